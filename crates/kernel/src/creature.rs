use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;

use blockworld_common::{CreatureConfig, EntityId};

/// Behaviour state of a creature. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureState {
    Wandering,
    Chasing,
    Preparing,
}

impl fmt::Display for CreatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CreatureState::Wandering => "wandering",
            CreatureState::Chasing => "chasing",
            CreatureState::Preparing => "preparing",
        })
    }
}

/// A hostile creature driven by distance to the player.
///
/// Creatures never read the block registry: they walk through terrain and are
/// confined only by the square roaming boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: EntityId,
    pub position: Vec3,
    /// Direction of travel in radians, measured from +x toward +z.
    pub heading: f32,
    /// Rendered body yaw, eased toward `heading`.
    pub facing: f32,
    pub state: CreatureState,
    pub prepare_ticks: u32,
    pub color: [f32; 3],
    /// Leg swing phase in radians.
    pub stride_phase: f32,
}

impl Creature {
    /// A wandering creature at `position` with a random heading and stride.
    pub fn new(
        id: EntityId,
        position: Vec3,
        config: &CreatureConfig,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            position,
            heading: rng.gen_range(0.0..TAU),
            facing: 0.0,
            state: CreatureState::Wandering,
            prepare_ticks: 0,
            color: config.normal_color,
            stride_phase: rng.gen_range(0.0..TAU),
        }
    }

    /// Distance to `target` measured on the ground plane.
    pub fn ground_distance(&self, target: Vec3) -> f32 {
        Vec2::new(target.x - self.position.x, target.z - self.position.z).length()
    }

    /// Heights of the four legs relative to the body center.
    pub fn leg_heights(&self) -> [f32; 4] {
        std::array::from_fn(|i| -0.75 + (self.stride_phase + i as f32 * PI / 2.0).sin() * 0.1)
    }

    /// Advance one tick toward `player`. Returns the previous state when the
    /// state changed during this tick.
    pub fn update(
        &mut self,
        player: Vec3,
        config: &CreatureConfig,
        rng: &mut impl Rng,
    ) -> Option<CreatureState> {
        let before = self.state;
        self.stride_phase += config.stride_rate;

        self.transition(self.ground_distance(player), config, rng);
        let step = self.steer(player, config, rng);
        self.advance(step, config);
        self.ease_facing(config);

        (self.state != before).then_some(before)
    }

    fn transition(&mut self, distance: f32, config: &CreatureConfig, rng: &mut impl Rng) {
        if distance <= config.explosion_range {
            if self.state != CreatureState::Preparing {
                self.state = CreatureState::Preparing;
                self.prepare_ticks = 0;
            }
        } else if distance <= config.detection_range {
            // A creature already preparing keeps its fuse while the player
            // stays inside detection range.
            if self.state == CreatureState::Wandering {
                self.state = CreatureState::Chasing;
                self.color = config.normal_color;
            }
        } else if self.state != CreatureState::Wandering {
            self.state = CreatureState::Wandering;
            self.prepare_ticks = 0;
            self.color = config.normal_color;
            self.heading = rng.gen_range(0.0..TAU);
        }
    }

    /// Ground-plane displacement for this tick.
    fn steer(&mut self, player: Vec3, config: &CreatureConfig, rng: &mut impl Rng) -> Vec2 {
        match self.state {
            CreatureState::Wandering => {
                if rng.gen_bool(config.turn_chance) {
                    self.heading += rng.gen_range(-config.max_turn..=config.max_turn);
                }
                heading_vector(self.heading) * config.wander_speed
            }
            CreatureState::Chasing => {
                self.heading = (player.z - self.position.z).atan2(player.x - self.position.x);
                heading_vector(self.heading) * config.chase_speed
            }
            CreatureState::Preparing => {
                self.prepare_ticks += 1;
                let flash = (self.prepare_ticks as f32 * config.flash_frequency).sin() * 0.5 + 0.5;
                self.color = lerp_color(config.normal_color, config.flash_color, flash);
                let half = config.shake_amount / 2.0;
                let jitter = if half > 0.0 {
                    Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
                } else {
                    Vec2::ZERO
                };
                if self.prepare_ticks >= config.max_prepare_ticks {
                    tracing::debug!(id = ?self.id, "creature fuse expired");
                    self.state = CreatureState::Wandering;
                    self.prepare_ticks = 0;
                    self.color = config.normal_color;
                }
                jitter
            }
        }
    }

    fn advance(&mut self, step: Vec2, config: &CreatureConfig) {
        let limit = config.roam_limit;
        let next = Vec2::new(self.position.x, self.position.z) + step;
        if (next.x.abs() > limit || next.y.abs() > limit) && self.state == CreatureState::Wandering {
            self.heading += PI;
        }
        // Clamp after moving so a single large step cannot cross the boundary.
        self.position.x = next.x.clamp(-limit, limit);
        self.position.z = next.y.clamp(-limit, limit);
    }

    fn ease_facing(&mut self, config: &CreatureConfig) {
        self.facing += wrap_angle(self.heading - self.facing) * config.facing_smoothing;
    }
}

fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Wrap an angle difference into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}
