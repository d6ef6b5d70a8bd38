use glam::Vec3;

use blockworld_common::PhysicsConfig;
use blockworld_kernel::BlockRegistry;
use blockworld_query as query;

use crate::input::{HeldInputs, MoveIntent};

/// Eye position the player starts at.
pub const SPAWN_EYE: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Radians of rotation per pixel of pointer motion.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Pitch limit in degrees either side of the horizon.
const MAX_PITCH_DEGREES: f32 = 89.0;

/// What a jump request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Left the ground.
    Single,
    /// Second jump in mid-air.
    Double,
    /// No jump available.
    Denied,
}

/// First-person player body.
///
/// The eye is the tracked point; the feet sit `floor_offset` below it.
/// Orientation follows the usual first-person convention: yaw 0 looks down
/// -Z and positive yaw turns left.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical velocity in units per tick. Positive is up.
    pub velocity: f32,
    pub on_ground: bool,
    /// Single jump still available. Cleared on takeoff.
    pub can_jump: bool,
    /// Double jump still available. Cleared when it fires.
    pub double_jump: bool,
    /// Height of the last surface stood on.
    pub last_ground_y: f32,
    inputs: HeldInputs,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(SPAWN_EYE)
    }
}

impl Player {
    /// A player in mid-air at `eye`, with both jumps armed.
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            yaw: 0.0,
            pitch: 0.0,
            velocity: 0.0,
            on_ground: false,
            can_jump: true,
            double_jump: true,
            last_ground_y: 0.0,
            inputs: HeldInputs::default(),
        }
    }

    pub fn inputs(&self) -> HeldInputs {
        self.inputs
    }

    /// Replace the held inputs.
    ///
    /// Jump is edge-triggered: it fires only when the jump input goes from
    /// released to pressed. Returns the jump result when it fired.
    pub fn set_held_inputs(&mut self, inputs: HeldInputs, config: &PhysicsConfig) -> Option<JumpKind> {
        let pressed = inputs.jump && !self.inputs.jump;
        self.inputs = inputs;
        pressed.then(|| self.jump(config))
    }

    /// Attempt a jump.
    ///
    /// Grounded players take a full jump. Once airborne after a single jump,
    /// one weaker double jump is allowed. Both are restored only by landing.
    pub fn jump(&mut self, config: &PhysicsConfig) -> JumpKind {
        let kind = if self.on_ground {
            self.velocity = config.jump_force;
            self.can_jump = false;
            self.on_ground = false;
            JumpKind::Single
        } else if !self.can_jump && self.double_jump {
            self.velocity = config.double_jump_force;
            self.double_jump = false;
            JumpKind::Double
        } else {
            JumpKind::Denied
        };
        tracing::debug!(?kind, velocity = self.velocity, "jump");
        kind
    }

    /// Rotate the view. Pitch is clamped short of straight up or down.
    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let limit = MAX_PITCH_DEGREES.to_radians();
        self.yaw = (self.yaw + yaw_delta).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch_delta).clamp(-limit, limit);
    }

    /// Rotate the view from a pointer motion delta in pixels.
    pub fn look_pointer(&mut self, dx: f32, dy: f32) {
        self.look(-dx * MOUSE_SENSITIVITY, -dy * MOUSE_SENSITIVITY);
    }

    /// Unit view direction, including pitch.
    pub fn view_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// View direction flattened onto the ground plane.
    pub fn horizontal_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    /// Unit ground-plane direction for a movement intent.
    pub fn movement_direction(&self, intent: MoveIntent) -> Vec3 {
        let forward = self.horizontal_forward();
        let left = Vec3::Y.cross(forward).normalize_or_zero();
        match intent {
            MoveIntent::Forward => forward,
            MoveIntent::Back => -forward,
            MoveIntent::Left => left,
            MoveIntent::Right => -left,
        }
    }

    /// Feet height.
    pub fn feet_y(&self, config: &PhysicsConfig) -> f32 {
        self.eye.y - config.floor_offset
    }

    /// Advance one tick against the block registry.
    ///
    /// Gravity first, then ground snap, ceiling stop, vertical motion and
    /// finally each held movement intent on its own wall check. Combined
    /// intents are not normalized, so diagonals are faster.
    pub fn step(&mut self, registry: &BlockRegistry, config: &PhysicsConfig) {
        self.velocity = (self.velocity - config.gravity).max(config.terminal_velocity);

        let contact = query::ground(registry, self.eye, config);
        match contact.surface_y() {
            Some(surface) if contact.colliding => {
                if self.velocity <= 0.0 {
                    self.land(surface, config);
                }
            }
            _ => self.on_ground = false,
        }

        if self.velocity > 0.0 && query::ceiling(registry, self.eye, config) {
            tracing::trace!(eye = ?self.eye, "head bump");
            self.velocity = 0.0;
        }

        self.eye.y += self.velocity;

        let inputs = self.inputs;
        for intent in inputs.intents() {
            let direction = self.movement_direction(intent);
            if query::wall(registry, self.eye, direction, config) {
                continue;
            }
            self.eye += direction * config.move_speed;
        }
    }

    /// Snap the feet onto `surface` and re-arm both jumps.
    fn land(&mut self, surface: f32, config: &PhysicsConfig) {
        if !self.on_ground {
            tracing::debug!(surface, "landed");
        }
        self.eye.y = surface + config.floor_offset;
        self.velocity = 0.0;
        self.on_ground = true;
        self.can_jump = true;
        self.double_jump = true;
        self.last_ground_y = surface;
    }
}
