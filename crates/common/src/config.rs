//! Tuning constants for the sandbox, grouped by subsystem.
//!
//! Units: distances in world units (one voxel edge = 1.0), speeds in world
//! units per tick, durations in ticks unless a field says otherwise.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration. Every section falls back to its defaults when
/// omitted from a YAML document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub physics: PhysicsConfig,
    pub creature: CreatureConfig,
    pub world: WorldConfig,
}

/// Player movement and collision probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Horizontal displacement per held direction per tick.
    pub move_speed: f32,
    /// Subtracted from vertical velocity every tick.
    pub gravity: f32,
    pub jump_force: f32,
    pub double_jump_force: f32,
    /// Lowest vertical velocity (negative, units/tick).
    pub terminal_velocity: f32,
    /// Eye height above the surface the player stands on.
    pub floor_offset: f32,
    /// Ground rays start this far above the feet.
    pub ground_probe_margin: f32,
    /// Ground contact when the nearest downward hit is at most this far.
    pub ground_contact_distance: f32,
    /// Head contact when the upward hit is closer than this.
    pub ceiling_clearance: f32,
    pub player_radius: f32,
    /// Eye-relative heights of the wall probe rows.
    pub wall_probe_heights: Vec<f32>,
    /// Maximum reach for block targeting.
    pub interaction_range: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            gravity: 0.015,
            jump_force: 0.2,
            double_jump_force: 0.15,
            terminal_velocity: -0.4,
            floor_offset: 1.8,
            ground_probe_margin: 0.1,
            ground_contact_distance: 0.5,
            ceiling_clearance: 1.0,
            player_radius: 0.3,
            wall_probe_heights: vec![-1.0, -0.5, 0.0, 0.5, 1.0],
            interaction_range: 5.0,
        }
    }
}

/// Creature behaviour thresholds and animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    /// Ground-plane distance at which a creature starts chasing.
    pub detection_range: f32,
    /// Ground-plane distance at which a creature starts preparing.
    pub explosion_range: f32,
    /// Ticks spent preparing before resetting to wandering.
    pub max_prepare_ticks: u32,
    pub wander_speed: f32,
    pub chase_speed: f32,
    /// Per-tick probability of a random heading change while wandering.
    pub turn_chance: f64,
    /// Largest heading change in radians (applied as a uniform +/- range).
    pub max_turn: f32,
    /// Creatures are clamped to `[-roam_limit, roam_limit]` on x and z.
    pub roam_limit: f32,
    /// Fraction of the remaining facing error closed each tick.
    pub facing_smoothing: f32,
    /// Peak-to-peak jitter per axis while preparing.
    pub shake_amount: f32,
    /// Angular frequency (radians per prepare tick) of the flash.
    pub flash_frequency: f32,
    /// Leg animation phase advance per tick.
    pub stride_rate: f32,
    pub normal_color: [f32; 3],
    pub flash_color: [f32; 3],
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            detection_range: 5.0,
            explosion_range: 2.0,
            max_prepare_ticks: 30,
            wander_speed: 0.05,
            chase_speed: 0.08,
            turn_chance: 0.02,
            max_turn: std::f32::consts::FRAC_PI_4,
            roam_limit: 19.0,
            facing_smoothing: 0.1,
            shake_amount: 0.05,
            flash_frequency: 0.3,
            stride_rate: 0.05,
            normal_color: rgb(0x50b54c),
            flash_color: rgb(0xffffff),
        }
    }
}

/// Generation-time conventions. The registry itself never enforces these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    /// Ground is laid for x and z in `-terrain_extent..=terrain_extent`.
    pub terrain_extent: i32,
    /// Trees and creatures spawn at integer x and z in `-spawn_extent..spawn_extent`.
    pub spawn_extent: i32,
    pub tree_count: usize,
    pub initial_creatures: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            terrain_extent: 20,
            spawn_extent: 18,
            tree_count: 10,
            initial_creatures: 5,
        }
    }
}

/// Convert a packed `0xRRGGBB` color to linear floats in `0.0..=1.0`.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

impl SandboxConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let positive = [
            ("physics.move_speed", p.move_speed),
            ("physics.gravity", p.gravity),
            ("physics.jump_force", p.jump_force),
            ("physics.double_jump_force", p.double_jump_force),
            ("physics.floor_offset", p.floor_offset),
            ("physics.player_radius", p.player_radius),
            ("physics.ground_contact_distance", p.ground_contact_distance),
            ("physics.ceiling_clearance", p.ceiling_clearance),
            ("physics.interaction_range", p.interaction_range),
            ("creature.detection_range", self.creature.detection_range),
            ("creature.explosion_range", self.creature.explosion_range),
            ("creature.wander_speed", self.creature.wander_speed),
            ("creature.chase_speed", self.creature.chase_speed),
            ("creature.roam_limit", self.creature.roam_limit),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if p.terminal_velocity >= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.terminal_velocity must be negative, got {}",
                p.terminal_velocity
            )));
        }
        if p.wall_probe_heights.is_empty() {
            return Err(ConfigError::Invalid(
                "physics.wall_probe_heights must not be empty".into(),
            ));
        }
        let c = &self.creature;
        if c.explosion_range >= c.detection_range {
            return Err(ConfigError::Invalid(format!(
                "creature.explosion_range ({}) must be below detection_range ({})",
                c.explosion_range, c.detection_range
            )));
        }
        if !(0.0..=1.0).contains(&c.turn_chance) {
            return Err(ConfigError::Invalid(format!(
                "creature.turn_chance must be a probability, got {}",
                c.turn_chance
            )));
        }
        if c.max_turn.is_nan() || c.max_turn < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "creature.max_turn must be non-negative, got {}",
                c.max_turn
            )));
        }
        if c.max_prepare_ticks == 0 {
            return Err(ConfigError::Invalid(
                "creature.max_prepare_ticks must be at least 1".into(),
            ));
        }
        let w = &self.world;
        if w.spawn_extent <= 0 {
            return Err(ConfigError::Invalid(format!(
                "world.spawn_extent must be positive, got {}",
                w.spawn_extent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        SandboxConfig::default().validate().unwrap();
    }

    #[test]
    fn yaml_round_trip_preserves_values() {
        let mut config = SandboxConfig::default();
        config.physics.move_speed = 0.25;
        config.world.seed = 7;
        let yaml = config.to_yaml().unwrap();
        let parsed = SandboxConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let parsed = SandboxConfig::from_yaml_str("creature:\n  chase_speed: 0.12\n").unwrap();
        assert_eq!(parsed.creature.chase_speed, 0.12);
        assert_eq!(parsed.creature.detection_range, 5.0);
        assert_eq!(parsed.physics, PhysicsConfig::default());
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = SandboxConfig::from_yaml_str(
            "creature:\n  detection_range: 2.0\n  explosion_range: 3.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_upward_terminal_velocity() {
        let mut config = SandboxConfig::default();
        config.physics.terminal_velocity = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_or_nan_max_turn() {
        let mut config = SandboxConfig::default();
        config.creature.max_turn = -0.5;
        assert!(config.validate().is_err());
        config.creature.max_turn = f32::NAN;
        assert!(config.validate().is_err());
        config.creature.max_turn = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn yaml_with_negative_max_turn_is_rejected() {
        let err = SandboxConfig::from_yaml_str("creature:\n  max_turn: -0.5\n  turn_chance: 1.0\n")
            .unwrap_err();
        assert!(err.to_string().contains("max_turn"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "world:\n  seed: 99\n  tree_count: 3").unwrap();
        let config = SandboxConfig::load(file.path()).unwrap();
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.tree_count, 3);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = SandboxConfig::load("/nonexistent/blockworld.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blockworld.yaml"));
    }

    #[test]
    fn rgb_unpacks_channels() {
        assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
        let c = rgb(0x50b54c);
        assert!((c[0] - 80.0 / 255.0).abs() < 1e-6);
    }
}
