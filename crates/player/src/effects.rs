use std::time::Duration;

use glam::Vec3;

use crate::kinematics::JumpKind;

/// How long a jump ring stays visible.
pub const RING_LIFETIME: Duration = Duration::from_millis(500);
/// Ring geometry in world units, for the renderer.
pub const RING_INNER_RADIUS: f32 = 0.5;
pub const RING_OUTER_RADIUS: f32 = 0.7;
pub const RING_COLOR: u32 = 0x00ff00;

/// Distance below the eye at which a ring spawns.
const RING_DROP: f32 = 0.5;

/// Expanding, fading ring left behind by a double jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpRing {
    pub position: Vec3,
    elapsed: Duration,
}

impl JumpRing {
    pub fn new(eye: Vec3) -> Self {
        Self {
            position: eye - Vec3::Y * RING_DROP,
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn progress(&self) -> f32 {
        self.elapsed.as_secs_f32() / RING_LIFETIME.as_secs_f32()
    }

    /// Uniform scale, growing from 1 to 2 over the lifetime.
    pub fn scale(&self) -> f32 {
        1.0 + self.progress()
    }

    /// Opacity, fading from 0.5 to 0 over the lifetime.
    pub fn opacity(&self) -> f32 {
        0.5 * (1.0 - self.progress())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed > RING_LIFETIME
    }
}

/// Transient effects, advanced by wall-clock time rather than world ticks.
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    rings: Vec<JumpRing>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_ring(&mut self, eye: Vec3) {
        let ring = JumpRing::new(eye);
        tracing::trace!(position = ?ring.position, "jump ring spawned");
        self.rings.push(ring);
    }

    /// React to a jump. Only double jumps leave a ring.
    pub fn on_jump(&mut self, kind: JumpKind, eye: Vec3) {
        if kind == JumpKind::Double {
            self.spawn_ring(eye);
        }
    }

    /// Age every effect by `dt` and drop the expired ones.
    /// Returns the number dropped.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let before = self.rings.len();
        for ring in &mut self.rings {
            ring.elapsed += dt;
        }
        self.rings.retain(|ring| !ring.is_expired());
        before - self.rings.len()
    }

    pub fn rings(&self) -> &[JumpRing] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}
