use std::time::Duration;

use blockworld_common::{BlockError, BlockKind};
use blockworld_kernel::{Block, World};

use crate::effects::EffectQueue;
use crate::input::{Action, HeldInputs, Hotbar};
use crate::interact::{self, Placement};
use crate::kinematics::{JumpKind, Player};

/// Run one frame of simulation.
///
/// While input is captured the world's cached player position is synced
/// first, then the player moves against the registry. The world ticks last,
/// so creatures see the position from the start of the frame.
pub fn advance_frame(world: &mut World, player: &mut Player, captured: bool) {
    if captured {
        world.update_player_position(player.eye.x, player.eye.y, player.eye.z);
        let physics = &world.config().physics;
        player.step(world.registry(), physics);
    }
    world.step();
}

/// What handling an [`Action`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Any action other than jump while not captured.
    Ignored,
    Looked,
    Jumped(JumpKind),
    /// Mine or place with nothing in reach.
    NoTarget,
    Mined(Block),
    Placed(Placement),
    Selected(BlockKind),
}

/// A world plus one player, as driven by a frontend.
#[derive(Debug, Clone)]
pub struct Session {
    pub world: World,
    pub player: Player,
    pub hotbar: Hotbar,
    pub effects: EffectQueue,
    /// Whether input is captured. Only jump applies while it is not.
    pub captured: bool,
}

impl Session {
    pub fn new(world: World) -> Self {
        Self {
            world,
            player: Player::default(),
            hotbar: Hotbar::default(),
            effects: EffectQueue::new(),
            captured: true,
        }
    }

    /// Sample held keys. A jump edge fires immediately.
    pub fn set_held_inputs(&mut self, inputs: HeldInputs) -> Option<JumpKind> {
        let kind = self
            .player
            .set_held_inputs(inputs, &self.world.config().physics)?;
        self.effects.on_jump(kind, self.player.eye);
        Some(kind)
    }

    pub fn handle(&mut self, action: Action) -> Result<Outcome, BlockError> {
        let physics = &self.world.config().physics;
        let outcome = match action {
            Action::Jump => {
                let kind = self.player.jump(physics);
                self.effects.on_jump(kind, self.player.eye);
                Outcome::Jumped(kind)
            }
            _ if !self.captured => Outcome::Ignored,
            Action::SelectNext => {
                self.hotbar.next();
                Outcome::Selected(self.hotbar.selected())
            }
            Action::SelectPrevious => {
                self.hotbar.previous();
                Outcome::Selected(self.hotbar.selected())
            }
            Action::SelectSlot(index) => {
                self.hotbar.select(index);
                Outcome::Selected(self.hotbar.selected())
            }
            Action::Look { yaw, pitch } => {
                self.player.look(yaw, pitch);
                Outcome::Looked
            }
            Action::Mine => {
                match interact::target(self.world.registry(), &self.player, physics) {
                    Some(hit) => match interact::mine(self.world.registry_mut(), &hit) {
                        Some(block) => Outcome::Mined(block),
                        None => Outcome::NoTarget,
                    },
                    None => Outcome::NoTarget,
                }
            }
            Action::Place => {
                match interact::target(self.world.registry(), &self.player, physics) {
                    Some(hit) => {
                        let physics = physics.clone();
                        let kind = self.hotbar.selected();
                        let eye = self.player.eye;
                        let placement =
                            interact::place(self.world.registry_mut(), &hit, eye, kind, &physics)?;
                        Outcome::Placed(placement)
                    }
                    None => Outcome::NoTarget,
                }
            }
        };
        Ok(outcome)
    }

    /// Advance one frame plus `dt` of wall-clock time for effects.
    pub fn frame(&mut self, dt: Duration) {
        advance_frame(&mut self.world, &mut self.player, self.captured);
        self.effects.advance(dt);
    }
}
