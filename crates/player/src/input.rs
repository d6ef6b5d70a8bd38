use blockworld_common::BlockKind;

/// Keys sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInputs {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl HeldInputs {
    /// Intents currently held, in the order they are applied.
    pub fn intents(&self) -> impl Iterator<Item = MoveIntent> + '_ {
        MoveIntent::ALL.into_iter().filter(|intent| match intent {
            MoveIntent::Forward => self.forward,
            MoveIntent::Back => self.back,
            MoveIntent::Left => self.left,
            MoveIntent::Right => self.right,
        })
    }
}

/// A horizontal movement direction relative to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveIntent {
    pub const ALL: [MoveIntent; 4] = [
        MoveIntent::Forward,
        MoveIntent::Back,
        MoveIntent::Left,
        MoveIntent::Right,
    ];
}

/// A discrete action produced by the input layer.
///
/// Held movement keys travel separately as [`HeldInputs`]; everything else
/// the player can do in one press is an `Action`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rotate the view by a yaw and pitch delta in radians.
    Look { yaw: f32, pitch: f32 },
    Jump,
    /// Remove the targeted block.
    Mine,
    /// Place the selected kind against the targeted face.
    Place,
    SelectNext,
    SelectPrevious,
    /// Select a hotbar slot by zero-based index.
    SelectSlot(usize),
}

/// The block palette and the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotbar {
    slots: Vec<BlockKind>,
    selected: usize,
}

impl Default for Hotbar {
    fn default() -> Self {
        Self {
            slots: BlockKind::ALL.to_vec(),
            selected: 0,
        }
    }
}

impl Hotbar {
    pub fn selected(&self) -> BlockKind {
        self.slots[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn slots(&self) -> &[BlockKind] {
        &self.slots
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.slots.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + self.slots.len() - 1) % self.slots.len();
    }

    /// Select `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.slots.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_follow_held_keys() {
        let held = HeldInputs {
            forward: true,
            right: true,
            ..HeldInputs::default()
        };
        let intents: Vec<_> = held.intents().collect();
        assert_eq!(intents, vec![MoveIntent::Forward, MoveIntent::Right]);
        assert_eq!(HeldInputs::default().intents().count(), 0);
    }

    #[test]
    fn hotbar_wraps_both_ways() {
        let mut bar = Hotbar::default();
        assert_eq!(bar.selected(), BlockKind::Dirt);
        bar.previous();
        assert_eq!(bar.selected(), BlockKind::Leaves);
        bar.next();
        bar.next();
        assert_eq!(bar.selected(), BlockKind::Stone);
    }

    #[test]
    fn hotbar_select_ignores_out_of_range() {
        let mut bar = Hotbar::default();
        assert!(bar.select(3));
        assert_eq!(bar.selected(), BlockKind::Wood);
        assert!(!bar.select(5));
        assert_eq!(bar.selected_index(), 3);
    }
}
