use crate::player::MoveInput;
use crate::session::Action;
use crate::shop::ItemKind;
use bevy::prelude::*;

/// Actions pressed since the last simulation tick.
///
/// Key presses are sampled every frame but the simulation steps on a fixed
/// clock, so presses are buffered here until the next tick drains them.
#[derive(Resource, Default, Debug)]
pub struct PendingActions {
    queue: Vec<Action>,
}

impl PendingActions {
    pub fn push(&mut self, action: Action) {
        self.queue.push(action);
    }

    pub fn drain(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Key bindings for one-shot actions
pub const ACTION_BINDINGS: [(KeyCode, Action); 11] = [
    (KeyCode::Space, Action::Chop),
    (KeyCode::KeyP, Action::SellWood),
    (KeyCode::KeyE, Action::UseFood),
    (KeyCode::KeyH, Action::UsePotion),
    (KeyCode::KeyG, Action::CatchGoblin),
    (KeyCode::KeyL, Action::InteractLeprechaun),
    (KeyCode::KeyB, Action::ToggleShop),
    (KeyCode::Digit1, Action::QuickBuy(ItemKind::Food)),
    (KeyCode::Digit2, Action::QuickBuy(ItemKind::Potion)),
    (KeyCode::Digit3, Action::QuickBuy(ItemKind::BetterAxe)),
    (KeyCode::Digit4, Action::QuickBuy(ItemKind::Protection)),
];

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    ACTION_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, action)| *action)
}

/// Arrows or WASD
pub fn movement_from_keys(keys: &ButtonInput<KeyCode>) -> MoveInput {
    MoveInput {
        left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        up: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
        down: keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
    }
}

/// Queue every action whose key went down this frame
pub fn collect_actions(keys: Res<ButtonInput<KeyCode>>, mut pending: ResMut<PendingActions>) {
    for key in keys.get_just_pressed() {
        if let Some(action) = action_for_key(*key) {
            pending.push(action);
        }
    }
}
