use gtk::gdk::{self, ModifierType};

use crate::text_map::NavDirection;

use super::key_action::KeyAction;

/// Result of key processing
#[derive(Debug, PartialEq)]
pub enum KeyResult {
    /// Key was handled, execute this action
    Action(KeyAction),
    /// Key was not handled here
    Unhandled,
}

/// Map a key press to a reader action.
/// Arrow keys and hjkl move the finger; q and Escape close the window.
pub fn handle_reader_key(keyval: gdk::Key, modifiers: ModifierType) -> KeyResult {
    // Leave Ctrl/Alt combinations to the toolkit
    if modifiers.intersects(ModifierType::CONTROL_MASK | ModifierType::ALT_MASK) {
        return KeyResult::Unhandled;
    }

    let action = match keyval {
        gdk::Key::h | gdk::Key::Left | gdk::Key::KP_Left => {
            KeyAction::MoveCursor(NavDirection::Left)
        }
        gdk::Key::l | gdk::Key::Right | gdk::Key::KP_Right => {
            KeyAction::MoveCursor(NavDirection::Right)
        }
        gdk::Key::k | gdk::Key::Up | gdk::Key::KP_Up => KeyAction::MoveCursor(NavDirection::Up),
        gdk::Key::j | gdk::Key::Down | gdk::Key::KP_Down => {
            KeyAction::MoveCursor(NavDirection::Down)
        }
        gdk::Key::q | gdk::Key::Escape => KeyAction::Close,
        _ => return KeyResult::Unhandled,
    };

    KeyResult::Action(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(keyval: gdk::Key) -> KeyResult {
        handle_reader_key(keyval, ModifierType::empty())
    }

    #[test]
    fn test_arrows_and_vim_keys_move() {
        let cases = [
            (gdk::Key::Left, NavDirection::Left),
            (gdk::Key::h, NavDirection::Left),
            (gdk::Key::Right, NavDirection::Right),
            (gdk::Key::l, NavDirection::Right),
            (gdk::Key::Up, NavDirection::Up),
            (gdk::Key::k, NavDirection::Up),
            (gdk::Key::Down, NavDirection::Down),
            (gdk::Key::j, NavDirection::Down),
        ];
        for (keyval, direction) in cases {
            assert_eq!(
                plain(keyval),
                KeyResult::Action(KeyAction::MoveCursor(direction))
            );
        }
    }

    #[test]
    fn test_close_keys() {
        assert_eq!(plain(gdk::Key::q), KeyResult::Action(KeyAction::Close));
        assert_eq!(plain(gdk::Key::Escape), KeyResult::Action(KeyAction::Close));
    }

    #[test]
    fn test_other_keys_are_unhandled() {
        assert_eq!(plain(gdk::Key::a), KeyResult::Unhandled);
        assert_eq!(plain(gdk::Key::Tab), KeyResult::Unhandled);
    }

    #[test]
    fn test_control_combinations_are_unhandled() {
        let result = handle_reader_key(gdk::Key::j, ModifierType::CONTROL_MASK);
        assert_eq!(result, KeyResult::Unhandled);
    }
}
