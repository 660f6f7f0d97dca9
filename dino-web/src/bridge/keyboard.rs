//! Keyboard controls for playing without a camera

use super::control::Command;

/// Map a `KeyboardEvent.code` to a command. `pressed` is false on key-up.
pub fn command_for_key(code: &str, pressed: bool) -> Option<Command> {
    match (code, pressed) {
        ("Space" | "ArrowUp", true) => Some(Command::Jump),
        ("ArrowDown", true) => Some(Command::BeginDuck),
        ("ArrowDown", false) => Some(Command::EndDuck),
        _ => None,
    }
}

/// Whether the host should `preventDefault()` the event (page scrolling keys)
pub fn is_game_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp" | "ArrowDown")
}
