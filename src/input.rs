//! Input surface
//!
//! Raw pointer/keyboard events collapse to a single logical command. Hosts
//! translate their native events into [`InputEvent`].

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowUp,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` / `key` string
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" | " " => Key::Space,
            "ArrowUp" => Key::ArrowUp,
            "Enter" | "NumpadEnter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// A raw input event from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Mouse button, pen or touch press
    PointerDown,
    KeyDown(Key),
}

/// What the session should do with an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flap (or start, outside of play)
    Impulse,
    /// Start / replay only
    Start,
}

/// Map an input to a command. Everything is ignored while a text field or
/// modal overlay has focus.
pub fn command_for(event: InputEvent, overlay_focused: bool) -> Option<Command> {
    if overlay_focused {
        return None;
    }
    match event {
        InputEvent::PointerDown => Some(Command::Impulse),
        InputEvent::KeyDown(Key::Space | Key::ArrowUp) => Some(Command::Impulse),
        InputEvent::KeyDown(Key::Enter) => Some(Command::Start),
        InputEvent::KeyDown(Key::Other) => None,
    }
}
