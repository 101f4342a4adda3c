use arena_shared::participant::Intent;

/// Logical keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Jump,
}

impl Key {
    /// Map a browser `KeyboardEvent.which` code.
    pub fn from_code(code: u32) -> Option<Key> {
        match code {
            65 | 37 => Some(Key::Left),  // A, ArrowLeft
            68 | 39 => Some(Key::Right), // D, ArrowRight
            87 | 38 => Some(Key::Up),    // W, ArrowUp
            83 | 40 => Some(Key::Down),  // S, ArrowDown
            32 => Some(Key::Jump),       // Space
            _ => None,
        }
    }
}

/// A discrete intent change from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

impl InputEvent {
    pub fn from_key_code(code: u32, pressed: bool) -> Option<Self> {
        let key = Key::from_code(code)?;
        Some(if pressed {
            InputEvent::Pressed(key)
        } else {
            InputEvent::Released(key)
        })
    }
}

/// Set or clear the intent flag behind a directional key.
/// Returns false for keys that are not directional.
pub fn apply_to_intent(intent: &mut Intent, key: Key, held: bool) -> bool {
    match key {
        Key::Left => intent.moving_left = held,
        Key::Right => intent.moving_right = held,
        Key::Up => intent.moving_up = held,
        Key::Down => intent.moving_down = held,
        Key::Jump => return false,
    }
    true
}
