use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::input::{InputEvent, Key};

const HORIZONTAL: [Key; 2] = [Key::Left, Key::Right];
const VERTICAL: [Key; 2] = [Key::Up, Key::Down];

/// Random walker that produces key events like a wandering player.
///
/// Holds a direction for a random number of frames, occasionally adds a
/// vertical key, and taps jump now and then.
pub struct WanderBot {
    rng: StdRng,
    held: Vec<Key>,
    frames_left: u32,
    jump_down: bool,
}

impl WanderBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            held: Vec::new(),
            frames_left: 0,
            jump_down: false,
        }
    }

    /// Forget held keys and the current hold, e.g. after the engine was
    /// reset. The next call picks a fresh hold.
    pub fn reset(&mut self) {
        self.held.clear();
        self.frames_left = 0;
        self.jump_down = false;
    }

    /// Key events for the next frame.
    pub fn next_inputs(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if self.jump_down {
            events.push(InputEvent::Released(Key::Jump));
            self.jump_down = false;
        } else if self.rng.gen_bool(0.01) {
            events.push(InputEvent::Pressed(Key::Jump));
            self.jump_down = true;
        }

        if self.frames_left > 0 {
            self.frames_left -= 1;
            return events;
        }

        for key in self.held.drain(..) {
            events.push(InputEvent::Released(key));
        }

        // Idle about a quarter of the time.
        if self.rng.gen_bool(0.75) {
            let key = HORIZONTAL[self.rng.gen_range(0..HORIZONTAL.len())];
            self.held.push(key);
            if self.rng.gen_bool(0.2) {
                self.held.push(VERTICAL[self.rng.gen_range(0..VERTICAL.len())]);
            }
        }
        for key in &self.held {
            events.push(InputEvent::Pressed(*key));
        }

        self.frames_left = self.rng.gen_range(15..120);
        events
    }
}
