use arena_shared::config::ArenaConfig;
use arena_shared::gravity::step_gravity;

/// Vertical motion state of the local participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalState {
    Grounded,
    Airborne,
}

/// Local-only vertical physics. Remote participants are never integrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPhysics {
    pub fall_speed: f64,
    pub vertical: VerticalState,
}

impl LocalPhysics {
    /// State of a freshly joined participant: falling from rest.
    pub fn airborne() -> Self {
        Self {
            fall_speed: 0.0,
            vertical: VerticalState::Airborne,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.vertical == VerticalState::Airborne
    }

    /// Apply one gravity tick to the vertical target.
    pub fn apply_tick(&mut self, target_y: &mut f64, config: &ArenaConfig) {
        let step = step_gravity(*target_y, self.fall_speed, config);
        *target_y = step.new_dest;
        self.fall_speed = step.fall_speed;
        self.vertical = if step.falling {
            VerticalState::Airborne
        } else {
            VerticalState::Grounded
        };
    }

    /// Lift the vertical target by the jump offset. No-op while airborne.
    pub fn jump(&mut self, target_y: &mut f64, config: &ArenaConfig) -> bool {
        if self.is_airborne() {
            return false;
        }
        *target_y -= config.jump_offset;
        self.vertical = VerticalState::Airborne;
        true
    }
}
