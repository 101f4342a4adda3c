use crate::config::ArenaConfig;

/// Result of one gravity tick applied to a vertical target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityStep {
    pub new_dest: f64,
    /// Fall speed to carry into the next tick
    pub fall_speed: f64,
    /// Still above the floor after this tick
    pub falling: bool,
}

/// Advance one gravity tick.
///
/// Fall speed grows by `gravity_per_tick` up to `max_fall_speed`. A target
/// above the floor drops by that speed, never past the floor. Reaching the
/// floor grounds it in the same tick and resets the fall speed.
pub fn step_gravity(dest_y: f64, fall_speed: f64, config: &ArenaConfig) -> GravityStep {
    let speed = (fall_speed.max(0.0) + config.gravity_per_tick).min(config.max_fall_speed);

    if dest_y < config.floor_y {
        let new_dest = (dest_y + speed).min(config.floor_y);
        if new_dest < config.floor_y {
            return GravityStep {
                new_dest,
                fall_speed: speed,
                falling: true,
            };
        }
    }

    GravityStep {
        new_dest: config.floor_y,
        fall_speed: 0.0,
        falling: false,
    }
}
