/// Arena geometry and motion tuning.
///
/// Every value here is a per-frame or per-tick constant: motion advances once
/// per render callback or gravity tick, never by elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Largest horizontal target a sprite may reach (width minus sprite width)
    pub max_x: f64,
    /// Vertical target at which a falling sprite is grounded
    pub floor_y: f64,
    /// Horizontal target delta per frame while a horizontal intent is held
    pub step: f64,
    /// Interpolation progress added per rendered frame
    pub interpolation_increment: f64,
    /// Sub-frames drawn before the sprite column advances
    pub frames_per_animation_step: u32,
    pub animation_columns: u8,
    /// Fall speed gained per gravity tick
    pub gravity_per_tick: f64,
    pub max_fall_speed: f64,
    pub jump_offset: f64,
    pub sprite_width: f64,
    pub sprite_height: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            max_x: 439.0,
            floor_y: 379.0,
            step: 2.0,
            interpolation_increment: 0.05, // ~20 frames per segment
            frames_per_animation_step: 8,
            animation_columns: 8,
            gravity_per_tick: 1.0,
            max_fall_speed: 15.0,
            jump_offset: 75.0,
            sprite_width: 61.0,
            sprite_height: 121.0,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err("width must be finite and > 0".to_string());
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err("height must be finite and > 0".to_string());
        }
        if !self.max_x.is_finite() || self.max_x < 0.0 || self.max_x > self.width {
            return Err("max_x must lie within [0, width]".to_string());
        }
        if !self.floor_y.is_finite() || self.floor_y < 0.0 || self.floor_y > self.height {
            return Err("floor_y must lie within [0, height]".to_string());
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err("step must be finite and > 0".to_string());
        }
        if !(self.interpolation_increment > 0.0 && self.interpolation_increment <= 1.0) {
            return Err("interpolation_increment must be in (0, 1]".to_string());
        }
        if self.frames_per_animation_step == 0 {
            return Err("frames_per_animation_step must be > 0".to_string());
        }
        if self.animation_columns == 0 {
            return Err("animation_columns must be > 0".to_string());
        }
        if !self.gravity_per_tick.is_finite() || self.gravity_per_tick <= 0.0 {
            return Err("gravity_per_tick must be finite and > 0".to_string());
        }
        if !self.max_fall_speed.is_finite() || self.max_fall_speed < self.gravity_per_tick {
            return Err("max_fall_speed must be finite and >= gravity_per_tick".to_string());
        }
        if !self.jump_offset.is_finite() || self.jump_offset <= 0.0 {
            return Err("jump_offset must be finite and > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arena_config_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn play_area_leaves_room_for_sprite() {
        let config = ArenaConfig::default();
        assert_eq!(config.max_x + config.sprite_width, config.width);
        assert_eq!(config.floor_y + config.sprite_height, config.height);
    }

    #[test]
    fn max_x_outside_arena_invalid() {
        let config = ArenaConfig {
            max_x: 600.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interpolation_increment_invalid() {
        let config = ArenaConfig {
            interpolation_increment: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fall_cap_below_increment_invalid() {
        let config = ArenaConfig {
            max_fall_speed: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_jump_offset_invalid() {
        let config = ArenaConfig {
            jump_offset: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
