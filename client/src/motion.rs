use arena_shared::config::ArenaConfig;
use arena_shared::participant::ParticipantState;

/// Advance the interpolation segment by one frame and recompute the drawn
/// position. Once progress reaches 1 the position rests on the target.
pub fn interpolate(state: &mut ParticipantState, increment: f64) {
    state.interpolation_progress = (state.interpolation_progress + increment).clamp(0.0, 1.0);
    state.position = state
        .previous_position
        .lerp(state.target_position, state.interpolation_progress);
}

/// Advance the walk cycle by one frame.
///
/// Participants with held intent, or still partway through a cycle, count
/// sub-frames; every `frames_per_step`th one moves to the next column.
pub fn advance_animation(state: &mut ParticipantState, frames_per_step: u32, columns: u8) {
    if state.animation_frame == 0 && !state.intent.any() {
        return;
    }

    state.animation_frame_counter = state.animation_frame_counter.wrapping_add(1);
    if state.animation_frame_counter % frames_per_step == 0 {
        state.animation_frame = if state.animation_frame + 1 < columns {
            state.animation_frame + 1
        } else {
            0
        };
    }
}

/// Move the horizontal target by one step per held horizontal intent,
/// clamped to the play area.
pub fn step_horizontal(state: &mut ParticipantState, config: &ArenaConfig) {
    let mut x = state.target_position.x;
    if state.intent.moving_left {
        x -= config.step;
    }
    if state.intent.moving_right {
        x += config.step;
    }
    state.target_position.x = x.clamp(0.0, config.max_x);
}
