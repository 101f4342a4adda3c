use arena_shared::config::ArenaConfig;
use arena_shared::participant::{ParticipantId, ParticipantState};

/// One sprite to draw this frame.
///
/// The source rectangle indexes the 8x8 sprite sheet: the column is the
/// animation frame, the row is the facing. The destination is the
/// participant's rendered position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub id: ParticipantId,
    pub is_local: bool,
    pub src_x: f64,
    pub src_y: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl SpriteFrame {
    pub fn for_state(state: &ParticipantState, is_local: bool, config: &ArenaConfig) -> Self {
        Self {
            id: state.id.clone(),
            is_local,
            src_x: f64::from(state.animation_frame) * config.sprite_width,
            src_y: f64::from(state.facing.row()) * config.sprite_height,
            width: config.sprite_width,
            height: config.sprite_height,
            x: state.position.x,
            y: state.position.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::participant::{Facing, Position};

    #[test]
    fn fresh_participant_uses_down_row_first_column() {
        let state = ParticipantState::new(ParticipantId::new("p"), 1);
        let frame = SpriteFrame::for_state(&state, true, &ArenaConfig::default());
        assert_eq!(frame.src_x, 0.0);
        assert_eq!(frame.src_y, 121.0);
        assert_eq!(frame.width, 61.0);
        assert_eq!(frame.height, 121.0);
        assert!(frame.is_local);
    }

    #[test]
    fn column_and_row_follow_animation_and_facing() {
        let mut state = ParticipantState::new(ParticipantId::new("p"), 1);
        state.animation_frame = 3;
        state.facing = Facing::Right;
        state.position = Position::new(42.5, 379.0);
        let frame = SpriteFrame::for_state(&state, false, &ArenaConfig::default());
        assert_eq!(frame.src_x, 183.0);
        assert_eq!(frame.src_y, 605.0);
        assert_eq!((frame.x, frame.y), (42.5, 379.0));
        assert!(!frame.is_local);
    }
}
