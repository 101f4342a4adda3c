use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Opaque participant id, assigned by the registry when a connection opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Per-axis linear blend. `alpha` 0 is `self`, 1 is `to`.
    pub fn lerp(self, to: Position, alpha: f64) -> Position {
        Position {
            x: lerp(self.x, to.x, alpha),
            y: lerp(self.y, to.y, alpha),
        }
    }
}

#[inline]
pub fn lerp(v0: f64, v1: f64, alpha: f64) -> f64 {
    (1.0 - alpha) * v0 + alpha * v1
}

/// Currently held directional inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Intent {
    pub fn horizontal(&self) -> bool {
        self.moving_left || self.moving_right
    }

    pub fn vertical(&self) -> bool {
        self.moving_up || self.moving_down
    }

    pub fn any(&self) -> bool {
        self.horizontal() || self.vertical()
    }
}

/// Sprite facing. The discriminant is the sprite-sheet row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    DownLeft = 0,
    #[default]
    Down = 1,
    DownRight = 2,
    Left = 3,
    UpLeft = 4,
    Right = 5,
    UpRight = 6,
    Up = 7,
}

impl Facing {
    pub fn row(self) -> u32 {
        self as u32
    }

    /// Facing after applying `intent`.
    ///
    /// A single axis of intent selects a cardinal facing. Mixed horizontal and
    /// vertical intent keeps `current`, so the diagonal rows are only ever
    /// carried over from an earlier state, never selected here.
    pub fn from_intent(intent: Intent, current: Facing) -> Facing {
        let mut facing = current;
        if intent.moving_down && !intent.horizontal() {
            facing = Facing::Down;
        }
        if intent.moving_up && !intent.horizontal() {
            facing = Facing::Up;
        }
        if intent.moving_left && !intent.vertical() {
            facing = Facing::Left;
        }
        if intent.moving_right && !intent.vertical() {
            facing = Facing::Right;
        }
        facing
    }
}

/// The unit of synchronization: one per connected participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantState {
    pub id: ParticipantId,
    /// Freshness token; receivers apply an update only when this grows
    #[ts(type = "number")]
    pub version: u64,
    /// Last rendered position
    pub position: Position,
    pub previous_position: Position,
    pub target_position: Position,
    pub interpolation_progress: f64,
    pub intent: Intent,
    pub facing: Facing,
    pub animation_frame: u8,
    pub animation_frame_counter: u32,
    #[serde(default)]
    pub fall_velocity: f64,
}

impl ParticipantState {
    /// Fresh state at the origin with no held intent.
    pub fn new(id: ParticipantId, version: u64) -> Self {
        Self {
            id,
            version,
            position: Position::default(),
            previous_position: Position::default(),
            target_position: Position::default(),
            interpolation_progress: 0.0,
            intent: Intent::default(),
            facing: Facing::default(),
            animation_frame: 0,
            animation_frame_counter: 0,
            fall_velocity: 0.0,
        }
    }
}
