use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::participant::{ParticipantId, ParticipantState};

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// The single room every connection joins.
pub const DEFAULT_ROOM: &str = "room1";

// === Server -> Client ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ServerMsg {
    /// Sent only to the connection that was just allocated
    #[serde(rename = "joined")]
    Joined(JoinedMsg),
    #[serde(rename = "updatedMovement")]
    UpdatedMovement(ParticipantState),
    #[serde(rename = "left")]
    Left(LeftMsg),
    #[serde(rename = "gravityTick")]
    GravityTick,
    #[serde(rename = "gravUpdate")]
    GravUpdate(GravUpdateMsg),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMsg {
    pub protocol_version: u32,
    pub room: String,
    pub participant: ParticipantState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeftMsg {
    pub id: ParticipantId,
}

/// Advisory answer to `calculateGravity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GravUpdateMsg {
    pub new_dest: f64,
    pub grav_multiplier: f64,
    pub falling: bool,
}

// === Client -> Server ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "movementUpdate")]
    MovementUpdate(ParticipantState),
    #[serde(rename = "calculateGravity")]
    CalculateGravity(CalculateGravityMsg),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculateGravityMsg {
    /// Fall speed the caller is currently carrying
    pub grav_mult: f64,
    pub square: ParticipantState,
}
