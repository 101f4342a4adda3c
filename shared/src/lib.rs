//! Types shared by the arena server and its clients: the wire protocol,
//! participant state and the tuning constants both sides agree on.

pub mod config;
pub mod gravity;
pub mod participant;
pub mod protocol;
