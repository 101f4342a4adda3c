//! Arena session registry.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod config;
pub mod game_loop;
pub mod participant;
pub mod state;
pub mod ws;
