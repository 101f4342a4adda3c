//! Client side of the arena: reconciles relayed participant state into a
//! local mirror, drives the local participant and picks sprite frames.

pub mod bot;
pub mod connection;
pub mod engine;
pub mod error;
pub mod input;
pub mod mirror;
pub mod motion;
pub mod physics;
pub mod render;
