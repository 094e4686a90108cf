// walls_bot/bot/src/systems/mod.rs
pub mod navigator;
pub mod physics;

pub use navigator::{AgentState, Navigator};
