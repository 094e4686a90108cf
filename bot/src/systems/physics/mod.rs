// walls_bot/bot/src/systems/physics/mod.rs
pub mod collision;
pub mod practice;

pub use practice::{Opponent, PracticeArena};
