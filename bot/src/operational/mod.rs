// walls_bot/bot/src/operational/mod.rs
pub mod monitoring;
