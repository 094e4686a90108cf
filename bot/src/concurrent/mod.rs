// walls_bot/bot/src/concurrent/mod.rs
pub mod event_queue;
