pub mod attachment;
pub mod sessions;
pub mod timers;
pub mod types;
