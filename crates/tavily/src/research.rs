pub mod client;
pub mod events;
pub mod options;
pub mod types;
