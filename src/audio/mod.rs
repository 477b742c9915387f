pub mod commands;
pub mod config;
pub mod error;
pub mod playback;
pub mod progress;
pub mod queue;
pub mod state;
pub mod system;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;
pub mod transport;
pub mod util;
