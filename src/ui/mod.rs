pub mod app;
pub mod components;
pub mod context;
pub mod input;
pub mod layout;
pub mod message;
pub mod router;
pub mod scroll;
pub mod state;
pub mod traits;
pub mod tui;
pub mod util;
pub mod views;
