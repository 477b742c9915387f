pub mod card;
pub mod controls;
pub mod gauge;
pub mod player;
pub mod profile_menu;
pub mod progress;
pub mod sidebar;
pub mod spinner;
