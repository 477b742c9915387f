pub mod dashboard;
pub mod login;
pub mod playlist_detail;

pub use dashboard::Dashboard;
pub use login::Login;
pub use playlist_detail::PlaylistDetail;
