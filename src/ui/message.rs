#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    Quit,

    // Transport
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    ToggleMute,

    // Navigation
    GoBack,
    GoForward,
    GoHome,
    ToggleFocus,
    ToggleProfileMenu,
    Logout,
}
