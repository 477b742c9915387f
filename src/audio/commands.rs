use std::time::Duration;

use crate::model::track::Track;

#[derive(Debug, Clone)]
pub enum AudioCommand {
    PlayTrack(Track),
    TogglePlay,
    Next,
    Previous,
    Stop,
    Seek(Duration),
    SeekToOffset { offset: u16, width: u16 },
    SeekForward,
    SeekBackward,
    SetVolume(u8),
    VolumeUp,
    VolumeDown,
    ToggleMute,
}
