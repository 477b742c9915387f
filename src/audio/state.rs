#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}
