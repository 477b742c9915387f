use std::time::Duration;

use crate::{
    auth::RedirectOutcome,
    model::view::{PlaylistCard, PlaylistModel, ProfileView, UserPlaylistEntry},
};

#[derive(Debug, Clone)]
pub enum Event {
    // Session
    /// The consent page was opened; carries its URL for manual use.
    AuthStarted(String),
    AuthRedirect(RedirectOutcome),
    AuthFailed(String),

    // Fetch results
    ProfileFetched(ProfileView),
    UserPlaylistsFetched(Vec<UserPlaylistEntry>),
    FeaturedPlaylistsFetched(Vec<PlaylistCard>),
    TopPlaylistsFetched(Vec<PlaylistCard>),
    PlaylistFetched(PlaylistModel),
    FetchError(String),
    SessionRejected,

    // Audio element lifecycle
    Audio(AudioEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Carries the clip URL so late events for a replaced clip are dropped.
    MetadataLoaded {
        source: String,
        total: Option<Duration>,
    },
    Play,
    Pause,
    Ended,
    Failed {
        source: String,
        reason: String,
    },
}
