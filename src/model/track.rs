use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::model::{FullTrack, Image, PlaylistItem};

const ROW_IMAGE_HEIGHT: u32 = 64;

/// Client-side projection of a provider track, persisted as the last loaded
/// track list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist_names: String,
    pub album_name: String,
    pub duration_ms: u64,
    pub preview_url: Option<String>,
    pub image_url: Option<String>,
}

impl Track {
    pub fn from_api(track: &FullTrack) -> Option<Self> {
        let id = track.id.clone()?;
        let artist_names = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Some(Self {
            id,
            name: track.name.clone(),
            artist_names,
            album_name: track.album.name.clone(),
            duration_ms: track.duration_ms,
            preview_url: track.preview_url.clone().filter(|url| !url.is_empty()),
            image_url: row_image(&track.album.images).map(|i| i.url.clone()),
        })
    }

    pub fn is_playable(&self) -> bool {
        self.preview_url.is_some()
    }
}

/// Thumbnail-sized album art, falling back to the smallest image offered.
fn row_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .find(|img| img.height == Some(ROW_IMAGE_HEIGHT))
        .or_else(|| images.iter().min_by_key(|img| img.height.unwrap_or(u32::MAX)))
}

/// Which playlist items make it into the rendered track list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackFilter {
    /// Tracks without a preview clip are dropped before numbering.
    #[default]
    PlayableOnly,
    /// Every track is listed; those without a preview cannot be played.
    All,
}

#[derive(Error, Debug)]
#[error("Unknown track filter '{0}', expected 'playable' or 'all'")]
pub struct ParseTrackFilterError(String);

impl FromStr for TrackFilter {
    type Err = ParseTrackFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "playable" | "playable-only" => Ok(Self::PlayableOnly),
            "all" => Ok(Self::All),
            other => Err(ParseTrackFilterError(other.to_string())),
        }
    }
}

pub fn project_tracks(items: &[PlaylistItem], filter: TrackFilter) -> Vec<Track> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter_map(Track::from_api)
        .filter(|track| filter == TrackFilter::All || track.is_playable())
        .collect()
}
