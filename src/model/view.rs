//! View models: plain data shaped from API payloads, consumed by the painters
//! in `ui`. Nothing here touches the terminal.

use scraper::Html;

use crate::http::model::{
    Image, Paging, Playlist, PlaylistListing, SimplifiedPlaylist, UserProfile,
};

use super::track::{Track, TrackFilter, project_tracks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub display_name: String,
    pub has_avatar: bool,
}

impl ProfileView {
    pub fn from_api(profile: &UserProfile) -> Self {
        Self {
            display_name: profile
                .display_name
                .clone()
                .unwrap_or_else(|| profile.id.clone()),
            has_avatar: profile.images.as_ref().is_some_and(|i| !i.is_empty()),
        }
    }

    pub fn greeting(&self) -> String {
        format!("Hello, {}", self.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl PlaylistCard {
    fn from_api(playlist: &SimplifiedPlaylist) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: playlist
                .description
                .as_deref()
                .map(strip_markup)
                .unwrap_or_default(),
            image_url: first_image(playlist.images.as_deref()),
        }
    }
}

pub fn playlist_cards(listing: &PlaylistListing) -> Vec<PlaylistCard> {
    listing
        .playlists
        .items
        .iter()
        .flatten()
        .map(PlaylistCard::from_api)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPlaylistEntry {
    pub id: String,
    pub name: String,
}

pub fn user_playlist_entries(page: &Paging<SimplifiedPlaylist>) -> Vec<UserPlaylistEntry> {
    page.items
        .iter()
        .map(|p| UserPlaylistEntry {
            id: p.id.clone(),
            name: p.name.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHeader {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// A fetched playlist, shaped for the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistModel {
    pub id: String,
    pub header: PlaylistHeader,
    pub tracks: Vec<Track>,
}

impl PlaylistModel {
    pub fn from_api(playlist: &Playlist, filter: TrackFilter) -> Self {
        Self {
            id: playlist.id.clone(),
            header: PlaylistHeader {
                name: playlist.name.clone(),
                description: playlist
                    .description
                    .as_deref()
                    .map(strip_markup)
                    .unwrap_or_default(),
                image_url: first_image(playlist.images.as_deref()),
            },
            tracks: project_tracks(&playlist.tracks.items, filter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

impl PlayIcon {
    pub fn for_playing(is_playing: bool) -> Self {
        if is_playing { Self::Pause } else { Self::Play }
    }

    pub fn transport_glyph(self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Pause => "⏸",
        }
    }

    pub fn row_glyph(self) -> &'static str {
        match self {
            Self::Play => "▷",
            Self::Pause => "❚❚",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub number: usize,
    pub id: String,
    pub title: String,
    pub artist_names: String,
    pub album_name: String,
    pub duration: String,
    pub is_selected: bool,
    pub is_current: bool,
    pub play_icon: PlayIcon,
    pub playable: bool,
}

/// Shapes table rows for a track list. Numbering follows list position, so a
/// filtered list is numbered without gaps.
pub fn track_rows(
    tracks: &[Track],
    selected_id: Option<&str>,
    current_id: Option<&str>,
    is_playing: bool,
) -> Vec<TrackRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = current_id == Some(track.id.as_str());
            TrackRow {
                number: i + 1,
                id: track.id.clone(),
                title: track.name.clone(),
                artist_names: track.artist_names.clone(),
                album_name: track.album_name.clone(),
                duration: format_time(track.duration_ms),
                is_selected: selected_id == Some(track.id.as_str()),
                is_current,
                play_icon: PlayIcon::for_playing(is_current && is_playing),
                playable: track.is_playable(),
            }
        })
        .collect()
}

/// Formats milliseconds as `m:ss`, rounding to the nearest second.
pub fn format_time(duration_ms: u64) -> String {
    let rounded_secs = (duration_ms + 500) / 1000;
    let minutes = rounded_secs / 60;
    let seconds = rounded_secs % 60;
    format!("{minutes}:{seconds:02}")
}

fn first_image(images: Option<&[Image]>) -> Option<String> {
    images.and_then(|i| i.first()).map(|i| i.url.clone())
}

/// Playlist descriptions arrive as HTML fragments; keep the decoded text only.
pub fn strip_markup(input: &str) -> String {
    Html::parse_fragment(input)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::model::{AlbumRef, FullTrack, PlaylistItem};

    fn track(id: &str, duration_ms: u64, preview: bool) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Song {id}"),
            artist_names: "Artist".to_string(),
            album_name: "Album".to_string(),
            duration_ms,
            preview_url: preview.then(|| format!("https://p/{id}.mp3")),
            image_url: None,
        }
    }

    #[test]
    fn format_time_matches_minute_second_display() {
        assert_eq!(format_time(125_000), "2:05");
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(61_000), "1:01");
        assert_eq!(format_time(59_600), "1:00");
        assert_eq!(format_time(30_000), "0:30");
        assert_eq!(format_time(3_600_000), "60:00");
    }

    #[test]
    fn rows_are_numbered_by_position_and_mark_playback() {
        let tracks = vec![track("a", 1_000, true), track("b", 2_000, true), track("c", 3_000, true)];
        let rows = track_rows(&tracks, Some("c"), Some("b"), true);

        assert_eq!(rows.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(rows[2].is_selected);
        assert!(rows[1].is_current);
        assert_eq!(rows[1].play_icon, PlayIcon::Pause);
        assert_eq!(rows[0].play_icon, PlayIcon::Play);

        let paused = track_rows(&tracks, None, Some("b"), false);
        assert_eq!(paused[1].play_icon, PlayIcon::Play);
    }

    #[test]
    fn fourth_row_duration_renders_in_minutes() {
        let mut tracks: Vec<_> = (0..5).map(|i| track(&i.to_string(), 1_000, true)).collect();
        tracks[3].duration_ms = 125_000;
        assert_eq!(track_rows(&tracks, None, None, false)[3].duration, "2:05");
    }

    #[test]
    fn playlist_model_numbers_after_filtering() {
        let api_track = |id: &str, preview: Option<&str>| FullTrack {
            id: Some(id.to_string()),
            name: id.to_string(),
            artists: vec![],
            album: AlbumRef {
                name: "Album".to_string(),
                images: vec![],
            },
            duration_ms: 1_000,
            preview_url: preview.map(str::to_string),
        };
        let playlist = Playlist {
            id: "pl".to_string(),
            name: "Mix".to_string(),
            description: Some("<a href=\"x\">Fresh</a> &amp; new".to_string()),
            images: None,
            tracks: Paging {
                items: vec![
                    PlaylistItem {
                        track: Some(api_track("a", None)),
                    },
                    PlaylistItem {
                        track: Some(api_track("b", Some("https://p/b.mp3"))),
                    },
                ],
                total: Some(2),
                next: None,
            },
        };

        let model = PlaylistModel::from_api(&playlist, TrackFilter::PlayableOnly);
        assert_eq!(model.header.description, "Fresh & new");
        assert_eq!(model.header.image_url, None);

        let rows = track_rows(&model.tracks, None, None, false);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].number, rows[0].id.as_str()), (1, "b"));

        let all = PlaylistModel::from_api(&playlist, TrackFilter::All);
        let rows = track_rows(&all.tracks, None, None, false);
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].playable);
    }

    #[test]
    fn cards_skip_null_listing_entries() {
        let listing: PlaylistListing = serde_json::from_value(serde_json::json!({
            "message": "Editor's picks",
            "playlists": {
                "items": [
                    { "id": "1", "name": "One", "description": "First", "images": [{ "url": "img1" }] },
                    null,
                    { "id": "2", "name": "Two", "description": null, "images": null }
                ]
            }
        }))
        .unwrap();

        let cards = playlist_cards(&listing);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].image_url.as_deref(), Some("img1"));
        assert_eq!(cards[1].description, "");
        assert_eq!(cards[1].image_url, None);
    }

    #[test]
    fn markup_is_stripped_and_every_entity_decoded() {
        assert_eq!(strip_markup("Rock &#x2F; Pop"), "Rock / Pop");
        assert_eq!(strip_markup("Today&#8217;s <i>hits</i>"), "Today\u{2019}s hits");
        assert_eq!(strip_markup("&nbsp;<b>Chill</b> &amp; focus&nbsp;"), "Chill & focus");
        assert_eq!(strip_markup("1 &lt; 2"), "1 < 2");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn profile_falls_back_to_user_id() {
        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({ "id": "u1", "display_name": null }))
                .unwrap();
        let view = ProfileView::from_api(&profile);
        assert_eq!(view.greeting(), "Hello, u1");
        assert!(!view.has_avatar);
    }
}
