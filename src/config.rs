use std::path::PathBuf;

use color_eyre::eyre::{Context, eyre};
use directories::ProjectDirs;
use url::Url;

use crate::{audio::config::AudioConfig, model::track::TrackFilter};

pub const SCOPES: &str = "user-top-read user-follow-read playlist-read-private user-library-read";

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1/";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: Option<String>,
    pub redirect_uri: Url,
    pub authorize_url: Url,
    pub scopes: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub api_base: Url,
    pub track_filter: TrackFilter,
    pub data_dir: PathBuf,
    pub audio: AudioConfig,
}

impl Config {
    pub fn from_env() -> color_eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> color_eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let redirect_uri = var("SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        let authorize_url =
            var("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string());
        let mut api_base = var("SPOTIFY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        let track_filter = match var("SPOTLITE_TRACK_FILTER") {
            Some(raw) => raw.parse()?,
            None => TrackFilter::default(),
        };

        let data_dir = match var("SPOTLITE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        Ok(Self {
            auth: AuthConfig {
                client_id: var("SPOTIFY_CLIENT_ID"),
                redirect_uri: Url::parse(&redirect_uri)
                    .wrap_err_with(|| format!("Invalid SPOTIFY_REDIRECT_URI: {redirect_uri}"))?,
                authorize_url: Url::parse(&authorize_url)
                    .wrap_err_with(|| format!("Invalid SPOTIFY_AUTH_URL: {authorize_url}"))?,
                scopes: SCOPES.to_string(),
            },
            api_base: Url::parse(&api_base)
                .wrap_err_with(|| format!("Invalid SPOTIFY_API_BASE: {api_base}"))?,
            track_filter,
            data_dir,
            audio: AudioConfig::default(),
        })
    }
}

fn default_data_dir() -> color_eyre::Result<PathBuf> {
    ProjectDirs::from("", "", "spotlite")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or(eyre!("Could not determine a data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[("SPOTLITE_DATA_DIR", "/tmp/spotlite")])).unwrap();

        assert_eq!(config.auth.client_id, None);
        assert_eq!(config.auth.redirect_uri.as_str(), DEFAULT_REDIRECT_URI);
        assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(config.track_filter, TrackFilter::PlayableOnly);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/spotlite"));
        assert_eq!(config.auth.scopes, SCOPES);
    }

    #[test]
    fn api_base_gains_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            ("SPOTLITE_DATA_DIR", "/tmp/spotlite"),
            ("SPOTIFY_API_BASE", "http://localhost:9000/v1"),
            ("SPOTLITE_TRACK_FILTER", "all"),
            ("SPOTIFY_CLIENT_ID", "abc"),
        ]))
        .unwrap();

        assert_eq!(config.api_base.as_str(), "http://localhost:9000/v1/");
        assert_eq!(config.track_filter, TrackFilter::All);
        assert_eq!(config.auth.client_id.as_deref(), Some("abc"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(
            Config::from_lookup(lookup(&[
                ("SPOTLITE_DATA_DIR", "/tmp/spotlite"),
                ("SPOTLITE_TRACK_FILTER", "sometimes"),
            ]))
            .is_err()
        );
        assert!(
            Config::from_lookup(lookup(&[
                ("SPOTLITE_DATA_DIR", "/tmp/spotlite"),
                ("SPOTIFY_REDIRECT_URI", "not a url"),
            ]))
            .is_err()
        );
    }
}
