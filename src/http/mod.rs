pub mod error;
pub mod model;

use std::{sync::RwLock, time::Duration};

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Session;

use self::{
    error::ApiError,
    model::{Paging, Playlist, PlaylistListing, SimplifiedPlaylist, UserProfile},
};

pub mod endpoint {
    pub const USER_INFO: &str = "me";
    pub const USER_PLAYLISTS: &str = "me/playlists";
    pub const FEATURED_PLAYLISTS: &str = "browse/featured-playlists?limit=5";
    pub const TOP_PLAYLISTS: &str = "browse/categories/toplists/playlists?limit=10";
    pub const PLAYLIST: &str = "playlists";
}

pub struct ApiService {
    client: Client,
    base_url: Url,
    authorization: RwLock<Option<String>>,
}

impl ApiService {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("spotlite/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            authorization: RwLock::new(None),
        })
    }

    /// The underlying HTTP client, shared with the audio backend for preview downloads.
    pub fn http(&self) -> Client {
        self.client.clone()
    }

    pub fn set_session(&self, session: &Session) {
        let mut authorization = self.authorization.write().unwrap_or_else(|e| e.into_inner());
        *authorization = Some(session.authorization_header());
    }

    pub fn clear_session(&self) {
        let mut authorization = self.authorization.write().unwrap_or_else(|e| e.into_inner());
        *authorization = None;
    }

    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|source| ApiError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let authorization = self
            .authorization
            .read()
            .ok()
            .and_then(|a| a.clone())
            .ok_or(ApiError::NoSession)?;

        debug!(url = %url, "Fetching");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint, "Access token rejected");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Parse {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn fetch_user_profile(&self) -> Result<UserProfile, ApiError> {
        self.fetch(endpoint::USER_INFO).await
    }

    pub async fn fetch_user_playlists(&self) -> Result<Paging<SimplifiedPlaylist>, ApiError> {
        self.fetch(endpoint::USER_PLAYLISTS).await
    }

    pub async fn fetch_featured_playlists(&self) -> Result<PlaylistListing, ApiError> {
        self.fetch(endpoint::FEATURED_PLAYLISTS).await
    }

    pub async fn fetch_top_playlists(&self) -> Result<PlaylistListing, ApiError> {
        self.fetch(endpoint::TOP_PLAYLISTS).await
    }

    pub async fn fetch_playlist(&self, playlist_id: &str) -> Result<Playlist, ApiError> {
        self.fetch(&format!("{}/{playlist_id}", endpoint::PLAYLIST))
            .await
    }
}
