//! Implicit-grant authorization: the provider returns the access token in the
//! redirect fragment, so there is no code exchange and no refresh token.

pub mod listener;

use thiserror::Error;
use tracing::{info, warn};
use url::{Url, form_urlencoded};

use crate::{
    config::AuthConfig,
    storage::{ACCESS_TOKEN, EXPIRES_IN, Storage, StorageError, TOKEN_TYPE},
};

pub use listener::RedirectListener;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("SPOTIFY_CLIENT_ID is not set")]
    MissingClientId,

    #[error("Redirect URI {0} has no host or port")]
    InvalidRedirectUri(String),

    #[error("Failed to bind redirect listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Timed out waiting for the authorization redirect")]
    Timeout,

    #[error("Authorization window closed without a redirect")]
    Abandoned,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl Session {
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Authorized(Session),
    /// The user declined, the provider reported an error, or no token came back.
    Denied { error: Option<String> },
}

pub fn authorize_url(config: &AuthConfig) -> Result<Url, AuthError> {
    let client_id = config.client_id.as_deref().ok_or(AuthError::MissingClientId)?;

    let mut url = config.authorize_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "token")
        .append_pair("redirect_uri", config.redirect_uri.as_str())
        .append_pair("scope", &config.scopes)
        .append_pair("show_dialog", "true");
    Ok(url)
}

/// Reads the outcome of an authorization redirect from the full redirect URL.
/// Both the fragment and the query are inspected, since providers report
/// errors in either.
pub fn parse_redirect(href: &str) -> RedirectOutcome {
    let Ok(url) = Url::parse(href) else {
        return RedirectOutcome::Denied {
            error: Some("malformed redirect".to_string()),
        };
    };

    let params: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .chain(form_urlencoded::parse(url.fragment().unwrap_or_default().as_bytes()).into_owned())
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    if let Some(error) = param("error") {
        return RedirectOutcome::Denied { error: Some(error) };
    }

    match param("access_token").filter(|t| !t.is_empty()) {
        Some(access_token) => RedirectOutcome::Authorized(Session {
            access_token,
            token_type: param("token_type").unwrap_or_else(|| "Bearer".to_string()),
            expires_in: param("expires_in")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }),
        None => RedirectOutcome::Denied { error: None },
    }
}

/// Persists the session of a successful redirect. A denied redirect leaves
/// storage untouched.
pub fn complete_authorization(
    storage: &Storage,
    outcome: &RedirectOutcome,
) -> Result<Option<Session>, AuthError> {
    match outcome {
        RedirectOutcome::Authorized(session) => {
            storage.set_item(ACCESS_TOKEN, session.access_token.as_str())?;
            storage.set_item(TOKEN_TYPE, session.token_type.as_str())?;
            storage.set_item(EXPIRES_IN, session.expires_in.to_string())?;
            info!(expires_in = session.expires_in, "Authorization complete");
            Ok(Some(session.clone()))
        }
        RedirectOutcome::Denied { error } => {
            warn!(error = ?error, "Authorization denied");
            Ok(None)
        }
    }
}

pub fn load_session(storage: &Storage) -> Option<Session> {
    let access_token = storage.get_item(ACCESS_TOKEN)?;
    Some(Session {
        access_token,
        token_type: storage
            .get_item(TOKEN_TYPE)
            .unwrap_or_else(|| "Bearer".to_string()),
        expires_in: storage
            .get_item(EXPIRES_IN)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
    })
}

pub fn logout(storage: &Storage) -> Result<(), AuthError> {
    storage.remove_item(ACCESS_TOKEN)?;
    storage.remove_item(TOKEN_TYPE)?;
    storage.remove_item(EXPIRES_IN)?;
    info!("Signed out");
    Ok(())
}

/// Starts the redirect listener and opens the provider's consent page in the
/// system browser. The caller awaits the returned listener for the outcome.
pub async fn begin_authorization(config: &AuthConfig) -> Result<(Url, RedirectListener), AuthError> {
    let url = authorize_url(config)?;
    let listener = RedirectListener::bind(&config.redirect_uri).await?;

    if let Err(e) = open::that_detached(url.as_str()) {
        warn!(error = %e, "Could not open a browser, the URL must be opened manually");
    }

    Ok((url, listener))
}
