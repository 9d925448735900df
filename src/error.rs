use thiserror::Error;

use crate::model::ItemType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("The state in the authorization redirect does not match the original state")]
    AuthorizationStateMismatch,
    #[error("The authorization redirect did not contain an access token")]
    MissingAccessToken,
    #[error("The user did not authorize the application: {0}")]
    AuthorizationDenied(String),

    #[error("The access token expired. The user should be reauthorized")]
    AccessTokenExpired,
    #[error("Request rate limit hit; retry after {0} seconds")]
    RateLimit(u64),
    #[error("The required scope for the endpoint hasn't been granted by the user")]
    MissingScope,
    #[error(
        "The endpoint is forbidden. The user likely removed the application's access to their account or doesn't \
         have a Premium subscription"
    )]
    Forbidden,
    #[error("No active device found to target playback on")]
    NoActiveDevice,
    #[error(
        "Missing or invalid Retry-After header in 429 rate-limit response. This is likely an issue on Spotify's side"
    )]
    InvalidRateLimitResponse,
    #[error("Unhandled API error {0}: {1}")]
    UnhandledSpotifyError(u16, String),

    #[error("Spotify player is not ready yet")]
    PlayerNotReady,
    #[error("User is not playing music through the Web Playback SDK")]
    NoPlaybackState,
    #[error("Web Playback SDK error: {0}")]
    Sdk(String),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Cookie value contains characters that cannot be stored in a cookie: {0:?}")]
    InvalidCookieValue(String),

    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("The input string is not a Spotify URI or URL: {0}")]
    MalformedString(String),
    #[error("Invalid Spotify ID: {0}")]
    InvalidId(String),
    #[error("Unknown item type: {0}")]
    InvalidItemType(String),
    #[error("{0:?} is not a playable context")]
    WrongItemType(ItemType),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid redirect URI {0:?}: {1}")]
    InvalidRedirectUri(String, url::ParseError),
    #[error("Invalid player volume {0:?}; expected a number between 0 and 1")]
    InvalidVolume(String),
    #[error("Invalid context URI: {0}")]
    InvalidContext(#[from] IdError),
    #[error("Invalid log level {0:?}")]
    InvalidLogLevel(String),
    #[error("Invalid boolean {0:?} for {1}")]
    InvalidFlag(String, &'static str),
}
