//! The one Web API endpoint the player talks to directly: starting playback of a context on the SDK's device.
//! Resuming and pausing go through the SDK player itself.

use const_format::concatcp;
use log::{debug, error, info, trace, warn};
use reqwest::{header, Client as AsyncClient, Response, StatusCode, Url};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    model::{
        error::{ApiErrorMessage, ApiErrorResponse},
        id::PlayableContext,
    },
    token::AccessToken,
};

const API_BASE_URL: &str = "https://api.spotify.com/v1/";
const API_PLAYER_PLAY_ENDPOINT: &str = concatcp!(API_BASE_URL, "me/player/play");

const DEVICE_ID_QUERY: &str = "device_id";

#[derive(Debug, Serialize)]
struct PlayContextBody<'a> {
    context_uri: &'a PlayableContext,
}

/// A Web API client authenticated with the user's access token.
#[derive(Debug, Clone)]
pub struct WebApiClient {
    access_token: AccessToken,
    http_client: AsyncClient,
}

impl WebApiClient {
    pub fn new(access_token: AccessToken) -> Self {
        Self {
            access_token,
            http_client: AsyncClient::new(),
        }
    }

    /// Start playing a context; artist, album, playlist or show.
    ///
    /// If `device_id` is supplied, playback will be targeted on that device. If not supplied, playback will be targeted
    /// on the user's currently active device.
    ///
    /// Required scope: [UserModifyPlaybackState](crate::scope::Scope::UserModifyPlaybackState).
    pub async fn play_context(&self, context: &PlayableContext, device_id: Option<&str>) -> Result<()> {
        let url = build_play_url(device_id);
        let body = PlayContextBody { context_uri: context };

        trace!("Play body: {:?}", body);

        let response = self
            .http_client
            .put(url)
            .bearer_auth(self.access_token.as_str())
            .json(&body)
            .send()
            .await?;

        trace!("Play response: {:?}", response);

        handle_player_control_response(response).await?;
        info!("Started playing {}", context);

        Ok(())
    }
}

fn build_play_url(device_id: Option<&str>) -> Url {
    let mut url = Url::parse(API_PLAYER_PLAY_ENDPOINT)
        .expect("failed to build play endpoint URL: invalid base URL (this is likely a bug)");

    if let Some(device_id) = device_id {
        url.query_pairs_mut().append_pair(DEVICE_ID_QUERY, device_id);
    }

    url
}

async fn handle_player_control_response(response: Response) -> Result<()> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|header| header.to_str().ok())
        .map(str::to_owned);

    if status.is_success() && status != StatusCode::OK {
        return player_control_result(status, retry_after.as_deref(), "");
    }

    let body = response.text().await?;
    player_control_result(status, retry_after.as_deref(), &body)
}

/// Maps a player control response to a result. Nothing here is retried; rate limits are reported back as errors.
fn player_control_result(status: StatusCode, retry_after: Option<&str>, body: &str) -> Result<()> {
    match status {
        StatusCode::NO_CONTENT | StatusCode::ACCEPTED => Ok(()),

        StatusCode::UNAUTHORIZED => {
            warn!("Got 401 Unauthorized response");

            match parse_error_message(body) {
                Some(ApiErrorMessage::TokenExpired) => Err(Error::AccessTokenExpired),
                Some(ApiErrorMessage::PermissionsMissing) => {
                    error!("Missing required scope for the endpoint");
                    Err(Error::MissingScope)
                }
                other => Err(unhandled(status, other, body)),
            }
        }

        StatusCode::FORBIDDEN => {
            error!("Got 403 Forbidden response");
            Err(Error::Forbidden)
        }

        StatusCode::NOT_FOUND => {
            debug!("Got 404 Not Found response: {}", body);
            Err(Error::NoActiveDevice)
        }

        StatusCode::TOO_MANY_REQUESTS => match retry_after.and_then(|header| header.parse::<u64>().ok()) {
            Some(wait_time) => {
                warn!(
                    "Got 429 rate-limit response from Spotify with Retry-After: {}",
                    wait_time
                );
                Err(Error::RateLimit(wait_time))
            }
            None => {
                warn!("Invalid rate-limit response");
                Err(Error::InvalidRateLimitResponse)
            }
        },

        status => Err(unhandled(status, parse_error_message(body), body)),
    }
}

fn parse_error_message(body: &str) -> Option<ApiErrorMessage> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|response| response.error.message)
        .ok()
}

fn unhandled(status: StatusCode, message: Option<ApiErrorMessage>, body: &str) -> Error {
    let message = message
        .map(|message| message.describe().to_owned())
        .unwrap_or_else(|| body.to_owned());

    error!("Unexpected Spotify response {}: {}", status, message);
    Error::UnhandledSpotifyError(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_url_with_device() {
        assert_eq!(
            build_play_url(Some("abc 123")).as_str(),
            "https://api.spotify.com/v1/me/player/play?device_id=abc+123"
        );
        assert_eq!(
            build_play_url(None).as_str(),
            "https://api.spotify.com/v1/me/player/play"
        );
    }

    #[test]
    fn play_body() {
        let context = PlayableContext::from_uri("spotify:artist:4NqH3V7GS0Igs1VyGMXEi8").unwrap();
        let body = serde_json::to_value(PlayContextBody { context_uri: &context }).unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "context_uri": "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8" })
        );
    }

    #[test]
    fn success_statuses() {
        assert!(player_control_result(StatusCode::NO_CONTENT, None, "").is_ok());
        assert!(player_control_result(StatusCode::ACCEPTED, None, "").is_ok());
    }

    #[test]
    fn ok_with_body_is_unexpected() {
        assert!(matches!(
            player_control_result(StatusCode::OK, None, "{}"),
            Err(Error::UnhandledSpotifyError(200, _))
        ));
    }

    #[test]
    fn unauthorized_responses() {
        let expired = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let missing = r#"{"error": {"status": 401, "message": "Permissions missing"}}"#;
        let other = r#"{"error": {"status": 401, "message": "Invalid access token"}}"#;

        assert!(matches!(
            player_control_result(StatusCode::UNAUTHORIZED, None, expired),
            Err(Error::AccessTokenExpired)
        ));
        assert!(matches!(
            player_control_result(StatusCode::UNAUTHORIZED, None, missing),
            Err(Error::MissingScope)
        ));
        assert!(matches!(
            player_control_result(StatusCode::UNAUTHORIZED, None, other),
            Err(Error::UnhandledSpotifyError(401, message)) if message == "Invalid access token"
        ));
    }

    #[test]
    fn forbidden_and_not_found() {
        assert!(matches!(
            player_control_result(StatusCode::FORBIDDEN, None, ""),
            Err(Error::Forbidden)
        ));
        assert!(matches!(
            player_control_result(StatusCode::NOT_FOUND, None, ""),
            Err(Error::NoActiveDevice)
        ));
    }

    #[test]
    fn rate_limited() {
        assert!(matches!(
            player_control_result(StatusCode::TOO_MANY_REQUESTS, Some("5"), ""),
            Err(Error::RateLimit(5))
        ));
        assert!(matches!(
            player_control_result(StatusCode::TOO_MANY_REQUESTS, Some("soon"), ""),
            Err(Error::InvalidRateLimitResponse)
        ));
        assert!(matches!(
            player_control_result(StatusCode::TOO_MANY_REQUESTS, None, ""),
            Err(Error::InvalidRateLimitResponse)
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn response(status: u16, body: &'static str) -> Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn handles_no_content_response() {
        assert!(handle_player_control_response(response(204, "")).await.is_ok());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn reads_error_body() {
        let expired = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;

        assert!(matches!(
            handle_player_control_response(response(401, expired)).await,
            Err(Error::AccessTokenExpired)
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn reads_retry_after_header() {
        let response: Response = http::Response::builder()
            .status(429)
            .header(header::RETRY_AFTER, "7")
            .body("")
            .unwrap()
            .into();

        assert!(matches!(
            handle_player_control_response(response).await,
            Err(Error::RateLimit(7))
        ));
    }

    #[test]
    fn server_error_keeps_raw_body() {
        assert!(matches!(
            player_control_result(StatusCode::BAD_GATEWAY, None, "upstream down"),
            Err(Error::UnhandledSpotifyError(502, message)) if message == "upstream down"
        ));
    }
}
