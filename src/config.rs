//! Player configuration.
//!
//! A page compiled to WebAssembly has no process environment, so the configuration is baked in when the crate is
//! compiled: every setting can be overridden with an environment variable at build time, e.g.
//!
//! ```text
//! SPOTIFY_CLIENT_ID=... SPOTIFY_REDIRECT_URI=https://player.example.com/ trunk build --release
//! ```

use log::Level;
use url::Url;

use crate::{
    error::ConfigError,
    implicit_grant::{ImplicitGrantBuilder, IncompleteImplicitGrant},
    model::id::PlayableContext,
    scope::{Scope, WEB_PLAYBACK_SCOPES},
};

pub const DEFAULT_CLIENT_ID: &str = "cfe6dca828d640e9ae3a74e53817be89";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173";
pub const DEFAULT_PLAYER_NAME: &str = "Rust Web Player";
pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_CONTEXT_URI: &str = "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8";

/// Session storage key for the state of an authorization that is in progress.
pub const AUTHORIZATION_STATE_KEY: &str = "spotify_authorization_state";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<Scope>,
    pub show_dialog: bool,
    /// The device name shown in Spotify's device list.
    pub player_name: String,
    /// Initial volume between 0 and 1.
    pub volume: f32,
    /// What the "Play Artist" button plays.
    pub context: PlayableContext,
    pub log_level: Level,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_owned(),
            scopes: WEB_PLAYBACK_SCOPES.to_vec(),
            show_dialog: false,
            player_name: DEFAULT_PLAYER_NAME.to_owned(),
            volume: DEFAULT_VOLUME,
            context: PlayableContext::from_uri(DEFAULT_CONTEXT_URI)
                .expect("default context URI is invalid (this is a bug)"),
            log_level: Level::Info,
        }
    }
}

impl PlayerConfig {
    /// Reads the configuration from the environment variables set when the crate was compiled.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            let value = match name {
                "SPOTIFY_CLIENT_ID" => option_env!("SPOTIFY_CLIENT_ID"),
                "SPOTIFY_REDIRECT_URI" => option_env!("SPOTIFY_REDIRECT_URI"),
                "SPOTIFY_SHOW_DIALOG" => option_env!("SPOTIFY_SHOW_DIALOG"),
                "SPOTIFY_PLAYER_NAME" => option_env!("SPOTIFY_PLAYER_NAME"),
                "SPOTIFY_PLAYER_VOLUME" => option_env!("SPOTIFY_PLAYER_VOLUME"),
                "SPOTIFY_CONTEXT_URI" => option_env!("SPOTIFY_CONTEXT_URI"),
                "LOG_LEVEL" => option_env!("LOG_LEVEL"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Builds the configuration from a variable lookup, falling back to the defaults for unset or blank
    /// variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let client_id = lookup("SPOTIFY_CLIENT_ID").unwrap_or(defaults.client_id);

        let redirect_uri = lookup("SPOTIFY_REDIRECT_URI").unwrap_or(defaults.redirect_uri);
        Url::parse(&redirect_uri).map_err(|err| ConfigError::InvalidRedirectUri(redirect_uri.clone(), err))?;

        let show_dialog = match lookup("SPOTIFY_SHOW_DIALOG") {
            Some(value) => parse_flag(&value, "SPOTIFY_SHOW_DIALOG")?,
            None => defaults.show_dialog,
        };

        let volume = match lookup("SPOTIFY_PLAYER_VOLUME") {
            Some(value) => parse_volume(&value)?,
            None => defaults.volume,
        };

        let context = match lookup("SPOTIFY_CONTEXT_URI") {
            Some(value) => PlayableContext::from_url_or_uri(value.trim())?,
            None => defaults.context,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(value.clone()))?,
            None => defaults.log_level,
        };

        Ok(Self {
            client_id,
            redirect_uri,
            scopes: defaults.scopes,
            show_dialog,
            player_name: lookup("SPOTIFY_PLAYER_NAME").unwrap_or(defaults.player_name),
            volume,
            context,
            log_level,
        })
    }

    /// Starts a new implicit grant for this application.
    pub fn implicit_grant(&self) -> IncompleteImplicitGrant {
        ImplicitGrantBuilder::new(&self.client_id, &self.redirect_uri)
            .scopes(self.scopes.iter().copied())
            .show_dialog(self.show_dialog)
            .build()
    }
}

fn parse_volume(value: &str) -> Result<f32, ConfigError> {
    match value.trim().parse::<f32>() {
        Ok(volume) if (0.0..=1.0).contains(&volume) => Ok(volume),
        _ => Err(ConfigError::InvalidVolume(value.to_owned())),
    }
}

fn parse_flag(value: &str, name: &'static str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(value.to_owned(), name)),
    }
}
