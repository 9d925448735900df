//! Objects the Web Playback SDK hands to its event listeners and to `getCurrentState()`.

use std::time::Duration;

use serde::Deserialize;

use crate::util::duration_millis;

/// Payload of the `ready` and `not_ready` events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceEvent {
    pub device_id: String,
}

/// Payload of the SDK's error events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SdkErrorEvent {
    pub message: String,
}

/// The local playback state of the SDK player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebPlaybackState {
    paused: bool,
    #[serde(with = "duration_millis", default)]
    position: Duration,
    #[serde(with = "duration_millis", default)]
    duration: Duration,
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    repeat_mode: RepeatMode,
    #[serde(default)]
    context: PlaybackContext,
    #[serde(default)]
    track_window: TrackWindow,
}

/// The repeat mode as the SDK reports it: 0 is off, 1 repeats the context, 2 repeats the track.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum RepeatMode {
    #[default]
    Off,
    Context,
    Track,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackContext {
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackWindow {
    #[serde(default)]
    pub current_track: Option<WebPlaybackTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebPlaybackTrack {
    pub uri: String,
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<WebPlaybackArtist>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebPlaybackArtist {
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
}

impl From<u8> for RepeatMode {
    fn from(value: u8) -> Self {
        match value {
            1 => RepeatMode::Context,
            2 => RepeatMode::Track,
            _ => RepeatMode::Off,
        }
    }
}

impl WebPlaybackState {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// The URI of the context being played, if any.
    pub fn context_uri(&self) -> Option<&str> {
        self.context.uri.as_deref()
    }

    pub fn current_track(&self) -> Option<&WebPlaybackTrack> {
        self.track_window.current_track.as_ref()
    }
}

impl WebPlaybackTrack {
    /// The artist names joined with commas.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: &str = r#"{
        "context": { "uri": "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8", "metadata": {} },
        "disallows": { "pausing": false, "skipping_prev": true },
        "paused": false,
        "position": 12000,
        "duration": 215000,
        "repeat_mode": 1,
        "shuffle": true,
        "track_window": {
            "current_track": {
                "uri": "spotify:track:2pDPOMX0kWA7kcPBcDCQBu",
                "id": "2pDPOMX0kWA7kcPBcDCQBu",
                "type": "track",
                "name": "Some Song",
                "is_playable": true,
                "artists": [
                    { "uri": "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8", "name": "First" },
                    { "uri": "spotify:artist:6pNgnvzBa6Bthsv8SrZJYl", "name": "Second" }
                ]
            },
            "previous_tracks": [],
            "next_tracks": []
        }
    }"#;

    #[test]
    fn full_state() {
        let state: WebPlaybackState = serde_json::from_str(STATE).unwrap();

        assert!(!state.is_paused());
        assert_eq!(state.position(), Duration::from_secs(12));
        assert_eq!(state.duration(), Duration::from_secs(215));
        assert!(state.shuffle());
        assert_eq!(state.repeat_mode(), RepeatMode::Context);
        assert_eq!(state.context_uri(), Some("spotify:artist:4NqH3V7GS0Igs1VyGMXEi8"));

        let track = state.current_track().unwrap();
        assert_eq!(track.name, "Some Song");
        assert_eq!(track.artist_names(), "First, Second");
    }

    #[test]
    fn minimal_paused_state() {
        let state: WebPlaybackState = serde_json::from_str(r#"{"paused": true}"#).unwrap();

        assert!(state.is_paused());
        assert_eq!(state.repeat_mode(), RepeatMode::Off);
        assert!(state.current_track().is_none());
        assert!(state.context_uri().is_none());
    }

    #[test]
    fn ready_event() {
        let event: DeviceEvent = serde_json::from_str(r#"{"device_id": "abc123"}"#).unwrap();
        assert_eq!(event.device_id, "abc123");
    }
}
