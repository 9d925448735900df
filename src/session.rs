//! Page session state shared by the UI.

use std::rc::Rc;

use log::debug;
use yew::{Reducible, UseReducerHandle};

use crate::{
    error::{Error, Result},
    model::playback::WebPlaybackState,
    token::AccessToken,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<AccessToken>,
    /// Assigned by the SDK once the player is ready.
    pub device_id: Option<String>,
    pub paused: bool,
    pub now_playing: Option<NowPlaying>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: String,
    pub artists: String,
}

pub enum SessionAction {
    SignIn(AccessToken),
    SignOut,
    DeviceReady(String),
    DeviceOffline(String),
    PlaybackChanged(Option<WebPlaybackState>),
}

pub type SessionContext = UseReducerHandle<Session>;

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            device_id: None,
            paused: true,
            now_playing: None,
        }
    }
}

impl Session {
    pub fn new(token: Option<AccessToken>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The device playback should be started on.
    pub fn play_target(&self) -> Result<&str> {
        self.device_id.as_deref().ok_or(Error::PlayerNotReady)
    }
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            SessionAction::SignIn(token) => {
                debug!("Signed in with {:?}", token);
                Rc::new(Session::new(Some(token)))
            }

            SessionAction::SignOut => {
                debug!("Signed out");
                Rc::new(Session::default())
            }

            SessionAction::DeviceReady(device_id) => Rc::new(Session {
                device_id: Some(device_id),
                ..(*self).clone()
            }),

            SessionAction::DeviceOffline(device_id) => {
                if self.device_id.as_deref() == Some(device_id.as_str()) {
                    Rc::new(Session {
                        device_id: None,
                        ..(*self).clone()
                    })
                } else {
                    self
                }
            }

            SessionAction::PlaybackChanged(Some(state)) => {
                let now_playing = state.current_track().map(|track| NowPlaying {
                    track: track.name.clone(),
                    artists: track.artist_names(),
                });

                Rc::new(Session {
                    paused: state.is_paused(),
                    now_playing,
                    ..(*self).clone()
                })
            }

            // playback moved to another device; keep showing the last known state
            SessionAction::PlaybackChanged(None) => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("BQD").unwrap()
    }

    fn signed_in() -> Rc<Session> {
        Rc::new(Session::default()).reduce(SessionAction::SignIn(token()))
    }

    fn playback(paused: bool) -> WebPlaybackState {
        serde_json::from_value(serde_json::json!({
            "paused": paused,
            "track_window": {
                "current_track": {
                    "uri": "spotify:track:2pDPOMX0kWA7kcPBcDCQBu",
                    "name": "Some Song",
                    "artists": [{ "name": "First" }]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn starts_paused_and_signed_out() {
        let session = Session::default();

        assert!(!session.is_authenticated());
        assert!(session.paused);
        assert!(matches!(session.play_target(), Err(Error::PlayerNotReady)));
    }

    #[test]
    fn device_lifecycle() {
        let session = signed_in().reduce(SessionAction::DeviceReady("device-1".to_owned()));
        assert_eq!(session.play_target().unwrap(), "device-1");

        // another device going offline doesn't matter
        let session = session.reduce(SessionAction::DeviceOffline("device-2".to_owned()));
        assert_eq!(session.device_id.as_deref(), Some("device-1"));

        let session = session.reduce(SessionAction::DeviceOffline("device-1".to_owned()));
        assert!(session.device_id.is_none());
        assert!(session.is_authenticated());
    }

    #[test]
    fn playback_changes() {
        let session = signed_in().reduce(SessionAction::PlaybackChanged(Some(playback(false))));

        assert!(!session.paused);
        assert_eq!(
            session.now_playing,
            Some(NowPlaying {
                track: "Some Song".to_owned(),
                artists: "First".to_owned()
            })
        );

        let session = session.reduce(SessionAction::PlaybackChanged(None));
        assert!(!session.paused);
        assert!(session.now_playing.is_some());

        let session = session.reduce(SessionAction::PlaybackChanged(Some(playback(true))));
        assert!(session.paused);
    }

    #[test]
    fn sign_out_clears_everything() {
        let session = signed_in()
            .reduce(SessionAction::DeviceReady("device-1".to_owned()))
            .reduce(SessionAction::PlaybackChanged(Some(playback(false))))
            .reduce(SessionAction::SignOut);

        assert_eq!(*session, Session::default());
    }

    #[test]
    fn sign_in_resets_device() {
        let session = signed_in()
            .reduce(SessionAction::DeviceReady("device-1".to_owned()))
            .reduce(SessionAction::SignIn(AccessToken::new("BQE").unwrap()));

        assert_eq!(session.token.as_ref().map(AccessToken::as_str), Some("BQE"));
        assert!(session.device_id.is_none());
    }
}
