//! A browser playback device, backed by the Web Playback SDK.

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use log::{debug, error, info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;

use crate::{
    error::{Error, Result},
    model::playback::{DeviceEvent, SdkErrorEvent, WebPlaybackState},
    sdk::{js_error, SdkPlayer},
    token::AccessToken,
};

const READY_EVENT: &str = "ready";
const NOT_READY_EVENT: &str = "not_ready";
const STATE_CHANGED_EVENT: &str = "player_state_changed";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// The device name shown in Spotify Connect.
    pub name: String,
    /// Initial volume between 0 and 1.
    pub volume: f32,
    pub token: AccessToken,
}

/// Something the SDK player reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The player is connected and can be targeted with the given device ID.
    Ready { device_id: String },
    /// The device has gone offline.
    NotReady { device_id: String },
    /// The local playback state changed. `None` when playback moved away from this player.
    StateChanged(Option<WebPlaybackState>),
    Error { kind: PlayerErrorKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorKind {
    /// The browser doesn't support the SDK (e.g. no EME).
    Initialization,
    /// The access token is invalid or lacks the `streaming` scope.
    Authentication,
    /// The user's account can't stream; the SDK requires Premium.
    Account,
    /// Loading or playing back a track failed.
    Playback,
}

/// What toggling playback should do given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Resume,
    Pause,
}

type EventClosure = Closure<dyn FnMut(JsValue)>;

/// An SDK player. The player disconnects from Spotify and unregisters its listeners when dropped.
pub struct WebPlayer {
    inner: SdkPlayer,
    // kept alive for as long as the SDK may call them
    _token_callback: Closure<dyn FnMut(Function)>,
    listeners: Vec<(&'static str, EventClosure)>,
}

impl PlayerErrorKind {
    pub const ALL: [PlayerErrorKind; 4] = [
        PlayerErrorKind::Initialization,
        PlayerErrorKind::Authentication,
        PlayerErrorKind::Account,
        PlayerErrorKind::Playback,
    ];

    /// The SDK event this kind of error is reported through.
    pub fn event_name(self) -> &'static str {
        match self {
            PlayerErrorKind::Initialization => "initialization_error",
            PlayerErrorKind::Authentication => "authentication_error",
            PlayerErrorKind::Account => "account_error",
            PlayerErrorKind::Playback => "playback_error",
        }
    }
}

/// Decides how to toggle playback. Without a local playback state there is nothing to toggle.
pub fn toggle_action(state: Option<&WebPlaybackState>) -> Result<PlaybackAction> {
    match state {
        Some(state) if state.is_paused() => Ok(PlaybackAction::Resume),
        Some(_) => Ok(PlaybackAction::Pause),
        None => Err(Error::NoPlaybackState),
    }
}

impl WebPlayer {
    /// Creates a player and subscribes `on_event` to everything it reports. The SDK must already be loaded, see
    /// [load_sdk](crate::sdk::load_sdk).
    pub fn new<F>(options: &PlayerOptions, on_event: F) -> Result<Self>
    where
        F: Fn(PlayerEvent) + 'static,
    {
        let on_event: Rc<dyn Fn(PlayerEvent)> = Rc::new(on_event);

        let token = JsValue::from_str(options.token.as_str());
        let token_callback = Closure::<dyn FnMut(Function)>::new(move |callback: Function| {
            if let Err(err) = callback.call1(&JsValue::NULL, &token) {
                error!("Failed to hand the access token to the SDK: {:?}", err);
            }
        });

        let sdk_options = Object::new();
        Reflect::set(&sdk_options, &"name".into(), &JsValue::from_str(&options.name)).map_err(js_error)?;
        Reflect::set(&sdk_options, &"getOAuthToken".into(), token_callback.as_ref()).map_err(js_error)?;
        Reflect::set(&sdk_options, &"volume".into(), &JsValue::from_f64(options.volume.into())).map_err(js_error)?;

        let mut player = Self {
            inner: SdkPlayer::new(&sdk_options),
            _token_callback: token_callback,
            listeners: Vec::new(),
        };

        player.listen(READY_EVENT, Rc::clone(&on_event), |payload| {
            let event: DeviceEvent = decode(payload)?;
            info!("Ready with Device ID {}", event.device_id);
            Ok(PlayerEvent::Ready {
                device_id: event.device_id,
            })
        })?;

        player.listen(NOT_READY_EVENT, Rc::clone(&on_event), |payload| {
            let event: DeviceEvent = decode(payload)?;
            warn!("Device ID has gone offline {}", event.device_id);
            Ok(PlayerEvent::NotReady {
                device_id: event.device_id,
            })
        })?;

        player.listen(STATE_CHANGED_EVENT, Rc::clone(&on_event), |payload| {
            let state: Option<WebPlaybackState> = decode(payload)?;
            Ok(PlayerEvent::StateChanged(state))
        })?;

        for kind in PlayerErrorKind::ALL {
            player.listen(kind.event_name(), Rc::clone(&on_event), move |payload| {
                let event: SdkErrorEvent = decode(payload)?;
                error!("Web Playback SDK {}: {}", kind.event_name(), event.message);
                Ok(PlayerEvent::Error {
                    kind,
                    message: event.message,
                })
            })?;
        }

        Ok(player)
    }

    fn listen<D>(&mut self, event: &'static str, on_event: Rc<dyn Fn(PlayerEvent)>, decode_event: D) -> Result<()>
    where
        D: Fn(JsValue) -> Result<PlayerEvent> + 'static,
    {
        let closure = EventClosure::new(move |payload: JsValue| match decode_event(payload) {
            Ok(event) => on_event(event),
            Err(err) => error!("Failed to decode Web Playback SDK {} event: {}", event, err),
        });

        if !self.inner.add_listener(event, closure.as_ref().unchecked_ref()) {
            return Err(Error::Sdk(format!("failed to register listener for {event}")));
        }

        self.listeners.push((event, closure));
        Ok(())
    }

    /// Connects the player to Spotify. Resolves to whether the connection succeeded; the device ID arrives later
    /// through [PlayerEvent::Ready].
    pub async fn connect(&self) -> Result<bool> {
        debug!("Connecting the Web Playback SDK player");
        let connected = JsFuture::from(self.inner.connect()).await.map_err(js_error)?;
        Ok(connected.as_bool().unwrap_or(false))
    }

    pub fn disconnect(&self) {
        debug!("Disconnecting the Web Playback SDK player");
        self.inner.disconnect();
    }

    /// The local playback state, or `None` if the user isn't playing music through this player.
    pub async fn current_state(&self) -> Result<Option<WebPlaybackState>> {
        let state = JsFuture::from(self.inner.get_current_state())
            .await
            .map_err(js_error)?;
        decode(state)
    }

    pub async fn resume(&self) -> Result<()> {
        JsFuture::from(self.inner.resume()).await.map_err(js_error)?;
        info!("Resumed playback!");
        Ok(())
    }

    pub async fn pause(&self) -> Result<()> {
        JsFuture::from(self.inner.pause()).await.map_err(js_error)?;
        info!("Paused playback!");
        Ok(())
    }

    /// Resumes paused playback or pauses playing playback, returning what was done.
    pub async fn toggle(&self) -> Result<PlaybackAction> {
        let state = self.current_state().await?;
        let action = toggle_action(state.as_ref())?;

        match action {
            PlaybackAction::Resume => self.resume().await?,
            PlaybackAction::Pause => self.pause().await?,
        }

        Ok(action)
    }
}

impl Drop for WebPlayer {
    fn drop(&mut self) {
        for (event, _) in &self.listeners {
            self.inner.remove_listener(event);
        }
        self.disconnect();
    }
}

fn decode<T>(value: JsValue) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_wasm_bindgen::from_value(value).map_err(|err| Error::Sdk(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(paused: bool) -> WebPlaybackState {
        serde_json::from_value(serde_json::json!({ "paused": paused })).unwrap()
    }

    #[test]
    fn toggle_paused_resumes() {
        assert_eq!(toggle_action(Some(&state(true))).unwrap(), PlaybackAction::Resume);
    }

    #[test]
    fn toggle_playing_pauses() {
        assert_eq!(toggle_action(Some(&state(false))).unwrap(), PlaybackAction::Pause);
    }

    #[test]
    fn toggle_without_state() {
        assert!(matches!(toggle_action(None), Err(Error::NoPlaybackState)));
    }

    #[test]
    fn error_event_names() {
        let names: Vec<_> = PlayerErrorKind::ALL.iter().map(|kind| kind.event_name()).collect();
        assert_eq!(
            names,
            ["initialization_error", "authentication_error", "account_error", "playback_error"]
        );
    }
}
