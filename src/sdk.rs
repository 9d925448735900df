//! Bindings to the Spotify Web Playback SDK (`https://sdk.scdn.co/spotify-player.js`).
//!
//! The SDK is a plain script that defines the global `Spotify.Player` class and then calls
//! `window.onSpotifyWebPlaybackSDKReady`. Nothing here may touch `Spotify.Player` before that callback has run.

use js_sys::{Function, Promise, Reflect};
use log::{debug, trace};
use wasm_bindgen::{prelude::*, JsCast};

use crate::error::{Error, Result};

pub const SDK_SCRIPT_URL: &str = "https://sdk.scdn.co/spotify-player.js";

const SDK_SCRIPT_ID: &str = "spotify-web-playback-sdk";
const SDK_READY_CALLBACK: &str = "onSpotifyWebPlaybackSDKReady";
const SDK_GLOBAL: &str = "Spotify";

#[wasm_bindgen]
extern "C" {
    /// `Spotify.Player`
    #[wasm_bindgen(js_namespace = Spotify, js_name = Player)]
    #[derive(Debug, Clone)]
    pub type SdkPlayer;

    #[wasm_bindgen(constructor, js_namespace = Spotify, js_class = "Player")]
    pub fn new(options: &JsValue) -> SdkPlayer;

    /// Resolves to `true` if the player connected.
    #[wasm_bindgen(method)]
    pub fn connect(this: &SdkPlayer) -> Promise;

    #[wasm_bindgen(method)]
    pub fn disconnect(this: &SdkPlayer);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &SdkPlayer, event: &str, callback: &Function) -> bool;

    #[wasm_bindgen(method, js_name = removeListener)]
    pub fn remove_listener(this: &SdkPlayer, event: &str) -> bool;

    /// Resolves to the local playback state, or `null` if the user isn't playing through this player.
    #[wasm_bindgen(method, js_name = getCurrentState)]
    pub fn get_current_state(this: &SdkPlayer) -> Promise;

    #[wasm_bindgen(method)]
    pub fn resume(this: &SdkPlayer) -> Promise;

    #[wasm_bindgen(method)]
    pub fn pause(this: &SdkPlayer) -> Promise;
}

/// Loads the SDK and calls `on_ready` once `Spotify.Player` can be constructed.
///
/// The script tag is injected only once per page. If the SDK has already been loaded (e.g. a new player is created
/// after logging in again), `on_ready` is called right away, since the SDK never fires its ready callback twice.
pub fn load_sdk<F>(on_ready: F) -> Result<()>
where
    F: FnOnce() + 'static,
{
    let window = web_sys::window().ok_or_else(|| Error::Browser("no window available".to_owned()))?;

    if is_sdk_loaded(&window) {
        debug!("Web Playback SDK already loaded");
        on_ready();
        return Ok(());
    }

    // must be in place before the script runs, the SDK throws if the callback is missing
    Reflect::set(
        &window,
        &JsValue::from_str(SDK_READY_CALLBACK),
        &Closure::once_into_js(on_ready),
    )
    .map_err(js_error)?;

    let document = window
        .document()
        .ok_or_else(|| Error::Browser("no document available".to_owned()))?;

    if document.get_element_by_id(SDK_SCRIPT_ID).is_some() {
        trace!("Web Playback SDK script already injected, waiting for it to load");
        return Ok(());
    }

    let script: web_sys::HtmlScriptElement = document
        .create_element("script")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| Error::Browser("created element is not a script".to_owned()))?;

    script.set_id(SDK_SCRIPT_ID);
    script.set_src(SDK_SCRIPT_URL);
    script.set_async(true);

    document
        .body()
        .ok_or_else(|| Error::Browser("document has no body".to_owned()))?
        .append_child(&script)
        .map_err(js_error)?;

    debug!("Injected Web Playback SDK script");
    Ok(())
}

fn is_sdk_loaded(window: &web_sys::Window) -> bool {
    Reflect::get(window, &JsValue::from_str(SDK_GLOBAL))
        .map(|spotify| !spotify.is_undefined() && !spotify.is_null())
        .unwrap_or(false)
}

/// Turns a rejected promise or thrown exception into an error.
pub(crate) fn js_error(value: JsValue) -> Error {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| {
            Reflect::get(&value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));

    Error::Sdk(message)
}
