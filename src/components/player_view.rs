use std::{cell::Cell, rc::Rc};

use log::{debug, error, info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{use_config, use_session};
use crate::{
    client::WebApiClient,
    cookie::DocumentCookies,
    model::ItemType,
    player::{PlayerEvent, PlayerOptions, WebPlayer},
    sdk::load_sdk,
    session::{SessionAction, SessionContext},
    token::TokenStore,
};

/// The player controls shown to an authenticated user.
#[function_component(PlayerView)]
pub fn player_view() -> Html {
    let config = use_config();
    let session = use_session();
    let player = use_state(|| Option::<Rc<WebPlayer>>::None);

    // One SDK player per access token. Dropping it disconnects it.
    {
        let player = player.clone();
        let session = session.clone();
        let config = Rc::clone(&config);

        use_effect_with(session.token.clone(), move |token| {
            let cancelled = Rc::new(Cell::new(false));

            if let Some(token) = token.clone() {
                let options = PlayerOptions {
                    name: config.player_name.clone(),
                    volume: config.volume,
                    token,
                };

                let cancelled = Rc::clone(&cancelled);
                let player = player.clone();
                let on_ready = move || {
                    if cancelled.get() {
                        debug!("Web Playback SDK ready after the player view went away");
                        return;
                    }

                    match WebPlayer::new(&options, move |event| dispatch_player_event(&session, event)) {
                        Ok(web_player) => {
                            let web_player = Rc::new(web_player);
                            connect(Rc::clone(&web_player));
                            player.set(Some(web_player));
                        }
                        Err(err) => error!("Failed to create the Web Playback SDK player: {}", err),
                    }
                };

                if let Err(err) = load_sdk(on_ready) {
                    error!("Failed to load the Web Playback SDK: {}", err);
                }
            }

            move || {
                cancelled.set(true);
                player.set(None);
            }
        });
    }

    let on_play_context = {
        let session = session.clone();
        let context = config.context.clone();

        Callback::from(move |_: MouseEvent| {
            let device_id = match session.play_target() {
                Ok(device_id) => device_id.to_owned(),
                Err(err) => {
                    warn!("{}", err);
                    return;
                }
            };

            let Some(token) = session.token.clone() else {
                return;
            };

            let context = context.clone();
            spawn_local(async move {
                let client = WebApiClient::new(token);
                if let Err(err) = client.play_context(&context, Some(&device_id)).await {
                    error!("Error playing {}: {}", context, err);
                }
            });
        })
    };

    let on_toggle = {
        let player = player.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(player) = (*player).clone() else {
                warn!("Web Playback SDK player hasn't been created yet");
                return;
            };

            spawn_local(async move {
                if let Err(err) = player.toggle().await {
                    error!("Error toggling playback: {}", err);
                }
            });
        })
    };

    let on_logout = {
        let session = session.clone();

        Callback::from(move |_: MouseEvent| {
            if let Err(err) = TokenStore::new(DocumentCookies).clear() {
                error!("Failed to remove the access token: {}", err);
            }

            info!("Logged out");
            session.dispatch(SessionAction::SignOut);
        })
    };

    let toggle_label = if session.paused { "Play Song" } else { "Pause Song" };

    html! {
        <div class="player">
            <h2>{"Spotify Web Player"}</h2>
            <div class="controls">
                <button onclick={on_play_context}>{play_label(config.context.item_type())}</button>
                <button onclick={on_toggle}>{toggle_label}</button>
                <button onclick={on_logout}>{"Log out"}</button>
            </div>
            if let Some(now_playing) = &session.now_playing {
                <p class="now-playing">{format!("{} - {}", now_playing.track, now_playing.artists)}</p>
            }
        </div>
    }
}

fn play_label(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Album => "Play Album",
        ItemType::Playlist => "Play Playlist",
        ItemType::Show => "Play Show",
        _ => "Play Artist",
    }
}

fn dispatch_player_event(session: &SessionContext, event: PlayerEvent) {
    match event {
        PlayerEvent::Ready { device_id } => session.dispatch(SessionAction::DeviceReady(device_id)),
        PlayerEvent::NotReady { device_id } => session.dispatch(SessionAction::DeviceOffline(device_id)),
        PlayerEvent::StateChanged(state) => session.dispatch(SessionAction::PlaybackChanged(state)),
        // already logged by the player
        PlayerEvent::Error { .. } => {}
    }
}

fn connect(player: Rc<WebPlayer>) {
    spawn_local(async move {
        match player.connect().await {
            Ok(true) => info!("The Web Playback SDK successfully connected to Spotify!"),
            Ok(false) => warn!("The Web Playback SDK failed to connect to Spotify"),
            Err(err) => error!("Failed to connect the Web Playback SDK player: {}", err),
        }
    });
}
