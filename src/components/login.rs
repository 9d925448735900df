use gloo::storage::{SessionStorage, Storage};
use log::{debug, error};
use yew::prelude::*;

use super::use_config;
use crate::config::AUTHORIZATION_STATE_KEY;

/// Sends the user to Spotify to authorize the player.
#[function_component(LoginButton)]
pub fn login_button() -> Html {
    let config = use_config();

    let onclick = Callback::from(move |_: MouseEvent| {
        let grant = config.implicit_grant();

        if let Err(err) = SessionStorage::set(AUTHORIZATION_STATE_KEY, grant.state()) {
            error!("Failed to remember the authorization state: {}", err);
            return;
        }

        let authorize_url = grant.get_authorize_url();
        debug!("Redirecting to {}", authorize_url);

        if let Err(err) = gloo::utils::window().location().set_href(&authorize_url) {
            error!("Failed to redirect to Spotify: {:?}", err);
        }
    });

    html! {
        <div class="login">
            <button class="login-button" {onclick}>{"Log in with Spotify"}</button>
        </div>
    }
}
