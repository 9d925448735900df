use std::rc::Rc;

use gloo::storage::{SessionStorage, Storage};
use log::{error, info, warn};
use wasm_bindgen::JsValue;
use yew::prelude::*;

use super::{LoginButton, PlayerView};
use crate::{
    config::{PlayerConfig, AUTHORIZATION_STATE_KEY},
    cookie::DocumentCookies,
    implicit_grant::AuthorizationRedirect,
    session::{Session, SessionAction, SessionContext},
    token::{AccessToken, TokenStore},
};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<PlayerConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let session = use_reducer(|| Session::new(TokenStore::new(DocumentCookies).load()));

    // Coming back from Spotify's authorize page
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            if let Some(token) = take_authorization_redirect() {
                session.dispatch(SessionAction::SignIn(token));
            }
            || ()
        });
    }

    html! {
        <ContextProvider<Rc<PlayerConfig>> context={props.config.clone()}>
            <ContextProvider<SessionContext> context={session.clone()}>
                <div class="app">
                    if session.is_authenticated() {
                        <PlayerView />
                    } else {
                        <LoginButton />
                    }
                </div>
            </ContextProvider<SessionContext>>
        </ContextProvider<Rc<PlayerConfig>>>
    }
}

/// Consumes an authorization redirect in the address bar, if there is one, and stores the token it carries.
fn take_authorization_redirect() -> Option<AccessToken> {
    let fragment = gloo::utils::window().location().hash().ok()?;
    let redirect = AuthorizationRedirect::parse(&fragment)?;

    let expected_state = SessionStorage::get::<String>(AUTHORIZATION_STATE_KEY).ok();
    SessionStorage::delete(AUTHORIZATION_STATE_KEY);
    clear_fragment();

    match redirect.into_token(expected_state.as_deref()) {
        Ok(granted) => {
            if let Err(err) = TokenStore::new(DocumentCookies).save(&granted) {
                error!("Failed to store the access token: {}", err);
            }

            info!("Authorized with Spotify");
            Some(granted.access_token)
        }
        Err(err) => {
            error!("Authorization failed: {}", err);
            None
        }
    }
}

/// Removes the token from the address bar without reloading the page.
fn clear_fragment() {
    let window = gloo::utils::window();
    let location = window.location();
    let url = format!(
        "{}{}",
        location.pathname().unwrap_or_default(),
        location.search().unwrap_or_default()
    );

    let replaced = window
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)));

    if let Err(err) = replaced {
        warn!("Failed to clear the authorization redirect from the address bar: {:?}", err);
    }
}
