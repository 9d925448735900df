//! The page's UI.

mod app;
mod login;
mod player_view;

pub use app::{App, AppProps};
pub use login::LoginButton;
pub use player_view::PlayerView;

use std::rc::Rc;

use yew::prelude::*;

use crate::{config::PlayerConfig, session::SessionContext};

#[hook]
pub fn use_config() -> Rc<PlayerConfig> {
    use_context::<Rc<PlayerConfig>>().expect("PlayerConfig not found. Make sure to render inside App")
}

#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext not found. Make sure to render inside App")
}
