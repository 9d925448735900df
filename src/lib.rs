//! A browser Spotify player built on the [Web Playback SDK](https://developer.spotify.com/documentation/web-playback-sdk).
//!
//! The page authorizes with Spotify through the implicit grant flow, keeps the access token in a cookie, creates an
//! SDK player device in the browser and lets the user start playback of a configured context on it, toggle playback
//! and log out.
//!
//! The browser-facing parts ([components], [player], [sdk] and [cookie::DocumentCookies]) only work on
//! `wasm32-unknown-unknown`. Everything else, such as the authorization flow, token storage and Web API response
//! handling, is plain Rust and works anywhere.
//!
//! # Configuration
//!
//! The page is configured at build time through environment variables, see [config::PlayerConfig].

pub mod client;
pub mod components;
pub mod config;
pub mod cookie;
pub mod error;
pub mod implicit_grant;
pub mod model;
pub mod player;
pub mod scope;
pub mod sdk;
pub mod session;
pub mod token;

mod util {
    pub(crate) mod duration_millis;
}

pub use crate::{
    error::{Error, Result},
    scope::Scope,
};
