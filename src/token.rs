use std::fmt;

use log::{debug, warn};

use crate::{cookie::CookieStore, error::Result};

/// Name of the cookie the access token is kept in.
pub const TOKEN_COOKIE_NAME: &str = "spotifyAuthToken";

/// A bearer token for the Spotify Web API and the Web Playback SDK. Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

/// A token received from the authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedToken {
    pub access_token: AccessToken,
    pub token_type: String,
    /// Lifetime of the token in seconds, if Spotify reported one.
    pub expires_in: Option<u32>,
}

/// Keeps the access token in a cookie so it survives page reloads for as long as the token is valid.
#[derive(Debug, Clone)]
pub struct TokenStore<C> {
    cookies: C,
}

impl AccessToken {
    /// Returns `None` for an empty or whitespace-only token.
    pub fn new<S>(token: S) -> Option<Self>
    where
        S: Into<String>,
    {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // enough to tell tokens apart in logs without leaking them
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "AccessToken({prefix}...)")
    }
}

impl<C> TokenStore<C>
where
    C: CookieStore,
{
    pub fn new(cookies: C) -> Self {
        Self { cookies }
    }

    /// Reads the stored token. Unreadable cookies count as no token.
    pub fn load(&self) -> Option<AccessToken> {
        match self.cookies.get(TOKEN_COOKIE_NAME) {
            Ok(token) => token.and_then(AccessToken::new),
            Err(err) => {
                warn!("Failed to read the token cookie: {}", err);
                None
            }
        }
    }

    pub fn save(&self, token: &GrantedToken) -> Result<()> {
        debug!(
            "Storing {:?} in cookie {} (expires in {:?} s)",
            token.access_token, TOKEN_COOKIE_NAME, token.expires_in
        );
        self.cookies
            .set(TOKEN_COOKIE_NAME, token.access_token.as_str(), token.expires_in)
    }

    pub fn clear(&self) -> Result<()> {
        debug!("Removing the token cookie");
        self.cookies.remove(TOKEN_COOKIE_NAME)
    }
}
