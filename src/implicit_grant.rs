//! Implicit grant authorization.
//!
//! The player runs entirely in the browser and cannot keep a client secret, so the user is sent to Spotify's authorize
//! page and comes back with the access token in the redirect URL's fragment:
//!
//! ```text
//! http://localhost:5173/#access_token=BQD...&token_type=Bearer&expires_in=3600&state=abc
//! ```
//!
//! or, when the user declines:
//!
//! ```text
//! http://localhost:5173/#error=access_denied&state=abc
//! ```
//!
//! # Usage
//!
//! ```
//! # use ferriplay::{implicit_grant::ImplicitGrantBuilder, scope::WEB_PLAYBACK_SCOPES};
//! let grant = ImplicitGrantBuilder::new("application client ID", "http://localhost:5173")
//!     .scopes(WEB_PLAYBACK_SCOPES)
//!     .build();
//!
//! // send the user here, and remember the state across the redirect
//! let authorize_url = grant.get_authorize_url();
//! let state = grant.state().to_owned();
//! # let fragment = format!("#access_token=BQD&token_type=Bearer&expires_in=3600&state={state}");
//!
//! // once the user returns, finalize with the fragment from the address bar
//! let token = grant.finalize(&fragment).expect("failed to finalize implicit grant");
//! assert_eq!(token.access_token.as_str(), "BQD");
//! ```

use const_format::concatcp;
use log::{debug, warn};
use rand::{distributions::Alphanumeric, Rng};
use url::{form_urlencoded, Url};

use crate::{
    error::{Error, Result},
    scope::ToScopesString,
    token::{AccessToken, GrantedToken},
};

const RANDOM_STATE_LENGTH: usize = 16;

const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com/";
const ACCOUNTS_AUTHORIZE_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "authorize");

#[derive(Debug, Clone)]
pub struct ImplicitGrantBuilder {
    client_id: String,
    redirect_uri: String,
    state: Option<String>,
    scopes: Option<String>,
    show_dialog: bool,
}

/// An implicit grant that has its authorize URL ready, but hasn't yet received the user's authorization.
#[derive(Debug, Clone)]
pub struct IncompleteImplicitGrant {
    client_id: String,
    redirect_uri: String,
    state: String,
    scopes: Option<String>,
    show_dialog: bool,
}

/// The parameters Spotify appends to the redirect URI's fragment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorizationRedirect {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u32>,
    state: Option<String>,
    error: Option<String>,
}

impl ImplicitGrantBuilder {
    pub fn new<C, R>(client_id: C, redirect_uri: R) -> Self
    where
        C: Into<String>,
        R: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            state: None,
            scopes: None,
            show_dialog: false,
        }
    }

    pub fn state<S>(self, state: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            state: Some(state.into()),
            ..self
        }
    }

    pub fn scopes<T>(self, scopes: T) -> Self
    where
        T: ToScopesString,
    {
        Self {
            scopes: Some(scopes.to_scopes_string()),
            ..self
        }
    }

    /// Force the user to approve the application again even if they already have.
    pub fn show_dialog(self, show_dialog: bool) -> Self {
        Self { show_dialog, ..self }
    }

    pub fn build(self) -> IncompleteImplicitGrant {
        let state = self.state.unwrap_or_else(|| {
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(RANDOM_STATE_LENGTH)
                .map(char::from)
                .collect()
        });

        IncompleteImplicitGrant {
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            state,
            scopes: self.scopes,
            show_dialog: self.show_dialog,
        }
    }
}

impl IncompleteImplicitGrant {
    pub fn get_authorize_url(&self) -> String {
        let mut query_params = vec![
            ("response_type", "token"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("state", self.state.as_str()),
        ];

        if let Some(scopes) = &self.scopes {
            query_params.push(("scope", scopes.as_str()));
        }

        if self.show_dialog {
            // spotify's default for show_dialog is false if it's not specified
            query_params.push(("show_dialog", "true"));
        }

        let mut authorize_url = Url::parse(ACCOUNTS_AUTHORIZE_ENDPOINT).expect(
            "failed to build authorize URL: invalid base URL (this is likely a bug)",
        );
        authorize_url.query_pairs_mut().extend_pairs(query_params);

        authorize_url.into()
    }

    /// The state value that has to come back in the redirect.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Finalizes the grant from the redirect URL's fragment.
    pub fn finalize(&self, fragment: &str) -> Result<GrantedToken> {
        AuthorizationRedirect::parse(fragment)
            .ok_or(Error::MissingAccessToken)?
            .into_token(Some(&self.state))
    }
}

impl AuthorizationRedirect {
    /// Parses a URL fragment, with or without its leading `#`. Returns `None` if the fragment isn't an authorization
    /// redirect at all.
    pub fn parse(fragment: &str) -> Option<Self> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut redirect = AuthorizationRedirect::default();

        for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
            match key.as_ref() {
                "access_token" => redirect.access_token = Some(value.into_owned()),
                "token_type" => redirect.token_type = Some(value.into_owned()),
                "expires_in" => redirect.expires_in = value.parse().ok(),
                "state" => redirect.state = Some(value.into_owned()),
                "error" => redirect.error = Some(value.into_owned()),
                _ => {}
            }
        }

        if redirect.access_token.is_none() && redirect.error.is_none() {
            None
        } else {
            Some(redirect)
        }
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Verifies the redirect against the state sent with the authorize request and extracts the token. A redirect is
    /// rejected when no state was remembered for it.
    pub fn into_token(self, expected_state: Option<&str>) -> Result<GrantedToken> {
        if let Some(error) = self.error {
            warn!("Authorization was not granted: {}", error);
            return Err(Error::AuthorizationDenied(error));
        }

        match (expected_state, self.state.as_deref()) {
            (Some(expected), Some(state)) if expected == state => {}
            (expected, state) => {
                warn!(
                    "Authorization redirect state mismatch: expected {:?}, got {:?}",
                    expected, state
                );
                return Err(Error::AuthorizationStateMismatch);
            }
        }

        let access_token = self
            .access_token
            .and_then(AccessToken::new)
            .ok_or(Error::MissingAccessToken)?;

        let token = GrantedToken {
            access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_owned()),
            expires_in: self.expires_in,
        };

        debug!("Finalized implicit grant: {:?}", token);
        Ok(token)
    }
}
