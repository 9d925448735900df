use ferriplay::{
    config::PlayerConfig,
    cookie::{CookieStore, MemoryCookies},
    implicit_grant::AuthorizationRedirect,
    token::{TokenStore, TOKEN_COOKIE_NAME},
    Error,
};
use url::Url;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

#[test]
fn login_roundtrip() {
    init_logging();

    let config = PlayerConfig::default();
    let grant = config.implicit_grant();

    let authorize_url = Url::parse(&grant.get_authorize_url()).unwrap();
    assert_eq!(authorize_url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(query_value(&authorize_url, "response_type").as_deref(), Some("token"));
    assert_eq!(
        query_value(&authorize_url, "redirect_uri").as_deref(),
        Some("http://localhost:5173")
    );
    assert_eq!(query_value(&authorize_url, "state").as_deref(), Some(grant.state()));

    let scopes = query_value(&authorize_url, "scope").unwrap();
    assert!(scopes.split(' ').any(|scope| scope == "streaming"));

    // what the page sees after Spotify redirects back
    let fragment = format!(
        "#access_token=BQDfirst&token_type=Bearer&expires_in=3600&state={}",
        grant.state()
    );
    let granted = grant.finalize(&fragment).unwrap();

    let jar = MemoryCookies::default();
    let store = TokenStore::new(&jar);
    assert!(store.load().is_none());

    store.save(&granted).unwrap();
    assert_eq!(jar.get(TOKEN_COOKIE_NAME).unwrap().as_deref(), Some("BQDfirst"));
    assert_eq!(store.load(), Some(granted.access_token.clone()));

    // logging out
    store.clear().unwrap();
    assert!(store.load().is_none());
    assert!(jar.written().last().unwrap().contains("Max-Age=0"));
}

#[test]
fn redirect_from_another_login_is_rejected() {
    init_logging();

    let grant = PlayerConfig::default().implicit_grant();
    let redirect = AuthorizationRedirect::parse("#access_token=BQD&token_type=Bearer&state=someone-elses").unwrap();

    assert!(matches!(
        redirect.into_token(Some(grant.state())),
        Err(Error::AuthorizationStateMismatch)
    ));
}

#[test]
fn declined_authorization() {
    init_logging();

    let grant = PlayerConfig::default().implicit_grant();
    let fragment = format!("#error=access_denied&state={}", grant.state());

    match grant.finalize(&fragment) {
        Err(Error::AuthorizationDenied(reason)) => assert_eq!(reason, "access_denied"),
        other => panic!("expected a denied authorization, got {other:?}"),
    }
}

#[test]
fn page_without_redirect() {
    assert!(AuthorizationRedirect::parse("").is_none());
    assert!(AuthorizationRedirect::parse("#section-2").is_none());
}
