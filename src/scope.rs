use std::{fmt::Display, str::FromStr};

/// The scopes the player requests: profile access, reading and modifying playback, and streaming through the Web
/// Playback SDK.
pub const WEB_PLAYBACK_SCOPES: [Scope; 5] = [
    Scope::UserReadPrivate,
    Scope::UserReadEmail,
    Scope::UserReadPlaybackState,
    Scope::UserModifyPlaybackState,
    Scope::Streaming,
];

pub trait ToScopesString {
    fn to_scopes_string(self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    UgcImageUpload,
    UserModifyPlaybackState,
    UserReadPlaybackState,
    UserReadCurrentlyPlaying,
    UserFollowModify,
    UserFollowRead,
    UserReadRecentlyPlayed,
    UserReadPlaybackPosition,
    UserTopRead,
    PlaylistReadCollaborative,
    PlaylistModifyPublic,
    PlaylistReadPrivate,
    PlaylistModifyPrivate,
    AppRemoteControl,
    Streaming,
    UserReadEmail,
    UserReadPrivate,
    UserLibraryModify,
    UserLibraryRead,
}

const ALL_SCOPES: [Scope; 19] = [
    Scope::UgcImageUpload,
    Scope::UserModifyPlaybackState,
    Scope::UserReadPlaybackState,
    Scope::UserReadCurrentlyPlaying,
    Scope::UserFollowModify,
    Scope::UserFollowRead,
    Scope::UserReadRecentlyPlayed,
    Scope::UserReadPlaybackPosition,
    Scope::UserTopRead,
    Scope::PlaylistReadCollaborative,
    Scope::PlaylistModifyPublic,
    Scope::PlaylistReadPrivate,
    Scope::PlaylistModifyPrivate,
    Scope::AppRemoteControl,
    Scope::Streaming,
    Scope::UserReadEmail,
    Scope::UserReadPrivate,
    Scope::UserLibraryModify,
    Scope::UserLibraryRead,
];

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::UgcImageUpload => "ugc-image-upload",
            Scope::UserModifyPlaybackState => "user-modify-playback-state",
            Scope::UserReadPlaybackState => "user-read-playback-state",
            Scope::UserReadCurrentlyPlaying => "user-read-currently-playing",
            Scope::UserFollowModify => "user-follow-modify",
            Scope::UserFollowRead => "user-follow-read",
            Scope::UserReadRecentlyPlayed => "user-read-recently-played",
            Scope::UserReadPlaybackPosition => "user-read-playback-position",
            Scope::UserTopRead => "user-top-read",
            Scope::PlaylistReadCollaborative => "playlist-read-collaborative",
            Scope::PlaylistModifyPublic => "playlist-modify-public",
            Scope::PlaylistReadPrivate => "playlist-read-private",
            Scope::PlaylistModifyPrivate => "playlist-modify-private",
            Scope::AppRemoteControl => "app-remote-control",
            Scope::Streaming => "streaming",
            Scope::UserReadEmail => "user-read-email",
            Scope::UserReadPrivate => "user-read-private",
            Scope::UserLibraryModify => "user-library-modify",
            Scope::UserLibraryRead => "user-library-read",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SCOPES
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| s.to_owned())
    }
}

impl<I> ToScopesString for I
where
    I: IntoIterator<Item = Scope>,
{
    fn to_scopes_string(self) -> String {
        self.into_iter().map(Scope::as_str).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_playback_scopes_string() {
        assert_eq!(
            WEB_PLAYBACK_SCOPES.to_scopes_string(),
            "user-read-private user-read-email user-read-playback-state user-modify-playback-state streaming"
        );
    }

    #[test]
    fn scope_from_str() {
        assert_eq!("streaming".parse::<Scope>(), Ok(Scope::Streaming));
        assert_eq!(
            "user-modify-playback-state".parse::<Scope>(),
            Ok(Scope::UserModifyPlaybackState)
        );
        assert!("not-a-scope".parse::<Scope>().is_err());
    }

    #[test]
    fn every_scope_parses_back() {
        for scope in ALL_SCOPES {
            assert_eq!(scope.to_string().parse::<Scope>(), Ok(scope));
        }
    }

    #[test]
    fn empty_scopes_string() {
        assert_eq!(Vec::<Scope>::new().to_scopes_string(), "");
    }
}
