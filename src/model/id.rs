//! Spotify context IDs.
//!
//! The player only ever starts playback of a *context*: an artist, album, playlist or show. A context is accepted in
//! either of its two string forms:
//! - URIs: `spotify:artist:4NqH3V7GS0Igs1VyGMXEi8`
//! - URLs: `https://open.spotify.com/artist/4NqH3V7GS0Igs1VyGMXEi8`. The URL may contain any query parameters.
//!
//! ```
//! # use ferriplay::model::{id::PlayableContext, ItemType};
//! let artist = PlayableContext::from_url_or_uri("spotify:artist:4NqH3V7GS0Igs1VyGMXEi8").unwrap();
//! assert_eq!(artist.item_type(), ItemType::Artist);
//! assert_eq!(artist.as_str(), "4NqH3V7GS0Igs1VyGMXEi8");
//!
//! // tracks are playable items, not contexts
//! assert!(PlayableContext::from_uri("spotify:track:2pDPOMX0kWA7kcPBcDCQBu").is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use super::ItemType;
use crate::error::IdError;

const ID_LENGTH: usize = 22; // I hope Spotify never changes this length
const URL_PREFIX: &str = "https://open.spotify.com/";
const URI_PREFIX: &str = "spotify:";

/// A playable context; an artist, album, playlist or show. Serializes as its URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayableContext {
    item_type: ItemType,
    id: String,
}

impl PlayableContext {
    /// Parses a Spotify URI string into a context.
    pub fn from_uri(uri: &str) -> Result<Self, IdError> {
        let (item_type, id) = parse_item_type_and_id_from_uri(uri)?;
        Self::new(item_type, id)
    }

    /// Parses a Spotify URL string into a context.
    pub fn from_url(url: &str) -> Result<Self, IdError> {
        let (item_type, id) = parse_item_type_and_id_from_url(url)?;
        Self::new(item_type, id)
    }

    /// Parses either a Spotify URL or URI string into a context.
    pub fn from_url_or_uri(url_or_uri: &str) -> Result<Self, IdError> {
        if url_or_uri.starts_with(URI_PREFIX) {
            Self::from_uri(url_or_uri)
        } else if url_or_uri.starts_with(URL_PREFIX) {
            Self::from_url(url_or_uri)
        } else {
            Err(IdError::MalformedString(url_or_uri.to_owned()))
        }
    }

    fn new(item_type: ItemType, id: &str) -> Result<Self, IdError> {
        match item_type {
            ItemType::Artist | ItemType::Album | ItemType::Playlist | ItemType::Show => Ok(Self {
                item_type,
                id: id.to_owned(),
            }),
            other => Err(IdError::WrongItemType(other)),
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// The bare base-62 ID.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn uri(&self) -> String {
        format!("{}{}:{}", URI_PREFIX, self.item_type.as_str(), self.id)
    }

    pub fn url(&self) -> String {
        format!("{}{}/{}", URL_PREFIX, self.item_type.as_str(), self.id)
    }
}

impl FromStr for PlayableContext {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_url_or_uri(s)
    }
}

impl fmt::Display for PlayableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", URI_PREFIX, self.item_type.as_str(), self.id)
    }
}

impl Serialize for PlayableContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn parse_item_type_and_id_from_uri(uri: &str) -> Result<(ItemType, &str), IdError> {
    // a URI looks like spotify:artist:4NqH3V7GS0Igs1VyGMXEi8
    let (item_type_str, id) = uri
        .strip_prefix(URI_PREFIX)
        .and_then(|prefix_removed| prefix_removed.split_once(':'))
        .ok_or_else(|| IdError::MalformedString(uri.to_owned()))?;

    let item_type: ItemType = item_type_str.parse()?;

    if verify_valid_id(id) {
        Ok((item_type, id))
    } else {
        Err(IdError::InvalidId(id.to_owned()))
    }
}

fn parse_item_type_and_id_from_url(url: &str) -> Result<(ItemType, &str), IdError> {
    let (item_type_str, id) = url
        .strip_prefix(URL_PREFIX)
        // split by / to get "artist" and "4NqH3V7GS0Igs1VyGMXEi8?si=AAAAAAAAAAAAAAAA"
        .and_then(|prefix_removed| prefix_removed.split_once('/'))
        // remove the possible query from the path to get just the ID
        .map(|(item_type_str, id_with_possible_query)| {
            let id = id_with_possible_query
                .split_once('?')
                .map_or(id_with_possible_query, |(id, _)| id);
            (item_type_str, id)
        })
        .ok_or_else(|| IdError::MalformedString(url.to_owned()))?;

    let item_type: ItemType = item_type_str.parse()?;

    if verify_valid_id(id) {
        Ok((item_type, id))
    } else {
        Err(IdError::InvalidId(id.to_owned()))
    }
}

fn verify_valid_id(id: &str) -> bool {
    // Spotify IDs are base-62 strings and they look like 4NqH3V7GS0Igs1VyGMXEi8
    id.len() == ID_LENGTH && id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn artist_from_uri() {
        let id = PlayableContext::from_uri("spotify:artist:4NqH3V7GS0Igs1VyGMXEi8").unwrap();

        assert_eq!(id.item_type(), ItemType::Artist);
        assert_eq!(id.as_str(), "4NqH3V7GS0Igs1VyGMXEi8");
        assert_eq!(id.uri(), "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8");
    }

    #[test]
    fn artist_from_url_with_query() {
        let id = PlayableContext::from_url("https://open.spotify.com/artist/4NqH3V7GS0Igs1VyGMXEi8?si=AAAAAAAAAA")
            .unwrap();

        assert_eq!(id.as_str(), "4NqH3V7GS0Igs1VyGMXEi8");
        assert_eq!(id.url(), "https://open.spotify.com/artist/4NqH3V7GS0Igs1VyGMXEi8");
    }

    #[test]
    fn album_and_playlist_from_url_or_uri() {
        let album = PlayableContext::from_url_or_uri("https://open.spotify.com/album/0tDsHtvN9YNuZjlqHvDY2P").unwrap();
        let playlist = PlayableContext::from_url_or_uri("spotify:playlist:37i9dQZF1DWZipvLjDtZYe").unwrap();

        assert_eq!(album.item_type(), ItemType::Album);
        assert_eq!(playlist.item_type(), ItemType::Playlist);
    }

    #[test]
    fn track_is_not_a_context() {
        assert_eq!(
            PlayableContext::from_uri("spotify:track:2pDPOMX0kWA7kcPBcDCQBu"),
            Err(IdError::WrongItemType(ItemType::Track))
        );
    }

    #[test]
    fn invalid_ids() {
        assert_eq!(
            PlayableContext::from_uri("spotify:artist:tooshort"),
            Err(IdError::InvalidId("tooshort".to_owned()))
        );
        assert_eq!(
            PlayableContext::from_uri("spotify:artist:4NqH3V7GS0Igs1VyGMXE-8"),
            Err(IdError::InvalidId("4NqH3V7GS0Igs1VyGMXE-8".to_owned()))
        );
        assert!(matches!(
            PlayableContext::from_uri("spotify:band:4NqH3V7GS0Igs1VyGMXEi8"),
            Err(IdError::InvalidItemType(_))
        ));
        assert!(matches!(
            PlayableContext::from_url_or_uri("4NqH3V7GS0Igs1VyGMXEi8"),
            Err(IdError::MalformedString(_))
        ));
    }

    #[test]
    fn usable_as_set_key() {
        let contexts: HashSet<PlayableContext> = [
            "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8",
            "https://open.spotify.com/artist/4NqH3V7GS0Igs1VyGMXEi8",
            "spotify:album:4NqH3V7GS0Igs1VyGMXEi8",
        ]
        .into_iter()
        .map(|uri| PlayableContext::from_url_or_uri(uri).unwrap())
        .collect();

        // the same ID under another item type is a different context
        assert_eq!(contexts.len(), 2);
    }

    #[test]
    fn serializes_as_uri() {
        let id: PlayableContext = "spotify:artist:4NqH3V7GS0Igs1VyGMXEi8".parse().unwrap();

        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"spotify:artist:4NqH3V7GS0Igs1VyGMXEi8\""
        );
    }
}
