pub mod error;
pub mod id;
pub mod playback;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Album => "album",
            ItemType::Artist => "artist",
            ItemType::Playlist => "playlist",
            ItemType::Track => "track",
            ItemType::Show => "show",
            ItemType::Episode => "episode",
        }
    }
}

impl FromStr for ItemType {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album" => Ok(ItemType::Album),
            "artist" => Ok(ItemType::Artist),
            "playlist" => Ok(ItemType::Playlist),
            "track" => Ok(ItemType::Track),
            "show" => Ok(ItemType::Show),
            "episode" => Ok(ItemType::Episode),
            other => Err(IdError::InvalidItemType(other.to_owned())),
        }
    }
}
