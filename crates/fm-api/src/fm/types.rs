use crate::SongId;
use serde::{Deserialize, Deserializer};

#[derive(Debug, PartialEq, Deserialize)]
pub struct Playlist {
    pub channel_name: String,
    #[serde(rename = "list")]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: SongId,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flow_mark: i64,
}

// Missing and `null` entry fields both read as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, PartialEq, Clone)]
pub struct SongLink {
    pub link: String,
    pub name: String,
    pub artist: String,
    pub format: Option<String>,
}
