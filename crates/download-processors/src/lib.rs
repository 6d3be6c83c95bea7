mod playlist_proc;
mod utils;

pub use playlist_proc::*;
pub use utils::sanitize_path_component;

use std::ops::Deref;

// PlaylistId
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct PlaylistId(pub(crate) String);

impl Deref for PlaylistId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for PlaylistId {
    fn from(value: String) -> Self {
        PlaylistId(value)
    }
}

impl From<&str> for PlaylistId {
    fn from(value: &str) -> Self {
        PlaylistId(value.to_string())
    }
}

impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// TrackId
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug)]
pub struct TrackId(pub(crate) u64);

impl Deref for TrackId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u64> for TrackId {
    fn from(value: u64) -> Self {
        TrackId(value)
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
