mod fetcher;
mod fm;

use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub use fetcher::*;
pub use fm::*;

#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug, Default, Serialize, Deserialize)]
pub struct SongId(pub(crate) u64);

impl From<u64> for SongId {
    fn from(value: u64) -> Self {
        SongId(value)
    }
}

impl Deref for SongId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
