use crate::fm::types::{Playlist, SongLink};
use serde_json::Value;

const SNIPPET_LENGTH: usize = 200;

// Error codes the media link endpoint uses for tracks without a lossless source.
const UNAVAILABLE_ERROR_CODES: [i64; 2] = [22005, 22012];

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed response: {reason} (response: {snippet:?})")]
    Malformed { reason: String, snippet: String },
    #[error("Song is unavailable: {0}")]
    Unavailable(String),
}

impl ParseError {
    fn malformed(raw: &[u8], reason: impl ToString) -> Self {
        ParseError::Malformed {
            reason: reason.to_string(),
            snippet: String::from_utf8_lossy(raw)
                .chars()
                .take(SNIPPET_LENGTH)
                .collect(),
        }
    }
}

/// The playlist endpoint pads its JSON body with null bytes.
pub(crate) fn trim_null_padding(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| *b != 0).map_or(start, |i| i + 1);

    &raw[start..end]
}

pub(crate) fn parse_playlist(raw: &[u8]) -> Result<Playlist, ParseError> {
    let trimmed = trim_null_padding(raw);

    serde_json::from_slice::<Playlist>(trimmed).map_err(|error| ParseError::malformed(trimmed, error))
}

pub(crate) fn parse_song_link(raw: &[u8]) -> Result<SongLink, ParseError> {
    let trimmed = trim_null_padding(raw);

    let value = serde_json::from_slice::<Value>(trimmed)
        .map_err(|error| ParseError::malformed(trimmed, error))?;

    let error_code = value
        .get("errorCode")
        .and_then(|code| code.as_i64().or_else(|| code.as_f64().map(|f| f as i64)));

    if let Some(code) = error_code {
        if UNAVAILABLE_ERROR_CODES.contains(&code) {
            return Err(ParseError::Unavailable(format!(
                "upstream error code {}",
                code
            )));
        }
    }

    let song = value
        .get("data")
        .and_then(|data| data.get("songList"))
        .and_then(|songs| songs.as_array())
        .and_then(|songs| songs.first())
        .ok_or_else(|| ParseError::Unavailable("response contains no songs".into()))?;

    let field = |name: &str| {
        song.get(name)
            .and_then(|value| value.as_str())
            .map(String::from)
            .ok_or_else(|| ParseError::Unavailable(format!("song has no {} field", name)))
    };

    Ok(SongLink {
        link: field("songLink")?,
        name: field("songName")?,
        artist: field("artistName")?,
        format: song
            .get("format")
            .and_then(|format| format.as_str())
            .filter(|format| !format.is_empty())
            .map(String::from),
    })
}
