//! Shareable configuration tokens
//!
//! A versioned JSON payload (`{v, count, segments}`) encoded as URL-safe
//! base64 without padding, small enough to ride a query parameter. Decoding
//! tolerates padded tokens and the legacy form where items are bare label
//! strings.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::wheel::segments::{RawSegment, SegmentSet};

/// Wire format version
const SHARE_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    #[serde(default)]
    v: u32,
    #[serde(default)]
    count: usize,
    segments: Vec<ShareSegment>,
}

/// Current `{text, seconds}` items alongside legacy bare strings
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ShareSegment {
    Timed {
        text: String,
        #[serde(default)]
        seconds: u32,
    },
    Legacy(String),
}

/// Why a token failed to import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportError {
    /// Not valid base64
    Encoding,
    /// Decoded bytes are not the expected JSON shape
    Payload,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Encoding => write!(f, "share token is not valid base64"),
            ImportError::Payload => write!(f, "share token payload is malformed"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Serialize a set into a token; refused while any label is blank
pub fn encode(set: &SegmentSet) -> Option<String> {
    if set.iter().any(|s| s.text.trim().is_empty()) {
        return None;
    }
    let payload = SharePayload {
        v: SHARE_VERSION,
        count: set.len(),
        segments: set
            .iter()
            .map(|s| ShareSegment::Timed {
                text: s.text.trim().to_string(),
                seconds: s.seconds,
            })
            .collect(),
    };
    let json = serde_json::to_string(&payload).ok()?;
    Some(URL_SAFE_NO_PAD.encode(json))
}

/// Rebuild a set from a token. Never touches existing state: the caller
/// swaps the returned set in only on success.
pub fn decode(token: &str) -> Result<SegmentSet, ImportError> {
    let stripped = token.trim().trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(stripped)
        .map_err(|_| ImportError::Encoding)?;
    let payload: SharePayload =
        serde_json::from_slice(&bytes).map_err(|_| ImportError::Payload)?;

    let raw: Vec<RawSegment> = payload
        .segments
        .into_iter()
        .map(|item| match item {
            ShareSegment::Timed { text, seconds } => RawSegment::timed(text, seconds),
            ShareSegment::Legacy(text) => RawSegment::text(text),
        })
        .collect();

    let count = if payload.count != 0 { payload.count } else { raw.len() };
    Ok(SegmentSet::normalize(raw).resize(count))
}
