//! Mate-invariant read identifiers.
//!
//! Forward and reverse headers of one fragment usually differ only in a short
//! mate suffix (`/1` vs `/2`, `_R` vs `_F`, `.1` vs `.2`). In paired mode those
//! suffixes are stripped so both mates share one key.

use std::borrow::Borrow;
use std::fmt;

/// Characters that may separate the read name from its mate marker.
const MATE_SEPARATORS: &[char] = &['/', '.', '_', '-', ':', ';'];

/// Mate markers. Case-sensitive.
const MATE_MARKERS: &[char] = &['0', '1', '2', 'l', 'r', 'L', 'R', 'f', 'F', '5', '3'];

/// Canonical per-fragment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadId(String);

impl ReadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for ReadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ReadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalize a raw header line into a [`ReadId`].
///
/// The header is cut at the first space or tab. With `paired` set, one
/// trailing `<separator><marker>'*` mate suffix is stripped, so `@SIM.1/1` and
/// `@SIM.1/2` both become `@SIM.1`, and `@SRR5891520.1.1` / `@SRR5891520.1.2`
/// both become `@SRR5891520.1`. Accepts any input.
pub fn normalize_read_id(header: &str, paired: bool) -> ReadId {
    let name = match header.find([' ', '\t']) {
        Some(i) => &header[..i],
        None => header,
    };
    if !paired {
        return ReadId(name.to_string());
    }
    match mate_suffix_start(name) {
        Some(cut) => ReadId(name[..cut].to_string()),
        None => ReadId(name.to_string()),
    }
}

/// Byte offset where a trailing `<separator><marker>'*` suffix begins.
///
/// The last `.` of a name is the spot separator that both mates share
/// (`@SRR5891520.1` is spot 1, not mate 1), so a `.` only counts as a mate
/// separator when another `.` precedes it.
fn mate_suffix_start(id: &str) -> Option<usize> {
    let body = id.trim_end_matches('\'');
    let mut tail = body.char_indices().rev();
    let (_, marker) = tail.next()?;
    let (sep_at, sep) = tail.next()?;
    if !MATE_MARKERS.contains(&marker) || !MATE_SEPARATORS.contains(&sep) {
        return None;
    }
    if sep == '.' && !id[..sep_at].contains('.') {
        return None;
    }
    Some(sep_at)
}
