//! Document id assignment.
//!
//! `Positional` reproduces the classic behavior: the id is the string form of
//! the line's position, so re-ingesting a reordered or appended file
//! overwrites records that now hold different text. `ContentHash` derives the
//! id from the text itself, so identical lines collapse into one record and
//! reordering is harmless.

/// How record ids are derived from documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// `"0"..="N-1"` in input order.
    #[default]
    Positional,
    /// Lowercase hex blake3 digest of the document text.
    ContentHash,
}

impl IdStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positional" | "position" => Some(IdStrategy::Positional),
            "content_hash" | "content-hash" | "hash" => Some(IdStrategy::ContentHash),
            _ => None,
        }
    }

    /// Id for the document at `position` with the given `text`.
    pub fn id_for(&self, position: usize, text: &str) -> String {
        match self {
            IdStrategy::Positional => position.to_string(),
            IdStrategy::ContentHash => blake3::hash(text.as_bytes()).to_hex().to_string(),
        }
    }
}
