//! Transcript to signal resolution.
//!
//! The vocabulary is scanned in a fixed order (spelled-out words first, then
//! digits, each ascending) and the first key contained in the transcript wins.
//! "tengo 15 uno" therefore resolves to 1 through "uno" before the digit keys
//! are ever tried, while "15" alone resolves to 1 through the digit "1".

use shared::domain::SignalValue;

use crate::error::CommandError;

pub const VOCABULARY: [(&str, i64); 10] = [
    ("uno", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("1", 1),
    ("2", 2),
    ("3", 3),
    ("4", 4),
    ("5", 5),
];

/// Resolves an already lowercased, final transcript.
pub fn resolve(transcript: &str) -> Result<SignalValue, CommandError> {
    VOCABULARY
        .iter()
        .find(|(key, _)| transcript.contains(key))
        .and_then(|(_, value)| SignalValue::new(*value).ok())
        .ok_or_else(|| CommandError::Unrecognized {
            transcript: transcript.to_string(),
        })
}
