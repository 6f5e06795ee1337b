use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which search configuration is active while the session is listening.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Fire only on the fixed trigger phrases from the keyword list.
    KeywordSpotting,
    /// Spot a single named word/phrase search.
    Word(String),
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::KeywordSpotting => write!(f, "keyword"),
            SearchMode::Word(name) => write!(f, "word:{name}"),
        }
    }
}

/// Payload handed to the recognizer when registering a named search.
///
/// The decoder can switch between registered searches without being
/// reconstructed. Paths are opaque to the session core; the host resolves
/// them under the assets directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDefinition {
    /// A keyword-spotting search backed by a keyword list file.
    KeywordList(PathBuf),
    /// A single key phrase, used when switching to a word search.
    Phrase(String),
}
