use std::path::PathBuf;

use thiserror::Error;

/// Errors fatal to constructing a [`crate::HunspellDict`]. Everything past
/// construction is infallible: `spellcheck`/`suggestions`/`add_word`/
/// `remove_word` return `bool`/`Vec<String>` directly, treating a degenerate
/// input (e.g. an empty token) as a plain negative result rather than an
/// error. Recoverable parse trouble (an unusable directive, a rule whose
/// condition fails to compile) is absorbed by the permissive parser and
/// never reaches this enum.
#[derive(Debug, Error)]
pub enum SpellerError {
    #[error("dictionary file not found: {path}")]
    FileMissing { path: PathBuf },

    #[error("{path}: bytes do not decode as {encoding}")]
    EncodingMismatch { path: PathBuf, encoding: String },
}
