use std::path::PathBuf;

/// Errors produced while loading a transducer from disk.
///
/// `apply` and `apply_bulk` never return an error: an input that cannot be
/// tokenized, or that the transducer does not accept, simply yields the
/// empty result set (see [`crate::transducer::Transducer::apply`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read transducer file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transducer is malformed: {0}")]
    Malformed(String),

    #[error("transducer declares a weighted format, which is not supported")]
    UnsupportedWeighted,
}
