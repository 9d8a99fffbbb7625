use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Every candidate spool filename was already taken.
    #[error("no unused spool filename after {0} attempts")]
    SpoolExhausted(u32),

    /// The message bytes do not parse as a mail message.
    #[error("message cannot be parsed")]
    BadMessage,

    /// A certificate or key file could not be read.
    #[error("cannot read {}: {}", path.display(), source)]
    TlsFile {
        /// Path of the unreadable file
        path: PathBuf,
        /// The underlying I/O failure
        source: io::Error,
    },

    /// The TLS material or version selection was rejected.
    #[error("invalid TLS configuration: {0}")]
    TlsConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
