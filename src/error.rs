//! Error types for image building

/// Result type for image building operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a policy or building an image.
///
/// There is no partial-success state: a policy error happens before any
/// layout work, a capacity error after layout but before any byte is
/// written, and an I/O error during the write pass (the partial output
/// file is left in place for the caller to deal with).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The options record is malformed or contradictory
    #[error("invalid policy: {field}: {reason}")]
    InvalidPolicy {
        /// Name of the offending options field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },

    /// A computed size exceeds what the on-disc format can address
    #[error("image too large: {value} exceeds the {limit} limit")]
    ImageTooLarge {
        /// The format limit that was exceeded
        limit: &'static str,
        /// The offending value (sectors, directories, or bytes per `limit`)
        value: u64,
    },

    /// A requested capability is not implemented by this build
    #[error("{feature} is not supported")]
    Unsupported {
        /// Description of the missing capability
        feature: &'static str,
    },

    /// Failure writing the output stream or reading a file's content
    #[error("I/O failure")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_policy(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidPolicy {
            field,
            reason: reason.into(),
        }
    }
}
