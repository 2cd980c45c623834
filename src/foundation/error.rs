/// Convenience result type used across the crate.
pub type LightFieldResult<T> = Result<T, LightFieldError>;

/// Top-level error taxonomy used by the core APIs.
///
/// Parse-time variants are fatal to a load (no partial sequence is published). Blend and
/// render variants are fatal to one operation only and leave the current sequence intact.
#[derive(thiserror::Error, Debug)]
pub enum LightFieldError {
    /// The pose document is not a mapping with an `images` or `frames` array, or a record
    /// carries a structurally invalid field.
    #[error("malformed pose document: {0}")]
    MalformedPoseDocument(String),

    /// A rotation array that is neither a quaternion nor an Euler triple.
    #[error("invalid rotation format in record {record}: expected 3 or 4 numbers, got {len}")]
    InvalidRotationFormat {
        /// Index of the offending record in the source array.
        record: usize,
        /// Number of components found.
        len: usize,
    },

    /// `fovy` absent, non-numeric or not a single-element list.
    #[error("missing or invalid fovy in record {record}")]
    MissingOrInvalidFov {
        /// Index of the offending record in the source array.
        record: usize,
    },

    /// Timestamp that could not be parsed as ISO-8601.
    #[error("invalid timestamp in record {record}: {value:?}")]
    InvalidTimestamp {
        /// Index of the offending record in the source array.
        record: usize,
        /// Raw timestamp text (empty when the field was missing).
        value: String,
    },

    /// A trajectory was requested for a sequence without samples.
    #[error("camera sequence is empty")]
    EmptySequence,

    /// The compositor was called with no buffers.
    #[error("blend set is empty")]
    EmptyBlendSet,

    /// A buffer in the blend set does not match the first buffer's dimensions.
    #[error(
        "dimension mismatch at buffer {index}: expected {}x{}, found {}x{}",
        expected.0, expected.1, found.0, found.1
    )]
    DimensionMismatch {
        /// Position of the offending buffer in the blend set.
        index: usize,
        /// `(width, height)` of the first buffer.
        expected: (u32, u32),
        /// `(width, height)` of the offending buffer.
        found: (u32, u32),
    },

    /// The external renderer failed for one windowed sample.
    #[error("render failed for sample {index}: {source}")]
    RenderFailure {
        /// Sample index whose render failed.
        index: usize,
        /// Error reported by the renderer.
        #[source]
        source: anyhow::Error,
    },

    /// A newer request superseded this in-flight window render.
    #[error("render request {ticket} was superseded")]
    Superseded {
        /// Ticket of the abandoned request.
        ticket: u64,
    },

    /// Invalid caller-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem or image IO failure.
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LightFieldError {
    /// Build a [`LightFieldError::MalformedPoseDocument`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPoseDocument(msg.into())
    }

    /// Build a [`LightFieldError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LightFieldError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`LightFieldError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts a load (as opposed to a single window operation).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedPoseDocument(_)
                | Self::InvalidRotationFormat { .. }
                | Self::MissingOrInvalidFov { .. }
                | Self::InvalidTimestamp { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
