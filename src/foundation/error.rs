/// Convenience result type used across geomotion.
pub type GeomotionResult<T> = Result<T, GeomotionError>;

/// Top-level error taxonomy.
///
/// Every variant is surfaced to the caller immediately; nothing in the crate retries or
/// substitutes a default.
#[derive(thiserror::Error, Debug)]
pub enum GeomotionError {
    /// A constructor received an unsupported representation (wrong arity, non-finite value).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Division by a zero-magnitude operand inside a derived computation.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A point/side/segment index beyond an entity's current count.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    /// A fixed-arity entity was updated with a different number of elements.
    #[error("count mismatch: {0}")]
    CountMismatch(String),

    /// A registry lookup for something that was never registered.
    #[error("lookup miss: {0}")]
    LookupMiss(String),

    /// A model dependency edge that would close a cycle.
    #[error("dependency cycle: {0}")]
    Cycle(String),

    /// Invalid playback request (bad run time, drawable unknown to the backend).
    #[error("playback error: {0}")]
    Playback(String),

    /// Narration text or timing could not be resolved.
    #[error("narration error: {0}")]
    Narration(String),

    /// Invalid scene configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from a collaborator (backend, synthesizer, IO).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeomotionError {
    /// Build a [`GeomotionError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`GeomotionError::Arithmetic`] value.
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Build a [`GeomotionError::IndexOutOfRange`] value.
    pub fn index_out_of_range(msg: impl Into<String>) -> Self {
        Self::IndexOutOfRange(msg.into())
    }

    /// Build a [`GeomotionError::CountMismatch`] value.
    pub fn count_mismatch(msg: impl Into<String>) -> Self {
        Self::CountMismatch(msg.into())
    }

    /// Build a [`GeomotionError::LookupMiss`] value.
    pub fn lookup_miss(msg: impl Into<String>) -> Self {
        Self::LookupMiss(msg.into())
    }

    /// Build a [`GeomotionError::Cycle`] value.
    pub fn cycle(msg: impl Into<String>) -> Self {
        Self::Cycle(msg.into())
    }

    /// Build a [`GeomotionError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`GeomotionError::Narration`] value.
    pub fn narration(msg: impl Into<String>) -> Self {
        Self::Narration(msg.into())
    }

    /// Build a [`GeomotionError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
