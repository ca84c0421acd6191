use std::fmt;

/// Errors raised while configuring or initializing a height-field simulation.
///
/// None of these occur while stepping; a running simulation cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A parameter is outside its valid range.
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// The adapter cannot run the requested backend.
    Unsupported(String),

    /// A backend name did not parse.
    UnknownBackend(String),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameter { name, reason } => {
                write!(f, "invalid simulation parameter `{name}`: {reason}")
            }
            SimError::Unsupported(what) => write!(f, "unsupported on this adapter: {what}"),
            SimError::UnknownBackend(name) => {
                write!(f, "unknown backend '{name}' (expected auto, gpu, cpu or static)")
            }
        }
    }
}

impl std::error::Error for SimError {}
