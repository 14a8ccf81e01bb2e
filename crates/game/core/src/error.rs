//! Common error infrastructure for duel-core.
//!
//! Domain errors (`ActionError`, `PlacementError`, `ExecuteError`) live next
//! to the code that raises them; this module only holds the shared
//! classification they all implement.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same side may act again (e.g. wait for mana)
/// - **Validation**: the request itself is wrong and should not be retried
/// - **Internal**: state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all duel-core errors.
///
/// Gives the server a uniform way to log and classify rejected actions
/// without matching on every concrete error type.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, suitable for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
