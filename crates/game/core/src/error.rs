//! Common error infrastructure for realm-core.
//!
//! Domain-specific errors (e.g., `SkillError`, `ModError`) are defined in
//! their respective modules alongside the operations they guard. This module
//! only provides the shared classification used by callers to decide how to
//! react (reject quietly, log, or investigate).

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request may succeed later (skill still cooling down)
/// - **Validation**: the request itself is wrong (same-team target, bad slot)
/// - **Internal**: a collaborator misbehaved (a mod handler failed)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retrying later may succeed.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    Validation,

    /// Unexpected failure inside a collaborator. Logged, never fatal.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or misbehaving collaborator.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all realm-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for rejection acknowledgements and for asserting in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
