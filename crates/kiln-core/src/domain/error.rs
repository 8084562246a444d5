// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so they can travel inside reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Unknown stack '{name}'")]
    UnknownStack {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid package requirement '{value}': {reason}")]
    InvalidRequirement { value: String, reason: String },

    // ========================================================================
    // Manifest Errors
    // ========================================================================
    #[error("Manifest is not valid JSON: {reason}")]
    InvalidManifest { reason: String },

    #[error("Manifest field '{field}' must be a JSON object")]
    ManifestFieldNotObject { field: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownStack { name, available } => {
                let mut out = vec![format!("'{}' is not a known stack", name)];
                out.push("Available stacks:".into());
                for stack in available {
                    out.push(format!("  • {}", stack));
                }
                out.push("Try: kiln stacks".into());
                out
            }
            Self::InvalidRequirement { .. } => vec![
                "Requirements are written as name:constraint".into(),
                "Example: laravel/sanctum:^3.2".into(),
            ],
            Self::InvalidManifest { .. } | Self::ManifestFieldNotObject { .. } => vec![
                "package.json could not be updated".into(),
                "Check that it is valid JSON (npm pkg fix can help)".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownStack { .. } | Self::InvalidRequirement { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidManifest { .. } | Self::ManifestFieldNotObject { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}
