// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler. This is a false positive in newer Rust versions.
#![allow(unused_assignments)]

//! Error types for displacement operations.
//!
//! Errors carry a machine-readable `DISPLACE-XXXX` code and a recovery
//! suggestion, and render through miette.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for displacement operations.
pub type DisplaceResult<T> = Result<T, DisplaceError>;

/// Machine-readable error codes for displacement operations.
///
/// Codes follow the pattern `DISPLACE-XXXX` where:
/// - 1xxx = Parameter errors
/// - 2xxx = Configuration errors
/// - 3xxx = Host mesh errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplaceErrorCode {
    /// DISPLACE-1001: Distance is NaN or infinite
    InvalidDistance = 1001,
    /// DISPLACE-1002: Other parameter out of range
    InvalidParams = 1002,

    /// DISPLACE-2001: Configuration could not be read or parsed
    Config = 2001,

    /// DISPLACE-3001: Underlying mesh error
    Mesh = 3001,
}

impl DisplaceErrorCode {
    /// Returns the error code as a string in the format `DISPLACE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplaceErrorCode::InvalidDistance => "DISPLACE-1001",
            DisplaceErrorCode::InvalidParams => "DISPLACE-1002",
            DisplaceErrorCode::Config => "DISPLACE-2001",
            DisplaceErrorCode::Mesh => "DISPLACE-3001",
        }
    }
}

impl std::fmt::Display for DisplaceErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for displacement errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplaceRecoverySuggestion {
    /// Pass a finite distance.
    UseFiniteDistance,
    /// Adjust a named parameter.
    AdjustParameter { name: String, expected: String },
    /// Fix the configuration file.
    CheckConfig { path: Option<PathBuf> },
    /// Check the input mesh.
    CheckInputMesh,
    /// No specific suggestion.
    None,
}

impl std::fmt::Display for DisplaceRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplaceRecoverySuggestion::UseFiniteDistance => {
                write!(f, "Pass a finite distance, e.g. --distance 0.5 or -0.5 to move inward")
            }
            DisplaceRecoverySuggestion::AdjustParameter { name, expected } => {
                write!(f, "Set {} to {}", name, expected)
            }
            DisplaceRecoverySuggestion::CheckConfig { path: Some(path) } => {
                write!(f, "Check the syntax and field names in {}", path.display())
            }
            DisplaceRecoverySuggestion::CheckConfig { path: None } => {
                write!(f, "Check the configuration syntax and field names")
            }
            DisplaceRecoverySuggestion::CheckInputMesh => {
                write!(f, "Run `mesh info` on the input mesh and check the selection")
            }
            DisplaceRecoverySuggestion::None => {
                write!(f, "No specific suggestion available")
            }
        }
    }
}

/// Errors that can occur during displacement.
#[derive(Debug, Error, Diagnostic)]
pub enum DisplaceError {
    /// Distance is not a finite number.
    #[error("displacement distance must be finite, got {value}")]
    #[diagnostic(
        code(displace::params::distance),
        help("Use any finite value; positive moves along the normals, negative against them.")
    )]
    InvalidDistance { value: f64 },

    /// A parameter other than the distance is out of range.
    #[error("invalid displacement parameter {param_name}: {details}")]
    #[diagnostic(code(displace::params::invalid))]
    InvalidParams {
        param_name: String,
        param_value: String,
        details: String,
    },

    /// Configuration could not be read or parsed.
    #[error("invalid displacement configuration: {details}")]
    #[diagnostic(
        code(displace::config::invalid),
        help("Expected fields: distance (number), update_normals (bool), divergence_warn_cos (number in [0, 1))")
    )]
    Config {
        details: String,
        path: Option<PathBuf>,
    },

    /// Underlying mesh error.
    #[error("mesh operation failed: {0}")]
    #[diagnostic(code(displace::mesh::error))]
    MeshError(#[from] mesh_edit::MeshError),
}

impl DisplaceError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> DisplaceErrorCode {
        match self {
            DisplaceError::InvalidDistance { .. } => DisplaceErrorCode::InvalidDistance,
            DisplaceError::InvalidParams { .. } => DisplaceErrorCode::InvalidParams,
            DisplaceError::Config { .. } => DisplaceErrorCode::Config,
            DisplaceError::MeshError(_) => DisplaceErrorCode::Mesh,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> DisplaceRecoverySuggestion {
        match self {
            DisplaceError::InvalidDistance { .. } => DisplaceRecoverySuggestion::UseFiniteDistance,
            DisplaceError::InvalidParams { param_name, .. } => {
                DisplaceRecoverySuggestion::AdjustParameter {
                    name: param_name.clone(),
                    expected: match param_name.as_str() {
                        "divergence_warn_cos" => "a value in [0, 1)".to_string(),
                        _ => "a finite value".to_string(),
                    },
                }
            }
            DisplaceError::Config { path, .. } => {
                DisplaceRecoverySuggestion::CheckConfig { path: path.clone() }
            }
            DisplaceError::MeshError(_) => DisplaceRecoverySuggestion::CheckInputMesh,
        }
    }

    // Constructor helpers

    /// Create an invalid distance error.
    pub fn invalid_distance(value: f64) -> Self {
        DisplaceError::InvalidDistance { value }
    }

    /// Create an invalid parameter error.
    pub fn invalid_param(
        param_name: impl Into<String>,
        param_value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        DisplaceError::InvalidParams {
            param_name: param_name.into(),
            param_value: param_value.into(),
            details: details.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(details: impl Into<String>, path: Option<PathBuf>) -> Self {
        DisplaceError::Config {
            details: details.into(),
            path,
        }
    }
}
