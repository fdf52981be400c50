//! Displacement parameters and their TOML/JSON configuration form.
//!
//! ```toml
//! distance = 0.25
//! update_normals = true
//! divergence_warn_cos = 0.001
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DisplaceError, DisplaceResult};

/// Parameters for displacing a selection along its normals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaceParams {
    /// Signed displacement distance. Positive moves along the normals.
    /// Zero leaves the mesh untouched.
    pub distance: f64,

    /// Ask the host to recompute normals after vertices moved.
    pub update_normals: bool,

    /// Warn about a vertex when the cosine between its summed direction and
    /// its first contribution falls below this value. The offset is still
    /// applied; this only flags it.
    pub divergence_warn_cos: f64,
}

impl Default for DisplaceParams {
    fn default() -> Self {
        Self {
            distance: 0.0,
            update_normals: true,
            divergence_warn_cos: 1e-3,
        }
    }
}

impl DisplaceParams {
    /// Default parameters with the given distance.
    pub fn with_distance(distance: f64) -> Self {
        Self {
            distance,
            ..Default::default()
        }
    }

    /// Check that the parameters describe a real displacement.
    pub fn validate(&self) -> DisplaceResult<()> {
        if !self.distance.is_finite() {
            return Err(DisplaceError::invalid_distance(self.distance));
        }
        if !(0.0..1.0).contains(&self.divergence_warn_cos) {
            return Err(DisplaceError::invalid_param(
                "divergence_warn_cos",
                self.divergence_warn_cos.to_string(),
                "must lie in [0, 1)",
            ));
        }
        Ok(())
    }

    /// Load parameters from a TOML string. Missing fields take defaults.
    pub fn from_toml(toml_str: &str) -> DisplaceResult<Self> {
        toml::from_str(toml_str).map_err(|e| DisplaceError::config(e.to_string(), None))
    }

    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> DisplaceResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DisplaceError::config(format!("cannot read file: {}", e), Some(path.to_path_buf()))
        })?;
        toml::from_str(&contents)
            .map_err(|e| DisplaceError::config(e.to_string(), Some(path.to_path_buf())))
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> DisplaceResult<String> {
        toml::to_string_pretty(self).map_err(|e| DisplaceError::config(e.to_string(), None))
    }

    /// Load parameters from a JSON string.
    pub fn from_json(json_str: &str) -> DisplaceResult<Self> {
        serde_json::from_str(json_str).map_err(|e| DisplaceError::config(e.to_string(), None))
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> DisplaceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DisplaceError::config(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let params = DisplaceParams::default();
        assert_eq!(params.distance, 0.0);
        assert!(params.update_normals);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_distance() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = DisplaceParams::with_distance(bad).validate().unwrap_err();
            assert!(matches!(err, DisplaceError::InvalidDistance { .. }));
        }
        assert!(DisplaceParams::with_distance(-1e9).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_warn_cos() {
        let params = DisplaceParams {
            divergence_warn_cos: 1.5,
            ..DisplaceParams::with_distance(1.0)
        };
        assert!(matches!(
            params.validate(),
            Err(DisplaceError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let params = DisplaceParams::from_toml("distance = -0.5\n").unwrap();
        assert_eq!(params.distance, -0.5);
        assert!(params.update_normals);
        assert_eq!(params.divergence_warn_cos, 1e-3);
    }

    #[test]
    fn test_toml_and_json_round_trip() {
        let params = DisplaceParams {
            distance: 0.125,
            update_normals: false,
            divergence_warn_cos: 0.05,
        };
        assert_eq!(DisplaceParams::from_toml(&params.to_toml().unwrap()).unwrap(), params);
        assert_eq!(DisplaceParams::from_json(&params.to_json().unwrap()).unwrap(), params);
    }

    #[test]
    fn test_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "distance = 2.0").unwrap();
        writeln!(file, "update_normals = false").unwrap();
        file.flush().unwrap();

        let params = DisplaceParams::from_toml_file(file.path()).unwrap();
        assert_eq!(params.distance, 2.0);
        assert!(!params.update_normals);

        let err = DisplaceParams::from_toml_file("/nonexistent/displace.toml").unwrap_err();
        assert!(matches!(err, DisplaceError::Config { path: Some(_), .. }));
    }

    #[test]
    fn test_malformed_config() {
        let err = DisplaceParams::from_toml("distance = \"far\"").unwrap_err();
        assert_eq!(err.code().as_str(), "DISPLACE-2001");
        assert!(DisplaceParams::from_json("{ \"distance\": ").is_err());
    }
}
