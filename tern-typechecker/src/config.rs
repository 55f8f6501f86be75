//! Checker configuration
//!
//! Every field has a default, so an empty TOML document yields
//! [`CheckerConfig::default`]:
//!
//! ```toml
//! report_unsupported = false
//! max_supertype_depth = 128
//! ```

use serde::Deserialize;
use tern_model::DEFAULT_MAX_SUPERTYPE_DEPTH;

use crate::error::{TypecheckError, TypecheckResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Warn about constructs that are accepted but not checked
    pub report_unsupported: bool,
    /// Require declared and parameter types to be visible wherever the
    /// declaration is
    pub check_visibility: bool,
    /// Run the initializer leak pass after typing a unit
    pub check_self_references: bool,
    /// Recursion limit for supertype search on malformed hierarchies
    pub max_supertype_depth: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            report_unsupported: true,
            check_visibility: true,
            check_self_references: true,
            max_supertype_depth: DEFAULT_MAX_SUPERTYPE_DEPTH,
        }
    }
}

impl CheckerConfig {
    pub fn from_toml_str(source: &str) -> TypecheckResult<Self> {
        let config: Self = toml::from_str(source).map_err(|err| TypecheckError::InvalidConfig {
            message: err.message().to_string(),
        })?;
        if config.max_supertype_depth == 0 {
            return Err(TypecheckError::InvalidConfig {
                message: "max_supertype_depth must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}
