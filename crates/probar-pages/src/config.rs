//! Page object configuration.

use serde::{Deserialize, Serialize};

/// Default first component of dotted page object paths
pub const DEFAULT_ROOT_NAME: &str = "page";

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

/// Configuration shared by every node of a page object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Name of the root node in dotted paths (`page.form.submit()`)
    #[serde(default = "default_root_name")]
    pub root_name: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
        }
    }
}

impl PageConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root name used in error paths
    #[must_use]
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(PageConfig::new().root_name, "page");
    }

    #[test]
    fn test_builder() {
        assert_eq!(PageConfig::new().root_name("login").root_name, "login");
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let config: PageConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }
}
