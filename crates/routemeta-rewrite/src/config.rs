//! `routemeta.toml`: names the rewriter matches and emits.
//!
//! ```toml
//! [registry]
//! type = "RouteMap"
//! method = "route"
//!
//! [meta]
//! params-field = "paramsTypeId"
//! return-field = "returnTypeId"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub registry: RegistryConfig,
    pub meta: MetaConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Class the default export must be an instance of.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Method on that class whose call sites are rewritten.
    pub method: String,
}

/// Keys of the object literal appended to each rewritten call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MetaConfig {
    pub params_field: String,
    pub return_field: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            type_name: "RouteMap".to_string(),
            method: "route".to_string(),
        }
    }
}

impl Default for MetaConfig {
    fn default() -> Self {
        MetaConfig {
            params_field: "paramsTypeId".to_string(),
            return_field: "returnTypeId".to_string(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            registry: RegistryConfig::default(),
            meta: MetaConfig::default(),
        }
    }
}

impl RewriteConfig {
    pub fn from_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse routemeta.toml: {}", e))
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        Self::from_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RewriteConfig::from_str("").unwrap();
        assert_eq!(config, RewriteConfig::default());
        assert_eq!(config.registry.type_name, "RouteMap");
        assert_eq!(config.meta.return_field, "returnTypeId");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = RewriteConfig::from_str(
            r#"
[registry]
method = "add"

[meta]
params-field = "inputSchema"
"#,
        )
        .unwrap();
        assert_eq!(config.registry.type_name, "RouteMap");
        assert_eq!(config.registry.method, "add");
        assert_eq!(config.meta.params_field, "inputSchema");
        assert_eq!(config.meta.return_field, "returnTypeId");
    }

    #[test]
    fn rejects_wrong_value_types() {
        let err = RewriteConfig::from_str("[registry]\ntype = 3\n").unwrap_err();
        assert!(err.starts_with("Failed to parse routemeta.toml"), "{}", err);
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routemeta.toml");
        std::fs::write(&path, "[registry]\ntype = \"Router\"\n").unwrap();
        let config = RewriteConfig::from_file(&path).unwrap();
        assert_eq!(config.registry.type_name, "Router");

        let missing = RewriteConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(missing.starts_with("Failed to read"), "{}", missing);
    }
}
