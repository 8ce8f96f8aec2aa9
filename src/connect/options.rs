use crate::action::ComponentKey;
use crate::error::ConfigError;
use crate::utils::{generate_random_key, ComponentMeta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Derives the key of a component instance from its props and type.
pub type KeyGenerator<P> = Arc<dyn Fn(&P, &ComponentMeta) -> ComponentKey + Send + Sync>;

/// Serializable part of the connector options.
///
/// ```toml
/// slice_name = "componentState"
/// store_binding = "store"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Name of the component state slice within the global state.
    #[serde(default = "default_slice_name")]
    pub slice_name: String,
    /// Name under which the store is registered in the [`StoreContext`](crate::store::StoreContext).
    #[serde(default = "default_store_binding")]
    pub store_binding: String,
}

fn default_slice_name() -> String {
    "componentState".to_string()
}

fn default_store_binding() -> String {
    "store".to_string()
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            slice_name: default_slice_name(),
            store_binding: default_store_binding(),
        }
    }
}

impl ConnectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Options for [`connect_component_state`](super::connect_component_state).
pub struct ConnectOptions<P> {
    pub key_generator: KeyGenerator<P>,
    pub slice_name: String,
    pub store_binding: String,
}

impl<P: 'static> ConnectOptions<P> {
    pub fn from_config(config: ConnectConfig) -> Self {
        Self {
            slice_name: config.slice_name,
            store_binding: config.store_binding,
            ..Self::default()
        }
    }

    /// Options from a TOML file, with the default key generator.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self::from_config(ConnectConfig::load(path)?))
    }

    pub fn with_key_generator<F>(mut self, key_generator: F) -> Self
    where
        F: Fn(&P, &ComponentMeta) -> ComponentKey + Send + Sync + 'static,
    {
        self.key_generator = Arc::new(key_generator);
        self
    }

    pub fn with_slice_name(mut self, slice_name: impl Into<String>) -> Self {
        self.slice_name = slice_name.into();
        self
    }

    pub fn with_store_binding(mut self, store_binding: impl Into<String>) -> Self {
        self.store_binding = store_binding.into();
        self
    }
}

impl<P: 'static> Default for ConnectOptions<P> {
    fn default() -> Self {
        let config = ConnectConfig::default();
        Self {
            key_generator: Arc::new(|_props: &P, meta: &ComponentMeta| generate_random_key(meta)),
            slice_name: config.slice_name,
            store_binding: config.store_binding,
        }
    }
}

impl<P> Clone for ConnectOptions<P> {
    fn clone(&self) -> Self {
        Self {
            key_generator: Arc::clone(&self.key_generator),
            slice_name: self.slice_name.clone(),
            store_binding: self.store_binding.clone(),
        }
    }
}

impl<P> fmt::Debug for ConnectOptions<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("slice_name", &self.slice_name)
            .field("store_binding", &self.store_binding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ConnectConfig::default();
        assert_eq!(config.slice_name, "componentState");
        assert_eq!(config.store_binding, "store");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = ConnectConfig::from_toml_str("slice_name = \"ui\"").unwrap();
        assert_eq!(config.slice_name, "ui");
        assert_eq!(config.store_binding, "store");
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ConnectConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "slice_name = \"widgets\"\nstore_binding = \"app\"").unwrap();

        let config = ConnectConfig::load(file.path()).unwrap();
        assert_eq!(config.slice_name, "widgets");
        assert_eq!(config.store_binding, "app");
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "slice_name = [").unwrap();

        let err = ConnectConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn options_from_config() {
        let options = ConnectOptions::<()>::from_config(ConnectConfig {
            slice_name: "ui".to_string(),
            store_binding: "main".to_string(),
        });
        assert_eq!(options.slice_name, "ui");
        assert_eq!(options.store_binding, "main");

        let key = (options.key_generator)(&(), &ComponentMeta::default());
        assert!(key.as_str().starts_with("Anonymous__"));
    }

    #[test]
    fn options_load_wraps_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_binding = 7").unwrap();

        let err = ConnectOptions::<()>::load(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::Parse { .. })));
    }
}
