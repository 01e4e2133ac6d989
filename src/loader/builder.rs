use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::env::EnvSource;
use super::file::FileSource;
use super::source::IniSource;
use crate::ini::{IniError, IniStore};

/// Builder for loading INI content from several layered sources.
///
/// Sources are merged in registration order, with later sources overriding
/// keys set by earlier ones. Sections are merged key by key.
///
/// ## Example
///
/// ```no_run
/// use dragon_ini::IniStore;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     name: String,
///     port: u16,
/// }
///
/// // defaults -> local file -> MYAPP__* environment overrides
/// let config: MyConfig = IniStore::builder()
///     .with_file("config/default.ini", true)
///     .with_file("config/local.ini", false)
///     .with_env("MYAPP", "__")
///     .build()?;
/// # Ok::<(), dragon_ini::IniError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "loaders do nothing until .load() or .build() is called"]
pub struct IniLoader {
    sources: Vec<Box<dyn IniSource>>,
    ignore_errors: bool,
}

impl IniStore {
    /// Creates a new layered loader.
    pub fn builder() -> IniLoader {
        IniLoader::default()
    }
}

impl IniLoader {
    /// Adds an INI file to be loaded.
    ///
    /// If `required` is `true`, loading fails if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        if required {
            self.with_source(FileSource::required(path))
        } else {
            self.with_source(FileSource::optional(path))
        }
    }

    /// Overrides keys from environment variables starting with `prefix`.
    ///
    /// `MYAPP__PORT` sets `port` in the default section and
    /// `MYAPP__DATABASE__HOST` sets `host` in `[database]`.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    pub fn with_source(mut self, source: impl IniSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Skip malformed lines in file sources instead of failing.
    pub fn ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Loads and merges every source into a new, unlinked store.
    pub fn load(self) -> Result<IniStore, IniError> {
        let mut store = IniStore::new();
        for source in &self.sources {
            debug!(?source, "applying ini source");
            source.apply(&mut store, self.ignore_errors)?;
        }
        Ok(store)
    }

    /// Loads every source and deserializes the result into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, IniError> {
        self.load()?.deserialize()
    }
}
