use tracing::trace;

use super::source::IniSource;
use crate::ini::{IniError, IniStore};

/// A source that overrides keys from environment variables.
///
/// `PREFIX<sep>KEY` sets `KEY` in the default section and
/// `PREFIX<sep>SECTION<sep>KEY` sets `KEY` in `SECTION`. Names are lowercased.
#[derive(Debug, Clone)]
pub struct EnvSource {
    /// The prefix with its trailing separator, e.g. `MYAPP__`.
    var_prefix: String,
    separator: String,
}

impl EnvSource {
    /// # Panics
    ///
    /// Panics if `separator` is empty, since section and key could not be told apart.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");

        let mut var_prefix = prefix.into();
        var_prefix.push_str(&separator);
        Self {
            var_prefix,
            separator,
        }
    }

    /// Maps matching variables to `(section, key, value)` in name order.
    fn entries(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Vec<(String, String, String)> {
        let mut vars: Vec<_> = vars.into_iter().collect();
        vars.sort();

        let mut entries = Vec::new();
        for (name, value) in vars {
            let Some(path) = name.strip_prefix(self.var_prefix.as_str()) else {
                continue;
            };

            let segments: Vec<String> = path
                .split(self.separator.as_str())
                .map(|s| s.to_lowercase())
                .collect();

            match segments.as_slice() {
                [key] if !key.is_empty() => entries.push((String::new(), key.clone(), value)),
                [section, key] if !section.is_empty() && !key.is_empty() => {
                    entries.push((section.clone(), key.clone(), value))
                }
                _ => trace!(var = %name, "ignoring environment variable with unsupported shape"),
            }
        }

        entries
    }
}

impl IniSource for EnvSource {
    fn apply(&self, store: &mut IniStore, _ignore_errors: bool) -> Result<(), IniError> {
        for (section, key, value) in self.entries(std::env::vars()) {
            store.set_str(&section, &key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_entries_map_sections_and_keys() {
        let source = EnvSource::new("APP", "__");
        let entries = source.entries(vars(&[
            ("APP__DATABASE__PORT", "5432"),
            ("APP__NAME", "demo"),
            ("OTHER__NAME", "skip"),
        ]));

        assert_eq!(
            entries,
            vec![
                ("database".to_string(), "port".to_string(), "5432".to_string()),
                (String::new(), "name".to_string(), "demo".to_string()),
            ]
        );
    }

    #[test]
    fn test_entries_skip_unsupported_shapes() {
        let source = EnvSource::new("APP", "__");
        let entries = source.entries(vars(&[
            ("APP__", "empty"),
            ("APP__A__B__C", "too deep"),
            ("APP____KEY", "empty section"),
        ]));

        assert!(entries.is_empty());
    }

    #[test]
    fn test_apply_reads_process_environment() {
        std::env::set_var("DRAGON_INI_ENV_TEST__SERVER__HOST", "example.com");

        let mut store = IniStore::new();
        EnvSource::new("DRAGON_INI_ENV_TEST", "__")
            .apply(&mut store, false)
            .unwrap();

        assert_eq!(store.get_str("server", "host", ""), "example.com");
    }

    #[test]
    #[should_panic(expected = "separator must not be empty")]
    fn test_empty_separator_panics() {
        EnvSource::new("APP", "");
    }
}
