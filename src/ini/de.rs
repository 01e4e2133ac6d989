//! Typed deserialization of a whole store through `serde`.

use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::warn;

use super::{IniError, IniStore, IniValue};

impl IniStore {
    /// Deserializes the store into `T`.
    ///
    /// Keys of the default section become top-level fields and every named
    /// section becomes a nested table. Values are coerced from text to the
    /// most specific type: boolean, integer, float, or string (fallback).
    ///
    /// ```
    /// use dragon_ini::IniStore;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct AppConfig {
    ///     name: String,
    ///     server: Server,
    /// }
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     port: u16,
    ///     debug: bool,
    /// }
    ///
    /// let store: IniStore = "name = demo\n[server]\nport = 8080\ndebug = true\n".parse()?;
    /// let config: AppConfig = store.deserialize()?;
    /// assert_eq!(config.name, "demo");
    /// assert_eq!(config.server.port, 8080);
    /// assert!(config.server.debug);
    /// # Ok::<(), dragon_ini::IniError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, IniError> {
        Value::Table(to_table(self)).try_into().map_err(IniError::Deserialize)
    }
}

fn to_table(store: &IniStore) -> Table {
    let mut root = Table::new();

    if let Some(defaults) = store.section("") {
        for (key, value) in defaults {
            root.insert(key.clone(), typed_value(value));
        }
    }

    for (name, keys) in store.sections().filter(|(name, _)| !name.is_empty()) {
        let table: Table = keys
            .iter()
            .map(|(key, value)| (key.clone(), typed_value(value)))
            .collect();

        if root.insert(name.to_string(), Value::Table(table)).is_some() {
            warn!(section = name, "section shadows a default-section key of the same name");
        }
    }

    root
}

/// Types a stored value for deserialization. INI text carries no type, so
/// `true`/`false` become booleans, plain decimal digits become integers and
/// dotted numbers become floats. Anything else, including integers too large
/// for `i64`, stays a string.
fn typed_value(text: &str) -> Value {
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        return Value::Boolean(text.eq_ignore_ascii_case("true"));
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    let is_decimal = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());

    let typed = if is_decimal {
        <i64 as IniValue>::parse(text).ok().map(Value::Integer)
    } else if text.contains('.') {
        <f64 as IniValue>::parse(text).ok().map(Value::Float)
    } else {
        None
    };

    typed.unwrap_or_else(|| Value::String(text.to_string()))
}
