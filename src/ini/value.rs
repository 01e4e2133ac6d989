//! Conversion between typed values and their stored text.

use std::path::PathBuf;

use super::ConversionError;

/// A type that can be stored in an [`IniStore`](super::IniStore) as text.
///
/// `render` produces the canonical text for a value and `parse` reads it back.
/// Implement this for your own types to use them with
/// [`get`](super::IniStore::get) and [`set`](super::IniStore::set).
///
/// ```
/// use dragon_ini::{ConversionError, IniStore, IniValue};
///
/// #[derive(Debug, PartialEq)]
/// struct Level(u8);
///
/// impl IniValue for Level {
///     fn render(&self) -> String {
///         format!("L{}", self.0)
///     }
///
///     fn parse(text: &str) -> Result<Self, ConversionError> {
///         text.strip_prefix('L')
///             .and_then(|n| n.parse().ok())
///             .map(Level)
///             .ok_or_else(|| ConversionError::new::<Self>(text))
///     }
/// }
///
/// let mut store = IniStore::new();
/// store.set("game", "level", Level(3));
/// assert_eq!(store.get_str("game", "level", ""), "L3");
/// assert_eq!(store.get("game", "level", Level(1))?, Level(3));
/// # Ok::<(), dragon_ini::IniError>(())
/// ```
pub trait IniValue: Sized {
    fn render(&self) -> String;

    fn parse(text: &str) -> Result<Self, ConversionError>;
}

impl IniValue for String {
    fn render(&self) -> String {
        self.clone()
    }

    fn parse(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl IniValue for PathBuf {
    fn render(&self) -> String {
        self.display().to_string()
    }

    fn parse(text: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(text))
    }
}

impl IniValue for bool {
    fn render(&self) -> String {
        self.to_string()
    }

    // Accepts numeric flags as well, since hand-edited files often use them.
    fn parse(text: &str) -> Result<Self, ConversionError> {
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Ok(false)
        } else {
            Err(ConversionError::new::<Self>(text))
        }
    }
}

macro_rules! impl_ini_value_via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IniValue for $ty {
                fn render(&self) -> String {
                    self.to_string()
                }

                fn parse(text: &str) -> Result<Self, ConversionError> {
                    text.parse().map_err(|_| ConversionError::new::<Self>(text))
                }
            }
        )*
    };
}

impl_ini_value_via_from_str!(
    char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_roundtrip() {
        assert_eq!(42i32.render(), "42");
        assert_eq!(<i32 as IniValue>::parse("-7"), Ok(-7));
        assert_eq!(<u64 as IniValue>::parse("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn test_integer_rejects_garbage() {
        let err = <u8 as IniValue>::parse("300").unwrap_err();
        assert_eq!(err.text, "300");
        assert_eq!(err.target, "u8");
        assert!(<i32 as IniValue>::parse("12abc").is_err());
    }

    #[test]
    fn test_bool_accepts_words_and_digits() {
        assert_eq!(<bool as IniValue>::parse("TRUE"), Ok(true));
        assert_eq!(<bool as IniValue>::parse("1"), Ok(true));
        assert_eq!(<bool as IniValue>::parse("False"), Ok(false));
        assert_eq!(<bool as IniValue>::parse("0"), Ok(false));
        assert!(<bool as IniValue>::parse("yes").is_err());
        assert_eq!(true.render(), "true");
    }

    #[test]
    fn test_float_render() {
        assert_eq!(1.5f64.render(), "1.5");
        assert_eq!(<f64 as IniValue>::parse("2.25"), Ok(2.25));
    }

    #[test]
    fn test_string_and_path_passthrough() {
        assert_eq!(<String as IniValue>::parse("a b c"), Ok("a b c".to_string()));
        assert_eq!(
            <PathBuf as IniValue>::parse("/var/log/app.log"),
            Ok(PathBuf::from("/var/log/app.log"))
        );
    }
}
