pub mod ini;
pub mod loader;

pub use ini::{ConversionError, IniError, IniStore, IniValue, Section};
pub use loader::IniLoader;
