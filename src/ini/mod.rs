//! The INI document model, its parser, and its file binding.

mod de;
mod error;
mod parse;
mod store;
mod value;

use indexmap::IndexMap;

pub use error::{ConversionError, IniError};
pub use store::IniStore;
pub use value::IniValue;

/// The keys of one section, in insertion order.
pub type Section = IndexMap<String, String>;

pub(crate) type Sections = IndexMap<String, Section>;
