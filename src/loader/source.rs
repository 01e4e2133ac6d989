use crate::ini::{IniError, IniStore};

/// A layer of INI content applied by [`IniLoader`](super::IniLoader).
///
/// Sources merge into the store, overriding keys set by earlier layers.
pub trait IniSource: Send + Sync + std::fmt::Debug {
    fn apply(&self, store: &mut IniStore, ignore_errors: bool) -> Result<(), IniError>;
}
