//! Layered loading of INI content from files and the environment.

mod builder;
mod env;
mod file;
mod source;

pub use builder::IniLoader;
pub use env::EnvSource;
pub use file::FileSource;
pub use source::IniSource;
