use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, error};

use super::parse::parse_into;
use super::{IniError, IniValue, Section, Sections};

/// An in-memory INI document, optionally linked to a file on disk.
///
/// Sections and keys keep their insertion order, so writing a store back out
/// is deterministic. Keys that appear before any `[header]` belong to the
/// default section, whose name is the empty string.
///
/// ## File binding
///
/// [`open`](Self::open) links the store to a path. With auto-sync enabled,
/// [`close`](Self::close) writes the content back before resetting the store.
/// Dropping a linked store closes it too, but a failed write during drop can
/// only be logged, so call `close` explicitly when the outcome matters.
///
/// ## Example
///
/// ```no_run
/// use dragon_ini::IniStore;
///
/// let mut store = IniStore::new();
/// store.open("settings.ini", true, false)?;
///
/// let port: u16 = store.get("server", "port", 8080)?;
/// store.set("server", "port", port + 1);
///
/// store.close()?; // writes settings.ini
/// # Ok::<(), dragon_ini::IniError>(())
/// ```
#[derive(Debug, Default)]
pub struct IniStore {
    sections: Sections,
    linked_path: Option<PathBuf>,
    auto_sync: bool,
}

impl IniStore {
    /// Creates an empty, unlinked store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store linked to `path`, reading it if it exists.
    pub fn linked(path: impl AsRef<Path>, auto_sync: bool) -> Result<Self, IniError> {
        let mut store = Self::new();
        store.open(path, auto_sync, false)?;
        Ok(store)
    }

    /// The file linked by [`open`](Self::open) or [`set_filename`](Self::set_filename).
    ///
    /// Reading a file through [`read`](Self::read) does not link it.
    pub fn filename(&self) -> Option<&Path> {
        self.linked_path.as_deref()
    }

    /// Links the store to `path`. An empty path unlinks it.
    pub fn set_filename(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.linked_path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path.to_path_buf())
        };
    }

    pub fn auto_sync_enabled(&self) -> bool {
        self.auto_sync
    }

    pub fn enable_auto_sync(&mut self, enable: bool) {
        self.auto_sync = enable;
    }

    /// Returns the stored text, or inserts `default` and returns it.
    pub fn get_str(&mut self, section: &str, key: &str, default: &str) -> String {
        self.section_mut(section)
            .entry(key.to_string())
            .or_insert_with(|| default.to_string())
            .clone()
    }

    pub fn set_str(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.section_mut(section).insert(key.to_string(), value.into());
    }

    /// Returns the stored value parsed as `T`.
    ///
    /// If the key is missing, the rendered `default` is stored and `default`
    /// is returned. A stored value that does not parse as `T` is an error.
    pub fn get<T: IniValue>(
        &mut self,
        section: &str,
        key: &str,
        default: T,
    ) -> Result<T, IniError> {
        let keys = self.section_mut(section);
        match keys.get(key) {
            Some(text) => Ok(T::parse(text)?),
            None => {
                keys.insert(key.to_string(), default.render());
                Ok(default)
            }
        }
    }

    /// Like [`get`](Self::get), but a value that fails to parse yields `T::default()`.
    pub fn get_lossy<T: IniValue + Default>(
        &mut self,
        section: &str,
        key: &str,
        default: T,
    ) -> T {
        self.get(section, key, default).unwrap_or_else(|e| {
            debug!(section, key, error = %e, "falling back to default value");
            T::default()
        })
    }

    pub fn set<T: IniValue>(&mut self, section: &str, key: &str, value: T) {
        self.set_str(section, key, value.render());
    }

    /// Returns whether `key` exists in `section`. Never inserts anything.
    pub fn exists(&self, section: &str, key: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|keys| keys.contains_key(key))
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterates sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, keys)| (name.as_str(), keys))
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Removes a key, returning its value. Order of the remaining keys is kept.
    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections.get_mut(section)?.shift_remove(key)
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Reads INI text from `reader`, merging it into the current content.
    ///
    /// Malformed lines fail the read with [`IniError::Format`] unless
    /// `ignore_errors` is set, in which case they are skipped.
    pub fn read_more(
        &mut self,
        reader: impl BufRead,
        ignore_errors: bool,
    ) -> Result<(), IniError> {
        parse_into(&mut self.sections, reader, ignore_errors)
    }

    /// Clears the content and reads it from `reader`.
    ///
    /// This does not link anything; use [`open`](Self::open) for that.
    pub fn read(&mut self, reader: impl BufRead, ignore_errors: bool) -> Result<(), IniError> {
        self.sections.clear();
        self.read_more(reader, ignore_errors)
    }

    /// Writes the content to `writer` in INI format.
    pub fn write(&self, mut writer: impl Write) -> Result<(), IniError> {
        write!(writer, "{self}")?;
        writer.flush()?;
        Ok(())
    }

    /// Links `path` and reads it if it can be opened.
    ///
    /// A missing or unreadable file is not an error: the store keeps its
    /// current content and the file is created on the next [`sync`](Self::sync).
    /// If the file exists but fails to parse, the store is left unlinked with
    /// auto-sync disabled, so the partly read content is never written back.
    pub fn open(
        &mut self,
        path: impl AsRef<Path>,
        auto_sync: bool,
        ignore_errors: bool,
    ) -> Result<(), IniError> {
        let path = path.as_ref();

        match File::open(path) {
            Ok(file) => {
                debug!(path = %path.display(), "reading linked ini file");
                if let Err(e) = self.read(BufReader::new(file), ignore_errors) {
                    // Partial content must never be synced over the file.
                    self.linked_path = None;
                    self.auto_sync = false;
                    return Err(e);
                }
            }
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "linked ini file not readable, starting empty"
                );
            }
        }

        self.set_filename(path);
        self.auto_sync = auto_sync;
        Ok(())
    }

    /// Writes the content to the linked file, truncating it.
    pub fn sync(&self) -> Result<(), IniError> {
        let path = self.linked_path.as_deref().ok_or(IniError::NoLinkedFile)?;
        let file = File::create(path).map_err(|e| IniError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), sections = self.sections.len(), "syncing ini file");
        self.write(BufWriter::new(file))
    }

    /// Syncs if linked with auto-sync enabled, then resets the store.
    ///
    /// The store is cleared and unlinked even when the sync fails; the
    /// failure is still returned.
    pub fn close(&mut self) -> Result<(), IniError> {
        let synced = if self.linked_path.is_some() && self.auto_sync {
            self.sync()
        } else {
            Ok(())
        };

        self.sections.clear();
        self.linked_path = None;
        self.auto_sync = false;
        synced
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }
}

impl Drop for IniStore {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!(error = %e, "failed to sync ini file on drop");
        }
    }
}

impl fmt::Display for IniStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header-less keys must come first or they would be read back into
        // whichever section precedes them.
        let defaults = self
            .sections
            .get("")
            .filter(|keys| !keys.is_empty())
            .map(|keys| ("", keys));
        let named = self
            .sections
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, keys)| (name.as_str(), keys));

        for (name, keys) in defaults.into_iter().chain(named) {
            if !name.is_empty() {
                writeln!(f, "[{name}]")?;
            }
            for (key, value) in keys {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for IniStore {
    type Err = IniError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut store = Self::new();
        store.read(s.as_bytes(), false)?;
        Ok(store)
    }
}
