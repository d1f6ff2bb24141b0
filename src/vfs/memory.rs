use super::{parent_of, ExtendedFs, VirtualFs};
use crate::path::absolutize;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-process filesystem handle
///
/// Directories and files live in ordered maps behind a mutex so the handle
/// can be shared between concurrent writers.
pub struct MemoryFs {
    cwd: String,
    extended: bool,
    max_file_size: u64,
    max_total_size: u64,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    total_size: u64,
}

/// Builder for [`MemoryFs`]
pub struct MemoryFsBuilder {
    cwd: String,
    extended: bool,
    max_file_size: u64,
    max_total_size: u64,
}

impl MemoryFsBuilder {
    pub fn new() -> Self {
        Self {
            cwd: "/".to_string(),
            extended: true,
            max_file_size: 50 * 1024 * 1024,   // 50 MB per file
            max_total_size: 500 * 1024 * 1024, // 500 MB total
        }
    }

    /// Set the working directory; it is created on build
    pub fn cwd(mut self, cwd: impl AsRef<str>) -> Self {
        self.cwd = absolutize("/", cwd.as_ref());
        self
    }

    /// Whether the handle exposes [`ExtendedFs`]
    pub fn extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    /// Set maximum individual file size
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set maximum total size of all files
    pub fn max_total_size(mut self, size: u64) -> Self {
        self.max_total_size = size;
        self
    }

    pub fn build(self) -> MemoryFs {
        let mut state = MemoryState::default();
        state.dirs.insert("/".to_string());
        // Every ancestor of the cwd exists from the start
        let mut prefix = String::new();
        for branch in self.cwd.split('/').filter(|b| !b.is_empty()) {
            prefix.push('/');
            prefix.push_str(branch);
            state.dirs.insert(prefix.clone());
        }

        MemoryFs {
            cwd: self.cwd,
            extended: self.extended,
            max_file_size: self.max_file_size,
            max_total_size: self.max_total_size,
            state: Mutex::new(state),
        }
    }
}

impl Default for MemoryFsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn builder() -> MemoryFsBuilder {
        MemoryFsBuilder::new()
    }

    /// Copy of a file's contents
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.state().files.get(&self.absolute(path)).cloned()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.state().dirs.contains(&self.absolute(path))
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.state().files.contains_key(&self.absolute(path))
    }

    /// Absolute paths of all files, sorted
    pub fn list_files(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    pub fn file_count(&self) -> usize {
        self.state().files.len()
    }

    /// Total bytes held across all files
    pub fn total_size(&self) -> u64 {
        self.state().total_size
    }

    fn absolute(&self, path: &str) -> String {
        absolutize(&self.cwd, path)
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        MemoryFsBuilder::new().build()
    }
}

impl VirtualFs for MemoryFs {
    fn mkdir(&self, path: &str) -> io::Result<()> {
        let abs_path = self.absolute(path);
        let mut state = self.state();

        if state.files.contains_key(&abs_path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("File exists: {}", abs_path),
            ));
        }
        if state.dirs.contains(&abs_path) {
            return Ok(());
        }
        if !state.dirs.contains(parent_of(&abs_path)) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No such directory: {}", parent_of(&abs_path)),
            ));
        }

        state.dirs.insert(abs_path);
        Ok(())
    }

    fn write_file(&self, path: &str, data: Vec<u8>) -> io::Result<()> {
        let abs_path = self.absolute(path);
        let mut state = self.state();

        if state.dirs.contains(&abs_path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Is a directory: {}", abs_path),
            ));
        }
        if !state.dirs.contains(parent_of(&abs_path)) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No such directory: {}", parent_of(&abs_path)),
            ));
        }

        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(io::Error::other(format!(
                "File too large: {} bytes (max: {})",
                size, self.max_file_size
            )));
        }

        let replaced = state.files.get(&abs_path).map_or(0, |old| old.len() as u64);
        let new_total = state.total_size - replaced + size;
        if new_total > self.max_total_size {
            return Err(io::Error::other(format!(
                "File too large: {} bytes (max: {})",
                new_total, self.max_total_size
            )));
        }

        state.total_size = new_total;
        state.files.insert(abs_path, data);
        Ok(())
    }

    fn cwd(&self) -> String {
        self.cwd.clone()
    }

    fn extended(&self) -> Option<&dyn ExtendedFs> {
        if self.extended {
            Some(self)
        } else {
            None
        }
    }
}

impl ExtendedFs for MemoryFs {
    fn mkdir_tree(&self, path: &str) -> io::Result<()> {
        let abs_path = self.absolute(path);
        let mut prefix = String::new();
        for branch in abs_path.split('/').filter(|b| !b.is_empty()) {
            prefix.push('/');
            prefix.push_str(branch);
            self.mkdir(&prefix)?;
        }
        Ok(())
    }

    fn dirname(&self, path: &str) -> String {
        parent_of(&self.absolute(path)).to_string()
    }

    fn resolve(&self, path: &str) -> String {
        self.absolute(path)
    }
}
