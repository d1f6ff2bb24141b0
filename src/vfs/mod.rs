mod dir;
mod memory;


pub use dir::DirFs;
pub use memory::{MemoryFs, MemoryFsBuilder};

use crate::path;
use std::io;

/// Core operations every interpreter filesystem exposes
///
/// Paths are `/`-separated virtual paths. Relative paths are interpreted
/// against [`VirtualFs::cwd`].
pub trait VirtualFs: Send + Sync {
    /// Create a single directory. Its parent must already exist.
    fn mkdir(&self, path: &str) -> io::Result<()>;

    /// Replace the file at `path` with `data`, taking ownership of the buffer
    fn write_file(&self, path: &str, data: Vec<u8>) -> io::Result<()>;

    /// Current working directory, always absolute
    fn cwd(&self) -> String;

    /// The extended operation set, when this handle provides one
    fn extended(&self) -> Option<&dyn ExtendedFs> {
        None
    }
}

/// Optional operations offered by richer hosts
pub trait ExtendedFs {
    /// Create `path` and every missing ancestor
    fn mkdir_tree(&self, path: &str) -> io::Result<()>;

    /// Parent directory of an absolute path
    fn dirname(&self, path: &str) -> String;

    /// Absolute, normalized form of `path`
    fn resolve(&self, path: &str) -> String;
}

/// Write `buffer` to `path`, creating missing parent directories first
///
/// Picks [`write_file_rich`] when the handle exposes [`ExtendedFs`] and
/// [`write_file_shim`] otherwise.
pub fn write_file(fs: &dyn VirtualFs, path: &str, buffer: Vec<u8>) -> io::Result<()> {
    match fs.extended() {
        Some(ext) => write_file_rich(fs, ext, path, buffer),
        None => write_file_shim(fs, path, buffer),
    }
}

/// Writer for hosts that resolve and create directory trees themselves
pub fn write_file_rich(
    fs: &dyn VirtualFs,
    ext: &dyn ExtendedFs,
    path: &str,
    buffer: Vec<u8>,
) -> io::Result<()> {
    let abs_path = ext.resolve(path);
    ext.mkdir_tree(&ext.dirname(&abs_path))?;
    fs.write_file(&abs_path, buffer)
}

/// Writer for hosts that only offer `mkdir`, `write_file` and `cwd`
///
/// The tree is built from the resolved path, so it always matches the
/// directory the write lands in.
pub fn write_file_shim(fs: &dyn VirtualFs, path: &str, buffer: Vec<u8>) -> io::Result<()> {
    let abs_path = path::resolve(fs, path);
    path::mkdir_tree(fs, &path::dirname(&abs_path))?;
    fs.write_file(&abs_path, buffer)
}

/// Parent of a normalized absolute path, `/` for top-level entries
pub(crate) fn parent_of(abs_path: &str) -> &str {
    match abs_path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &abs_path[..idx],
    }
}
