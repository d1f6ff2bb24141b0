use super::{parent_of, ExtendedFs, VirtualFs};
use crate::path::absolutize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem handle that maps the virtual tree onto a host directory
///
/// Virtual `/` is `root`. Paths are normalized before mapping, so `..`
/// can never climb out of `root`.
pub struct DirFs {
    root: PathBuf,
    cwd: String,
    extended: bool,
}

impl DirFs {
    /// Open a handle over an existing host directory
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Not a directory: {}", root.display()),
            ));
        }

        Ok(Self {
            root,
            cwd: "/".to_string(),
            extended: true,
        })
    }

    /// Change the virtual working directory, creating it on the host
    pub fn with_cwd(mut self, cwd: &str) -> io::Result<Self> {
        let cwd = absolutize("/", cwd);
        fs::create_dir_all(self.host_path(&cwd))?;
        self.cwd = cwd;
        Ok(self)
    }

    /// Hide the extended operation set, forcing the shim writer
    pub fn shim(mut self) -> Self {
        self.extended = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host location of a virtual path
    pub fn host_path(&self, path: &str) -> PathBuf {
        let abs_path = absolutize(&self.cwd, path);
        let mut host = self.root.clone();
        for branch in abs_path.split('/').filter(|b| !b.is_empty()) {
            host.push(branch);
        }
        host
    }
}

impl VirtualFs for DirFs {
    fn mkdir(&self, path: &str) -> io::Result<()> {
        let host = self.host_path(path);
        match fs::create_dir(&host) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && host.is_dir() => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn write_file(&self, path: &str, data: Vec<u8>) -> io::Result<()> {
        fs::write(self.host_path(path), data)
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

impl ExtendedFs for DirFs {
    fn mkdir_tree(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.host_path(path))
    }

    fn dirname(&self, path: &str) -> String {
        parent_of(&absolutize(&self.cwd, path)).to_string()
    }

    fn resolve(&self, path: &str) -> String {
        absolutize(&self.cwd, path)
    }
}
