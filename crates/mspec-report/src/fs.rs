//! Filesystem Gateway: the only place the generator touches the disk
use std::fs;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

pub trait FileSystemGateway {
    /// Existing directory, or a creatable one: the path ends with a separator
    /// and its parent exists.
    ///
    /// A missing path without a trailing separator (`out/reports`) is not a
    /// directory; it classifies as a file target instead.
    fn is_valid_directory_path(&self, path: &Path) -> bool;

    /// A path a report file can be created at
    fn is_valid_file_path(&self, path: &Path) -> bool;

    fn delete_file_if_exists(&self, path: &Path) -> io::Result<()>;

    /// Remove whatever is at `path`, then create it as an empty directory.
    fn create_or_overwrite_directory(&self, path: &Path) -> io::Result<()>;

    fn open_write_stream(&self, path: &Path) -> io::Result<Box<dyn Write>>;
}

/// `std::fs` backed gateway
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl StdFileSystem {
    fn parent_exists(path: &Path) -> bool {
        match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => true,
            Some(parent) => parent.is_dir(),
            None => false,
        }
    }
}

fn ends_with_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR)
}

impl FileSystemGateway for StdFileSystem {
    fn is_valid_directory_path(&self, path: &Path) -> bool {
        path.is_dir() || (ends_with_separator(path) && !path.exists() && Self::parent_exists(path))
    }

    fn is_valid_file_path(&self, path: &Path) -> bool {
        !path.is_dir()
            && !ends_with_separator(path)
            && path.file_name().is_some()
            && Self::parent_exists(path)
    }

    fn delete_file_if_exists(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn create_or_overwrite_directory(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else if path.exists() {
            fs::remove_file(path)?;
        }
        fs::create_dir_all(path)
    }

    fn open_write_stream(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let file = fs::File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
