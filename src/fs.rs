//! Filesystem access behind a trait, so commands and config loading can be
//! exercised against an in-memory filesystem in tests.

use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write content to a file, creating it if it doesn't exist.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Last modification time, used by watch mode to detect edits.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if path == Path::new(STDIN_PATH) {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            return Ok(buffer);
        }
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::time::Duration;

    /// In-memory filesystem. Every write bumps a logical clock that stands in
    /// for the modification time.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<String, (String, u64)>>,
        clock: RwLock<u64>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<String>,
        {
            let fs = Self::new();
            for (path, content) in files {
                // Writes to the mock never fail
                let _ = fs.write(path.as_ref(), &content.into());
            }
            fs
        }

        pub fn contents(&self, path: &Path) -> Option<String> {
            let key = path.to_string_lossy().to_string();
            self.files.read().unwrap().get(&key).map(|(c, _)| c.clone())
        }
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.contents(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            let key = path.to_string_lossy().to_string();
            let mut clock = self.clock.write().unwrap();
            *clock += 1;
            self.files
                .write()
                .unwrap()
                .insert(key, (content.to_string(), *clock));
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.contents(path).is_some()
        }

        fn modified(&self, path: &Path) -> io::Result<SystemTime> {
            let key = path.to_string_lossy().to_string();
            self.files
                .read()
                .unwrap()
                .get(&key)
                .map(|(_, tick)| SystemTime::UNIX_EPOCH + Duration::from_secs(*tick))
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, key))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_fs_read_write() {
            let fs = MockFs::new();
            let path = Path::new("/data/doc.json");

            assert!(!fs.exists(path));
            assert!(fs.read_to_string(path).is_err());

            fs.write(path, "{}").unwrap();
            assert!(fs.exists(path));
            assert_eq!(fs.read_to_string(path).unwrap(), "{}");
        }

        #[test]
        fn test_mock_fs_modified_advances() {
            let fs = MockFs::with_files([(Path::new("/a.json"), "[]")]);
            let first = fs.modified(Path::new("/a.json")).unwrap();

            fs.write(Path::new("/a.json"), "[1]").unwrap();
            let second = fs.modified(Path::new("/a.json")).unwrap();

            assert!(second > first);
        }
    }
}
