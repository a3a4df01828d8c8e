//! Resolution of the session track list from a directory

use crate::{ImportError, Result};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extension used when none is given
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Builds the ordered track list for a session
///
/// Matches `*.<ext>` in a single directory (no recursion, hidden files
/// skipped), drops exclusions, then sorts by file name. Running the same
/// resolver twice yields the same list.
///
/// ```no_run
/// use listen_importer::TrackResolver;
///
/// let tracks = TrackResolver::new("audio")
///     .extension("m4a")
///     .exclude(["practice.m4a"])
///     .resolve()?;
/// # Ok::<(), listen_importer::ImportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrackResolver {
    dir: PathBuf,
    extension: String,
    excludes: Vec<PathBuf>,
    follow_links: bool,
}

impl TrackResolver {
    /// Resolver for `dir` matching `*.mp3`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            excludes: Vec::new(),
            follow_links: true,
        }
    }

    /// Extension to match, with or without the leading dot
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        self.extension = ext.as_ref().trim_start_matches('.').to_string();
        self
    }

    /// Add files to leave out
    ///
    /// Each entry may be the path as listed, any path to the same file, or a
    /// bare file name.
    pub fn exclude<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excludes.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Set whether symbolic links to files are matched
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Resolve the track list
    ///
    /// Fails with [`ImportError::NoInputFiles`] when nothing is left after
    /// exclusions.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Err(ImportError::DirectoryNotFound(self.dir.clone()));
        }
        if !self.dir.is_dir() {
            return Err(ImportError::NotADirectory(self.dir.clone()));
        }

        let exclusions = Exclusions::new(&self.excludes);
        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links);

        let mut tracks = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            if exclusions.contains(entry.path()) {
                tracing::debug!("Excluded {}", entry.path().display());
                continue;
            }

            tracks.push(entry.into_path());
        }

        tracks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        tracks.dedup();

        if tracks.is_empty() {
            return Err(ImportError::NoInputFiles {
                dir: self.dir.clone(),
                ext: self.extension.clone(),
            });
        }

        tracing::debug!(
            "Resolved {} track(s) in {}",
            tracks.len(),
            self.dir.display()
        );
        Ok(tracks)
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') {
            return false;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

/// Exclusion list split by how each entry matches
struct Exclusions {
    paths: HashSet<PathBuf>,
    canonical: HashSet<PathBuf>,
    names: HashSet<OsString>,
}

impl Exclusions {
    fn new(excludes: &[PathBuf]) -> Self {
        let mut paths = HashSet::new();
        let mut canonical = HashSet::new();
        let mut names = HashSet::new();

        for exclude in excludes {
            if is_bare_name(exclude) {
                names.insert(exclude.as_os_str().to_os_string());
            }
            if let Ok(resolved) = exclude.canonicalize() {
                canonical.insert(resolved);
            }
            paths.insert(exclude.clone());
        }

        Self {
            paths,
            canonical,
            names,
        }
    }

    fn contains(&self, path: &Path) -> bool {
        if self.paths.contains(path) {
            return true;
        }
        if path
            .file_name()
            .is_some_and(|name| self.names.contains(name))
        {
            return true;
        }
        !self.canonical.is_empty()
            && path
                .canonicalize()
                .is_ok_and(|resolved| self.canonical.contains(&resolved))
    }
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(tracks: &[PathBuf]) -> Vec<String> {
        tracks
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_extension_strips_leading_dot() {
        let resolver = TrackResolver::new("audio").extension(".m4a");
        assert_eq!(resolver.extension, "m4a");
    }

    #[test]
    fn test_bare_names() {
        assert!(is_bare_name(Path::new("03.mp3")));
        assert!(!is_bare_name(Path::new("./03.mp3")));
        assert!(!is_bare_name(Path::new("audio/03.mp3")));
        assert!(!is_bare_name(Path::new("/audio/03.mp3")));
    }

    #[test]
    fn test_resolve_sorts_by_name() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        for name in ["10.mp3", "02.mp3", "01.mp3", "b.mp3", "a.mp3"] {
            fs::write(base.join(name), b"fake mp3").unwrap();
        }

        let tracks = TrackResolver::new(base).resolve().unwrap();
        assert_eq!(
            names(&tracks),
            ["01.mp3", "02.mp3", "10.mp3", "a.mp3", "b.mp3"]
        );
    }

    #[test]
    fn test_resolve_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        fs::write(base.join("01.mp3"), b"fake mp3").unwrap();
        let subdir = base.join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(subdir.join("02.mp3"), b"fake mp3").unwrap();

        let tracks = TrackResolver::new(base).resolve().unwrap();
        assert_eq!(names(&tracks), ["01.mp3"]);
    }

    #[test]
    fn test_resolve_filters_extension() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        fs::write(base.join("01.mp3"), b"fake mp3").unwrap();
        fs::write(base.join("02.m4a"), b"fake m4a").unwrap();
        fs::write(base.join("notes.txt"), b"not audio").unwrap();
        fs::write(base.join(".hidden.mp3"), b"fake mp3").unwrap();
        fs::create_dir(base.join("folder.mp3")).unwrap();

        let mp3 = TrackResolver::new(base).resolve().unwrap();
        assert_eq!(names(&mp3), ["01.mp3"]);

        let m4a = TrackResolver::new(base).extension("m4a").resolve().unwrap();
        assert_eq!(names(&m4a), ["02.m4a"]);
    }

    #[test]
    fn test_missing_directory() {
        let err = TrackResolver::new("/no/such/dir").resolve().unwrap_err();
        assert!(matches!(err, ImportError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("01.mp3");
        fs::write(&file, b"fake mp3").unwrap();

        let err = TrackResolver::new(&file).resolve().unwrap_err();
        assert!(matches!(err, ImportError::NotADirectory(_)));
    }

    #[test]
    fn test_no_matches_is_no_input_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), b"not audio").unwrap();

        let err = TrackResolver::new(temp.path()).resolve().unwrap_err();
        match err {
            ImportError::NoInputFiles { ext, .. } => assert_eq!(ext, "mp3"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
