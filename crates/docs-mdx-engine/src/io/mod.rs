use relative_path::{Component, RelativePath, RelativePathBuf};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Pre-generated markdown served for the empty slug.
pub const HOME_MARKDOWN: &str = "home.md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid content directory: {0}")]
    InvalidContentDir(String),
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
}

/// Where sibling documents are read from when a page pulls in another file.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// An in-memory set of files, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not loaded", path.display()),
            )
        })
    }
}

/// Read a source file relative to the content root.
pub fn read_source(relative_path: &RelativePath, content_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(content_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write a file relative to `root`, creating parent directories.
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

pub fn validate_content_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidContentDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

/// Relative output path for a source file: same location, `.md` extension.
pub fn output_path_for(relative_source: &RelativePath) -> RelativePathBuf {
    relative_source.with_extension("md")
}

/// Map a page slug to its pre-generated markdown file under `public_root`.
///
/// `["sdk", "ios", "purchases"]` → `sdk/ios/purchases.md`; an empty slug is
/// the home page. Segments that would leave `public_root` are rejected.
pub fn raw_markdown_path<S: AsRef<str>>(slug: &[S]) -> Result<RelativePathBuf, IoError> {
    if slug.is_empty() {
        return Ok(RelativePathBuf::from(HOME_MARKDOWN));
    }

    let mut path = RelativePathBuf::new();
    for segment in slug {
        let segment = segment.as_ref();
        let single = RelativePath::new(segment);
        let is_plain = matches!(
            single.components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
        if !is_plain || segment.contains(['/', '\\']) {
            return Err(IoError::InvalidSlug(segment.to_string()));
        }
        path.push(segment);
    }
    Ok(path.with_extension("md"))
}

/// Read the pre-generated markdown for `slug`.
pub fn read_raw_markdown<S: AsRef<str>>(slug: &[S], public_root: &Path) -> Result<String, IoError> {
    let relative = raw_markdown_path(slug)?;
    read_source(&relative, public_root)
}
