//! File accessor confined to a single root directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::ToolError;

/// Returned by [`ToolSandbox::list`] for a directory with no entries.
pub const EMPTY_DIRECTORY: &str = "(empty directory)";

/// File operation, used to prefix I/O error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    List,
    Read,
    Write,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::List => "Error listing files at",
            FileOp::Read => "Error reading file",
            FileOp::Write => "Error writing file to",
        })
    }
}

/// Sandbox that restricts file operations to one directory tree.
#[derive(Debug, Clone)]
pub struct ToolSandbox {
    root: PathBuf,
}

impl ToolSandbox {
    /// Create a sandbox rooted at `root`.
    ///
    /// A relative root is resolved against the current directory. The root
    /// is canonicalized when it exists so later prefix checks compare
    /// resolved paths.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        let root = std::fs::canonicalize(&absolute).unwrap_or_else(|_| normalize(&absolute));
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` against the root without touching the filesystem.
    ///
    /// Absolute inputs replace the root entirely and are then subject to
    /// the same containment check.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ToolError> {
        let resolved = normalize(&self.root.join(relative));
        if !resolved.starts_with(&self.root) {
            return Err(self.access_denied(relative));
        }
        Ok(resolved)
    }

    /// Resolve and verify that no symlink inside the root points outside it.
    async fn resolve_checked(&self, relative: &str, op: FileOp) -> Result<PathBuf, ToolError> {
        let resolved = self.resolve(relative)?;

        for ancestor in resolved
            .ancestors()
            .take_while(|ancestor| ancestor.starts_with(&self.root))
        {
            match tokio::fs::canonicalize(ancestor).await {
                Ok(real) => {
                    if !real.starts_with(&self.root) {
                        return Err(self.access_denied(relative));
                    }
                    break;
                }
                Err(source) => {
                    let link = tokio::fs::symlink_metadata(ancestor).await;
                    if let Some(e) = self.unresolved_ancestor(relative, ancestor, op, link, source) {
                        return Err(e);
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Classify an ancestor that could not be canonicalized.
    ///
    /// A missing entry is skipped so the walk continues upwards. A symlink
    /// that cannot be followed is denied.
    /// Anything else is an I/O failure of `op`.
    fn unresolved_ancestor(
        &self,
        relative: &str,
        ancestor: &Path,
        op: FileOp,
        link: std::io::Result<std::fs::Metadata>,
        source: std::io::Error,
    ) -> Option<ToolError> {
        match link {
            Err(_) => None,
            Ok(meta) if meta.file_type().is_symlink() => Some(self.access_denied(relative)),
            Ok(_) => Some(ToolError::Io {
                op,
                path: ancestor.to_path_buf(),
                source,
            }),
        }
    }

    /// List a directory as `[DIR] name` / `[FILE] name` lines sorted by name.
    pub async fn list(&self, relative: &str) -> Result<String, ToolError> {
        let path = self.resolve_checked(relative, FileOp::List).await?;
        let io_err = |source| ToolError::Io {
            op: FileOp::List,
            path: path.clone(),
            source,
        };

        let mut reader = tokio::fs::read_dir(&path).await.map_err(io_err)?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(io_err)? {
            let is_dir = entry.file_type().await.map_err(io_err)?.is_dir();
            entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }

        debug!(path = %path.display(), entries = entries.len(), "Listed directory");

        if entries.is_empty() {
            return Ok(EMPTY_DIRECTORY.to_string());
        }
        entries.sort();
        Ok(entries
            .iter()
            .map(|(name, is_dir)| {
                let tag = if *is_dir { "[DIR]" } else { "[FILE]" };
                format!("{tag} {name}")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Read a whole file as text. Invalid UTF-8 is replaced, not rejected.
    pub async fn read(&self, relative: &str) -> Result<String, ToolError> {
        let path = self.resolve_checked(relative, FileOp::Read).await?;
        let bytes = tokio::fs::read(&path).await.map_err(|source| ToolError::Io {
            op: FileOp::Read,
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read file");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Create parent directories as needed, then replace the file's content.
    pub async fn write(&self, relative: &str, content: &str) -> Result<String, ToolError> {
        let path = self.resolve_checked(relative, FileOp::Write).await?;
        let io_err = |source| ToolError::Io {
            op: FileOp::Write,
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, content).await.map_err(io_err)?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(format!("Successfully wrote to {}", path.display()))
    }

    fn access_denied(&self, relative: &str) -> ToolError {
        ToolError::AccessDenied {
            path: relative.to_string(),
            root: self.root.clone(),
        }
    }
}

/// Lexically remove `.` and `..` components. `..` never climbs above the
/// filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
