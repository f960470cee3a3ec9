//! Turning generated text into files on disk: normalization, persistence,
//! and the optional compile step.

pub mod build;
pub mod normalize;

pub use build::GoBuilder;
pub use normalize::{
    strip_code_fence, FormatError, GofmtFormatter, OutputNormalizer, SourceFormatter,
};

use crate::error::{ErrorCode, Result, ScriptportError};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Extension of generated source files
pub const SOURCE_EXTENSION: &str = "go";

/// `dir/name.py` becomes `dir/name.go`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(SOURCE_EXTENSION)
}

/// `dir/name.go` becomes `dir/name`
pub fn default_binary_path(source: &Path) -> PathBuf {
    source.with_extension("")
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// New files are created owner read/write, world readable.
pub async fn write_source(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ScriptportError::storage_with_code(
                ErrorCode::STORAGE_CREATE_DIR,
                format!("failed to create output directory {}", parent.display()),
                Some(parent.to_path_buf()),
            )
            .with_source(e)
        })?;
    }

    let write_error = |e: std::io::Error| {
        ScriptportError::storage_with_code(
            ErrorCode::STORAGE_WRITE,
            format!("failed to write Go file {}", path.display()),
            Some(path.to_path_buf()),
        )
        .with_source(e)
    };

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path).await.map_err(write_error)?;
    file.write_all(content.as_bytes())
        .await
        .map_err(write_error)?;
    file.flush().await.map_err(write_error)?;

    info!(path = %path.display(), "Generated Go file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/path/to/script.py")),
            PathBuf::from("/path/to/script.go")
        );
        assert_eq!(
            default_output_path(Path::new("script.sh")),
            PathBuf::from("script.go")
        );
        assert_eq!(
            default_output_path(Path::new("bin/deploy")),
            PathBuf::from("bin/deploy.go")
        );
        assert_eq!(
            default_output_path(Path::new("my.tool.py")),
            PathBuf::from("my.tool.go")
        );
    }

    #[test]
    fn test_default_binary_path() {
        assert_eq!(
            default_binary_path(Path::new("/path/to/script.go")),
            PathBuf::from("/path/to/script")
        );
        assert_eq!(
            default_binary_path(Path::new("script.go")),
            PathBuf::from("script")
        );
    }

    #[tokio::test]
    async fn test_write_source_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("output.go");

        write_source(&path, "package main\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "package main\n");
    }

    #[tokio::test]
    async fn test_write_source_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.go");
        std::fs::write(&path, "a much longer previous body\n").unwrap();

        write_source(&path, "package main\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "package main\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_source_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.go");
        write_source(&path, "package main\n").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o111, 0);
    }

    #[tokio::test]
    async fn test_write_source_into_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_source(&blocker.join("out.go"), "package main\n")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::STORAGE_CREATE_DIR);
    }
}
