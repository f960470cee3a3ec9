//! Script classification and loading.
//!
//! A script's family is decided once, from its file extension first and
//! from a `#!` interpreter directive on the first line second.

use crate::error::{ErrorCode, Result, ScriptportError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source language family of an input script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Python,
    Shell,
    Unknown,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Python => "python",
            ScriptType::Shell => "shell",
            ScriptType::Unknown => "unknown",
        }
    }

    /// Only python and shell scripts are sent for translation
    pub fn is_supported(&self) -> bool {
        matches!(self, ScriptType::Python | ScriptType::Shell)
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PYTHON_EXTENSIONS: &[&str] = &["py"];
const SHELL_EXTENSIONS: &[&str] = &["sh", "bash", "zsh"];
/// Matched anywhere in the directive, so `bash-5.2`, `mksh` and
/// `busybox sh` all count
const SHELL_INTERPRETERS: &[&str] = &["sh"];
/// Shells whose syntax is not sh-compatible enough to translate as shell
const EXCLUDED_INTERPRETERS: &[&str] = &["fish"];

/// Classify a script from its path and already-read content.
///
/// Never fails: anything unrecognised is [`ScriptType::Unknown`].
pub fn classify(path: &Path, content: &str) -> ScriptType {
    if let Some(script_type) = classify_extension(path) {
        return script_type;
    }
    classify_shebang(content).unwrap_or(ScriptType::Unknown)
}

/// Free-function form of [`ScriptType::is_supported`]
pub fn is_supported(script_type: ScriptType) -> bool {
    script_type.is_supported()
}

fn classify_extension(path: &Path) -> Option<ScriptType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if PYTHON_EXTENSIONS.contains(&ext.as_str()) {
        Some(ScriptType::Python)
    } else if SHELL_EXTENSIONS.contains(&ext.as_str()) {
        Some(ScriptType::Shell)
    } else {
        None
    }
}

fn classify_shebang(content: &str) -> Option<ScriptType> {
    let first_line = content.lines().next()?.trim();
    let directive = first_line.strip_prefix("#!")?;

    if directive.contains("python") {
        Some(ScriptType::Python)
    } else if EXCLUDED_INTERPRETERS
        .iter()
        .any(|name| directive.contains(name))
    {
        None
    } else if SHELL_INTERPRETERS
        .iter()
        .any(|name| directive.contains(name))
    {
        Some(ScriptType::Shell)
    } else {
        None
    }
}

/// A script loaded from disk and classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScript {
    pub path: PathBuf,
    pub file_name: String,
    pub script_type: ScriptType,
    pub content: String,
}

/// Loads script files and classifies them
#[derive(Debug, Clone, Default)]
pub struct ScriptParser;

impl ScriptParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and classify a script file
    pub async fn parse(&self, path: &Path) -> Result<ParsedScript> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            let (code, message) = if e.kind() == std::io::ErrorKind::NotFound {
                (ErrorCode::INPUT_NOT_FOUND, "file does not exist")
            } else {
                (ErrorCode::INPUT_UNREADABLE, "failed to stat file")
            };
            ScriptportError::input_with_code(
                code,
                format!("{}: {}", message, path.display()),
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })?;

        if metadata.is_dir() {
            return Err(ScriptportError::input_with_code(
                ErrorCode::INPUT_IS_DIRECTORY,
                format!("path is a directory, not a file: {}", path.display()),
                Some(path.to_path_buf()),
            ));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ScriptportError::input_with_code(
                ErrorCode::INPUT_UNREADABLE,
                format!("failed to read file: {}", path.display()),
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })?;

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    valid_up_to = e.utf8_error().valid_up_to(),
                    "Script is not valid UTF-8, replacing invalid bytes"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let script_type = classify(path, &content);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(file = %file_name, script_type = %script_type, "Classified script");

        Ok(ParsedScript {
            path: path.to_path_buf(),
            file_name,
            script_type,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_wins_over_content() {
        let shell_body = "#!/bin/bash\necho hi\n";
        assert_eq!(classify(Path::new("a.py"), shell_body), ScriptType::Python);
        assert_eq!(
            classify(Path::new("a.sh"), "#!/usr/bin/env python3\n"),
            ScriptType::Shell
        );
        assert_eq!(classify(Path::new("deploy.BASH"), ""), ScriptType::Shell);
        assert_eq!(classify(Path::new("x.zsh"), ""), ScriptType::Shell);
    }

    #[test]
    fn test_shebang_fallback() {
        let cases = [
            ("#!/usr/bin/python3\nprint(1)\n", ScriptType::Python),
            ("#!/usr/bin/env python\n", ScriptType::Python),
            ("  #!/usr/bin/env -S python3 -u\n", ScriptType::Python),
            ("#!/bin/sh\n", ScriptType::Shell),
            ("#!/usr/bin/env bash\n", ScriptType::Shell),
            ("#!/bin/zsh -e\n", ScriptType::Shell),
            ("#!/usr/bin/perl\n", ScriptType::Unknown),
            ("#!/usr/bin/env node\n", ScriptType::Unknown),
            ("#!/usr/bin/env -S uv run python\n", ScriptType::Python),
            ("#!/bin/mksh\n", ScriptType::Shell),
            ("#!/bin/busybox sh\n", ScriptType::Shell),
            ("#!/usr/local/bin/bash-5.2\n", ScriptType::Shell),
            ("#!/bin/tcsh\n", ScriptType::Shell),
            ("#!/usr/bin/fish\n", ScriptType::Unknown),
            ("#!/usr/bin/env fish\n", ScriptType::Unknown),
        ];

        for (content, expected) in cases {
            assert_eq!(
                classify(Path::new("tool.txt"), content),
                expected,
                "content: {content:?}"
            );
        }
    }

    #[test]
    fn test_unrecognised_input() {
        assert_eq!(classify(Path::new("README"), "hello\n"), ScriptType::Unknown);
        assert_eq!(classify(Path::new("main.rb"), "puts 1\n"), ScriptType::Unknown);
        assert_eq!(classify(Path::new("noext"), ""), ScriptType::Unknown);
        // directive must be on the first line
        assert_eq!(
            classify(Path::new("noext"), "\n#!/bin/bash\n"),
            ScriptType::Unknown
        );
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(ScriptType::Python));
        assert!(is_supported(ScriptType::Shell));
        assert!(!is_supported(ScriptType::Unknown));
    }

    #[tokio::test]
    async fn test_parse_python_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.py");
        let content = "#!/usr/bin/env python3\nprint(\"Hello, World!\")\n";
        std::fs::write(&path, content).unwrap();

        let parsed = ScriptParser::new().parse(&path).await.unwrap();
        assert_eq!(parsed.script_type, ScriptType::Python);
        assert_eq!(parsed.content, content);
        assert_eq!(parsed.file_name, "test.py");
        assert_eq!(parsed.path, path);
    }

    #[tokio::test]
    async fn test_parse_extensionless_shell_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup");
        std::fs::write(&path, "#!/bin/bash\ntar czf b.tgz .\n").unwrap();

        let parsed = ScriptParser::new().parse(&path).await.unwrap();
        assert_eq!(parsed.script_type, ScriptType::Shell);
    }

    #[tokio::test]
    async fn test_parse_non_utf8_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.py");
        std::fs::write(&path, b"# caf\xe9\nprint('ok')\n").unwrap();

        let parsed = ScriptParser::new().parse(&path).await.unwrap();
        assert_eq!(parsed.script_type, ScriptType::Python);
        assert_eq!(parsed.content, "# caf\u{FFFD}\nprint('ok')\n");
    }

    #[tokio::test]
    async fn test_parse_missing_file() {
        let err = ScriptParser::new()
            .parse(Path::new("/nonexistent/file.py"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::INPUT_NOT_FOUND);
        assert!(err.to_string().contains("file does not exist"));
    }

    #[tokio::test]
    async fn test_parse_directory() {
        let dir = TempDir::new().unwrap();
        let err = ScriptParser::new().parse(dir.path()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::INPUT_IS_DIRECTORY);
    }
}
