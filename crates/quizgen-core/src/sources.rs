//! Source text assembly from uploaded files and pasted notes.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Most files accepted for one generation.
pub const MAX_SOURCE_FILES: usize = 10;

/// One labelled block of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSection {
    File { name: String, text: String },
    Pasted(String),
}

impl SourceSection {
    pub fn file(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::File {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn pasted(text: impl Into<String>) -> Self {
        Self::Pasted(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::File { text, .. } | Self::Pasted(text) => text,
        }
    }

    /// A section with only whitespace contributes nothing.
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

impl fmt::Display for SourceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { name, text } => write!(f, "Source: {name}\n{}", text.trim()),
            Self::Pasted(text) => write!(f, "Pasted Notes\n{}", text.trim()),
        }
    }
}

/// Join non-blank sections with a blank line between them.
///
/// Fails when more than [`MAX_SOURCE_FILES`] files are given or when
/// nothing usable remains.
pub fn combine_sections(sections: &[SourceSection]) -> Result<String> {
    let files = sections
        .iter()
        .filter(|s| matches!(s, SourceSection::File { .. }))
        .count();
    if files > MAX_SOURCE_FILES {
        bail!("too many source files: {files} (at most {MAX_SOURCE_FILES})");
    }

    let combined = sections
        .iter()
        .filter(|s| !s.is_blank())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");

    if combined.trim().is_empty() {
        bail!("could not extract usable text from the provided sources");
    }
    tracing::debug!(sections = sections.len(), chars = combined.len(), "combined source text");
    Ok(combined)
}

/// Read a UTF-8 text file as a section named after the file.
pub fn load_text_file(path: &Path) -> Result<SourceSection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceSection::file(name, text))
}
