//! Mapping between the English docs tree and its Urdu mirror

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::TranslationConfig;

/// Source and localized documentation roots
#[derive(Debug, Clone)]
pub struct DocsLayout {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl DocsLayout {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(&config.source_dir, &config.target_dir)
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Path of a document given relative to the source root
    pub fn source_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source_root.join(relative)
    }

    /// Mirrored localized path for a source document.
    ///
    /// `None` if `source` does not live under the source root.
    pub fn localized_path(&self, source: &Path) -> Option<PathBuf> {
        source
            .strip_prefix(&self.source_root)
            .ok()
            .map(|relative| self.target_root.join(relative))
    }

    /// Every `*.md` file under the source root, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.source_root.is_dir() {
            bail!(
                "Documentation directory not found: {}",
                self.source_root.display()
            );
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.source_root) {
            let entry = entry.with_context(|| {
                format!("Failed to walk {}", self.source_root.display())
            })?;
            let is_markdown = entry.path().extension().is_some_and(|ext| ext == "md");
            if entry.file_type().is_file() && is_markdown {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}
