//! Image manifest loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;

/// Ordered list of image file names plus the directory they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    image_dir: PathBuf,
    names: Vec<String>,
}

impl ImageSet {
    pub fn new<P: Into<PathBuf>>(image_dir: P, names: Vec<String>) -> Self {
        Self {
            image_dir: image_dir.into(),
            names,
        }
    }

    /// Read a whitespace-separated manifest.
    ///
    /// Entries are kept in file order with no deduplication and no existence
    /// check; a missing image only shows up later as a failed classification.
    pub fn load<P: AsRef<Path>, D: Into<PathBuf>>(manifest: P, image_dir: D) -> Result<Self> {
        let manifest = manifest.as_ref();
        let contents = fs::read_to_string(manifest)
            .with_context(|| format!("failed to read image manifest {}", manifest.display()))?;
        let set = Self::new(image_dir, parse_manifest(&contents));
        info!(
            "Loaded {} image name(s) from {}",
            set.len(),
            manifest.display()
        );
        Ok(set)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.image_dir.join(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Split manifest contents on arbitrary whitespace.
pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents.split_whitespace().map(str::to_string).collect()
}
