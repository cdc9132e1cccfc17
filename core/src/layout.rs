//! Audio asset locations.

use std::path::{Path, PathBuf};

/// Default audio file extension.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Default audio file name stem; the slide player requests `slide-NN.mp3`.
pub const DEFAULT_STEM: &str = "slide";

/// Maps units to audio file paths: `<root>/<group>/<stem>-NN.<ext>`.
#[derive(Debug, Clone)]
pub struct AudioLayout {
    root: PathBuf,
    stem: String,
    extension: String,
}

impl AudioLayout {
    /// Creates a layout rooted at `root` with the default stem and extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stem: DEFAULT_STEM.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the file name stem placed before the slide number.
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Sets the audio file extension (without dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the directory holding a group's audio files.
    pub fn group_dir(&self, group_id: &str) -> PathBuf {
        self.root.join(group_id)
    }

    /// Returns the audio file path of a unit.
    pub fn asset_path(&self, group_id: &str, index: u32) -> PathBuf {
        self.group_dir(group_id)
            .join(format!("{}-{:02}.{}", self.stem, index, self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path() {
        let layout = AudioLayout::new("slides/audio");
        assert_eq!(layout.group_dir("01"), PathBuf::from("slides/audio/01"));
        assert_eq!(
            layout.asset_path("01", 4),
            PathBuf::from("slides/audio/01/slide-04.mp3")
        );
        assert_eq!(
            layout.asset_path("01", 123),
            PathBuf::from("slides/audio/01/slide-123.mp3")
        );
    }

    #[test]
    fn test_custom_stem_and_extension() {
        let layout = AudioLayout::new("out").with_stem("unit").with_extension("wav");
        assert_eq!(layout.stem(), "unit");
        assert_eq!(layout.extension(), "wav");
        assert_eq!(layout.asset_path("12", 10), PathBuf::from("out/12/unit-10.wav"));
    }
}
