//! Common types for narration units.

/// Prefix of every unit key in the manifest and of every audio file name.
const UNIT_KEY_PREFIX: &str = "unit-";

/// Returns the manifest key for a slide position, e.g. `unit-03`.
pub fn unit_key(index: u32) -> String {
    format!("{}{:02}", UNIT_KEY_PREFIX, index)
}

// ==================== Boundary ====================

/// A slide boundary in document order.
///
/// Every boundary advances the slide index, whether or not it carries
/// narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// 1-based position among all boundaries of the document.
    pub index: u32,

    /// Unescaped, trimmed narration text. `None` when the attribute is
    /// missing, empty or whitespace only.
    pub narration: Option<String>,
}

impl Boundary {
    /// Returns true if this boundary yields a narration unit.
    pub fn has_narration(&self) -> bool {
        self.narration.is_some()
    }
}

// ==================== Narration Unit ====================

/// One narrated slide that needs an audio asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationUnit {
    /// Group (chapter) the slide belongs to.
    pub group_id: String,

    /// 1-based slide position within the group's document.
    pub index: u32,

    /// Narration text, never empty.
    pub text: String,
}

impl NarrationUnit {
    /// Returns the manifest key of this unit.
    pub fn key(&self) -> String {
        unit_key(self.index)
    }
}
