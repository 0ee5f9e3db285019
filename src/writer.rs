/*!
 * Output assembly
 */

/// Ordered text fragments for one run.
///
/// Fragments are joined with a single newline in push order. No reordering,
/// no deduplication.
#[derive(Debug, Clone, Default)]
pub struct OutputAssembler {
    fragments: Vec<String>,
}

impl OutputAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment: a tree line or a formatted file block
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Number of fragments so far
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True when nothing has been pushed
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The final blob
    pub fn assemble(&self) -> String {
        self.fragments.join("\n")
    }
}
