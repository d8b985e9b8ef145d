use crate::editing::BlockId;

/// Where the host should place the cursor inside the focused block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Start of the block's content
    Start,
    /// End of the block's content
    End,
    /// A specific byte offset (the join point after a merge)
    Offset(usize),
    /// Leave the widget's cursor where it already is
    Unchanged,
}

/// Directive to the host: move input focus to this block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub block: BlockId,
    pub cursor: Cursor,
}

/// Result of applying a command to the outline.
///
/// The engine never touches render state itself; the patch tells the host
/// what to do. A created block needs a render resource mounted at the right
/// position, a removed block needs its resource torn down, and `focus`
/// says where input focus goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub focus: Option<Focus>,
    pub created: Option<BlockId>,
    pub removed: Option<BlockId>,
    /// Outline version after the command (unchanged for no-ops)
    pub version: u64,
}

impl Patch {
    pub(crate) fn unchanged(version: u64) -> Self {
        Self {
            focus: None,
            created: None,
            removed: None,
            version,
        }
    }
}
