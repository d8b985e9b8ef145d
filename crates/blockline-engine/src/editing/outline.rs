use std::ops::Range;

use tracing::debug;

use crate::editing::{Block, BlockId, Cursor, Focus};

/// What a boundary delete did to the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    /// Nothing changed (cursor not at start, first block, or sole block)
    None,
    /// The empty block was removed
    Removed,
    /// The block's content was appended to its predecessor, then removed
    Merged,
}

/// Result of [`Outline::boundary_delete`].
///
/// `focus` is a directive to the host: move input focus to that block and
/// place the cursor as indicated (end of content after a removal, the join
/// offset after a merge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub action: DeleteAction,
    pub focus: Option<Focus>,
}

impl DeleteOutcome {
    fn none() -> Self {
        Self {
            action: DeleteAction::None,
            focus: None,
        }
    }
}

/// The block-outline engine.
///
/// Owns the ordered block sequence and keeps the indent-derived tree
/// consistent under interactive edits. The sequence is never empty while
/// the engine is live, the first block is always at indent 0, and a block
/// is never indented more than one level past its immediate predecessor.
///
/// Structural operations return focus directives rather than touching any
/// render state; mounting editor widgets, preview rendering and persistence
/// all belong to the host. The engine assumes exclusive single-threaded
/// access: every operation runs to completion before the next input event.
///
/// ```rust
/// use blockline_engine::Outline;
///
/// let mut outline = Outline::new();
/// let first = outline.blocks()[0].id;
/// outline.set_content(first, "hello");
///
/// // Enter: new empty sibling at the same depth
/// let second = outline.split_after(first).unwrap();
/// assert_eq!(outline.blocks().len(), 2);
///
/// // Tab: the new block becomes a child of the first
/// outline.indent(second);
/// assert_eq!(outline.get(second).unwrap().indent, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    blocks: Vec<Block>,
    /// Incremented on every mutation (enables host change detection)
    version: u64,
}

impl Outline {
    /// Create an outline with a single empty top-level block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new("", 0)],
            version: 0,
        }
    }

    /// Seed an outline from host-supplied blocks (loading from storage).
    ///
    /// An empty seed degrades to [`Outline::new`]. Indents are clamped so
    /// the invariants hold from the start: the first block goes to depth 0
    /// and no block sits more than one level below its predecessor.
    pub fn seeded(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        let mut outline = Self { blocks, version: 0 };
        outline.clamp_indents();
        outline
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Sequence position of a block, if it exists.
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Replace a block's content. Returns false for an unresolved id.
    pub fn set_content(&mut self, id: BlockId, content: impl Into<String>) -> bool {
        let Some(ix) = self.position(id) else {
            return false;
        };
        let content = content.into();
        if self.blocks[ix].content != content {
            self.blocks[ix].content = content;
            self.version += 1;
        }
        true
    }

    /// Insert a new block and return its id.
    ///
    /// Inserts immediately after `after`; when `after` is `None` or does not
    /// resolve, the block is appended instead (degrade, never fail). The
    /// requested indent is clamped to at most one past the predecessor;
    /// followers are left untouched, so deleting the new block while still
    /// empty restores the exact pre-insert sequence.
    pub fn create(
        &mut self,
        after: Option<BlockId>,
        indent: usize,
        initial_content: impl Into<String>,
    ) -> BlockId {
        let ix = match after.and_then(|id| self.position(id)) {
            Some(pos) => pos + 1,
            None => self.blocks.len(),
        };
        let indent = if ix == 0 {
            0
        } else {
            indent.min(self.blocks[ix - 1].indent + 1)
        };
        let block = Block::new(initial_content, indent);
        let id = block.id;
        self.blocks.insert(ix, block);
        self.version += 1;
        debug!(%id, position = ix, indent, "block created");
        id
    }

    /// Enter: create an empty sibling immediately after `id`, inheriting its
    /// indent, and return the new block's id for the host to focus.
    ///
    /// Deliberately does not split the source block's text at the cursor;
    /// the successor is always empty regardless of cursor position.
    pub fn split_after(&mut self, id: BlockId) -> Option<BlockId> {
        let ix = self.position(id)?;
        let indent = self.blocks[ix].indent;
        Some(self.create(Some(id), indent, ""))
    }

    /// Backspace at the very start of a block.
    ///
    /// The caller has already determined that both selection endpoints sit
    /// at offset 0 (`cursor_at_start`) and whether the live editor widget is
    /// empty (`content_empty`); the engine trusts that view of the widget
    /// state rather than re-deriving it.
    ///
    /// - Empty block, outline has more than one block: remove it; focus
    ///   moves to the preceding block with the cursor at its end.
    /// - Non-empty block with a predecessor: append this block's content to
    ///   the predecessor and remove it; focus moves to the predecessor with
    ///   the cursor at the join offset. The removed block's indent is
    ///   discarded.
    /// - Otherwise (first block with content, or the sole block): no-op.
    pub fn boundary_delete(
        &mut self,
        id: BlockId,
        cursor_at_start: bool,
        content_empty: bool,
    ) -> DeleteOutcome {
        if !cursor_at_start {
            return DeleteOutcome::none();
        }
        let Some(ix) = self.position(id) else {
            return DeleteOutcome::none();
        };

        if content_empty {
            // Never allow the sequence to become empty
            if self.blocks.len() <= 1 {
                return DeleteOutcome::none();
            }
            self.blocks.remove(ix);
            self.clamp_indents();
            self.version += 1;
            debug!(%id, position = ix, "empty block removed");
            let focus = ix.checked_sub(1).map(|prev| Focus {
                block: self.blocks[prev].id,
                cursor: Cursor::End,
            });
            return DeleteOutcome {
                action: DeleteAction::Removed,
                focus,
            };
        }

        if ix == 0 {
            // First block with content: nowhere to merge into
            return DeleteOutcome::none();
        }

        let removed = self.blocks.remove(ix);
        let prev = &mut self.blocks[ix - 1];
        let join_offset = prev.content.len();
        prev.content.push_str(&removed.content);
        let focus_id = prev.id;
        self.clamp_indents();
        self.version += 1;
        debug!(%id, into = %focus_id, join_offset, "block merged into predecessor");
        DeleteOutcome {
            action: DeleteAction::Merged,
            focus: Some(Focus {
                block: focus_id,
                cursor: Cursor::Offset(join_offset),
            }),
        }
    }

    /// Tab: move the block and its whole subtree one level deeper.
    ///
    /// No-op for the first block, and whenever the block already sits deeper
    /// than its immediate predecessor (a block can never be indented more
    /// than one level past it).
    pub fn indent(&mut self, id: BlockId) {
        let Some(ix) = self.position(id) else {
            return;
        };
        if ix == 0 {
            return;
        }
        if self.blocks[ix].indent > self.blocks[ix - 1].indent {
            return;
        }
        // Subtree boundary must be computed before any indent changes
        let subtree = self.subtree_range(ix);
        for block in &mut self.blocks[subtree] {
            block.indent += 1;
        }
        self.version += 1;
        debug!(%id, "subtree indented");
    }

    /// Shift-Tab: move the block and its whole subtree one level shallower.
    /// No-op when the block is already at depth 0.
    pub fn unindent(&mut self, id: BlockId) {
        let Some(ix) = self.position(id) else {
            return;
        };
        if self.blocks[ix].indent == 0 {
            return;
        }
        let subtree = self.subtree_range(ix);
        for block in &mut self.blocks[subtree] {
            block.indent -= 1;
        }
        self.version += 1;
        debug!(%id, "subtree unindented");
    }

    /// ArrowUp/ArrowDown: the block `delta` positions away, or `None` at the
    /// document edges (no wraparound). Does not mutate state.
    pub fn focus_relative(&self, id: BlockId, delta: isize) -> Option<BlockId> {
        let ix = self.position(id)?;
        let target = ix.checked_add_signed(delta)?;
        self.blocks.get(target).map(|b| b.id)
    }

    /// The contiguous run forming the subtree rooted at position `ix`: the
    /// block itself plus every immediately following block whose indent is
    /// strictly greater than the root's.
    pub fn subtree_range(&self, ix: usize) -> Range<usize> {
        let root_indent = self.blocks[ix].indent;
        let mut end = ix + 1;
        while end < self.blocks.len() && self.blocks[end].indent > root_indent {
            end += 1;
        }
        ix..end
    }

    /// Re-establish the indent invariants after a removal or seed: the first
    /// block goes to depth 0, every other block to at most one level below
    /// its predecessor. Relative nesting of untouched runs is preserved.
    fn clamp_indents(&mut self) {
        let mut prev_indent = 0;
        for (ix, block) in self.blocks.iter_mut().enumerate() {
            let max = if ix == 0 { 0 } else { prev_indent + 1 };
            if block.indent > max {
                block.indent = max;
            }
            prev_indent = block.indent;
        }
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}
