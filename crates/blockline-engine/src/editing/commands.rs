use crate::editing::{BlockId, Cursor, DeleteAction, Focus, Outline, Patch};

/// Commands that can be applied to the outline.
///
/// Each command corresponds to one engine operation; hosts either build
/// them directly or derive them from input events via [`Cmd::for_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Insert a new block after `after` (append when unresolved or `None`)
    Create {
        after: Option<BlockId>,
        indent: usize,
        content: String,
    },
    /// Enter: empty sibling after the block, inheriting its indent
    SplitBlock { id: BlockId },
    /// Backspace with the cursor at the very start of the block
    BoundaryDelete {
        id: BlockId,
        cursor_at_start: bool,
        content_empty: bool,
    },
    /// Tab: block and subtree one level deeper
    Indent { id: BlockId },
    /// Shift-Tab: block and subtree one level shallower
    Unindent { id: BlockId },
    /// ArrowUp: focus the previous block
    FocusUp { id: BlockId },
    /// ArrowDown: focus the next block
    FocusDown { id: BlockId },
    /// Host syncing its editor widget's text back into the engine
    SetContent { id: BlockId, text: String },
}

/// Input events the keymap understands.
///
/// `BackspaceAtStart` is only produced when the host has already checked
/// that both selection endpoints sit at offset 0; a backspace anywhere else
/// is ordinary text editing and never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Tab,
    ShiftTab,
    Enter,
    BackspaceAtStart { content_empty: bool },
    ArrowUp,
    ArrowDown,
}

impl Cmd {
    /// The keybinding table: a flat event-to-command lookup with no hidden
    /// modality.
    pub fn for_key(key: KeyInput, focused: BlockId) -> Cmd {
        match key {
            KeyInput::Tab => Cmd::Indent { id: focused },
            KeyInput::ShiftTab => Cmd::Unindent { id: focused },
            KeyInput::Enter => Cmd::SplitBlock { id: focused },
            KeyInput::BackspaceAtStart { content_empty } => Cmd::BoundaryDelete {
                id: focused,
                cursor_at_start: true,
                content_empty,
            },
            KeyInput::ArrowUp => Cmd::FocusUp { id: focused },
            KeyInput::ArrowDown => Cmd::FocusDown { id: focused },
        }
    }
}

impl Outline {
    /// Apply a command and report what the host must do next.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        match cmd {
            Cmd::Create {
                after,
                indent,
                content,
            } => {
                let id = self.create(after, indent, content);
                Patch {
                    focus: Some(Focus {
                        block: id,
                        cursor: Cursor::Start,
                    }),
                    created: Some(id),
                    removed: None,
                    version: self.version(),
                }
            }
            Cmd::SplitBlock { id } => match self.split_after(id) {
                Some(new_id) => Patch {
                    focus: Some(Focus {
                        block: new_id,
                        cursor: Cursor::Start,
                    }),
                    created: Some(new_id),
                    removed: None,
                    version: self.version(),
                },
                None => Patch::unchanged(self.version()),
            },
            Cmd::BoundaryDelete {
                id,
                cursor_at_start,
                content_empty,
            } => {
                let outcome = self.boundary_delete(id, cursor_at_start, content_empty);
                let removed = match outcome.action {
                    DeleteAction::None => None,
                    DeleteAction::Removed | DeleteAction::Merged => Some(id),
                };
                Patch {
                    focus: outcome.focus,
                    created: None,
                    removed,
                    version: self.version(),
                }
            }
            Cmd::Indent { id } => {
                self.indent(id);
                Patch::unchanged(self.version())
            }
            Cmd::Unindent { id } => {
                self.unindent(id);
                Patch::unchanged(self.version())
            }
            Cmd::FocusUp { id } => self.focus_patch(id, -1),
            Cmd::FocusDown { id } => self.focus_patch(id, 1),
            Cmd::SetContent { id, text } => {
                self.set_content(id, text);
                Patch::unchanged(self.version())
            }
        }
    }

    fn focus_patch(&self, id: BlockId, delta: isize) -> Patch {
        let focus = self.focus_relative(id, delta).map(|block| Focus {
            block,
            cursor: Cursor::Unchanged,
        });
        Patch {
            focus,
            created: None,
            removed: None,
            version: self.version(),
        }
    }
}
