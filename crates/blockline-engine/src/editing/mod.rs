/*!
 * # Outline Editing Core
 *
 * This module implements the block-outline engine: a document body is a flat
 * ordered sequence of text blocks, each carrying an indent depth, and the
 * parent/child tree is *derived* from indent + adjacency instead of being
 * stored as explicit references.
 *
 * ## Architecture Overview
 *
 * ### 1. Implicit tree over a flat list
 * - The entire outline is a `Vec<Block>`; order is reading order
 * - A block's parent is the nearest preceding block with strictly smaller
 *   indent
 * - A subtree is always a contiguous run, so structural edits are plain
 *   vector splices plus a single forward scan for the subtree boundary
 * - An explicit tree would need its own invariant maintenance on every
 *   edit; the flat representation gets that for free
 *
 * ### 2. Command-based editing
 * - Host input events map to a `Cmd` through a flat lookup (`Cmd::for_key`)
 *   with no hidden modality: Tab indents, Shift-Tab unindents, Enter splits,
 *   Backspace at the start of a block removes or merges
 * - `Outline::apply` executes a command and returns a `Patch` telling the
 *   host which block to focus and where to put the cursor
 *
 * ### 3. Edge conditions are no-ops, not errors
 * - First/last block, already at indent 0, unresolved block ids: all of
 *   these are normal interactive states and leave the outline untouched
 * - The one hard rule is that the sequence is never empty; a deletion that
 *   would empty it is refused
 *
 * ## Module Structure
 *
 * - **`block`**: `Block` and `BlockId` (uuid-backed, with a documented
 *   low-entropy fallback)
 * - **`outline`**: the `Outline` engine itself and its structural operations
 * - **`commands`**: `Cmd`, `KeyInput` and the keymap dispatch table
 * - **`patch`**: focus directives returned to the host after each edit
 */

pub mod block;
pub mod commands;
pub mod outline;
pub mod patch;

pub use block::{Block, BlockId};
pub use commands::{Cmd, KeyInput};
pub use outline::{DeleteAction, DeleteOutcome, Outline};
pub use patch::{Cursor, Focus, Patch};
