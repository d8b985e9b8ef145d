//! End-to-end editing scenarios driven through the command layer, the way a
//! host front-end uses the engine: key events in, focus directives out.

use blockline_engine::{
    Block, BlockId, Cmd, Cursor, DeleteAction, KeyInput, Outline,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn outline_from(entries: &[(&str, usize)]) -> Outline {
    Outline::seeded(
        entries
            .iter()
            .map(|(content, indent)| Block::new(*content, *indent))
            .collect(),
    )
}

fn id_at(outline: &Outline, ix: usize) -> BlockId {
    outline.blocks()[ix].id
}

/// Bullet-list rendition of the outline, two spaces per indent level.
fn render(outline: &Outline) -> String {
    outline
        .blocks()
        .iter()
        .map(|b| format!("{}• {}", "  ".repeat(b.indent), b.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn split_on_single_block_appends_empty_sibling() {
    let mut outline = outline_from(&[("hello", 0)]);
    let a = id_at(&outline, 0);

    let patch = outline.apply(Cmd::for_key(KeyInput::Enter, a));

    let b = patch.created.expect("enter creates a block");
    assert_eq!(outline.blocks().len(), 2);
    assert_eq!(outline.blocks()[0].content, "hello");
    assert_eq!(outline.get(b).unwrap().content, "");
    assert_eq!(outline.get(b).unwrap().indent, 0);
}

#[test]
fn tab_on_third_sibling_nests_it_under_second() {
    let mut outline = outline_from(&[("a", 0), ("b", 0), ("c", 0)]);
    let c = id_at(&outline, 2);

    outline.apply(Cmd::for_key(KeyInput::Tab, c));

    insta::assert_snapshot!(render(&outline), @r"
    • a
    • b
      • c
    ");
}

#[test]
fn tab_on_block_already_deeper_than_predecessor_is_refused() {
    // b and c form a subtree under a; b is already one level below a
    let mut outline = outline_from(&[("a", 0), ("b", 1), ("c", 2), ("d", 0)]);
    let b = id_at(&outline, 1);
    let before = outline.version();

    outline.apply(Cmd::for_key(KeyInput::Tab, b));

    assert_eq!(outline.version(), before);
    insta::assert_snapshot!(render(&outline), @r"
    • a
      • b
        • c
    • d
    ");
}

#[test]
fn backspace_on_empty_block_removes_it_and_focuses_previous() {
    let mut outline = outline_from(&[("a", 0), ("", 0)]);
    let a = id_at(&outline, 0);
    let b = id_at(&outline, 1);

    let patch = outline.apply(Cmd::for_key(
        KeyInput::BackspaceAtStart {
            content_empty: true,
        },
        b,
    ));

    assert_eq!(patch.removed, Some(b));
    let focus = patch.focus.expect("focus moves to the previous block");
    assert_eq!(focus.block, a);
    assert_eq!(focus.cursor, Cursor::End);
    assert_eq!(outline.blocks().len(), 1);
}

#[test]
fn backspace_on_non_empty_block_merges_with_cursor_at_join() {
    let mut outline = outline_from(&[("foo", 0), ("bar", 0)]);
    let a = id_at(&outline, 0);
    let b = id_at(&outline, 1);

    let patch = outline.apply(Cmd::for_key(
        KeyInput::BackspaceAtStart {
            content_empty: false,
        },
        b,
    ));

    assert_eq!(outline.blocks().len(), 1);
    assert_eq!(outline.blocks()[0].content, "foobar");
    let focus = patch.focus.unwrap();
    assert_eq!(focus.block, a);
    assert_eq!(focus.cursor, Cursor::Offset(3));
}

#[test]
fn arrow_keys_walk_the_sequence_without_wraparound() {
    let mut outline = outline_from(&[("a", 0), ("b", 1), ("c", 0)]);
    let a = id_at(&outline, 0);
    let b = id_at(&outline, 1);
    let c = id_at(&outline, 2);

    let down = outline.apply(Cmd::for_key(KeyInput::ArrowDown, a));
    assert_eq!(down.focus.unwrap().block, b);

    let up = outline.apply(Cmd::for_key(KeyInput::ArrowUp, a));
    assert_eq!(up.focus, None);

    let past_end = outline.apply(Cmd::for_key(KeyInput::ArrowDown, c));
    assert_eq!(past_end.focus, None);
}

#[test]
fn indent_unindent_session_preserves_subtree_shapes() {
    let mut outline = outline_from(&[("plan", 0)]);
    let plan = id_at(&outline, 0);

    // Build: plan > (shop > (milk, bread)), cook
    let shop = outline.split_after(plan).unwrap();
    outline.set_content(shop, "shop");
    outline.indent(shop);
    let milk = outline.split_after(shop).unwrap();
    outline.set_content(milk, "milk");
    outline.indent(milk);
    let bread = outline.split_after(milk).unwrap();
    outline.set_content(bread, "bread");
    let cook = outline.split_after(bread).unwrap();
    outline.set_content(cook, "cook");
    outline.unindent(cook);
    outline.unindent(cook);

    insta::assert_snapshot!(render(&outline), @r"
    • plan
      • shop
        • milk
        • bread
    • cook
    ");

    // Shift-Tab on shop drags milk and bread with it
    outline.unindent(shop);
    insta::assert_snapshot!(render(&outline), @r"
    • plan
    • shop
      • milk
      • bread
    • cook
    ");
}

#[rstest]
#[case::delete_on_sole_block(&[("", 0)], 0, KeyInput::BackspaceAtStart { content_empty: true })]
#[case::delete_on_first_with_content(&[("text", 0), ("b", 0)], 0, KeyInput::BackspaceAtStart { content_empty: false })]
#[case::tab_on_first(&[("a", 0), ("b", 0)], 0, KeyInput::Tab)]
#[case::shift_tab_at_top_level(&[("a", 0), ("b", 0)], 1, KeyInput::ShiftTab)]
fn edge_conditions_are_silent_noops(
    #[case] entries: &[(&str, usize)],
    #[case] target_ix: usize,
    #[case] key: KeyInput,
) {
    let mut outline = outline_from(entries);
    let target = id_at(&outline, target_ix);
    let blocks_before = outline.blocks().to_vec();
    let version_before = outline.version();

    let patch = outline.apply(Cmd::for_key(key, target));

    assert_eq!(outline.blocks(), blocks_before.as_slice());
    assert_eq!(patch.version, version_before);
}

#[test]
fn create_then_boundary_delete_restores_previous_sequence() {
    let mut outline = outline_from(&[("a", 0), ("b", 1), ("c", 0)]);
    let b = id_at(&outline, 1);
    let before = outline.blocks().to_vec();

    let patch = outline.apply(Cmd::Create {
        after: Some(b),
        indent: 1,
        content: String::new(),
    });
    let created = patch.created.unwrap();
    let outcome = outline.boundary_delete(created, true, true);

    assert_eq!(outcome.action, DeleteAction::Removed);
    assert_eq!(outline.blocks(), before.as_slice());
}

#[test]
fn first_block_stays_top_level_through_arbitrary_editing() {
    let mut outline = outline_from(&[("root", 0)]);
    let mut focused = id_at(&outline, 0);

    let keys = [
        KeyInput::Enter,
        KeyInput::Tab,
        KeyInput::Enter,
        KeyInput::Tab,
        KeyInput::ArrowUp,
        KeyInput::ShiftTab,
        KeyInput::Enter,
        KeyInput::BackspaceAtStart {
            content_empty: true,
        },
        KeyInput::ArrowDown,
        KeyInput::Tab,
    ];
    for key in keys {
        let patch = outline.apply(Cmd::for_key(key, focused));
        if let Some(focus) = patch.focus {
            focused = focus.block;
        }
        assert_eq!(outline.blocks()[0].indent, 0);
        for ix in 1..outline.blocks().len() {
            assert!(outline.blocks()[ix].indent <= outline.blocks()[ix - 1].indent + 1);
        }
    }
}
