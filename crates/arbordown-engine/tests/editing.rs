//! Editing scenarios over parsed documents: moving nodes between trees,
//! detaching subtrees, and the ownership rules around destroy.

use arbordown_engine::{
    NodeError, NodeKind, Options, Tree, markdown_to_html, parse_document, render_html,
    tree::check,
};

#[test]
fn move_item_between_parsed_lists() {
    let mut tree = Tree::new();
    let root = parse_document(
        &mut tree,
        "- a\n- b\n- c\n\nbreak\n\n- x\n- y\n",
        Options::DEFAULT,
    )
    .unwrap();

    let old_list = tree.first_child(root).unwrap();
    let new_list = tree.last_child(root).unwrap();
    assert_eq!(tree.kind(old_list), Some(NodeKind::List));
    assert_eq!(tree.kind(new_list), Some(NodeKind::List));
    assert_eq!(tree.children(old_list).count(), 3);
    assert_eq!(tree.children(new_list).count(), 2);

    let item = tree.first_child(old_list).unwrap();
    tree.append_child(new_list, item).unwrap();

    // One list shrank, the other grew, and the item changed parents.
    assert_eq!(tree.children(old_list).count(), 2);
    assert_eq!(tree.children(new_list).count(), 3);
    assert_eq!(tree.parent(item), Some(new_list));
    assert_eq!(tree.last_child(new_list), Some(item));
    check::check(&tree, root);
}

#[test]
fn unlinked_subtree_renders_standalone() {
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, "# Title\n\nBody text\n", Options::DEFAULT).unwrap();

    let heading = tree.first_child(root).unwrap();
    tree.unlink(heading).unwrap();

    // The document no longer contains the heading.
    let html = render_html(&tree, root, Options::DEFAULT).unwrap();
    assert_eq!(html, "<p>Body text</p>\n");

    // The heading is now a root of its own and renders on its own.
    assert_eq!(tree.parent(heading), None);
    let heading_html = render_html(&tree, heading, Options::DEFAULT).unwrap();
    assert_eq!(heading_html, "<h1>Title</h1>\n");
}

#[test]
fn destroying_old_root_leaves_detached_subtree_usable() {
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, "# Keep\n\nDrop this\n", Options::DEFAULT).unwrap();

    let heading = tree.first_child(root).unwrap();
    tree.unlink(heading).unwrap();
    tree.destroy(root).unwrap();

    // Handles into the destroyed document are stale...
    assert!(!tree.contains(root));
    assert_eq!(
        render_html(&tree, root, Options::DEFAULT),
        Err(NodeError::StaleNode { op: "render_html" })
    );

    // ...while the detached heading still works end to end.
    check::check(&tree, heading);
    let html = render_html(&tree, heading, Options::DEFAULT).unwrap();
    assert_eq!(html, "<h1>Keep</h1>\n");
}

#[test]
fn spliced_document_renders_in_new_order() {
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, "First\n\nSecond\n\nThird\n", Options::DEFAULT).unwrap();

    let first = tree.first_child(root).unwrap();
    let third = tree.last_child(root).unwrap();

    // Move the first paragraph to the end.
    tree.insert_after(third, first).unwrap();
    check::check(&tree, root);

    let html = render_html(&tree, root, Options::DEFAULT).unwrap();
    assert_eq!(html, "<p>Second</p>\n<p>Third</p>\n<p>First</p>\n");
}

#[test]
fn grafting_a_parsed_fragment_into_another_document() {
    let mut tree = Tree::new();
    let target = parse_document(&mut tree, "# Doc\n\nEnd\n", Options::DEFAULT).unwrap();
    let fragment = parse_document(&mut tree, "- grafted\n", Options::DEFAULT).unwrap();

    // Lift the list out of the fragment document and graft it.
    let list = tree.first_child(fragment).unwrap();
    let end_para = tree.last_child(target).unwrap();
    tree.insert_before(end_para, list).unwrap();
    tree.destroy(fragment).unwrap();

    check::check(&tree, target);
    let html = render_html(&tree, target, Options::DEFAULT).unwrap();
    assert_eq!(
        html,
        "<h1>Doc</h1>\n<ul>\n<li>grafted</li>\n</ul>\n<p>End</p>\n"
    );
}

#[test]
fn cycle_attempts_leave_documents_intact() {
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, "> outer\n", Options::DEFAULT).unwrap();
    let quote = tree.first_child(root).unwrap();
    let para = tree.first_child(quote).unwrap();

    assert!(matches!(
        tree.append_child(para, root),
        Err(NodeError::InvalidTarget { .. })
    ));
    assert!(matches!(
        tree.prepend_child(para, quote),
        Err(NodeError::InvalidTarget { .. })
    ));

    // Nothing moved; rendering is unchanged.
    check::check(&tree, root);
    let html = render_html(&tree, root, Options::DEFAULT).unwrap();
    assert_eq!(html, "<blockquote>\n<p>outer</p>\n</blockquote>\n");
}

#[test]
fn one_shot_conversion_matches_pipeline() {
    let source = "# Hello\n\nWorld\n";
    let one_shot = markdown_to_html(source).unwrap();

    let mut tree = Tree::new();
    let root = parse_document(&mut tree, source, Options::DEFAULT).unwrap();
    let pipeline = render_html(&tree, root, Options::DEFAULT).unwrap();

    assert_eq!(one_shot, pipeline);
    assert_eq!(one_shot, "<h1>Hello</h1>\n<p>World</p>\n");
}
