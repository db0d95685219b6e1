//! Round-trip properties: a tree built through the editing API, rendered as
//! commonmark and parsed back, reproduces the same kind/literal/attribute
//! structure; rendering a reparsed document again is a fixpoint.

use arbordown_engine::{
    ListType, NodeId, NodeKind, Options, Tree, parse_document, render_commonmark, render_html,
    tree::check,
};

/// Compare two subtrees structurally: kinds, payloads, and child shapes.
fn assert_structurally_equal(a: &Tree, ra: NodeId, b: &Tree, rb: NodeId) {
    let kind = a.kind(ra).expect("left handle is live");
    assert_eq!(Some(kind), b.kind(rb), "kind mismatch");

    match kind {
        NodeKind::Text | NodeKind::Code | NodeKind::InlineHtml => {
            assert_eq!(a.literal(ra).unwrap(), b.literal(rb).unwrap());
        }
        NodeKind::HtmlBlock => {
            // Block HTML keeps its text up to trailing-newline normalization.
            assert_eq!(
                a.literal(ra).unwrap().trim_end_matches('\n'),
                b.literal(rb).unwrap().trim_end_matches('\n')
            );
        }
        NodeKind::CodeBlock => {
            assert_eq!(a.literal(ra).unwrap(), b.literal(rb).unwrap());
            assert_eq!(a.fence_info(ra).unwrap(), b.fence_info(rb).unwrap());
        }
        NodeKind::Heading => {
            assert_eq!(a.heading_level(ra).unwrap(), b.heading_level(rb).unwrap());
        }
        NodeKind::List => {
            assert_eq!(a.list_type(ra).unwrap(), b.list_type(rb).unwrap());
            assert_eq!(a.list_tight(ra).unwrap(), b.list_tight(rb).unwrap());
            if a.list_type(ra).unwrap() == ListType::Ordered {
                assert_eq!(a.list_start(ra).unwrap(), b.list_start(rb).unwrap());
            }
        }
        NodeKind::Link | NodeKind::Image => {
            assert_eq!(a.url(ra).unwrap(), b.url(rb).unwrap());
            assert_eq!(a.title(ra).unwrap(), b.title(rb).unwrap());
        }
        _ => {}
    }

    let left: Vec<NodeId> = a.children(ra).collect();
    let right: Vec<NodeId> = b.children(rb).collect();
    assert_eq!(left.len(), right.len(), "child count mismatch under {kind}");
    for (x, y) in left.iter().zip(right.iter()) {
        assert_structurally_equal(a, *x, b, *y);
    }
}

/// Helpers for building trees purely through the editing API.
struct Builder {
    tree: Tree,
}

impl Builder {
    fn new() -> Self {
        Builder { tree: Tree::new() }
    }

    fn node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = self.tree.create(kind);
        if let Some(p) = parent {
            self.tree.append_child(p, id).unwrap();
        }
        id
    }

    fn text(&mut self, parent: NodeId, literal: &str) -> NodeId {
        let id = self.node(NodeKind::Text, Some(parent));
        self.tree.set_literal(id, literal).unwrap();
        id
    }
}

fn build_sample_document() -> (Tree, NodeId) {
    let mut b = Builder::new();
    let doc = b.node(NodeKind::Document, None);

    let heading = b.node(NodeKind::Heading, Some(doc));
    b.tree.set_heading_level(heading, 2).unwrap();
    b.text(heading, "Release notes");

    let para = b.node(NodeKind::Paragraph, Some(doc));
    b.text(para, "Some ");
    let emph = b.node(NodeKind::Emphasis, Some(para));
    b.text(emph, "fancy");
    b.text(para, " text with ");
    let code = b.node(NodeKind::Code, Some(para));
    b.tree.set_literal(code, "inline()").unwrap();
    b.text(para, " code.");

    let list = b.node(NodeKind::List, Some(doc));
    b.tree.set_list_tight(list, true).unwrap();
    for label in ["first", "second"] {
        let item = b.node(NodeKind::ListItem, Some(list));
        let item_para = b.node(NodeKind::Paragraph, Some(item));
        b.text(item_para, label);
    }

    let ordered = b.node(NodeKind::List, Some(doc));
    b.tree.set_list_type(ordered, ListType::Ordered).unwrap();
    b.tree.set_list_start(ordered, 3).unwrap();
    b.tree.set_list_tight(ordered, false).unwrap();
    for label in ["third", "fourth"] {
        let item = b.node(NodeKind::ListItem, Some(ordered));
        let item_para = b.node(NodeKind::Paragraph, Some(item));
        b.text(item_para, label);
    }

    let block = b.node(NodeKind::CodeBlock, Some(doc));
    b.tree.set_fence_info(block, "rust").unwrap();
    b.tree.set_literal(block, "fn main() {}\n").unwrap();

    let quote = b.node(NodeKind::BlockQuote, Some(doc));
    let quote_para = b.node(NodeKind::Paragraph, Some(quote));
    b.text(quote_para, "quoted wisdom");

    let link_para = b.node(NodeKind::Paragraph, Some(doc));
    b.text(link_para, "See ");
    let link = b.node(NodeKind::Link, Some(link_para));
    b.tree.set_url(link, "https://example.com/notes").unwrap();
    b.tree.set_title(link, "the notes").unwrap();
    b.text(link, "the full notes");
    b.text(link_para, " for details.");

    b.node(NodeKind::ThematicBreak, Some(doc));

    let img_para = b.node(NodeKind::Paragraph, Some(doc));
    let image = b.node(NodeKind::Image, Some(img_para));
    b.tree.set_url(image, "diagram.png").unwrap();
    b.text(image, "the diagram");

    (b.tree, doc)
}

#[test]
fn api_built_tree_survives_commonmark_roundtrip() {
    let (tree, root) = build_sample_document();
    check::check(&tree, root);

    let markdown = render_commonmark(&tree, root, Options::DEFAULT).unwrap();

    let mut reparsed = Tree::new();
    let new_root = parse_document(&mut reparsed, &markdown, Options::DEFAULT).unwrap();
    check::check(&reparsed, new_root);

    assert_structurally_equal(&tree, root, &reparsed, new_root);
}

#[test]
fn parsed_document_roundtrips_through_commonmark() {
    let source = "\
# Title

Intro paragraph with *emphasis*, **strength**, and `code`.

- alpha
- beta
  - nested

1. one
2. two

> A quote with two
> lines.

```sh
echo hi
```

Final [link](https://example.com \"hover\") and ![img](x.png).
";
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, source, Options::DEFAULT).unwrap();
    let markdown = render_commonmark(&tree, root, Options::DEFAULT).unwrap();

    let mut reparsed = Tree::new();
    let new_root = parse_document(&mut reparsed, &markdown, Options::DEFAULT).unwrap();

    assert_structurally_equal(&tree, root, &reparsed, new_root);
}

#[test]
fn commonmark_rendering_is_a_fixpoint() {
    let sources = [
        "# Hello\n\nWorld\n",
        "- one\n- two\n",
        "3. three\n\n4. four\n",
        "> quote\n",
        "```rust\nfn f() {}\n```\n",
        "a *b* **c** `d`\n",
    ];
    for source in sources {
        let mut tree = Tree::new();
        let root = parse_document(&mut tree, source, Options::DEFAULT).unwrap();
        let once = render_commonmark(&tree, root, Options::DEFAULT).unwrap();

        let mut tree2 = Tree::new();
        let root2 = parse_document(&mut tree2, &once, Options::DEFAULT).unwrap();
        let twice = render_commonmark(&tree2, root2, Options::DEFAULT).unwrap();

        assert_eq!(once, twice, "render of {source:?} is not a fixpoint");
    }
}

#[test]
fn html_of_api_built_tree_matches_html_of_roundtripped_tree() {
    let (tree, root) = build_sample_document();
    let html_direct = render_html(&tree, root, Options::DEFAULT).unwrap();

    let markdown = render_commonmark(&tree, root, Options::DEFAULT).unwrap();
    let mut reparsed = Tree::new();
    let new_root = parse_document(&mut reparsed, &markdown, Options::DEFAULT).unwrap();
    let html_roundtripped = render_html(&reparsed, new_root, Options::DEFAULT).unwrap();

    assert_eq!(html_direct, html_roundtripped);
}

#[test]
fn rendered_html_snapshot() {
    let (tree, root) = build_sample_document();
    let html = render_html(&tree, root, Options::DEFAULT).unwrap();

    insta::assert_snapshot!(html.trim_end(), @r#"
<h2>Release notes</h2>
<p>Some <em>fancy</em> text with <code>inline()</code> code.</p>
<ul>
<li>first</li>
<li>second</li>
</ul>
<ol start="3">
<li>
<p>third</p>
</li>
<li>
<p>fourth</p>
</li>
</ol>
<pre><code class="language-rust">fn main() {}
</code></pre>
<blockquote>
<p>quoted wisdom</p>
</blockquote>
<p>See <a href="https://example.com/notes" title="the notes">the full notes</a> for details.</p>
<hr />
<p><img src="diagram.png" alt="the diagram" /></p>
"#);
}
