//! Structural well-formedness checks.
//!
//! Used by the test suite after mutation sequences; asserts rather than
//! returning errors so a violation points straight at the failing property.

use std::collections::HashSet;

use crate::tree::{NodeId, Tree};

/// Assert that the subtree rooted at `root` is well-formed: coherent
/// first/last-child pointers, doubly-linked sibling chains, child→parent
/// back-references, and no node reachable twice.
pub fn check(tree: &Tree, root: NodeId) {
    assert!(tree.contains(root), "root handle is stale: {root:?}");

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        assert!(
            seen.insert(id),
            "node {id:?} is reachable twice (cycle or shared child)"
        );

        let first = tree.first_child(id);
        let last = tree.last_child(id);
        assert_eq!(
            first.is_some(),
            last.is_some(),
            "node {id:?} has mismatched first/last child pointers"
        );
        if let Some(f) = first {
            assert_eq!(
                tree.previous(f),
                None,
                "first child of {id:?} has a previous sibling"
            );
        }
        if let Some(l) = last {
            assert_eq!(tree.next(l), None, "last child of {id:?} has a next sibling");
        }

        let mut prev: Option<NodeId> = None;
        let mut child = first;
        while let Some(c) = child {
            assert!(tree.contains(c), "child link of {id:?} is stale");
            assert_eq!(
                tree.parent(c),
                Some(id),
                "child {c:?} does not point back at its parent {id:?}"
            );
            assert_eq!(
                tree.previous(c),
                prev,
                "sibling back-link mismatch at {c:?}"
            );
            stack.push(c);
            prev = Some(c);
            child = tree.next(c);
        }
        assert_eq!(
            prev, last,
            "child list of {id:?} does not end at its last_child"
        );
    }
}
