//    This file is part of org-rs.
//
//    org-rs is free software: you can redistribute it and/or modify
//    it under the terms of the GNU General Public License as published by
//    the Free Software Foundation, either version 3 of the License, or
//    (at your option) any later version.
//
//    org-rs is distributed in the hope that it will be useful,
//    but WITHOUT ANY WARRANTY; without even the implied warranty of
//    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//    GNU General Public License for more details.
//
//    You should have received a copy of the GNU General Public License
//    along with org-rs.  If not, see <https://www.gnu.org/licenses/>.

//! Shared assertions for the end-to-end scenario tests in `tests/`.
//!
//! These walk a parsed tree and check the quantified invariants a
//! conforming parse must satisfy, independent of any one fixture's shape.

use outline_element::{Handle, Syntax, SyntaxT};

/// `contents_begin <= contents_end`, and every child's range nests inside
/// its parent's `location`.
pub fn assert_positions_monotonic(node: &Handle) {
    if let Some(content) = node.content_location {
        assert!(
            content.start <= content.end,
            "contents_begin {} > contents_end {}",
            content.start,
            content.end
        );
    }
    for child in node.children.borrow().iter() {
        assert!(
            node.location.start <= child.location.start,
            "child {} starts before parent {}",
            child.location.start,
            node.location.start
        );
        assert!(
            child.location.end <= node.location.end,
            "child ends at {} past parent end {}",
            child.location.end,
            node.location.end
        );
        assert_positions_monotonic(child);
    }
}

/// A parent's children are strictly increasing in `location.start`.
pub fn assert_child_ordering(node: &Handle) {
    let mut prev: Option<usize> = None;
    for child in node.children.borrow().iter() {
        if let Some(p) = prev {
            assert!(
                child.location.start > p,
                "sibling at {} does not strictly follow previous sibling starting at {}",
                child.location.start,
                p
            );
        }
        prev = Some(child.location.start);
        assert_child_ordering(child);
    }
}

/// For any two sibling headlines at the same level, no descendant headline
/// strictly between them has a level less than or equal to either.
pub fn assert_headline_nesting(node: &Handle) {
    let kids = node.children.borrow();
    for child in kids.iter() {
        if let Syntax::Headline(data) = &child.data {
            for grandchild in child.children.borrow().iter() {
                if let Syntax::Headline(nested) = &grandchild.data {
                    assert!(
                        nested.level > data.level,
                        "headline at {} has level {} which does not nest under parent level {}",
                        grandchild.location.start,
                        nested.level,
                        data.level
                    );
                }
            }
        }
        assert_headline_nesting(child);
    }
}

/// Every descriptor of a plain-list's structure lies within the list's
/// contents range.
pub fn assert_list_structure_closure(node: &Handle) {
    if let Syntax::PlainList(data) = &node.data {
        let content = node
            .content_location
            .expect("plain-list always carries a contents range");
        for entry in data.structure.iter() {
            assert!(
                content.start <= entry.begin,
                "item at {} starts before list contents_begin {}",
                entry.begin,
                content.start
            );
            assert!(
                entry.begin < entry.end,
                "item descriptor {}..{} is not well-formed",
                entry.begin,
                entry.end
            );
            assert!(
                entry.end <= content.end,
                "item at {} ends at {} past list contents_end {}",
                entry.begin,
                entry.end,
                content.end
            );
        }
    }
    for child in node.children.borrow().iter() {
        assert_list_structure_closure(child);
    }
}

/// Runs every structural invariant the scenario tests care about in one call.
pub fn assert_all_invariants(root: &Handle) {
    assert_positions_monotonic(root);
    assert_child_ordering(root);
    assert_headline_nesting(root);
    assert_list_structure_closure(root);
}

/// Depth-first search for the first node of the given discriminant.
pub fn find_first<'a>(node: &Handle<'a>, kind: SyntaxT) -> Option<Handle<'a>> {
    if SyntaxT::from(&node.data) == kind {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_first(child, kind) {
            return Some(found);
        }
    }
    None
}

/// Concatenates the literal bytes a leaf element's objects were parsed
/// from: `text` nodes contribute their own value, recursive objects (links)
/// contribute their own source span (bracket syntax and all), so the result
/// reconstructs the element's `buffer[contents_begin..contents_end]` modulo
/// the object syntax itself.
pub fn object_span_coverage(node: &Handle) -> usize {
    node.children
        .borrow()
        .iter()
        .map(|child| child.location.end - child.location.start)
        .sum()
}
