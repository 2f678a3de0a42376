//! End-to-end scenario tests: whole documents in, top-level tree shape out.
//! Each fixture also runs through [`testing::assert_all_invariants`].

use outline_element::{parse, CheckBox, ParseOptions, Syntax};

fn parse_doc(text: &str) -> outline_element::Handle {
    let root = parse(text, ParseOptions::default());
    testing::assert_all_invariants(&root);
    root
}

fn children_of<'a>(node: &outline_element::Handle<'a>) -> Vec<outline_element::Handle<'a>> {
    node.children.borrow().clone()
}

#[test]
fn empty_document_has_no_children() {
    let root = parse_doc("");
    assert!(children_of(&root).is_empty());
}

#[test]
fn single_headline() {
    let root = parse_doc("* Hello");
    let kids = children_of(&root);
    assert_eq!(kids.len(), 1);
    match &kids[0].data {
        Syntax::Headline(data) => {
            assert_eq!(data.level, 1);
            assert_eq!(data.raw_value, "Hello");
            assert_eq!(data.title.len(), 1);
            match &data.title[0].data {
                Syntax::PlainText(t) => assert_eq!(*t, "Hello"),
                _ => panic!("expected plain text title"),
            }
        }
        _ => panic!("expected a headline"),
    }
    assert!(children_of(&kids[0]).is_empty());
}

#[test]
fn nested_headlines_by_level() {
    let root = parse_doc("* hi\n** there\n*** how\n* are\n*** you\n");
    let kids = children_of(&root);
    assert_eq!(kids.len(), 2);

    let hi = &kids[0];
    let hi_level = match &hi.data {
        Syntax::Headline(d) => d.level,
        _ => panic!("expected headline"),
    };
    assert_eq!(hi_level, 1);
    let hi_kids = children_of(hi);
    assert_eq!(hi_kids.len(), 1);
    let there = &hi_kids[0];
    assert!(matches!(&there.data, Syntax::Headline(d) if d.level == 2));
    let there_kids = children_of(there);
    assert_eq!(there_kids.len(), 1);
    assert!(matches!(&there_kids[0].data, Syntax::Headline(d) if d.level == 3));

    let are = &kids[1];
    assert!(matches!(&are.data, Syntax::Headline(d) if d.level == 1));
    let are_kids = children_of(are);
    assert_eq!(are_kids.len(), 1);
    assert!(matches!(&are_kids[0].data, Syntax::Headline(d) if d.level == 3));
}

#[test]
fn text_before_first_headline_becomes_a_section() {
    let root = parse_doc("hello\n* hi");
    let kids = children_of(&root);
    assert_eq!(kids.len(), 2);
    assert!(matches!(kids[0].data, Syntax::Section));
    let section_kids = children_of(&kids[0]);
    assert_eq!(section_kids.len(), 1);
    assert!(matches!(section_kids[0].data, Syntax::Paragraph));
    assert!(matches!(kids[1].data, Syntax::Headline(_)));
}

#[test]
fn flat_plain_list() {
    let root = parse_doc("- hi\n- there");
    let section = &children_of(&root)[0];
    let list = &children_of(section)[0];
    match &list.data {
        Syntax::PlainList(data) => assert_eq!(data.indent, 0),
        _ => panic!("expected a plain-list"),
    }
    let items = children_of(list);
    assert_eq!(items.len(), 2);
    for item in &items {
        assert!(matches!(item.data, Syntax::Item(_)));
        let item_kids = children_of(item);
        assert_eq!(item_kids.len(), 1);
        assert!(matches!(item_kids[0].data, Syntax::Paragraph));
    }
}

#[test]
fn nested_plain_list() {
    let root = parse_doc("- there\n  - nested\n  - list");
    let section = &children_of(&root)[0];
    let outer_list = &children_of(section)[0];
    let outer_items = children_of(outer_list);
    assert_eq!(outer_items.len(), 1);

    let outer_item = &outer_items[0];
    let outer_item_kids = children_of(outer_item);
    assert_eq!(outer_item_kids.len(), 2, "paragraph followed by nested list");

    let nested_list = outer_item_kids
        .iter()
        .find(|k| matches!(k.data, Syntax::PlainList(_)))
        .expect("nested plain-list");
    match &nested_list.data {
        Syntax::PlainList(data) => assert_eq!(data.indent, 2),
        _ => unreachable!(),
    }
    assert_eq!(children_of(nested_list).len(), 2);
}

#[test]
fn checkbox_items() {
    let root = parse_doc("- [X] done\n- [ ] not done\n- [-] partial\n");
    let section = &children_of(&root)[0];
    let list = &children_of(section)[0];
    let items = children_of(list);
    assert_eq!(items.len(), 3);
    let checkbox_of = |n: &outline_element::Handle| match &n.data {
        Syntax::Item(d) => d.checkbox,
        _ => panic!("expected item"),
    };
    assert_eq!(checkbox_of(&items[0]), Some(CheckBox::On));
    assert_eq!(checkbox_of(&items[1]), Some(CheckBox::Off));
    assert_eq!(checkbox_of(&items[2]), Some(CheckBox::Trans));
}

#[test]
fn bracket_link_with_description() {
    let root = parse_doc("[[link][text]]");
    let section = &children_of(&root)[0];
    let paragraph = &children_of(section)[0];
    let objects = children_of(paragraph);
    assert_eq!(objects.len(), 1);
    match &objects[0].data {
        Syntax::Link(data) => {
            assert_eq!(data.link_type, "fuzzy");
            assert_eq!(data.raw_link, "link");
        }
        _ => panic!("expected a link"),
    }
    let link_kids = children_of(&objects[0]);
    assert_eq!(link_kids.len(), 1);
    match &link_kids[0].data {
        Syntax::PlainText(t) => assert_eq!(*t, "text"),
        _ => panic!("expected plain text description"),
    }
}

#[test]
fn paragraph_with_plain_link_is_split_into_three_objects() {
    let root = parse_doc("hello http://example.com blah");
    let section = &children_of(&root)[0];
    let paragraph = &children_of(section)[0];
    let objects = children_of(paragraph);
    assert_eq!(objects.len(), 3);

    match &objects[0].data {
        Syntax::PlainText(t) => assert_eq!(*t, "hello "),
        _ => panic!("expected leading text"),
    }
    match &objects[1].data {
        Syntax::Link(data) => {
            assert_eq!(data.link_type, "http");
            assert_eq!(data.raw_link, "http://example.com");
        }
        _ => panic!("expected a link"),
    }
    match &objects[2].data {
        Syntax::PlainText(t) => assert_eq!(*t, " blah"),
        _ => panic!("expected trailing text"),
    }
}

#[test]
fn unterminated_bracket_link_degrades_to_text() {
    let root = parse_doc("see [[not closed");
    let section = &children_of(&root)[0];
    let paragraph = &children_of(section)[0];
    let objects = children_of(paragraph);
    assert!(objects.iter().all(|o| matches!(o.data, Syntax::PlainText(_))));
}

#[test]
fn whitespace_only_paragraph_elides_its_text_child() {
    // A list item whose body is all blank produces a paragraph with an
    // empty/whitespace-only contents range; no all-whitespace text node
    // should be emitted for it.
    let root = parse_doc("- \n- next\n");
    let section = &children_of(&root)[0];
    let list = &children_of(section)[0];
    let items = children_of(list);
    let first_item_kids = children_of(&items[0]);
    for k in &first_item_kids {
        if let Syntax::Paragraph = k.data {
            for obj in children_of(k) {
                if let Syntax::PlainText(t) = obj.data {
                    assert!(!t.trim().is_empty(), "all-whitespace text node should be elided");
                }
            }
        }
    }
}
