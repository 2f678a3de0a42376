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

use std::cell::RefCell;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::data::{Handle, Interval, Syntax, SyntaxNode, SyntaxT};
use crate::error::{bug, dump, ParserBug};
use crate::headline::REGEX_HEADLINE_SHORT;
use crate::list::{ItemDescriptor, REGEX_ITEM};

/// Knobs for [`parse`]. Carries no public fields yet; reserved for future
/// extension (e.g. a recursion-depth cap) without breaking callers, who
/// must always go through [`ParseOptions::default`].
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct ParseOptions {}

/// MODE prioritizes some elements over others while `parse_elements` walks
/// a range. Only `Section`/`FirstSection` and `Item` are ever produced by
/// this core; the type still distinguishes them individually to mirror the
/// upstream mode table.
///
/// Original function name: org-element--next-mode
/// https://code.orgmode.org/bzg/org-mode/src/master/lisp/org-element.el#L4273
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParserMode {
    FirstSection,
    Section,
    Item,
}

pub struct Parser<'a> {
    pub cursor: RefCell<Cursor<'a>>,
    pub input: &'a str,
    pub options: ParseOptions,
}

/// Parses `text` into a position-annotated syntax tree. Never fails:
/// anything that isn't recognized structure falls back to a paragraph
/// (see the crate-level docs on the error model).
pub fn parse(text: &str, options: ParseOptions) -> Handle {
    let parser = Parser {
        cursor: RefCell::new(Cursor::new(text, 0)),
        input: text,
        options,
    };
    parser.parse_buffer()
}

impl<'a> Parser<'a> {
    /// Mode a greater element's content should be parsed in, i.e. what
    /// `mode` the recursive `parse_elements` call over its
    /// `content_location` receives. `None` means the default mode.
    fn descend_mode(parent: SyntaxT) -> Option<ParserMode> {
        match parent {
            SyntaxT::Headline => Some(ParserMode::Section),
            SyntaxT::PlainList => Some(ParserMode::Item),
            _ => None,
        }
    }

    /// Mode the *next sibling* should be parsed in, given the mode the
    /// current element was parsed in and the element's own type. Only
    /// `Item` ever needs to persist across siblings in this core: every
    /// item in a list is parsed with the same mode as the one before it.
    fn sibling_mode(mode: Option<ParserMode>, _child: SyntaxT) -> Option<ParserMode> {
        match mode {
            Some(ParserMode::Item) => Some(ParserMode::Item),
            _ => None,
        }
    }

    /// org-element-parse-buffer
    fn parse_buffer(&self) -> Handle<'a> {
        let end = self.input.len();
        let root = Rc::new(SyntaxNode {
            parent: RefCell::new(None),
            children: RefCell::new(vec![]),
            data: Syntax::OrgData,
            location: Interval { start: 0, end },
            content_location: Some(Interval { start: 0, end }),
            post_blank: 0,
            affiliated: None,
        });

        let children = self.parse_elements(0, end, Some(ParserMode::FirstSection), None);
        for child in &children {
            *child.parent.borrow_mut() = Some(Rc::downgrade(&root));
        }
        *root.children.borrow_mut() = children;
        root
    }

    /// Parses elements between `beg` and `end`, narrowing the cursor to
    /// that range for the duration of the call.
    ///
    /// (defun org-element--parse-elements (beg end mode structure granularity visible-only acc))
    fn parse_elements(
        &self,
        beg: usize,
        end: usize,
        mut mode: Option<ParserMode>,
        structure: Option<Rc<Vec<ItemDescriptor<'a>>>>,
    ) -> Vec<Handle<'a>> {
        self.cursor.borrow_mut().narrow(beg, end);

        let mut elements = vec![];
        let mut last_pos = None;
        loop {
            if self.cursor.borrow().eof() {
                break;
            }
            let pos = self.cursor.borrow().pos();

            if let Some(p) = last_pos {
                if pos <= p {
                    bug!(ParserBug::NoProgress {
                        offset: pos,
                        remaining: dump(self.cursor.borrow().rest()),
                    });
                }
            }
            last_pos = Some(pos);

            let element = self.current_element(mode, structure.clone());
            let element_type = SyntaxT::from(&element.data);

            if element_type.is_greater_element() {
                if let Some(content) = element.content_location {
                    let new_mode = Self::descend_mode(element_type);
                    let child_structure = match &element.data {
                        Syntax::PlainList(d) => Some(d.structure.clone()),
                        _ => None,
                    };
                    let kids = self.parse_elements(content.start, content.end, new_mode, child_structure);
                    for k in &kids {
                        *k.parent.borrow_mut() = Some(Rc::downgrade(&element));
                    }
                    *element.children.borrow_mut() = kids;
                }
            }

            if let Some(m) = Self::sibling_mode(mode, element_type) {
                mode = Some(m);
            }

            self.cursor.borrow_mut().set(element.location.end);
            elements.push(element);
        }

        self.cursor.borrow_mut().widen(false);
        elements
    }

    /// Determines the type of the element starting at the cursor and
    /// dispatches to its parser. Assumes the cursor is at the beginning of
    /// the element to parse.
    ///
    /// (defun org-element--current-element (limit &optional granularity mode structure))
    fn current_element(
        &self,
        mode: Option<ParserMode>,
        structure: Option<Rc<Vec<ItemDescriptor<'a>>>>,
    ) -> Handle<'a> {
        let limit = self.cursor.borrow().window_end();

        if mode == Some(ParserMode::Item) {
            let structure = structure.expect("item mode always carries a list structure");
            log::trace!("current_element: item");
            return self.item_parser(structure);
        }

        if self.cursor.borrow().looking_at(&*REGEX_HEADLINE_SHORT).is_some() {
            log::trace!("current_element: headline");
            return self.headline_parser(limit);
        }

        if mode == Some(ParserMode::Section) || mode == Some(ParserMode::FirstSection) {
            log::trace!("current_element: section");
            return self.section_parser(limit);
        }

        if self.cursor.borrow().looking_at(&*REGEX_ITEM).is_some() {
            log::trace!("current_element: plain-list");
            let structure = structure.unwrap_or_else(|| self.list_struct(limit));
            return self.plain_list_parser(structure);
        }

        log::trace!("current_element: paragraph (default)");
        self.paragraph_parser(limit)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{CheckBox, Syntax};

    fn children_of(node: &Handle) -> Vec<Handle> {
        node.children.borrow().clone()
    }

    #[test]
    fn parses_empty_document() {
        let root = parse("", ParseOptions::default());
        assert!(children_of(&root).is_empty());
    }

    #[test]
    fn parses_text_before_first_headline_as_section() {
        let root = parse("hello\n* hi", ParseOptions::default());
        let kids = children_of(&root);
        assert_eq!(kids.len(), 2);
        assert!(matches!(kids[0].data, Syntax::Section));
        assert!(matches!(kids[1].data, Syntax::Headline(_)));
    }

    #[test]
    fn parses_headline_with_title_and_section() {
        let root = parse("* Hello World\nSome text.", ParseOptions::default());
        let kids = children_of(&root);
        assert_eq!(kids.len(), 1);
        match &kids[0].data {
            Syntax::Headline(data) => {
                assert_eq!(data.level, 1);
                assert_eq!(data.raw_value, "Hello World");
            }
            _ => panic!("expected a headline"),
        }
        let headline_kids = children_of(&kids[0]);
        assert_eq!(headline_kids.len(), 1);
        assert!(matches!(headline_kids[0].data, Syntax::Section));
        let section_kids = children_of(&headline_kids[0]);
        assert_eq!(section_kids.len(), 1);
        assert!(matches!(section_kids[0].data, Syntax::Paragraph));
    }

    #[test]
    fn parses_nested_headlines() {
        let root = parse("* One\n** Two\n* Three", ParseOptions::default());
        let kids = children_of(&root);
        assert_eq!(kids.len(), 2);
        let one_kids = children_of(&kids[0]);
        assert_eq!(one_kids.len(), 1);
        assert!(matches!(one_kids[0].data, Syntax::Headline(_)));
    }

    #[test]
    fn parses_plain_list_with_items() {
        let root = parse("- one\n- two\n", ParseOptions::default());
        let kids = children_of(&root);
        assert_eq!(kids.len(), 1);
        assert!(matches!(kids[0].data, Syntax::PlainList(_)));
        let items = children_of(&kids[0]);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| matches!(i.data, Syntax::Item(_))));
    }

    #[test]
    fn parses_checkbox_item() {
        let root = parse("- [X] done\n- [ ] not done\n", ParseOptions::default());
        let list = &children_of(&root)[0];
        let items = children_of(list);
        match &items[0].data {
            Syntax::Item(d) => assert_eq!(d.checkbox, Some(CheckBox::On)),
            _ => panic!("expected an item"),
        }
        match &items[1].data {
            Syntax::Item(d) => assert_eq!(d.checkbox, Some(CheckBox::Off)),
            _ => panic!("expected an item"),
        }
    }

    #[test]
    fn parses_bracket_link_inside_paragraph() {
        let root = parse("See [[http://example.com][here]].", ParseOptions::default());
        let section = &children_of(&root)[0];
        let paragraph = &children_of(section)[0];
        let objects = children_of(paragraph);
        assert!(objects.iter().any(|o| matches!(o.data, Syntax::Link(_))));
    }

    #[test]
    fn positions_are_monotonic_and_nested() {
        let root = parse("* One\nbody text\n* Two\n", ParseOptions::default());
        fn check(node: &Handle) {
            let mut prev_end = node.location.start;
            for child in node.children.borrow().iter() {
                assert!(child.location.start >= prev_end);
                assert!(child.location.end <= node.location.end);
                prev_end = child.location.end;
                check(child);
            }
        }
        check(&root);
    }
}
