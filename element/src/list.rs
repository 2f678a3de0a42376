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

//!  Plain Lists and Items
//! https://orgmode.org/worg/dev/org-syntax.html#Plain_Lists_and_Items
//!
//!  Items are defined by a line starting with the following pattern: "BULLET
//! COUNTER-SET CHECK-BOX TAG", in which only BULLET is mandatory.
//!
//!  BULLET is either an asterisk, a hyphen, a plus sign character or follows
//! either the pattern "COUNTER." or "COUNTER)".  In any case, BULLET is followed
//! by a whitespace character or line ending.
//!
//!  COUNTER can be a number or a single letter.
//!
//!  COUNTER-SET follows the pattern [@COUNTER].
//!
//!  CHECK-BOX is either a single whitespace character, a "X" character or a
//! hyphen, enclosed within square brackets.
//!
//!  TAG follows "TAG-TEXT ::" pattern, where TAG-TEXT can contain any character
//! but a new line.
//!
//!  An item ends before the next item, the first line less or equally indented
//! than its starting line, or two consecutive empty lines.
//!
//!  A plain list is a set of consecutive items of the same indentation. It can
//! only directly contain items.

use crate::cursor::REGEX_EMPTY_LINE;
use crate::data::{CheckBox, Handle, Interval, ItemData, PlainListData, Syntax, SyntaxNode};
use crate::error::{bug, dump, ParserBug};
use crate::parser::Parser;
use regex::Regex;
use std::rc::Rc;

lazy_static! {
    /// Matches the beginning of a plain list item, just enough to decide
    /// whether the current line starts one.
    pub static ref REGEX_ITEM: Regex = Regex::new(
        r"^[ \t]*(?:[-+*]|(?:[0-9]+|[A-Za-z])[.)])(?:[ \t]+|$)"
    ).unwrap();

    /// Matches a full item line, capturing bullet, counter, checkbox and tag.
    /// corresponds to `org-list-full-item-re` in org-list.el
    pub static ref REGEX_FULL_ITEM: Regex = Regex::new(concat!(
        r"^[ \t]*(?P<bullet>[-+*]|(?:[0-9]+|[A-Za-z])[.)])(?:[ \t]+|$)",
        r"(?:\[@(?:start:)?(?P<counter>[0-9]+|[A-Za-z])\][ \t]*)?",
        r"(?:(?P<checkbox>\[[ Xx-]\])(?:[ \t]+|$))?",
        r"(?:(?P<tag>.*?)[ \t]+::(?:[ \t]+|$))?",
    )).unwrap();
}

/// A positional record produced by the list structure scanner. Purely
/// locational: it records where an item starts and ends and what its
/// bullet line looked like, nothing about its parsed contents.
#[derive(Debug, Clone, Copy)]
pub struct ItemDescriptor<'a> {
    pub begin: usize,
    pub indent: usize,
    pub bullet: &'a str,
    pub counter: Option<usize>,
    pub checkbox: Option<CheckBox>,
    pub tag: Option<&'a str>,
    pub end: usize,
}

fn parse_checkbox(s: &str) -> CheckBox {
    match s {
        "[X]" | "[x]" => CheckBox::On,
        "[-]" => CheckBox::Trans,
        _ => CheckBox::Off,
    }
}

fn line_indent(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

impl<'a> Parser<'a> {
    /// Scans the list-and-sublist region starting at the cursor, which must
    /// be positioned at a line matching [`REGEX_ITEM`]. Returns without
    /// moving the cursor.
    ///
    /// (defun org-element--list-struct (limit))
    pub fn list_struct(&self, limit: usize) -> Rc<Vec<ItemDescriptor<'a>>> {
        let saved_pos = self.cursor.borrow().pos();

        let mut open: Vec<ItemDescriptor<'a>> = Vec::new();
        let mut closed: Vec<ItemDescriptor<'a>> = Vec::new();
        let mut consecutive_blanks = 0usize;

        loop {
            let pos = self.cursor.borrow().pos();
            if pos >= limit || self.cursor.borrow().eof() {
                break;
            }

            let line = self.cursor.borrow().line();

            if REGEX_EMPTY_LINE.is_match(line.trim_end_matches(['\n', '\r'])) {
                consecutive_blanks += 1;
                self.cursor.borrow_mut().goto_next_line();
                if consecutive_blanks >= 2 {
                    break;
                }
                continue;
            }
            consecutive_blanks = 0;

            let indent = line_indent(line);

            if let Some(caps) = self.cursor.borrow().capturing_at(&*REGEX_FULL_ITEM) {
                while let Some(top) = open.last() {
                    if top.indent >= indent {
                        let mut item = open.pop().unwrap();
                        item.end = pos;
                        log::trace!("list scanner: closing item {}..{}", item.begin, item.end);
                        closed.push(item);
                    } else {
                        break;
                    }
                }

                let bullet = caps.name("bullet").unwrap().as_str();
                let counter = caps
                    .name("counter")
                    .and_then(|m| m.as_str().parse::<usize>().ok());
                let checkbox = caps.name("checkbox").map(|m| parse_checkbox(m.as_str()));
                let tag = caps.name("tag").map(|m| m.as_str());

                log::trace!("list scanner: opening item at {} indent {}", pos, indent);
                open.push(ItemDescriptor {
                    begin: pos,
                    indent,
                    bullet,
                    counter,
                    checkbox,
                    tag,
                    end: pos,
                });

                self.cursor.borrow_mut().goto_next_line();
                continue;
            }

            // Continuation text line.
            while let Some(top) = open.last() {
                if top.indent >= indent {
                    let mut item = open.pop().unwrap();
                    item.end = pos;
                    closed.push(item);
                } else {
                    break;
                }
            }
            if open.is_empty() {
                break;
            }
            self.cursor.borrow_mut().goto_next_line();
        }

        let final_pos = self.cursor.borrow().pos();
        for mut item in open.drain(..) {
            item.end = final_pos;
            closed.push(item);
        }

        closed.sort_by_key(|d| d.begin);
        self.cursor.borrow_mut().set(saved_pos);
        Rc::new(closed)
    }

    /// Parses a single item at the cursor. The cursor must be positioned at
    /// the item's `begin`, which must have an entry in `structure`.
    ///
    /// (defun org-element-item-parser (struct))
    pub fn item_parser(&self, structure: Rc<Vec<ItemDescriptor<'a>>>) -> Handle<'a> {
        let begin = self.cursor.borrow().pos();

        let entry = match structure.iter().find(|d| d.begin == begin) {
            Some(e) => *e,
            None => bug!(ParserBug::MissingStructureEntry {
                offset: begin,
                remaining: dump(self.cursor.borrow().rest()),
            }),
        };

        let bullet_end = match self.cursor.borrow().capturing_at(&*REGEX_FULL_ITEM) {
            Some(caps) => caps.get(0).unwrap().end(),
            None => bug!(ParserBug::MalformedItemLine {
                offset: begin,
                remaining: dump(self.cursor.borrow().rest()),
            }),
        };

        let contents_begin = (begin + bullet_end).min(entry.end);
        let end = entry.end;

        self.cursor.borrow_mut().set(end);

        SyntaxNode::new(
            Syntax::Item(Box::new(ItemData {
                indent: entry.indent,
                bullet: entry.bullet,
                checkbox: entry.checkbox,
                structure,
            })),
            Interval { start: begin, end },
            Some(Interval {
                start: contents_begin,
                end,
            }),
        )
    }

    /// Parses a plain list starting at the cursor, walking `structure` to
    /// find where the run of top-level items (sharing the first item's
    /// indent) ends.
    ///
    /// (defun org-element-plain-list-parser (struct))
    pub fn plain_list_parser(&self, structure: Rc<Vec<ItemDescriptor<'a>>>) -> Handle<'a> {
        let begin = self.cursor.borrow().pos();

        let first = match structure.iter().find(|d| d.begin == begin) {
            Some(e) => *e,
            None => bug!(ParserBug::MissingStructureEntry {
                offset: begin,
                remaining: dump(self.cursor.borrow().rest()),
            }),
        };

        let indent = first.indent;
        let mut pos = first.end;
        while let Some(next) = structure.iter().find(|d| d.begin == pos && d.indent == indent) {
            pos = next.end;
        }
        let end = pos;

        self.cursor.borrow_mut().set(end);

        SyntaxNode::new(
            Syntax::PlainList(Box::new(PlainListData { indent, structure })),
            Interval { start: begin, end },
            Some(Interval { start: begin, end }),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cursor::Cursor;
    use crate::parser::{ParseOptions, Parser};
    use std::cell::RefCell;

    fn parser(input: &str) -> Parser {
        Parser {
            cursor: RefCell::new(Cursor::new(input, 0)),
            input,
            options: ParseOptions::default(),
        }
    }

    #[test]
    fn scans_flat_list() {
        let input = "- hi\n- there";
        let p = parser(input);
        let structure = p.list_struct(input.len());
        assert_eq!(structure.len(), 2);
        assert_eq!(structure[0].begin, 0);
        assert_eq!(structure[0].end, 5);
        assert_eq!(structure[1].begin, 5);
        assert_eq!(structure[1].end, input.len());
    }

    #[test]
    fn scans_nested_list() {
        let input = "- there\n  - nested\n  - list";
        let p = parser(input);
        let structure = p.list_struct(input.len());
        assert_eq!(structure.len(), 3);
        let outer = structure.iter().find(|d| d.indent == 0).unwrap();
        assert_eq!(outer.begin, 0);
        assert_eq!(outer.end, input.len());
        let nested: Vec<_> = structure.iter().filter(|d| d.indent == 2).collect();
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn full_item_regex_extracts_checkbox() {
        let caps = REGEX_FULL_ITEM.captures("- [X] done").unwrap();
        assert_eq!(caps.name("checkbox").unwrap().as_str(), "[X]");
    }
}
