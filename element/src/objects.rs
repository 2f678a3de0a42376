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

//! Inline objects: link and plain text.
//! https://orgmode.org/worg/dev/org-syntax.html#Links

use crate::data::{Handle, Interval, LinkData, Syntax, SyntaxNode, SyntaxT};
use crate::error::{bug, dump, ParserBug};
use crate::parser::Parser;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// Matches a bracket link: `[[target]]` or `[[target][description]]`.
    /// The target may contain escaped brackets.
    pub static ref REGEX_BRACKET_LINK: Regex = Regex::new(
        r"^\[\[(?P<target>(?:\\.|[^\[\]])+)\](?:\[(?P<desc>(?:\\.|[^\[\]])+)\])?\]"
    ).unwrap();

    /// Matches a plain link: a scheme-like prefix followed by a colon and
    /// non-whitespace.
    pub static ref REGEX_PLAIN_LINK: Regex = Regex::new(
        r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):(?P<rawlink>\S+)"
    ).unwrap();

    /// Matches the start of anything `parse_objects` knows how to dispatch
    /// on: a bracket link or a plain link.
    pub static ref REGEX_OBJECT_STARTS: Regex = Regex::new(
        r"\[\[|[A-Za-z][A-Za-z0-9+.\-]*:\S"
    ).unwrap();
}

impl<'a> Parser<'a> {
    /// Parses the visible window as a sequence of objects, gated by
    /// `restriction`. Consumes the whole window.
    ///
    /// (defun org-element--parse-objects (beg end acc restriction))
    pub fn parse_objects(&self, restriction: impl Fn(SyntaxT) -> bool) -> Vec<Handle<'a>> {
        let window_end = self.cursor.borrow().window_end();
        let mut objects = vec![];

        // Links are the only recursive object this core recognizes. If
        // they're restricted here (e.g. inside a link description), the
        // whole window is necessarily one run of plain text.
        if !restriction(SyntaxT::Link) {
            let pos = self.cursor.borrow().pos();
            if pos < window_end {
                let text = self.cursor.borrow().rest();
                if !text.trim().is_empty() {
                    objects.push(SyntaxNode::new(
                        Syntax::PlainText(text),
                        Interval { start: pos, end: window_end },
                        None,
                    ));
                }
            }
            self.cursor.borrow_mut().set(window_end);
            return objects;
        }

        let mut last_pos = None;
        loop {
            let pos = self.cursor.borrow().pos();
            if pos >= window_end {
                break;
            }

            if let Some(p) = last_pos {
                if pos <= p {
                    bug!(ParserBug::NoProgress {
                        offset: pos,
                        remaining: dump(self.cursor.borrow().rest()),
                    });
                }
            }
            last_pos = Some(pos);

            let rest = self.cursor.borrow().rest();
            match REGEX_OBJECT_STARTS.find(rest) {
                None => {
                    if !rest.trim().is_empty() {
                        objects.push(SyntaxNode::new(
                            Syntax::PlainText(rest),
                            Interval { start: pos, end: window_end },
                            None,
                        ));
                    }
                    self.cursor.borrow_mut().set(window_end);
                    break;
                }
                Some(m) => {
                    if m.start() > 0 {
                        let text = &rest[..m.start()];
                        if !text.trim().is_empty() {
                            objects.push(SyntaxNode::new(
                                Syntax::PlainText(text),
                                Interval { start: pos, end: pos + m.start() },
                                None,
                            ));
                        }
                        self.cursor.borrow_mut().inc(m.start());
                    }

                    match self.parse_link() {
                        Some(link) => objects.push(link),
                        None => {
                            // The object parser declined without advancing;
                            // consume one character as text to guarantee
                            // progress (see §4.3.7 of the design notes).
                            let cur = self.cursor.borrow().pos();
                            match self.cursor.borrow().rest().chars().next() {
                                Some(c) => {
                                    self.cursor.borrow_mut().inc(c.len_utf8());
                                    objects.push(SyntaxNode::new(
                                        Syntax::PlainText(&self.input[cur..cur + c.len_utf8()]),
                                        Interval { start: cur, end: cur + c.len_utf8() },
                                        None,
                                    ));
                                }
                                None => break,
                            }
                        }
                    }
                }
            }
        }
        objects
    }

    /// Attempts to parse a link at the cursor. Returns `None` without
    /// moving the cursor if neither link form matches.
    ///
    /// (defun org-element-link-parser ())
    pub fn parse_link(&self) -> Option<Handle<'a>> {
        let pos = self.cursor.borrow().pos();
        let rest = self.cursor.borrow().rest();

        if let Some(caps) = REGEX_BRACKET_LINK.captures(rest) {
            let whole = caps.get(0).unwrap();
            let target = caps.name("target").unwrap().as_str();
            let link_type: Cow<'a, str> = match target.find(':') {
                Some(i) => Cow::Borrowed(&target[..i]),
                None => Cow::Borrowed("fuzzy"),
            };
            let whole_end = pos + whole.end();

            let children = match caps.name("desc") {
                Some(desc) => {
                    let desc_begin = pos + desc.start();
                    let desc_end = pos + desc.end();
                    self.cursor.borrow_mut().narrow(desc_begin, desc_end);
                    let kids = self.parse_objects(|that| SyntaxT::Link.can_contain(that));
                    self.cursor.borrow_mut().widen(true);
                    kids
                }
                None => vec![],
            };

            self.cursor.borrow_mut().set(whole_end);

            let node = SyntaxNode::new(
                Syntax::Link(Box::new(LinkData {
                    link_type,
                    raw_link: target,
                })),
                Interval { start: pos, end: whole_end },
                None,
            )
            .with_children(children);
            log::trace!("parse_link: bracket link {}..{}", pos, whole_end);
            return Some(node);
        }

        if let Some(caps) = REGEX_PLAIN_LINK.captures(rest) {
            let whole = caps.get(0).unwrap();
            let scheme = caps.name("scheme").unwrap().as_str();
            let whole_end = pos + whole.end();
            let raw_link = &self.input[pos..whole_end];

            self.cursor.borrow_mut().set(whole_end);
            log::trace!("parse_link: plain link {}..{}", pos, whole_end);

            return Some(SyntaxNode::new(
                Syntax::Link(Box::new(LinkData {
                    link_type: Cow::Borrowed(scheme),
                    raw_link,
                })),
                Interval { start: pos, end: whole_end },
                None,
            ));
        }

        None
    }
}
