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

use crate::cursor::REGEX_EMPTY_LINE;
use crate::data::{Handle, Interval, Syntax, SyntaxNode, SyntaxT};
use crate::headline::REGEX_HEADLINE_MULTILINE;
use crate::parser::Parser;
use regex::Regex;

lazy_static! {
    /// Matches a line that ends a paragraph: a blank line, a headline, or
    /// the start of a plain list item.
    pub static ref REGEX_PARAGRAPH_SEPARATOR: Regex = Regex::new(
        r"(?m)^(?:[ \t]*$|\*+(?:[ \t]|$)|[ \t]*(?:[-+*]|(?:[0-9]+|[A-Za-z])[.)])(?:[ \t]|$))"
    ).unwrap();
}

impl<'a> Parser<'a> {
    /// Parses a paragraph. Assumes the cursor is at the beginning of the
    /// paragraph.
    ///
    /// (defun org-element-paragraph-parser (limit))
    pub fn paragraph_parser(&self, limit: usize) -> Handle<'a> {
        let begin = self.cursor.borrow().pos();
        log::trace!("paragraph_parser at {}", begin);

        // The first line cannot itself be a separator - dispatch already
        // established we are in the paragraph fallback for it.
        self.cursor.borrow_mut().goto_next_line();

        let contents_end = loop {
            let pos = self.cursor.borrow().pos();
            if pos >= limit {
                break limit;
            }
            if self
                .cursor
                .borrow()
                .looking_at(&*REGEX_PARAGRAPH_SEPARATOR)
                .is_some()
            {
                break pos;
            }
            self.cursor.borrow_mut().goto_next_line();
        };

        let mut end = contents_end;
        self.cursor.borrow_mut().set(end);
        loop {
            if end >= limit {
                break;
            }
            let line = self.cursor.borrow().line();
            if REGEX_EMPTY_LINE.is_match(line.trim_end_matches(['\n', '\r'])) {
                self.cursor.borrow_mut().goto_next_line();
                end = self.cursor.borrow().pos();
            } else {
                break;
            }
        }

        self.cursor.borrow_mut().narrow(begin, contents_end);
        let children = self.parse_objects(|that| SyntaxT::Paragraph.can_contain(that));
        self.cursor.borrow_mut().widen(true);

        self.cursor.borrow_mut().set(end);

        SyntaxNode::new(
            Syntax::Paragraph,
            Interval { start: begin, end },
            Some(Interval {
                start: begin,
                end: contents_end,
            }),
        )
        .with_children(children)
    }

    /// Parses a section: a run of elements ending at the next headline or
    /// the end of the window. Assumes the cursor is at the beginning of
    /// the section's contents.
    ///
    /// (defun org-element-section-parser (limit))
    pub fn section_parser(&self, limit: usize) -> Handle<'a> {
        let begin = self.cursor.borrow().pos();
        log::trace!("section_parser at {}", begin);

        let end = match self
            .cursor
            .borrow_mut()
            .re_search_forward(&*REGEX_HEADLINE_MULTILINE, Some(limit))
        {
            Some((start, _)) => start,
            None => limit,
        };

        self.cursor.borrow_mut().set(end);

        SyntaxNode::new(
            Syntax::Section,
            Interval { start: begin, end },
            Some(Interval { start: begin, end }),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn separator_matches_blank_headline_and_item() {
        assert!(REGEX_PARAGRAPH_SEPARATOR.is_match(""));
        assert!(REGEX_PARAGRAPH_SEPARATOR.is_match("* headline"));
        assert!(REGEX_PARAGRAPH_SEPARATOR.is_match("- item"));
        assert!(!REGEX_PARAGRAPH_SEPARATOR.is_match("plain text"));
    }
}
