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

//! Headlines and Sections
//! https://orgmode.org/worg/dev/org-syntax.html#Headlines_and_Sections
//!
//! A headline is defined as:
//!
//! STARS KEYWORD PRIORITY TITLE TAGS
//!
//! STARS is a string starting at column 0, containing at least one asterisk
//! and ended by a space character. The number of asterisks defines the
//! level of the headline; it is the sole compulsory part of a headline.
//!
//! A headline contains directly one section (optionally), followed by any
//! number of deeper level headlines.
//!
//! A section contains directly any greater element or element. Only a
//! headline can contain a section. As an exception, text before the first
//! headline in the document also belongs to a section.

use crate::cursor::REGEX_EMPTY_LINE;
use crate::data::{Handle, HeadlineData, Interval, Syntax, SyntaxNode, SyntaxT};
use crate::parser::Parser;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// Matches the start of a headline: one or more stars followed by
    /// whitespace or line end, anchored at the beginning of a line.
    pub static ref REGEX_HEADLINE_SHORT: Regex = Regex::new(r"^\*+(?:[ \t]|$)").unwrap();

    /// Same pattern, but matching anywhere on any line of a multiline
    /// search slice. Used to find the next headline forward from point.
    pub static ref REGEX_HEADLINE_MULTILINE: Regex = Regex::new(r"(?m)^\*+(?:[ \t]|$)").unwrap();
}

impl<'a> Parser<'a> {
    /// Parses a headline. Assumes the cursor is at the beginning of the
    /// headline (column 0, looking at [`REGEX_HEADLINE_SHORT`]).
    ///
    /// `limit` bounds the search for the end of the headline's subtree.
    ///
    /// (defun org-element-headline-parser (limit))
    pub fn headline_parser(&self, limit: usize) -> Handle<'a> {
        let begin = self.cursor.borrow().pos();
        log::trace!("headline_parser at {}", begin);

        let level = self.cursor.borrow_mut().skip_chars_forward("*", Some(limit));
        self.cursor.borrow_mut().skip_chars_forward(" \t", Some(limit));

        let title_start = self.cursor.borrow().pos();
        let line_end = self.cursor.borrow_mut().line_end_position(None).min(limit);

        let mut title_end = line_end;
        {
            let bytes = self.input.as_bytes();
            while title_end > title_start
                && (bytes[title_end - 1] == b' ' || bytes[title_end - 1] == b'\t')
            {
                title_end -= 1;
            }
        }

        let raw_value: Cow<'a, str> = Cow::Borrowed(&self.input[title_start..title_end]);

        self.cursor.borrow_mut().narrow(title_start, title_end);
        let title = self.parse_objects(|that| SyntaxT::Headline.can_contain(that));
        self.cursor.borrow_mut().widen(true);

        // End of subtree: the next line at this level or shallower, or the
        // window end if there is none. Reuses the already-compiled
        // REGEX_HEADLINE_MULTILINE (matches a headline line of any level)
        // instead of building a level-specific pattern on every call;
        // deeper headlines found along the way are skipped over.
        self.cursor.borrow_mut().set(line_end);
        self.cursor.borrow_mut().goto_next_line();
        let end = loop {
            match self
                .cursor
                .borrow_mut()
                .re_search_forward(&REGEX_HEADLINE_MULTILINE, Some(limit))
            {
                Some((start, _)) => {
                    let stars = self.input[start..].bytes().take_while(|&b| b == b'*').count();
                    if stars <= level {
                        break start;
                    }
                }
                None => break limit,
            }
        };

        // contents_begin: past the title line and any blank lines that follow.
        self.cursor.borrow_mut().set(line_end);
        self.cursor.borrow_mut().goto_next_line();
        loop {
            let pos = self.cursor.borrow().pos();
            if pos >= end {
                break;
            }
            let line = self.cursor.borrow().line();
            if REGEX_EMPTY_LINE.is_match(line.trim_end_matches(['\n', '\r'])) {
                self.cursor.borrow_mut().goto_next_line();
            } else {
                break;
            }
        }
        let contents_begin = self.cursor.borrow().pos();

        self.cursor.borrow_mut().set(end);

        SyntaxNode::new(
            Syntax::Headline(Box::new(HeadlineData {
                level,
                raw_value,
                title,
            })),
            Interval { start: begin, end },
            if contents_begin < end {
                Some(Interval {
                    start: contents_begin,
                    end,
                })
            } else {
                None
            },
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cursor::Cursor;

    #[test]
    fn headline_short_matches_stars_and_space() {
        assert!(REGEX_HEADLINE_SHORT.is_match("* hi"));
        assert!(REGEX_HEADLINE_SHORT.is_match("**** "));
        assert!(REGEX_HEADLINE_SHORT.is_match("*"));
        assert!(!REGEX_HEADLINE_SHORT.is_match("not a headline"));
    }

    #[test]
    fn looking_at_headline() {
        let text = "Some text\n**** headline\nNot headline again";
        let cursor = Cursor::new(text, 10);
        assert!(cursor.looking_at(&*REGEX_HEADLINE_SHORT).is_some());
        let cursor = Cursor::new(text, 0);
        assert!(cursor.looking_at(&*REGEX_HEADLINE_SHORT).is_none());
    }

    #[test]
    fn headline_as_last_line_without_trailing_newline() {
        use crate::parser::{parse, ParseOptions};

        let root = parse("* Hello", ParseOptions::default());
        let kids = root.children.borrow();
        assert_eq!(kids.len(), 1);
        match &kids[0].data {
            Syntax::Headline(data) => assert_eq!(data.raw_value, "Hello"),
            _ => panic!("expected a headline"),
        }
    }

    #[test]
    fn headline_after_leading_text_without_trailing_newline() {
        use crate::parser::{parse, ParseOptions};

        let root = parse("hello\n* hi", ParseOptions::default());
        let kids = root.children.borrow();
        assert_eq!(kids.len(), 2);
        assert!(matches!(kids[0].data, Syntax::Section));
        match &kids[1].data {
            Syntax::Headline(data) => assert_eq!(data.raw_value, "hi"),
            _ => panic!("expected a headline"),
        }
    }

    #[test]
    fn end_of_subtree_skips_deeper_headlines() {
        use crate::parser::{parse, ParseOptions};

        let root = parse("* hi\n** there\n*** how\n* are\n*** you\n", ParseOptions::default());
        let kids = root.children.borrow();
        assert_eq!(kids.len(), 2);

        let hi_children = kids[0].children.borrow();
        assert_eq!(hi_children.len(), 1);
        match &hi_children[0].data {
            Syntax::Headline(data) => assert_eq!(data.level, 2),
            _ => panic!("expected the level-2 headline nested under \"hi\""),
        }

        let are_children = kids[1].children.borrow();
        assert_eq!(are_children.len(), 1);
        match &are_children[0].data {
            Syntax::Headline(data) => assert_eq!(data.level, 3),
            _ => panic!("expected the level-3 headline nested under \"are\""),
        }
    }
}
