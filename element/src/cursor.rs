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

// Parts of the cursor code are shamelessly copied from xi-rope
// https://github.com/xi-editor/xi-editor/tree/master/rust/rope

use memchr::{memchr, memrchr};
use regex::{Captures, Match, Regex};

lazy_static! {
    pub static ref REGEX_EMPTY_LINE: Regex = Regex::new(r"^[ \t]*$").unwrap();
}

/// Metric is an addrress of special kind of marker.
/// Metric by itself does represent a user-facing value (e.g. char, string..)
pub trait Metric {
    /// Is this metric located by given offset in a given string
    fn is_boundary(s: &str, offset: usize) -> bool;

    /// Try to find previous metric relative the given offset in a given string
    fn prev(s: &str, offset: usize) -> Option<usize>;

    /// Try to find next metric relative the given offset in a given string
    fn next(s: &str, offset: usize) -> Option<usize>;

    fn at_or_next(s: &str, offset: usize) -> Option<usize> {
        if Self::is_boundary(s, offset) {
            Some(offset)
        } else {
            Self::next(s, offset)
        }
    }

    fn at_or_prev(s: &str, offset: usize) -> Option<usize> {
        if Self::is_boundary(s, offset) {
            Some(offset)
        } else {
            Self::prev(s, offset)
        }
    }
}

/// UTF char metric. The address of a UTF-8 char is the address of its first byte
pub struct CharMetric;

impl CharMetric {
    /// Given the inital byte of a UTF-8 codepoint, returns the number of
    /// bytes required to represent the codepoint.
    /// RFC reference : https://tools.ietf.org/html/rfc3629#section-4
    pub fn len_utf8_from_first_byte(b: u8) -> usize {
        match b {
            b if b < 0x80 => 1,
            b if b < 0xe0 => 2,
            b if b < 0xf0 => 3,
            _ => 4,
        }
    }
}

impl Metric for CharMetric {
    fn is_boundary(s: &str, offset: usize) -> bool {
        s.is_char_boundary(offset)
    }

    fn prev(s: &str, offset: usize) -> Option<usize> {
        if offset == 0 {
            None
        } else {
            let mut len = 1;
            while !s.is_char_boundary(offset - len) {
                len += 1;
            }
            Some(offset - len)
        }
    }

    fn next(s: &str, offset: usize) -> Option<usize> {
        if offset == s.len() {
            None
        } else {
            let b = s.as_bytes()[offset];
            Some(offset + CharMetric::len_utf8_from_first_byte(b))
        }
    }
}

/// Newline metric. The address of the '\n' byte
pub struct LinesMetric;

impl Metric for LinesMetric {
    fn is_boundary(s: &str, offset: usize) -> bool {
        if offset == 0 {
            false
        } else {
            s.as_bytes()[offset - 1] == b'\n'
        }
    }

    fn prev(s: &str, offset: usize) -> Option<usize> {
        debug_assert!(offset > 0, "caller is responsible for validating input");
        memrchr(b'\n', &s.as_bytes()[..offset - 1]).map(|pos| pos + 1)
    }

    fn next(s: &str, offset: usize) -> Option<usize> {
        memchr(b'\n', &s.as_bytes()[offset..]).map(|pos| offset + pos + 1)
    }
}

/// One level of the narrow-window stack: the window that was visible
/// before `narrow` was called, plus the cursor position at that time so
/// `widen` can restore it.
#[derive(Debug, Clone, Copy)]
struct NarrowFrame {
    begin: usize,
    end: usize,
    saved_pos: usize,
}

/// A cursor over an immutable text buffer.
///
/// In addition to the usual positional operations, a `Cursor` carries a
/// LIFO stack of narrowed windows (`narrow`/`widen`). Every regex match and
/// every positional query is clamped to the top of that stack, which is
/// what lets a recursive subparse see only the slice of text it owns
/// without the caller having to thread `begin`/`end` bounds through every
/// call.
pub struct Cursor<'a> {
    data: &'a str,
    pos: usize,
    windows: Vec<NarrowFrame>,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a str, pos: usize) -> Cursor<'a> {
        Cursor {
            data,
            pos,
            windows: Vec::new(),
        }
    }

    /// total length of the underlying buffer, ignoring any narrow window
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Start of the currently visible window (0 if not narrowed)
    pub fn window_begin(&self) -> usize {
        self.windows.last().map(|w| w.begin).unwrap_or(0)
    }

    /// End of the currently visible window (buffer length if not narrowed)
    pub fn window_end(&self) -> usize {
        self.windows
            .last()
            .map(|w| w.end)
            .unwrap_or_else(|| self.data.len())
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.window_end()
    }

    /// Push the current window, replace it with `[begin, end)` and move
    /// the cursor to `begin`. Must be paired with exactly one `widen` on
    /// every exit path.
    pub fn narrow(&mut self, begin: usize, end: usize) {
        debug_assert!(begin <= end);
        debug_assert!(end <= self.data.len());
        self.windows.push(NarrowFrame {
            begin,
            end,
            saved_pos: self.pos,
        });
        self.pos = begin;
    }

    /// Pop the most recently pushed window. By default the cursor is
    /// restored to the position it held when `narrow` was called; pass
    /// `preserve_position = true` to keep the current cursor position
    /// instead.
    pub fn widen(&mut self, preserve_position: bool) {
        let frame = self
            .windows
            .pop()
            .expect("widen() called without a matching narrow()");
        if !preserve_position {
            self.pos = frame.saved_pos;
        }
    }

    /// Next (up to) `n` bytes of the visible slice starting at the cursor.
    pub fn peek(&self, n: usize) -> &'a str {
        let end = self.window_end();
        let upper = (self.pos + n).min(end);
        &self.data[self.pos..upper]
    }

    /// The entire visible slice from the cursor to the window end.
    pub fn rest(&self) -> &'a str {
        &self.data[self.pos..self.window_end()]
    }

    /// Bytes from the cursor through the next newline inclusive, or
    /// through the window end if no newline remains.
    pub fn line(&self) -> &'a str {
        let end = self.window_end();
        let nl = memchr(b'\n', &self.data.as_bytes()[self.pos..end]);
        let line_end = nl.map(|p| self.pos + p + 1).unwrap_or(end);
        &self.data[self.pos..line_end]
    }

    pub fn set(&mut self, pos: usize) {
        debug_assert!(pos >= self.window_begin() && pos <= self.window_end());
        self.pos = pos;
    }

    pub fn inc(&mut self, inc: usize) {
        self.pos += inc;
    }

    pub fn dec(&mut self, dec: usize) {
        if dec > self.pos {
            self.pos = 0;
        } else {
            self.pos -= dec;
        }
    }

    /// Bytes `[a, b)` of the underlying buffer, ignoring the narrow window.
    pub fn substring(&self, a: usize, b: usize) -> &'a str {
        &self.data[a..b]
    }

    pub fn is_boundary<M: Metric>(&self) -> bool {
        M::is_boundary(self.data, self.pos)
    }

    pub fn next<M: Metric>(&mut self) -> Option<usize> {
        if let Some(l) = M::next(self.data, self.pos) {
            if l > self.window_end() {
                return None;
            }
            self.pos = l;
            Some(l)
        } else {
            None
        }
    }

    pub fn prev<M: Metric>(&mut self) -> Option<usize> {
        if let Some(offset) = M::prev(self.data, self.pos) {
            if offset < self.window_begin() {
                return None;
            }
            self.pos = offset;
            Some(offset)
        } else {
            None
        }
    }

    pub fn at_or_next<M: Metric>(&mut self) -> Option<usize> {
        if self.is_boundary::<M>() {
            Some(self.pos())
        } else {
            self.next::<M>()
        }
    }

    pub fn at_or_prev<M: Metric>(&mut self) -> Option<usize> {
        if self.is_boundary::<M>() {
            Some(self.pos())
        } else {
            self.prev::<M>()
        }
    }

    pub fn is_bol(&self) -> bool {
        if self.pos() == self.window_begin() {
            true
        } else {
            self.is_boundary::<LinesMetric>()
        }
    }

    /// Move point backward, stopping after a char not in `chars`, or at
    /// `limit` (defaults to the window begin). Returns the distance
    /// traveled.
    pub fn skip_chars_backward(&mut self, chars: &str, limit: Option<usize>) -> usize {
        let limit = limit.unwrap_or_else(|| self.window_begin());

        if self.pos() <= limit {
            return 0;
        }

        let mut count = 0;
        while self.pos() > limit {
            let prev = CharMetric::prev(self.data, self.pos).unwrap();
            let c = self.data[prev..].chars().next().unwrap();
            if !chars.contains(c) || prev < limit {
                break;
            }
            self.pos = prev;
            count += 1;
        }
        count
    }

    /// Moves point forward, stopping before a char not in `chars`, or at
    /// `limit` (defaults to the window end).
    pub fn skip_chars_forward(&mut self, chars: &str, limit: Option<usize>) -> usize {
        let limit = limit.unwrap_or_else(|| self.window_end());

        if self.pos() >= limit {
            return 0;
        }

        let mut count = 0;
        while self.pos() < limit {
            match self.data[self.pos..].chars().next() {
                Some(c) if chars.contains(c) => {
                    self.pos += c.len_utf8();
                    count += 1;
                }
                _ => break,
            }
        }
        count
    }

    /// Moves cursor to the beginning of the current line. Acts like "Home".
    pub fn goto_line_begin(&mut self) -> usize {
        if self.pos() != self.window_begin() && self.at_or_prev::<LinesMetric>().is_none() {
            self.pos = self.window_begin();
        }
        self.pos()
    }

    /// Moves cursor to the beginning of the next line, or to the window
    /// end if there is none.
    pub fn goto_next_line(&mut self) -> usize {
        match self.next::<LinesMetric>() {
            Some(p) => p,
            None => {
                self.pos = self.window_end();
                self.pos
            }
        }
    }

    /// Return the character position of the first character on the
    /// current line (or the Nth line relative to it, with `n`). Does not
    /// move the cursor.
    pub fn line_beginning_position(&mut self, n: Option<i32>) -> usize {
        let pos = self.pos();
        match n {
            None | Some(1) => {
                self.goto_line_begin();
            }
            Some(x) if x > 1 => {
                for _ in 0..x - 1 {
                    if self.next::<LinesMetric>().is_none() {
                        break;
                    }
                }
            }
            Some(x) => {
                self.goto_line_begin();
                if self.pos() != self.window_begin() {
                    for _ in 0..(x - 1).abs() {
                        if self.prev::<LinesMetric>().is_none() {
                            self.pos = self.window_begin();
                            break;
                        }
                    }
                }
            }
        }
        let result = self.pos();
        self.pos = pos;
        result
    }

    /// Return the character position of the last character on the
    /// current line (or the Nth line relative to it). Does not move the
    /// cursor.
    pub fn line_end_position(&mut self, n: Option<i32>) -> usize {
        let pos = self.pos();
        let result = match n {
            None | Some(1) => {
                if self.next::<LinesMetric>().is_some() {
                    self.prev::<CharMetric>().unwrap_or_else(|| self.window_begin())
                } else {
                    // No newline left on the current line: its end is the
                    // window end itself, not one char behind where we started.
                    self.window_end()
                }
            }
            Some(x) if x > 1 => {
                let mut reached = true;
                for _ in 0..x {
                    if self.next::<LinesMetric>().is_none() {
                        reached = false;
                        break;
                    }
                }
                if reached {
                    self.prev::<CharMetric>().unwrap_or_else(|| self.window_begin())
                } else {
                    self.window_end()
                }
            }
            Some(x) => {
                if self.pos() != self.window_begin() {
                    for _ in 0..=x.abs() {
                        if self.prev::<LinesMetric>().is_none() {
                            break;
                        }
                    }
                }
                self.prev::<CharMetric>().unwrap_or_else(|| self.window_begin())
            }
        };
        self.pos = pos;
        result
    }

    pub fn char_after(&mut self, offset: usize) -> Option<char> {
        if offset >= self.window_end() {
            return None;
        }
        self.data[offset..].chars().next()
    }

    /// Skip over spaces, tabs and newlines. Cursor is left before the next
    /// non-whitespace byte (or at the window end).
    pub fn skip_whitespace(&mut self) -> usize {
        let end = self.window_end();
        while self.pos < end {
            match self.data[self.pos..end].chars().next() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                _ => break,
            }
        }
        self.pos()
    }

    /// Checks if current line matches a given regex anchored at the
    /// cursor. Does not move the cursor.
    pub fn looking_at(&self, re: &Regex) -> Option<Match<'a>> {
        let end = self.match_window(re);
        re.find(&self.data[self.pos..end])
    }

    /// Acts exactly as `looking_at` but returns Captures.
    pub fn capturing_at(&self, re: &Regex) -> Option<Captures<'a>> {
        let end = self.match_window(re);
        re.captures(&self.data[self.pos..end])
    }

    fn match_window(&self, re: &Regex) -> usize {
        let end = self.window_end();
        if is_multiline_regex(re.as_str()) {
            end
        } else {
            LinesMetric::next(self.data, self.pos)
                .map(|p| (p - 1).min(end))
                .unwrap_or(end)
        }
    }

    /// Search forward from point to `needle`, bounded by the window end
    /// (or by `bound`, whichever is tighter). Sets point to the end of
    /// the `count`th occurrence found and returns that position.
    pub fn search_forward(
        &mut self,
        needle: &str,
        bound: Option<usize>,
        count: Option<usize>,
    ) -> Option<usize> {
        let count = count.unwrap_or(1);
        let bound = bound
            .unwrap_or_else(|| self.window_end())
            .min(self.window_end());

        let pos = self.pos();
        if bound < pos {
            return None;
        }

        let mut iter = self.data[pos..].match_indices(needle);
        let mut i = 1;
        loop {
            match iter.next() {
                Some(result) => {
                    if result.0 + pos + needle.len() > bound {
                        return None;
                    }
                    if count == i {
                        self.pos = result.0 + pos + needle.len();
                        return Some(self.pos);
                    }
                    i += 1;
                }
                None => return None,
            }
        }
    }

    /// Search forward from point for `re`, bounded by the window end (or
    /// `bound`). Sets point to the end of the match found and returns its
    /// interval, as absolute buffer offsets.
    pub fn re_search_forward(
        &mut self,
        re: &Regex,
        bound: Option<usize>,
    ) -> Option<(usize, usize)> {
        let end = bound
            .unwrap_or_else(|| self.window_end())
            .min(self.window_end());

        if end <= self.pos {
            return None;
        }

        match re.find(&self.data[self.pos..end]) {
            None => None,
            Some(m) => {
                let res = (self.pos + m.start(), self.pos + m.end());
                self.pos += m.end();
                Some(res)
            }
        }
    }
}

/// Checks if a regular expression can match multiple lines.
pub fn is_multiline_regex(regex: &str) -> bool {
    let multiline_indicators = ["\n", "\r", "(?m)", "(?s)"];
    multiline_indicators.iter().any(|&i| regex.contains(i))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn essentials() {
        let input = "1234567890\nЗдравствуйте";
        let mut cursor = Cursor::new(&input, 0);
        cursor.inc(1);
        assert_eq!(1, cursor.pos());
        cursor.inc(1);
        assert_eq!(2, cursor.pos());
        assert_eq!(11, cursor.next::<LinesMetric>().unwrap());
        assert!(cursor.is_boundary::<LinesMetric>());
        cursor.set(12);
        assert!(!cursor.is_boundary::<CharMetric>());
    }

    #[test]
    fn looking_at_empty_line_re() {
        let text = "First line\n   \n\nFourth line";
        let mut cursor = Cursor::new(&text, 0);

        assert!(cursor.looking_at(&*REGEX_EMPTY_LINE).is_none());
        cursor.next::<LinesMetric>();
        assert!(cursor.looking_at(&*REGEX_EMPTY_LINE).is_some());
        cursor.next::<LinesMetric>();
        assert!(cursor.looking_at(&*REGEX_EMPTY_LINE).is_some());
        cursor.next::<LinesMetric>();
        assert!(cursor.looking_at(&*REGEX_EMPTY_LINE).is_none());
    }

    #[test]
    fn skip_whitespaces() {
        let rope = " \n\t\rorg-mode ";
        let mut cursor = Cursor::new(&rope, 0);
        cursor.skip_whitespace();
        assert_eq!(cursor.rest().chars().next().unwrap(), 'o');
    }

    #[test]
    fn line_begin() {
        let rope = "First line\nSecond line\r\nThird line";
        let mut cursor = Cursor::new(&rope, 13);
        assert_eq!(cursor.goto_line_begin(), 11);
        cursor.set(26);
        assert_eq!(cursor.goto_line_begin(), 24);
        assert!(cursor.is_bol());
    }

    #[test]
    fn line_end_position_with_trailing_newline() {
        let text = "First line\nSecond line";
        let mut cursor = Cursor::new(&text, 0);
        assert_eq!(cursor.line_end_position(None), 10);
        assert_eq!(cursor.pos(), 0, "does not move the cursor");
    }

    #[test]
    fn line_end_position_on_last_line_without_trailing_newline() {
        let text = "* Hello";
        let mut cursor = Cursor::new(&text, 2);
        assert_eq!(cursor.line_end_position(None), text.len());
        assert_eq!(cursor.pos(), 2, "does not move the cursor");
    }

    #[test]
    fn narrow_widen_restores_position() {
        let text = "abcdefghij";
        let mut cursor = Cursor::new(&text, 3);
        cursor.narrow(2, 6);
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.window_end(), 6);
        assert_eq!(cursor.rest(), "cdef");
        cursor.set(5);
        cursor.widen(false);
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.window_end(), text.len());
    }

    #[test]
    fn narrow_widen_preserve_position() {
        let text = "abcdefghij";
        let mut cursor = Cursor::new(&text, 0);
        cursor.narrow(2, 6);
        cursor.set(5);
        cursor.widen(true);
        assert_eq!(cursor.pos(), 5);
    }

    #[test]
    fn search_forward() {
        let text = "onetwothreefouronetwothreeonetwothreeonetwothreefouroneabababa";
        let mut cursor = Cursor::new(&text, 0);
        assert_eq!(cursor.search_forward("one", None, Some(2)), Some(18));
        assert_eq!(cursor.search_forward("one", None, None), Some(29));
        cursor.set(0);
        assert_eq!(cursor.search_forward("threeone", Some(10), None), None);
        assert_eq!(cursor.search_forward("two", None, Some(4)), Some(43));
        assert_eq!(cursor.pos(), 43);
    }

    #[test]
    fn skip_chars_forward() {
        let str = "  k\t **hello";
        let mut cursor = Cursor::new(&str, 0);
        assert_eq!(cursor.skip_chars_forward(" ", None), 2);
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.skip_chars_forward(" k\t", None), 3);
    }

    #[test]
    fn skip_chars_backward() {
        let text = "This is some text 123 \t\n\r";
        let mut cursor = Cursor::new(&text, text.len());
        assert_eq!(8, cursor.skip_chars_backward(" \t\n\r123", None));
        assert_eq!(17, cursor.pos());
    }

    #[test]
    fn re_search_forward() {
        let text = "One\nTwo\nThi\nFo4\nFiv\nSix\n7en";
        let mut cursor = Cursor::new(&text, 0);

        let re = Regex::new(r"\d").unwrap();
        assert_eq!(14, cursor.re_search_forward(&re, None).unwrap().0);
        assert_eq!(15, cursor.pos());
        assert_eq!(None, cursor.re_search_forward(&re, Some(10)));
    }
}
