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

//! Internal invariant violations. These never occur on valid input; when
//! they do, they indicate a bug in the parser and are surfaced as panics,
//! not as values the caller can recover from.

const DUMP_LIMIT: usize = 80;

/// A parser-internal invariant violation.
///
/// This is never returned from [`crate::parser::parse`] - malformed
/// documents are absorbed by the paragraph fallback (see `error_handling`
/// in the crate docs). A `ParserBug` means the parser itself broke one of
/// its own guarantees.
#[derive(Debug, thiserror::Error)]
pub enum ParserBug {
    #[error("no progress at offset {offset}: {remaining}")]
    NoProgress { offset: usize, remaining: String },

    #[error("list structure has no entry starting at offset {offset}: {remaining}")]
    MissingStructureEntry { offset: usize, remaining: String },

    #[error("item line matched at offset {offset} but the full item pattern did not: {remaining}")]
    MalformedItemLine { offset: usize, remaining: String },
}

/// Truncates `s` to at most [`DUMP_LIMIT`] bytes on a char boundary, for
/// inclusion in a diagnostic.
pub(crate) fn dump(s: &str) -> String {
    if s.len() <= DUMP_LIMIT {
        return s.to_owned();
    }
    let mut end = DUMP_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Logs `$bug` at `error!` and panics with it. Used at the few sites where
/// the parser has detected that one of its own invariants broke.
macro_rules! bug {
    ($bug:expr) => {{
        let bug = $bug;
        log::error!("{}", bug);
        panic!("{}", bug);
    }};
}

pub(crate) use bug;
