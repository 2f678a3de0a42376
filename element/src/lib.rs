//! Recursive-descent parser for an outline-oriented lightweight markup
//! format. See [`parse`] for the entry point and [`Syntax`] for the
//! resulting tree shape.

#![allow(dead_code)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate strum_macros;

extern crate regex;
extern crate strum;

mod cursor;
mod data;
mod error;
mod headline;
mod list;
mod objects;
mod paragraph;
mod parser;

pub use data::{
    CheckBox, Handle, HeadlineData, Interval, ItemData, LinkData, PlainListData, Syntax,
    SyntaxNode, SyntaxT,
};
pub use error::ParserBug;
pub use list::ItemDescriptor;
pub use parser::{parse, ParseOptions};
