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

// https://orgmode.org/worg/dev/org-element-api.html
// API page lists LineBreak as element, when both org-syntax page and source code list is as object

use crate::list::ItemDescriptor;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use std::rc::Weak;

/// Reference to a DOM node.
pub type Handle<'a> = Rc<SyntaxNode<'a>>;

/// Weak reference to a DOM node, used for parent pointers.
pub type WeakHandle<'a> = Weak<SyntaxNode<'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

/// ParseTree node.
/// https://orgmode.org/worg/dev/org-element-api.html#attributes
/// Should be bound to the underlying buffer's lifetime
#[derive(Debug)]
pub struct SyntaxNode<'a> {
    /// Parent node.
    pub parent: RefCell<Option<WeakHandle<'a>>>,
    /// Child nodes of this node.
    pub children: RefCell<Vec<Handle<'a>>>,

    pub data: Syntax<'a>,

    /// holds `begin` and `end`
    pub location: Interval,

    /// holds `contents_begin` and `contents_end`
    pub content_location: Option<Interval>,

    /// Holds the number of blank lines, or white spaces, at its end.
    /// As a consequence whitespaces or newlines after an element or object
    /// still belong to it. To put it differently, `location.end` of an
    /// element matches `location.begin` of the following one at the same
    /// level, if any.
    pub post_blank: usize,

    /// Extension point for affiliated keywords (`#+CAPTION:`, `#+NAME:`,
    /// ...). Not parsed by this crate; carried as a placeholder so the
    /// hook is visible on the type.
    pub affiliated: Option<()>,
}

impl<'a> SyntaxNode<'a> {
    pub fn create_root() -> SyntaxNode<'a> {
        SyntaxNode {
            parent: RefCell::new(None),
            children: RefCell::new(vec![]),
            data: Syntax::OrgData,
            location: Interval { start: 0, end: 0 },
            content_location: None,
            post_blank: 0,
            affiliated: None,
        }
    }

    pub fn new(data: Syntax<'a>, location: Interval, content_location: Option<Interval>) -> Handle<'a> {
        Rc::new(SyntaxNode {
            parent: RefCell::new(None),
            children: RefCell::new(vec![]),
            data,
            location,
            content_location,
            post_blank: 0,
            affiliated: None,
        })
    }

    /// Appends a child to the node, setting the child's parent correctly.
    pub fn append_child(self: &Handle<'a>, child: Handle<'a>) {
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));
        self.children.borrow_mut().push(child);
    }

    pub fn with_children(self: Handle<'a>, children: Vec<Handle<'a>>) -> Handle<'a> {
        for child in &children {
            *child.parent.borrow_mut() = Some(Rc::downgrade(&self));
        }
        *self.children.borrow_mut() = children;
        self
    }
}

/// Complete list of syntax entities required by this core.
#[derive(Debug, EnumDiscriminants)]
#[strum_discriminants(name(SyntaxT))]
pub enum Syntax<'a> {
    /// Root of the parse tree.
    OrgData,

    /// Greater element. A run of elements attached to a headline (or the
    /// document root) ending at the next headline or buffer end.
    Section,

    /// Greater element.
    Headline(Box<HeadlineData<'a>>),

    /// Element containing objects.
    Paragraph,

    /// Greater element.
    PlainList(Box<PlainListData<'a>>),

    /// Greater element.
    Item(Box<ItemData<'a>>),

    /// Recursive object.
    Link(Box<LinkData<'a>>),

    /// Special object: a literal span of input text with no further structure.
    PlainText(&'a str),
}

impl SyntaxT {
    #[rustfmt::skip]
    pub fn is_greater_element(self) -> bool {
        use SyntaxT::*;
        matches!(self, Headline | Item | PlainList | Section)
    }

    #[rustfmt::skip]
    pub fn is_element(self) -> bool {
        use SyntaxT::*;
        matches!(self, Headline | Item | Paragraph | PlainList | Section)
    }

    #[rustfmt::skip]
    pub fn is_object(self) -> bool {
        use SyntaxT::*;
        matches!(self, Link | PlainText)
    }

    #[rustfmt::skip]
    pub fn is_recursive_object(self) -> bool {
        self == SyntaxT::Link
    }

    /// Object-restriction table: for a given container type, which object
    /// kinds may appear directly within it.
    ///
    /// Corresponds to `defconst org-element-object-restrictions` in
    /// org-element.el, narrowed to the object kinds this core supports.
    pub fn can_contain(self, that: SyntaxT) -> bool {
        use SyntaxT::*;
        match self {
            Headline | Paragraph => matches!(that, Link | PlainText),
            // Links ignore nested links in their description.
            Link => matches!(that, PlainText),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct HeadlineData<'a> {
    /// Reduced level of the headline (number of leading stars).
    pub level: usize,

    /// Raw headline's text, without the stars (string).
    pub raw_value: Cow<'a, str>,

    /// Parsed headline's text, without the stars (sequence of objects).
    pub title: Vec<Handle<'a>>,
}

#[derive(Debug)]
pub struct PlainListData<'a> {
    /// Column of the first item's bullet.
    pub indent: usize,

    /// Full list's structure, as returned by the list structure scanner.
    pub structure: Rc<Vec<ItemDescriptor<'a>>>,
}

#[derive(Debug)]
pub struct ItemData<'a> {
    /// Column of the item's bullet.
    pub indent: usize,

    /// Item's bullet (e.g. `-`, `+`, `*`, `1.`, `2)`).
    pub bullet: &'a str,

    /// Item's checkbox, if any.
    pub checkbox: Option<CheckBox>,

    /// Full list's structure, shared with the enclosing plain-list and all
    /// its sibling items.
    pub structure: Rc<Vec<ItemDescriptor<'a>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckBox {
    On,
    Off,
    Trans,
}

#[derive(Debug)]
pub struct LinkData<'a> {
    /// Link type, e.g. `http`, `file`, or `fuzzy` when no scheme is present.
    pub link_type: Cow<'a, str>,

    /// Uninterpreted link target, as it appeared in the source.
    pub raw_link: &'a str,
}
