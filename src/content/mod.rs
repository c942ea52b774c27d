//! Rich-text content: typed blocks, the parser that produces them, and the
//! renderer that turns them into themed markup.
//!
//! Travel descriptions, recommendations, and pros/cons are authored in the
//! product's web editor and stored as HTML fragments. The pipeline is:
//!
//! ```text
//! raw HTML ──parser::parse──▶ Vec<Block> ──render::render_blocks──▶ Markup
//! ```
//!
//! Blocks live only for one render call. The parser never fails: anything it
//! cannot classify becomes a [`Block::Paragraph`] with the literal text.

mod dom;
pub mod parser;
pub mod render;

pub use parser::parse;
pub use render::{render_block, render_blocks};

/// One typed unit of parsed rich text.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
        /// Formatting tree, present only when the paragraph has any.
        inline: Option<Vec<Inline>>,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Quote {
        text: String,
        author: Option<String>,
    },
    Image(ImageRef),
    ImageGallery {
        images: Vec<ImageRef>,
        columns: u8,
    },
    Callout {
        kind: CalloutKind,
        title: Option<String>,
        content: String,
    },
    Code {
        text: String,
        language: Option<String>,
    },
    Table {
        headers: Option<Vec<String>>,
        rows: Vec<Vec<String>>,
    },
    Separator,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            inline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub src: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            caption: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Warning,
    Tip,
    Danger,
}

/// Inline formatting inside a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Underline(Vec<Inline>),
    Strike(Vec<Inline>),
    Code(String),
    Link { href: String, children: Vec<Inline> },
    LineBreak,
}

/// Column count for an image gallery embedded in rich text.
pub fn gallery_columns(count: usize) -> u8 {
    match count {
        0..=4 => 2,
        5..=6 => 3,
        _ => 4,
    }
}
