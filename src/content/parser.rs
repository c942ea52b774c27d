//! Rich-text parser: HTML fragment in, ordered [`Block`]s out.
//!
//! The parser is total. It never panics and never reports an error; input it
//! cannot classify degrades to paragraphs holding the literal text.
//!
//! ## Element Mapping
//!
//! | Source | Block |
//! |---|---|
//! | `h1`–`h6` | [`Block::Heading`] |
//! | `p` | [`Block::Paragraph`] (or a callout when classed), followed by any images it holds |
//! | `ul`, `ol` | [`Block::List`] |
//! | `blockquote` | [`Block::Quote`], author from `cite` / `footer` |
//! | `img` | [`Block::Image`] |
//! | `figure` | [`Block::Image`] with `figcaption`, or [`Block::ImageGallery`] |
//! | `div`, `section`, ... | callout, gallery, paragraph, or recurse |
//! | `hr` | [`Block::Separator`] |
//! | `pre`, `code` | [`Block::Code`] |
//! | `table` | [`Block::Table`] |
//! | loose text and inline elements | one [`Block::Paragraph`] per run |
//!
//! Callouts are recognized by class name (English or Russian):
//! `tip`/`совет`/`лайфхак`, `warning`/`предупреждение`/`важно`,
//! `danger`/`опасность`, `info`/`информация`.
//!
//! Input without any `<` is plain text: blank lines separate paragraphs and
//! each paragraph keeps its trimmed text verbatim. Markup that yields no
//! block at all (`<foo>`, `<br>`, a bare `<img>`) becomes one paragraph with
//! the trimmed input; only comment-only input yields nothing.
//!
//! Adjacent paragraphs stay separate blocks. Each keeps its own inline
//! formatting, and the drop cap applies to the first one only.

use super::dom;
use super::{Block, CalloutKind, ImageRef, Inline, gallery_columns};
use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;
use std::sync::LazyLock;

/// Component tags from the mobile editor that sometimes leak into content.
static FRAMEWORK_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"</?(?:View|Text|ScrollView|Image|TouchableOpacity|TouchableHighlight|SafeAreaView|ActivityIndicator)\b[^>]*>",
    )
    .expect("framework tag pattern is valid")
});

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("blank line pattern is valid"));

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "data", "del", "dfn", "em", "font", "i", "ins",
    "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup",
    "time", "u", "var", "wbr",
];

const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "aside", "main", "header", "footer", "center", "details", "nav",
];

const IGNORED_TAGS: &[&str] = &[
    "script", "style", "template", "noscript", "head", "meta", "link", "title", "iframe", "object",
    "embed", "video", "audio", "svg", "canvas", "form", "input", "button", "select", "textarea",
];

const CALLOUT_MARKERS: &[(CalloutKind, &[&str])] = &[
    (CalloutKind::Tip, &["tip", "совет", "лайфхак"]),
    (CalloutKind::Warning, &["warning", "предупреждение", "важно"]),
    (CalloutKind::Danger, &["danger", "опасность"]),
    (CalloutKind::Info, &["info", "информация"]),
];

/// Parse one rich-text field into blocks.
pub fn parse(raw: &str) -> Vec<Block> {
    let cleaned = FRAMEWORK_TAGS.replace_all(raw, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if !trimmed.contains('<') {
        return parse_plain(trimmed);
    }

    let document = dom::parse_fragment(trimmed);
    let Some(body) = dom::find_first_element(&document.document, "body") else {
        return vec![Block::paragraph(trimmed)];
    };

    let mut walker = Walker::default();
    walker.walk_children(&body);
    let blocks = walker.finish();

    if blocks.is_empty() && !is_comment_only(&body) {
        log::debug!("no structure recognized, keeping literal text");
        return vec![Block::paragraph(trimmed)];
    }
    blocks
}

fn parse_plain(text: &str) -> Vec<Block> {
    BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(Block::paragraph)
        .collect()
}

/// Only comments and whitespace, e.g. `<!-- draft -->`.
fn is_comment_only(body: &Handle) -> bool {
    let children = body.children.borrow();
    let mut comments = false;
    for child in children.iter() {
        match child.data {
            NodeData::Comment { .. } => comments = true,
            NodeData::Text { ref contents } if contents.borrow().trim().is_empty() => {}
            _ => return false,
        }
    }
    comments
}

// ============================================================================
// Text helpers
// ============================================================================

fn visible(c: char) -> char {
    match c {
        '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{00A0}' => ' ',
        other => other,
    }
}

/// Collapse whitespace runs (including invisible characters) to one space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars().map(visible) {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn normalize_text(text: &str) -> String {
    collapse_whitespace(text).trim().to_string()
}

fn text_of(node: &Handle) -> String {
    normalize_text(&dom::get_text_content(node))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// Inline content
// ============================================================================

fn inline_children(node: &Handle) -> Vec<Inline> {
    dom::children(node).iter().flat_map(inline_node).collect()
}

fn inline_node(node: &Handle) -> Vec<Inline> {
    if let Some(text) = dom::text_of_node(node) {
        let text = collapse_whitespace(&text);
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::Text(text)]
        };
    }
    let Some(tag) = dom::element_name(node) else {
        return Vec::new();
    };
    let wrap = |make: fn(Vec<Inline>) -> Inline| {
        let children = inline_children(node);
        if children.is_empty() {
            Vec::new()
        } else {
            vec![make(children)]
        }
    };
    match tag.as_str() {
        "strong" | "b" => wrap(Inline::Strong),
        "em" | "i" => wrap(Inline::Emphasis),
        "u" | "ins" => wrap(Inline::Underline),
        "s" | "strike" | "del" => wrap(Inline::Strike),
        "code" | "kbd" | "samp" => non_empty(text_of(node))
            .map(|code| vec![Inline::Code(code)])
            .unwrap_or_default(),
        "a" => {
            let children = inline_children(node);
            match dom::get_attribute(node, "href").map(|h| h.trim().to_string()) {
                Some(href) if is_safe_href(&href) && !children.is_empty() => {
                    vec![Inline::Link { href, children }]
                }
                _ => children,
            }
        }
        "br" => vec![Inline::LineBreak],
        "img" => Vec::new(),
        t if IGNORED_TAGS.contains(&t) => Vec::new(),
        _ => inline_children(node),
    }
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

fn plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Underline(children)
            | Inline::Strike(children) => plain_text(children, out),
            Inline::Link { children, .. } => plain_text(children, out),
            Inline::LineBreak => out.push(' '),
        }
    }
}

fn trim_inlines(mut inlines: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(first)) = inlines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        *last = last.trim_end().to_string();
    }
    while matches!(inlines.last(), Some(Inline::LineBreak)) {
        inlines.pop();
    }
    inlines.retain(|inline| !matches!(inline, Inline::Text(t) if t.is_empty()));
    inlines
}

fn paragraph_from_inlines(inlines: Vec<Inline>) -> Option<Block> {
    let mut text = String::new();
    plain_text(&inlines, &mut text);
    let text = non_empty(normalize_text(&text))?;
    let formatted = inlines.iter().any(|inline| !matches!(inline, Inline::Text(_)));
    Some(Block::Paragraph {
        text,
        inline: formatted.then(|| trim_inlines(inlines)),
    })
}

// ============================================================================
// Block walker
// ============================================================================

#[derive(Default)]
struct Walker {
    blocks: Vec<Block>,
    /// Loose inline content waiting to become a paragraph.
    pending: Vec<Inline>,
}

impl Walker {
    fn walk_children(&mut self, node: &Handle) {
        for child in dom::children(node) {
            self.visit(&child);
        }
    }

    fn visit(&mut self, node: &Handle) {
        if dom::text_of_node(node).is_some() {
            self.pending.extend(inline_node(node));
            return;
        }
        let Some(tag) = dom::element_name(node) else {
            return;
        };
        if INLINE_TAGS.contains(&tag.as_str()) {
            self.pending.extend(inline_node(node));
            return;
        }
        self.flush();
        self.block_element(node, &tag);
    }

    fn flush(&mut self) {
        let inlines = std::mem::take(&mut self.pending);
        if let Some(block) = paragraph_from_inlines(inlines) {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn block_element(&mut self, node: &Handle, tag: &str) {
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().unwrap_or(2);
                if let Some(text) = non_empty(text_of(node)) {
                    self.blocks.push(Block::Heading { level, text });
                }
            }
            "p" => match callout_kind(node) {
                Some(kind) => self.callout(node, kind),
                None => self.paragraph_element(node),
            },
            "ul" | "ol" => self.list(node, tag == "ol"),
            "blockquote" => self.quote(node),
            "img" => {
                if let Some(image) = image_ref(node) {
                    self.blocks.push(Block::Image(image));
                }
            }
            "figure" => self.figure(node),
            "hr" => self.blocks.push(Block::Separator),
            "pre" | "code" => self.code(node),
            "table" => self.table(node),
            t if CONTAINER_TAGS.contains(&t) => self.container(node),
            t if IGNORED_TAGS.contains(&t) => {}
            _ => {
                if let Some(text) = non_empty(text_of(node)) {
                    self.blocks.push(Block::paragraph(text));
                }
            }
        }
    }

    /// A paragraph-like element: its text, then any images it holds.
    fn paragraph_element(&mut self, node: &Handle) {
        if let Some(block) = paragraph_from_inlines(inline_children(node)) {
            self.blocks.push(block);
        }
        let images: Vec<ImageRef> = dom::find_descendants(node, "img")
            .iter()
            .filter_map(image_ref)
            .collect();
        self.push_images(images);
    }

    fn push_images(&mut self, mut images: Vec<ImageRef>) {
        match images.len() {
            0 => {}
            1 => self.blocks.extend(images.pop().map(Block::Image)),
            n => self.blocks.push(Block::ImageGallery {
                images,
                columns: gallery_columns(n),
            }),
        }
    }

    fn container(&mut self, node: &Handle) {
        if let Some(kind) = callout_kind(node) {
            self.callout(node, kind);
            return;
        }
        let images = dom::find_descendants(node, "img");
        if images.len() > 1 && text_of(node).is_empty() {
            let images = images.iter().filter_map(image_ref).collect();
            self.push_images(images);
        } else if !has_block_child(node) {
            self.paragraph_element(node);
        } else {
            self.walk_children(node);
            self.flush();
        }
    }

    fn callout(&mut self, node: &Handle, kind: CalloutKind) {
        let title = find_title(node).and_then(|t| non_empty(text_of(&t)));
        let mut content = text_of(node);
        if let Some(rest) = title.as_deref().and_then(|t| content.strip_prefix(t)) {
            content = rest.trim().to_string();
        }
        if content.is_empty() && title.is_none() {
            return;
        }
        self.blocks.push(Block::Callout {
            kind,
            title,
            content,
        });
    }

    fn list(&mut self, node: &Handle, ordered: bool) {
        let items: Vec<String> = dom::children(node)
            .iter()
            .filter(|child| dom::element_name(child).as_deref() == Some("li"))
            .filter_map(|li| non_empty(text_of(li)))
            .collect();
        if !items.is_empty() {
            self.blocks.push(Block::List { ordered, items });
        }
    }

    fn quote(&mut self, node: &Handle) {
        let author = dom::find_first_element(node, "cite")
            .or_else(|| dom::find_first_element(node, "footer"))
            .map(|a| text_of(&a).trim_start_matches(['—', '–', '-', ' ']).to_string())
            .and_then(non_empty);
        let text = normalize_text(&dom::get_text_excluding(node, &["cite", "footer"]));
        match (non_empty(text), author) {
            (Some(text), author) => self.blocks.push(Block::Quote { text, author }),
            (None, Some(author)) => self.blocks.push(Block::Quote {
                text: author,
                author: None,
            }),
            (None, None) => {}
        }
    }

    fn figure(&mut self, node: &Handle) {
        let mut images: Vec<ImageRef> = dom::find_descendants(node, "img")
            .iter()
            .filter_map(image_ref)
            .collect();
        let caption = dom::find_first_element(node, "figcaption")
            .map(|c| text_of(&c))
            .and_then(non_empty);
        match images.len() {
            0 => {
                if let Some(text) = non_empty(text_of(node)) {
                    self.blocks.push(Block::paragraph(text));
                }
            }
            1 => {
                if let Some(mut image) = images.pop() {
                    image.caption = caption;
                    self.blocks.push(Block::Image(image));
                }
            }
            _ => self.push_images(images),
        }
    }

    fn code(&mut self, node: &Handle) {
        let raw = dom::get_text_content(node);
        let text = raw.trim_matches('\n').trim_end().to_string();
        if text.trim().is_empty() {
            return;
        }
        let language = code_language(node).or_else(|| {
            dom::find_first_element(node, "code")
                .filter(|code| !std::rc::Rc::ptr_eq(code, node))
                .and_then(|code| code_language(&code))
        });
        self.blocks.push(Block::Code { text, language });
    }

    fn table(&mut self, node: &Handle) {
        let mut rows: Vec<(bool, Vec<String>)> = dom::find_descendants(node, "tr")
            .iter()
            .map(|tr| {
                let cells: Vec<Handle> = dom::children(tr)
                    .into_iter()
                    .filter(|cell| matches!(dom::element_name(cell).as_deref(), Some("td" | "th")))
                    .collect();
                let all_th = !cells.is_empty()
                    && cells
                        .iter()
                        .all(|cell| dom::element_name(cell).as_deref() == Some("th"));
                (all_th, cells.iter().map(text_of).collect())
            })
            .collect();

        let headers = match rows.first() {
            Some((true, _)) => Some(rows.remove(0).1),
            _ => None,
        };
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|(_, cells)| cells)
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .collect();
        if headers.is_none() && rows.is_empty() {
            return;
        }
        self.blocks.push(Block::Table { headers, rows });
    }
}

fn has_block_child(node: &Handle) -> bool {
    dom::children(node).iter().any(|child| {
        dom::element_name(child)
            .is_some_and(|tag| !INLINE_TAGS.contains(&tag.as_str()) && tag != "img")
    })
}

fn callout_kind(node: &Handle) -> Option<CalloutKind> {
    let classes = dom::class_list(node);
    if classes.is_empty() {
        return None;
    }
    CALLOUT_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| classes.contains(m)))
        .map(|(kind, _)| *kind)
}

/// First `strong`/`b`/heading or `.title`/`.heading` element, document order.
fn find_title(node: &Handle) -> Option<Handle> {
    for child in dom::children(node) {
        if let Some(tag) = dom::element_name(&child) {
            let classes = dom::class_list(&child);
            let is_title = matches!(
                tag.as_str(),
                "strong" | "b" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ) || classes.contains("title")
                || classes.contains("heading");
            if is_title {
                return Some(child);
            }
            if let Some(found) = find_title(&child) {
                return Some(found);
            }
        }
    }
    None
}

fn image_ref(node: &Handle) -> Option<ImageRef> {
    let src = dom::get_attribute(node, "src")
        .or_else(|| dom::get_attribute(node, "data-src"))
        .map(|s| s.trim().to_string())
        .and_then(non_empty)?;
    Some(ImageRef {
        src,
        alt: dom::get_attribute(node, "alt")
            .map(|a| normalize_text(&a))
            .and_then(non_empty),
        caption: None,
        width: dimension(node, "width"),
        height: dimension(node, "height"),
    })
}

fn dimension(node: &Handle, attr: &str) -> Option<u32> {
    let raw = dom::get_attribute(node, attr)?;
    raw.trim().trim_end_matches("px").parse().ok()
}

fn code_language(node: &Handle) -> Option<String> {
    dom::class_list(node).split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}
