//! Tolerant reader for the editor's rich-text markup.
//!
//! The markup is HTML as produced by a rich-text editor. It is read with
//! `quick-xml` in a forgiving mode and flattened into block-level elements.
//! Nothing here fails: anything the reader can't make sense of is kept as
//! plain text.

use std::borrow::Cow;
use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
        /// Every visible character sits inside `em`/`i` (caption styling).
        emphasized: bool,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    BlockQuote {
        text: String,
        attribution: Option<String>,
    },
    Image {
        src: String,
        caption: Option<String>,
    },
    CodeBlock {
        code: String,
    },
    HorizontalRule,
    /// Text-bearing block with no dedicated handling (tables, details, ...).
    Other {
        text: String,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "template", "noscript"];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "del", "dfn", "em", "i", "ins", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "time", "u",
    "var",
];

/// Parse markup into an ordered list of blocks.
pub fn parse(markup: &str) -> Vec<Block> {
    let tree = build_tree(markup);
    let mut walker = Walker::default();
    walker.walk(&tree);
    walker.flush_run();
    log::trace!("markup produced {} blocks", walker.blocks.len());
    walker.blocks
}

struct Frame {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

fn build_tree(markup: &str) -> Vec<Node> {
    let mut reader = Reader::from_str(markup);
    reader.check_end_names(false);
    reader.trim_text(false);
    reader.expand_empty_elements(false);

    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (name, attrs) = element_parts(&e);
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    push_node(&mut stack, &mut root, element(name, attrs));
                } else {
                    stack.push(Frame {
                        name,
                        attrs,
                        children: Vec::new(),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                let (name, attrs) = element_parts(&e);
                push_node(&mut stack, &mut root, element(name, attrs));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Close everything up to the matching open tag; stray end tags are ignored.
                if let Some(pos) = stack.iter().rposition(|f| f.name == name) {
                    while stack.len() > pos {
                        close_frame(&mut stack, &mut root);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                let text = decode_text(&t);
                if !text.is_empty() {
                    push_node(&mut stack, &mut root, Node::Text(text));
                }
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c).to_string();
                push_node(&mut stack, &mut root, Node::Text(text));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let position = reader.buffer_position().min(markup.len());
                log::warn!("markup error at byte {position}, keeping the rest as text: {e}");
                while !stack.is_empty() {
                    close_frame(&mut stack, &mut root);
                }
                let rest = markup.get(position..).unwrap_or_default();
                let text = strip_tags(rest);
                if !text.trim().is_empty() {
                    root.push(Node::Element {
                        name: "p".to_string(),
                        attrs: Vec::new(),
                        children: vec![Node::Text(text)],
                    });
                }
                return root;
            }
        }
    }

    while !stack.is_empty() {
        close_frame(&mut stack, &mut root);
    }
    root
}

fn element(name: String, attrs: Vec<(String, String)>) -> Node {
    Node::Element {
        name,
        attrs,
        children: Vec::new(),
    }
}

fn push_node(stack: &mut [Frame], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(node),
        None => root.push(node),
    }
}

fn close_frame(stack: &mut Vec<Frame>, root: &mut Vec<Node>) {
    if let Some(frame) = stack.pop() {
        let node = Node::Element {
            name: frame.name,
            attrs: frame.attrs,
            children: frame.children,
        };
        push_node(stack, root, node);
    }
}

fn element_parts(e: &BytesStart) -> (String, Vec<(String, String)>) {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let attrs = e
        .attributes()
        .with_checks(false)
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = match attr.unescape_value() {
                Ok(v) => v.to_string(),
                Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
            };
            (key, value)
        })
        .collect();
    (name, attrs)
}

fn decode_text(t: &BytesText) -> String {
    match t.unescape_with(html_entity) {
        Ok(text) => text.to_string(),
        Err(_) => decode_entities_lossy(&String::from_utf8_lossy(t)),
    }
}

/// Named entities an editor commonly emits beyond the XML five.
fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{00A0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "laquo" => "\u{00AB}",
        "raquo" => "\u{00BB}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "times" => "\u{00D7}",
        "middot" => "\u{00B7}",
        "bull" => "\u{2022}",
        "euro" => "\u{20AC}",
        "pound" => "\u{00A3}",
        "yen" => "\u{00A5}",
        "deg" => "\u{00B0}",
        "shy" => "\u{00AD}",
        _ => return None,
    })
}

/// Best-effort entity decoding for text quick-xml refused to unescape.
/// Unknown entities and bare ampersands stay as they are.
fn decode_entities_lossy(raw: &str) -> String {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY.get_or_init(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
    });
    re.replace_all(raw, |caps: &regex::Captures| {
        let body = &caps[1];
        let decoded: Option<Cow<str>> = if let Some(hex) = body
            .strip_prefix("#x")
            .or_else(|| body.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(|c| Cow::Owned(c.to_string()))
        } else if let Some(dec) = body.strip_prefix('#') {
            dec.parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(|c| Cow::Owned(c.to_string()))
        } else {
            match body {
                "amp" => Some(Cow::Borrowed("&")),
                "lt" => Some(Cow::Borrowed("<")),
                "gt" => Some(Cow::Borrowed(">")),
                "quot" => Some(Cow::Borrowed("\"")),
                "apos" => Some(Cow::Borrowed("'")),
                other => html_entity(other).map(Cow::Borrowed),
            }
        };
        decoded.map_or_else(|| caps[0].to_string(), |d| d.into_owned())
    })
    .into_owned()
}

fn strip_tags(raw: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let re = TAG.get_or_init(|| Regex::new(r"<[^>]*(>|$)").expect("valid tag regex"));
    decode_entities_lossy(&re.replace_all(raw, " "))
}

/// Collapse whitespace runs inside each line and drop blank lines at the edges.
fn normalize(text: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn is_block_element(name: &str) -> bool {
    !INLINE_ELEMENTS.contains(&name) && name != "img"
}

fn contains_block(nodes: &[Node]) -> bool {
    nodes.iter().any(|n| match n {
        Node::Element { name, children, .. } => {
            is_block_element(name) || name == "img" || contains_block(children)
        }
        Node::Text(_) => false,
    })
}

/// Accumulated inline text and how much of it was emphasized.
#[derive(Default)]
struct InlineRun {
    text: String,
    emphasized_chars: usize,
    plain_chars: usize,
}

impl InlineRun {
    fn push_text(&mut self, s: &str, emphasized: bool) {
        let visible = s.chars().filter(|c| !c.is_whitespace()).count();
        if emphasized {
            self.emphasized_chars += visible;
        } else {
            self.plain_chars += visible;
        }
        self.text.push_str(s);
    }

    fn take(&mut self) -> Option<(String, bool)> {
        let text = normalize(&std::mem::take(&mut self.text));
        let emphasized = self.plain_chars == 0 && self.emphasized_chars > 0;
        self.emphasized_chars = 0;
        self.plain_chars = 0;
        if text.is_empty() {
            None
        } else {
            Some((text, emphasized))
        }
    }
}

#[derive(Default)]
struct Walker {
    blocks: Vec<Block>,
    run: InlineRun,
}

impl Walker {
    fn flush_run(&mut self) {
        let mut run = std::mem::take(&mut self.run);
        self.push_paragraph(&mut run);
    }

    fn walk(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Text(t) => self.run.push_text(t, false),
                Node::Element {
                    name,
                    attrs,
                    children,
                } => self.element(name, attrs, children),
            }
        }
    }

    fn element(&mut self, name: &str, attrs: &[(String, String)], children: &[Node]) {
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_run();
                let level = name[1..].parse::<u8>().unwrap_or(1);
                let text = normalize(&plain_text(children));
                if !text.is_empty() {
                    self.blocks.push(Block::Heading { level, text });
                }
                self.hoist_images(children);
            }
            "p" => {
                self.flush_run();
                self.paragraph(children);
            }
            "ul" | "ol" => {
                self.flush_run();
                let mut items = Vec::new();
                collect_list_items(children, &mut items);
                self.blocks.push(Block::List {
                    ordered: name == "ol",
                    items,
                });
                self.hoist_images(children);
            }
            "blockquote" => {
                self.flush_run();
                if let Some(quote) = blockquote(children) {
                    self.blocks.push(quote);
                }
                self.hoist_images(children);
            }
            "img" => {
                self.flush_run();
                if let Some(image) = image(attrs, None) {
                    self.blocks.push(image);
                }
            }
            "figure" => {
                self.flush_run();
                self.figure(children);
            }
            "hr" => {
                self.flush_run();
                self.blocks.push(Block::HorizontalRule);
            }
            "pre" => {
                self.flush_run();
                let code = raw_text(children);
                let code = code.trim_matches('\n').to_string();
                if !code.trim().is_empty() {
                    self.blocks.push(Block::CodeBlock { code });
                }
            }
            "table" | "dl" | "details" => {
                self.flush_run();
                let text = normalize(&plain_text(children));
                if !text.is_empty() {
                    self.blocks.push(Block::Other { text });
                }
                self.hoist_images(children);
            }
            _ if INLINE_ELEMENTS.contains(&name) && !contains_block(children) => {
                inline_into(&mut self.run, name, children, false);
            }
            // Containers (div, section, body, ...) and unknown elements.
            _ => {
                if contains_block(children) {
                    self.flush_run();
                    self.walk(children);
                    self.flush_run();
                } else {
                    self.flush_run();
                    let mut run = InlineRun::default();
                    inline_children(&mut run, children, false);
                    if let Some((text, emphasized)) = run.take() {
                        self.blocks.push(Block::Paragraph { text, emphasized });
                    }
                }
            }
        }
    }

    fn push_paragraph(&mut self, run: &mut InlineRun) {
        if let Some((text, emphasized)) = run.take() {
            self.blocks.push(Block::Paragraph { text, emphasized });
        }
    }

    /// A paragraph may carry images, possibly wrapped in links or other
    /// inline elements; split it around them so each image becomes its own
    /// block in source order.
    fn paragraph(&mut self, children: &[Node]) {
        let mut run = InlineRun::default();
        self.paragraph_inline(&mut run, children, false);
        self.push_paragraph(&mut run);
    }

    fn paragraph_inline(&mut self, run: &mut InlineRun, nodes: &[Node], emphasized: bool) {
        for node in nodes {
            match node {
                Node::Text(t) => run.push_text(t, emphasized),
                Node::Element { name, attrs, .. } if name == "img" => {
                    self.push_paragraph(run);
                    if let Some(image) = image(attrs, None) {
                        self.blocks.push(image);
                    }
                }
                Node::Element { name, children, .. } if find_img(children).is_some() => {
                    if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                        continue;
                    }
                    let emphasized = emphasized || name == "em" || name == "i";
                    self.paragraph_inline(run, children, emphasized);
                }
                Node::Element { name, children, .. } => {
                    inline_into(run, name, children, emphasized);
                }
            }
        }
    }

    /// Images below a block whose text was read separately (headings, list
    /// items, quotes, tables) follow that block in source order.
    fn hoist_images(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::Element {
                name,
                attrs,
                children,
            } = node
            {
                if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if name == "img" {
                    if let Some(image) = image(attrs, None) {
                        self.blocks.push(image);
                    }
                } else {
                    self.hoist_images(children);
                }
            }
        }
    }

    fn figure(&mut self, children: &[Node]) {
        let caption = find_element(children, "figcaption")
            .map(|c| normalize(&plain_text(c)))
            .filter(|c| !c.is_empty());
        match find_img(children) {
            Some(attrs) => {
                if let Some(image) = image(attrs, caption) {
                    self.blocks.push(image);
                }
            }
            None => {
                if let Some(text) = caption {
                    self.blocks.push(Block::Paragraph {
                        text,
                        emphasized: true,
                    });
                }
            }
        }
    }
}

fn image(attrs: &[(String, String)], caption: Option<String>) -> Option<Block> {
    let src = attr(attrs, "src")?.trim();
    if src.is_empty() {
        return None;
    }
    Some(Block::Image {
        src: src.to_string(),
        caption,
    })
}

fn find_element<'a>(nodes: &'a [Node], wanted: &str) -> Option<&'a [Node]> {
    nodes.iter().find_map(|n| match n {
        Node::Element { name, children, .. } if name == wanted => Some(children.as_slice()),
        Node::Element { children, .. } => find_element(children, wanted),
        Node::Text(_) => None,
    })
}

fn find_img(nodes: &[Node]) -> Option<&[(String, String)]> {
    nodes.iter().find_map(|n| match n {
        Node::Element { name, attrs, .. } if name == "img" => Some(attrs.as_slice()),
        Node::Element { children, .. } => find_img(children),
        Node::Text(_) => None,
    })
}

fn inline_into(run: &mut InlineRun, name: &str, children: &[Node], emphasized: bool) {
    match name {
        "br" => run.push_text("\n", emphasized),
        "em" | "i" => inline_children(run, children, true),
        _ => inline_children(run, children, emphasized),
    }
}

fn inline_children(run: &mut InlineRun, nodes: &[Node], emphasized: bool) {
    for node in nodes {
        match node {
            Node::Text(t) => run.push_text(t, emphasized),
            Node::Element { name, children, .. } => {
                if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if is_block_element(name) && name != "br" {
                    // Block nested where inline content was expected: keep it as a line.
                    run.push_text("\n", emphasized);
                    inline_children(run, children, emphasized);
                    run.push_text("\n", emphasized);
                } else {
                    inline_into(run, name, children, emphasized);
                }
            }
        }
    }
}

fn plain_text(nodes: &[Node]) -> String {
    let mut run = InlineRun::default();
    inline_children(&mut run, nodes, false);
    run.text
}

/// Text with whitespace preserved (for `pre`).
fn raw_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element { name, children, .. } => {
                if name == "br" {
                    out.push('\n');
                } else {
                    out.push_str(&raw_text(children));
                }
            }
        }
    }
    out
}

fn collect_list_items(nodes: &[Node], items: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Element { name, children, .. } if name == "li" => {
                let mut run = InlineRun::default();
                let mut nested: Vec<&[Node]> = Vec::new();
                for child in children {
                    match child {
                        Node::Element { name, children, .. } if name == "ul" || name == "ol" => {
                            nested.push(children)
                        }
                        Node::Element { name, children, .. } => {
                            if is_block_element(name) {
                                run.push_text(" ", false);
                            }
                            inline_into(&mut run, name, children, false);
                        }
                        Node::Text(t) => run.push_text(t, false),
                    }
                }
                if let Some((text, _)) = run.take() {
                    items.push(text.replace('\n', " "));
                }
                for list in nested {
                    collect_list_items(list, items);
                }
            }
            Node::Element { children, .. } => collect_list_items(children, items),
            // Stray text directly inside a list still counts as an entry.
            Node::Text(t) => {
                let text = normalize(t);
                if !text.is_empty() {
                    items.push(text.replace('\n', " "));
                }
            }
        }
    }
}

fn blockquote(children: &[Node]) -> Option<Block> {
    let mut attribution = find_element(children, "cite")
        .or_else(|| find_element(children, "footer"))
        .map(|c| normalize(&plain_text(c)))
        .filter(|c| !c.is_empty());

    let mut run = InlineRun::default();
    for node in children {
        match node {
            Node::Element { name, .. }
                if (name == "cite" || name == "footer") && attribution.is_some() => {}
            Node::Element { name, children, .. } => {
                if is_block_element(name) {
                    run.push_text("\n", false);
                    inline_children(&mut run, children, false);
                    run.push_text("\n", false);
                } else {
                    inline_into(&mut run, name, children, false);
                }
            }
            Node::Text(t) => run.push_text(t, false),
        }
    }
    let text = run.take().map(|(t, _)| t).unwrap_or_default();
    let mut lines: Vec<String> = text
        .lines()
        .map(str::to_string)
        .filter(|l| !l.is_empty())
        .collect();

    if attribution.is_none() && lines.len() > 1 {
        if let Some(cited) = lines.last().and_then(|l| citation(l)) {
            attribution = Some(cited);
            lines.pop();
        }
    }

    let text = lines.join("\n");
    if text.is_empty() {
        return attribution.map(|text| Block::Paragraph {
            text,
            emphasized: false,
        });
    }
    Some(Block::BlockQuote {
        text,
        attribution: attribution.map(|a| citation(&a).unwrap_or(a)),
    })
}

/// A citation line: leading dash or tilde followed by a name.
fn citation(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let rest = ["\u{2014}", "\u{2013}", "---", "--", "~", "-"]
        .iter()
        .find_map(|p| trimmed.strip_prefix(p))?;
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
            emphasized: false,
        }
    }

    #[test]
    fn test_simple_paragraphs() {
        let blocks = parse("<p>Hello world</p><p>Second   line</p>");
        assert_eq!(blocks, vec![para("Hello world"), para("Second line")]);
    }

    #[test]
    fn test_bare_text_becomes_paragraph() {
        assert_eq!(parse("Just text"), vec![para("Just text")]);
    }

    #[test]
    fn test_empty_markup() {
        assert!(parse("").is_empty());
        assert!(parse("<p></p><p>   </p>").is_empty());
    }

    #[test]
    fn test_headings_and_lists() {
        let blocks =
            parse("<h2>Plan</h2><ul><li><p>One</p></li><li>Two</li></ul><ol><li>A</li></ol>");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "Plan".to_string()
                },
                Block::List {
                    ordered: false,
                    items: vec!["One".to_string(), "Two".to_string()]
                },
                Block::List {
                    ordered: true,
                    items: vec!["A".to_string()]
                },
            ]
        );
    }

    #[test]
    fn test_nested_list_is_flattened_in_order() {
        let blocks = parse("<ul><li>Top<ul><li>Inner</li></ul></li><li>Next</li></ul>");
        assert_eq!(
            blocks,
            vec![Block::List {
                ordered: false,
                items: vec!["Top".to_string(), "Inner".to_string(), "Next".to_string()]
            }]
        );
    }

    #[test]
    fn test_void_elements_without_self_closing() {
        let blocks = parse(r#"<p>Line one<br>Line two</p><img src="a.png" alt="A"><p>After</p>"#);
        assert_eq!(
            blocks,
            vec![
                para("Line one\nLine two"),
                Block::Image {
                    src: "a.png".to_string(),
                    caption: None
                },
                para("After"),
            ]
        );
    }

    #[test]
    fn test_image_inside_paragraph_splits_it() {
        let blocks = parse(r#"<p>Before <img src="x.jpg"/> after</p>"#);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Image { .. }));
    }

    #[test]
    fn test_linked_image_inside_paragraph() {
        let blocks = parse(r#"<p>See <a href="https://x"><img src="a.jpg"></a> here</p>"#);
        assert_eq!(
            blocks,
            vec![
                para("See"),
                Block::Image {
                    src: "a.jpg".to_string(),
                    caption: None
                },
                para("here"),
            ]
        );
    }

    #[test]
    fn test_images_nested_in_blocks_are_kept() {
        let img = |src: &str| Block::Image {
            src: src.to_string(),
            caption: None,
        };
        assert_eq!(
            parse(r#"<p><strong><img src="a.jpg"></strong></p>"#),
            vec![img("a.jpg")]
        );
        assert_eq!(
            parse(r#"<h2>Coast <img src="a.jpg"></h2>"#),
            vec![
                Block::Heading {
                    level: 2,
                    text: "Coast".to_string()
                },
                img("a.jpg"),
            ]
        );
        assert_eq!(
            parse(r#"<ul><li><img src="a.jpg"></li><li>Two <a><img src="b.jpg"></a></li></ul>"#),
            vec![
                Block::List {
                    ordered: false,
                    items: vec!["Two".to_string()]
                },
                img("a.jpg"),
                img("b.jpg"),
            ]
        );
        assert_eq!(
            parse(r#"<blockquote>Wow<img src="q.jpg"></blockquote>"#)[1],
            img("q.jpg")
        );
    }

    #[test]
    fn test_figure_caption() {
        let blocks =
            parse(r#"<figure><img src="x.jpg" alt=""/><figcaption>The view</figcaption></figure>"#);
        assert_eq!(
            blocks,
            vec![Block::Image {
                src: "x.jpg".to_string(),
                caption: Some("The view".to_string())
            }]
        );
    }

    #[test]
    fn test_emphasized_paragraph() {
        let blocks = parse("<p><em>Photo by me</em></p><p><em>Half</em> plain</p>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    text: "Photo by me".to_string(),
                    emphasized: true
                },
                para("Half plain"),
            ]
        );
    }

    #[test]
    fn test_blockquote_with_trailing_citation() {
        let blocks = parse("<blockquote><p>Stay hungry.</p><p>\u{2014} Steve</p></blockquote>");
        assert_eq!(
            blocks,
            vec![Block::BlockQuote {
                text: "Stay hungry.".to_string(),
                attribution: Some("Steve".to_string())
            }]
        );
    }

    #[test]
    fn test_blockquote_with_cite_element() {
        let blocks = parse("<blockquote><p>Less is more.</p><cite>Mies</cite></blockquote>");
        assert_eq!(
            blocks,
            vec![Block::BlockQuote {
                text: "Less is more.".to_string(),
                attribution: Some("Mies".to_string())
            }]
        );
    }

    #[test]
    fn test_single_line_quote_keeps_dash() {
        let blocks = parse("<blockquote>- not a citation</blockquote>");
        assert!(matches!(&blocks[0], Block::BlockQuote { attribution: None, .. }));
    }

    #[test]
    fn test_html_entities() {
        let blocks = parse("<p>Tea&nbsp;time &mdash; &amp; cake &#39;n&#x27; more</p>");
        // The non-breaking space is whitespace and collapses like any other.
        assert_eq!(blocks, vec![para("Tea time \u{2014} & cake 'n' more")]);
    }

    #[test]
    fn test_bare_ampersand_is_kept() {
        let blocks = parse("<p>Tom & Jerry</p>");
        assert_eq!(blocks, vec![para("Tom & Jerry")]);
    }

    #[test]
    fn test_unclosed_tags_do_not_lose_text() {
        let blocks = parse("<p>Open paragraph <strong>bold");
        assert_eq!(blocks, vec![para("Open paragraph bold")]);
    }

    #[test]
    fn test_stray_end_tags_are_ignored() {
        let blocks = parse("</div><p>Fine</p></span>");
        assert_eq!(blocks, vec![para("Fine")]);
    }

    #[test]
    fn test_broken_tag_falls_back_to_text() {
        let blocks = parse("<p>Intact</p><p>Broken <b");
        assert_eq!(blocks.first(), Some(&para("Intact")));
        let all_text: String = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ");
        assert!(all_text.contains("Broken"), "got {blocks:?}");
    }

    #[test]
    fn test_scripts_are_skipped() {
        assert_eq!(parse("<script>alert(1)</script><p>Ok</p>"), vec![para("Ok")]);
    }

    #[test]
    fn test_containers_are_transparent() {
        let blocks = parse("<div><section><h1>T</h1><p>Body</p></section></div>");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn test_pre_keeps_whitespace() {
        let blocks = parse("<pre><code>fn main() {\n    run();\n}</code></pre>");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                code: "fn main() {\n    run();\n}".to_string()
            }]
        );
    }

    #[test]
    fn test_table_becomes_other() {
        let blocks = parse("<table><tr><td>a</td><td>b</td></tr></table>");
        assert!(matches!(blocks[0], Block::Other { .. }));
    }

    #[test]
    fn test_citation_prefixes() {
        assert_eq!(citation("-- Ada"), Some("Ada".to_string()));
        assert_eq!(citation("~ Ada"), Some("Ada".to_string()));
        assert_eq!(citation("\u{2013}Ada"), Some("Ada".to_string()));
        assert_eq!(citation("Ada"), None);
        assert_eq!(citation("--"), None);
    }
}
