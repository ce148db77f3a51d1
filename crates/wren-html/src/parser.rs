//! Streaming tokenizer and tree builder.
//!
//! The parser reads a character stream one code point at a time. Text between
//! tags is buffered; `<` flushes the buffer as a text node and starts a tag,
//! `>` ends it. Each tag is classified and applied to the stack of open
//! elements straight away, so there is no separate token list.
//!
//! Only a small, fixed set of HTML's tree-construction quirks is applied:
//! implicit `html`/`head`/`body`, auto-closing of `p` and `li`, and
//! self-closing void elements. Malformed markup is never an error.

use std::fmt;

use log::trace;
use strum_macros::{AsRefStr, Display};
use wren_dom::{AttributesMap, ElementData, NodeId, NodeTree, NodeType};

use crate::attributes::parse_attributes;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// `param` is kept for older documents.
const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags that may only appear inside `head`.
const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// [§ 13.1.2.4 Optional tags](https://html.spec.whatwg.org/multipage/syntax.html#optional-tags)
///
/// "A p element's end tag may be omitted if the p element is immediately
/// followed by an address, article, aside, blockquote, details, dialog, div,
/// dl, fieldset, figcaption, figure, footer, form, h1, h2, h3, h4, h5, h6,
/// header, hgroup, hr, main, menu, nav, ol, p, pre, search, section, table,
/// or ul element"
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "search",
    "section",
    "table",
    "ul",
];

fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS.contains(&tag)
}

fn is_head_tag(tag: &str) -> bool {
    HEAD_TAGS.contains(&tag)
}

/// Whether opening `incoming` implicitly closes an open `current` element.
fn auto_closes(current: &str, incoming: &str) -> bool {
    match current {
        "p" => CLOSES_P.contains(&incoming),
        "li" => incoming == "li",
        _ => false,
    }
}

/// What kind of recovery a [`ParseIssue`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// A closing tag arrived with only the root open.
    ExcessClosingTag,
    /// A required ancestor tag was synthesized.
    ImplicitTag,
    /// An open element was closed by the tag that follows it.
    AutoClosed,
    /// Input ended inside `<...`; the partial tag was dropped.
    UnterminatedTag,
}

/// A recoverable problem found while building the tree.
///
/// Parse issues are informational: the tree is always produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What happened.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// Character offset in the input where the triggering tag or text ended.
    pub offset: usize,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.offset, self.message)
    }
}

/// Streaming HTML tree builder.
///
/// # Example
/// ```
/// use wren_html::Parser;
///
/// let tree = Parser::new().run("<p>Hello".chars());
/// let body = tree.body().unwrap();
/// assert_eq!(tree.text_content(body), "Hello");
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    /// Output tree. Nodes are attached to their parent when created.
    tree: NodeTree,

    /// Stack of elements whose closing tag hasn't been seen yet. The
    /// innermost open element is at the end.
    unfinished: Vec<NodeId>,

    /// Recoveries made so far.
    issues: Vec<ParseIssue>,

    /// Characters consumed so far.
    offset: usize,
}

impl Parser {
    /// Create a parser with an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `input` to the end and return the tree.
    #[must_use]
    pub fn run<I: IntoIterator<Item = char>>(self, input: I) -> NodeTree {
        self.run_with_issues(input).0
    }

    /// Consume `input` to the end and return the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues<I: IntoIterator<Item = char>>(
        mut self,
        input: I,
    ) -> (NodeTree, Vec<ParseIssue>) {
        let mut buffer = String::new();
        let mut in_tag = false;

        for c in input {
            self.offset += 1;
            match c {
                '<' => {
                    in_tag = true;
                    self.add_text(&buffer);
                    buffer.clear();
                }
                '>' => {
                    in_tag = false;
                    self.add_tag(&buffer);
                    buffer.clear();
                }
                _ => buffer.push(c),
            }
        }

        if in_tag {
            self.issue(
                IssueKind::UnterminatedTag,
                format!("input ended inside tag <{buffer}"),
            );
        } else {
            self.add_text(&buffer);
        }

        self.finish();
        (self.tree, self.issues)
    }

    fn issue(&mut self, kind: IssueKind, message: String) {
        trace!("{kind}: {message}");
        self.issues.push(ParseIssue {
            kind,
            message,
            offset: self.offset,
        });
    }

    fn current_node(&self) -> Option<NodeId> {
        self.unfinished.last().copied()
    }

    fn open_tag_names(&self) -> Vec<&str> {
        self.unfinished
            .iter()
            .filter_map(|&id| self.tree.tag_name(id))
            .collect()
    }

    /// Append buffered text to the innermost open element. Whitespace-only
    /// text is dropped.
    fn add_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        self.implicit_tags(None);

        let parent = self.current_node();
        let _ = self
            .tree
            .append(parent, NodeType::Text(text.to_string()));
    }

    /// Classify a complete tag body (the text between `<` and `>`).
    fn add_tag(&mut self, body: &str) {
        let body = body.trim_start();
        let (raw_name, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));

        // Comments and doctype. `<>` names nothing.
        if raw_name.is_empty() || raw_name.starts_with('!') {
            return;
        }

        let mut name = raw_name.to_ascii_lowercase();
        // `<br/>` names the same element as `<br>`.
        if name.len() > 1 && !name.starts_with('/') && name.ends_with('/') {
            let _ = name.pop();
        }

        self.implicit_tags(Some(&name));

        if let Some(target) = name.strip_prefix('/') {
            self.close_tag(target);
        } else if is_self_closing(&name) {
            let parent = self.current_node();
            let element = ElementData::new(&name, parse_attributes(rest));
            let _ = self.tree.append(parent, NodeType::Element(element));
        } else {
            self.open_tag(&name, parse_attributes(rest));
        }
    }

    /// Handle `</target>`.
    ///
    /// The innermost open element is popped whatever its name. If the new
    /// innermost element is named `target`, it is popped as well, so both
    /// `<div><span>x</div>` and `<div><div>x</div>` leave both closed.
    fn close_tag(&mut self, target: &str) {
        if self.unfinished.len() < 2 {
            self.issue(
                IssueKind::ExcessClosingTag,
                format!("</{target}> with nothing left to close"),
            );
            return;
        }

        if self.unfinished.pop().is_none() {
            return;
        }

        let parent_matches = self
            .current_node()
            .and_then(|id| self.tree.tag_name(id))
            == Some(target);

        if parent_matches && self.unfinished.len() >= 2 {
            let _ = self.unfinished.pop();
        }
    }

    /// Push a new element, first closing the current one if the new tag
    /// implicitly ends it.
    fn open_tag(&mut self, name: &str, attrs: AttributesMap) {
        if let Some(current) = self.current_node()
            && self.unfinished.len() >= 2
            && self
                .tree
                .tag_name(current)
                .is_some_and(|open| auto_closes(open, name))
        {
            let _ = self.unfinished.pop();
            let closed = self.tree.tag_name(current).unwrap_or_default().to_string();
            self.issue(
                IssueKind::AutoClosed,
                format!("<{name}> closed the open <{closed}>"),
            );
        }

        let parent = self.current_node();
        let element = ElementData::new(name, attrs);
        let id = self.tree.append(parent, NodeType::Element(element));
        self.unfinished.push(id);
    }

    /// Decide which ancestor tag, if any, must be synthesized before `tag`
    /// (or before text, when `tag` is `None`) can be processed.
    fn implicit_tag_for(&self, tag: Option<&str>) -> Option<&'static str> {
        let open = self.open_tag_names();
        match open.as_slice() {
            [] if tag != Some("html") => Some("html"),
            ["html"] if !matches!(tag, Some("head" | "body" | "/html")) => {
                if tag.is_some_and(is_head_tag) {
                    Some("head")
                } else {
                    Some("body")
                }
            }
            ["html", "head"] if tag != Some("/head") && !tag.is_some_and(is_head_tag) => {
                Some("/head")
            }
            _ => None,
        }
    }

    /// Synthesize missing `html`, `head`, `body`, and `</head>` tags until
    /// the open-element stack can accept `tag`.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        while let Some(implicit) = self.implicit_tag_for(tag) {
            self.issue(
                IssueKind::ImplicitTag,
                format!(
                    "inserted <{implicit}> before {}",
                    tag.map_or_else(|| "text".to_string(), |t| format!("<{t}>"))
                ),
            );
            self.add_tag(implicit);
        }
    }

    /// Make sure a root exists and close everything still open.
    fn finish(&mut self) {
        if self.unfinished.is_empty() {
            self.implicit_tags(None);
        }
        self.unfinished.clear();
    }
}

/// Parse a complete document held in memory.
#[must_use]
pub fn parse(html: &str) -> NodeTree {
    Parser::new().run(html.chars())
}

/// Render an indented outline of the subtree at `id`.
///
/// Elements print as `<tag name="value">`; text is quoted, with newlines
/// escaped and spaces shown as `·` so whitespace is visible.
#[must_use]
pub fn format_tree(tree: &NodeTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &NodeTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    match &node.node_type {
        NodeType::Element(data) => {
            out.push_str(&format!("{prefix}{data}\n"));
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            out.push_str(&format!("{prefix}\"{display}\"\n"));
        }
    }
    for &child_id in tree.children(id) {
        write_tree(tree, child_id, indent + 1, out);
    }
}

/// Print the subtree at `id` to stdout. See [`format_tree`].
pub fn print_tree(tree: &NodeTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
