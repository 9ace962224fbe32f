//! Layout blocks: the units the pagination engine places on pages

use crate::document::element::{Attributes, Element, Node};

/// Attribute recording a heading's true nesting depth
pub const ACTUAL_LEVEL_ATTR: &str = "data-actual-level";

/// Attribute marking a block that continues content split from an earlier page
pub const CONTINUATION_ATTR: &str = "data-continued";

/// Minimum tail length (in characters) requested by the engine by default
pub const DEFAULT_MIN_TAIL_LENGTH: usize = 40;

/// A split is rejected when its tail is shorter than this share of the requested minimum
pub const MIN_TAIL_RATIO: f32 = 0.6;

/// Sentence terminals a text block may be cut after, in wide and ASCII forms
const SENTENCE_TERMINALS: [char; 9] = ['。', '．', '！', '？', '；', '.', '!', '?', ';'];

/// The kind of block element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Regular paragraph
    Paragraph,
    /// Heading with its visual tag level (1-6) and true nesting depth
    Heading { level: u8, depth: u32 },
    /// Bulleted or numbered list
    List { ordered: bool },
    /// Preformatted code
    Code,
    /// Block quote
    Quote,
    Table,
    Callout,
    Image,
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Paragraph
    }
}

impl BlockKind {
    /// Heading kind with the visual level clamped to the available tags
    pub fn heading(depth: u32) -> Self {
        let depth = depth.max(1);
        BlockKind::Heading {
            level: depth.min(6) as u8,
            depth,
        }
    }

    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level, .. } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            BlockKind::Code => 0.9,
            _ => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::List { .. } => 0.75,
            BlockKind::Image => 0.5,
            _ => 1.0,
        }
    }

    /// Tag used when this kind is materialized from scratch
    pub fn tag_name(&self) -> String {
        match self {
            BlockKind::Paragraph => "p".to_string(),
            BlockKind::Heading { level, .. } => format!("h{}", level),
            BlockKind::List { ordered: true } => "ol".to_string(),
            BlockKind::List { ordered: false } => "ul".to_string(),
            BlockKind::Code => "pre".to_string(),
            BlockKind::Quote => "blockquote".to_string(),
            BlockKind::Table => "table".to_string(),
            BlockKind::Callout => "div".to_string(),
            BlockKind::Image => "img".to_string(),
        }
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    /// Paragraphs and headings reflow; everything else is atomic
    pub fn is_reflowable(&self) -> bool {
        matches!(self, BlockKind::Paragraph | BlockKind::Heading { .. })
    }
}

/// A block backed by reflowable inline content
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    kind: BlockKind,
    attrs: Attributes,
    inline: Vec<Node>,
}

impl TextBlock {
    pub fn new(kind: BlockKind, attrs: Attributes, inline: Vec<Node>) -> Self {
        Self { kind, attrs, inline }
    }

    /// Plain paragraph holding a single text run
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, Attributes::new(), vec![Node::Text(text.into())])
    }

    /// Heading at the given nesting depth
    pub fn heading(depth: u32, text: impl Into<String>) -> Self {
        Self::new(BlockKind::heading(depth), Attributes::new(), vec![Node::Text(text.into())])
    }

    /// Build from a source element, taking a copy of its attributes and inline children
    pub fn from_element(kind: BlockKind, element: &Element) -> Self {
        Self::new(kind, element.attrs.clone(), element.children.clone())
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Whether this block is the tail of an earlier split
    pub fn is_continuation(&self) -> bool {
        self.attrs.iter().any(|(key, _)| key == CONTINUATION_ATTR)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.inline {
            node.push_text_content(&mut out);
        }
        out
    }

    /// Length of the visible text in characters
    pub fn char_len(&self) -> usize {
        self.text_content().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text_content().chars().all(char::is_whitespace)
    }

    /// Cut this block so that a tail of roughly `min_tail_len` characters is returned.
    ///
    /// The cut lands just after the sentence terminal nearest to
    /// `len - min_tail_len`, searching back to `min_tail_len`; without one the
    /// block is cut at its midpoint. Blocks shorter than `2 * min_tail_len`
    /// are never split, and a tail shorter than `MIN_TAIL_RATIO * min_tail_len`
    /// cancels the split. The tail loses any `id` and is marked with
    /// [`CONTINUATION_ATTR`].
    pub fn split_tail(&mut self, min_tail_len: usize) -> Option<TextBlock> {
        if min_tail_len == 0 {
            return None;
        }
        let chars: Vec<char> = self.text_content().chars().collect();
        let len = chars.len();
        if len < 2 * min_tail_len {
            return None;
        }

        let cut = sentence_cut(&chars, min_tail_len).unwrap_or(len / 2);
        let tail_len = len - cut;
        if cut == 0 || (tail_len as f32) < min_tail_len as f32 * MIN_TAIL_RATIO {
            return None;
        }

        let tail_inline = split_nodes(&mut self.inline, cut);
        let mut tail_attrs = self.attrs.clone();
        tail_attrs.retain(|(key, _)| key != "id");
        let mut tail = TextBlock::new(self.kind, tail_attrs, tail_inline);
        tail.set_attr(CONTINUATION_ATTR, "true");
        Some(tail)
    }

    /// Append another block's content, undoing an earlier split
    pub fn merge_tail(&mut self, other: TextBlock) {
        let mut incoming = other.inline.into_iter().peekable();
        if let Some(Node::Text(last)) = self.inline.last_mut() {
            if let Some(Node::Text(first)) = incoming.next_if(|node| matches!(node, Node::Text(_))) {
                last.push_str(&first);
            }
        }
        self.inline.extend(incoming);
    }

    /// Produce a fresh element for the block's current content
    pub fn materialize(&self) -> Element {
        let mut element = Element::new(self.kind.tag_name());
        element.attrs = self.attrs.clone();
        element.children = self.inline.clone();
        if let BlockKind::Heading { depth, .. } = self.kind {
            element.set_attr(ACTUAL_LEVEL_ATTR, depth.to_string());
        }
        element
    }
}

/// A block backed by non-reflowable content; refuses every split and merge
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicBlock {
    kind: BlockKind,
    element: Element,
}

impl AtomicBlock {
    pub fn new(kind: BlockKind, element: Element) -> Self {
        Self { kind, element }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn is_empty(&self) -> bool {
        self.element.text_content().is_empty()
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.element.set_attr(name, value);
    }

    pub fn materialize(&self) -> Element {
        self.element.clone()
    }
}

/// A unit of layout content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Atomic(AtomicBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text(block) => block.kind(),
            Block::Atomic(block) => block.kind(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Block::Text(block) => block.is_empty(),
            Block::Atomic(block) => block.is_empty(),
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Block::Text(block) => block.text_content(),
            Block::Atomic(block) => block.element().text_content(),
        }
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self {
            Block::Text(block) => block.set_attr(name, value),
            Block::Atomic(block) => block.set_attr(name, value),
        }
    }

    /// Carry attribute changes made to the rendered element back to the block.
    ///
    /// Text blocks pick up the `id`; atomic blocks take the element whole.
    pub fn sync_rendered(&mut self, element: &Element) {
        match self {
            Block::Text(block) => {
                if let Some(id) = element.attr("id") {
                    block.set_attr("id", id);
                }
            }
            Block::Atomic(block) => block.element = element.clone(),
        }
    }

    /// Split off a tail block; atomic blocks always refuse
    pub fn split_tail(&mut self, min_tail_len: usize) -> Option<Block> {
        match self {
            Block::Text(block) => block.split_tail(min_tail_len).map(Block::Text),
            Block::Atomic(_) => None,
        }
    }

    /// Re-attach a tail produced by `split_tail`.
    ///
    /// Only text-to-text merges do anything; tails are always text blocks.
    pub fn merge_tail(&mut self, other: Block) {
        if let (Block::Text(head), Block::Text(tail)) = (self, other) {
            head.merge_tail(tail);
        }
    }

    pub fn materialize(&self) -> Element {
        match self {
            Block::Text(block) => block.materialize(),
            Block::Atomic(block) => block.materialize(),
        }
    }
}

impl From<TextBlock> for Block {
    fn from(block: TextBlock) -> Self {
        Block::Text(block)
    }
}

impl From<AtomicBlock> for Block {
    fn from(block: AtomicBlock) -> Self {
        Block::Atomic(block)
    }
}

fn is_sentence_terminal(c: char) -> bool {
    SENTENCE_TERMINALS.contains(&c)
}

/// Cut position just after the terminal nearest to `len - min_tail_len`
fn sentence_cut(chars: &[char], min_tail_len: usize) -> Option<usize> {
    let start = chars.len().checked_sub(min_tail_len)?;
    if start < min_tail_len {
        return None;
    }
    (min_tail_len..=start)
        .rev()
        .find(|&i| is_sentence_terminal(chars[i]))
        .map(|i| i + 1)
}

/// Split inline nodes at a character offset, returning the tail.
///
/// Elements straddling the offset are duplicated: the head keeps the
/// leading children and the tail gets a shell with the trailing ones.
fn split_nodes(nodes: &mut Vec<Node>, at: usize) -> Vec<Node> {
    let mut start = 0;
    for index in 0..nodes.len() {
        if at <= start {
            return nodes.drain(index..).collect();
        }
        let len = nodes[index].text_content().chars().count();
        if at < start + len {
            let offset = at - start;
            let tail_node = match &mut nodes[index] {
                Node::Text(text) => {
                    let byte = text
                        .char_indices()
                        .nth(offset)
                        .map(|(byte, _)| byte)
                        .unwrap_or(text.len());
                    Node::Text(text.split_off(byte))
                }
                Node::Element(element) => {
                    let mut shell = Element::new(element.tag.clone());
                    shell.attrs = element.attrs.clone();
                    shell.children = split_nodes(&mut element.children, offset);
                    Node::Element(shell)
                }
            };
            let mut tail = vec![tail_node];
            tail.extend(nodes.drain(index + 1..));
            return tail;
        }
        start += len;
    }
    Vec::new()
}
