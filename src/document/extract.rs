//! Block extraction: flatten a rendered content container into layout blocks

use crate::document::block::{AtomicBlock, Block, BlockKind, TextBlock, ACTUAL_LEVEL_ATTR};
use crate::document::element::{Element, Node};

/// Options controlling extraction
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Drop paragraphs and headings whose text is only whitespace
    pub prune_empty_text: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            prune_empty_text: true,
        }
    }
}

/// Extract blocks from `container` in document order
pub fn extract_blocks(container: &Element, options: ExtractOptions) -> Vec<Block> {
    let mut blocks = Vec::new();
    collect(container, options, &mut blocks);
    log::debug!("extracted {} blocks from <{}>", blocks.len(), container.tag);
    blocks
}

fn collect(parent: &Element, options: ExtractOptions, out: &mut Vec<Block>) {
    for child in &parent.children {
        let element = match child {
            Node::Element(element) => element,
            Node::Text(text) => {
                // Stray text directly inside a wrapper still needs a slot
                if !text.trim().is_empty() {
                    out.push(Block::Text(TextBlock::paragraph(text.clone())));
                }
                continue;
            }
        };

        match classify(element) {
            Some(kind) if kind.is_reflowable() => {
                let block = TextBlock::from_element(kind, element);
                if options.prune_empty_text && block.is_empty() {
                    continue;
                }
                out.push(Block::Text(block));
            }
            Some(kind) => out.push(Block::Atomic(AtomicBlock::new(kind, element.clone()))),
            None => collect(element, options, out),
        }
    }
}

/// Match an element against the block selectors
fn classify(element: &Element) -> Option<BlockKind> {
    if let Some(level) = element.heading_level() {
        let depth = element
            .attr(ACTUAL_LEVEL_ATTR)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(level as u32);
        return Some(BlockKind::Heading { level, depth });
    }

    match element.tag.as_str() {
        "p" if is_lone_image(element) => Some(BlockKind::Image),
        "p" => Some(BlockKind::Paragraph),
        "ul" => Some(BlockKind::List { ordered: false }),
        "ol" => Some(BlockKind::List { ordered: true }),
        "pre" => Some(BlockKind::Code),
        "blockquote" => Some(BlockKind::Quote),
        "table" => Some(BlockKind::Table),
        "img" | "figure" => Some(BlockKind::Image),
        "div" if element.has_class("callout") || element.attr("data-callout").is_some() => {
            Some(BlockKind::Callout)
        }
        _ => None,
    }
}

/// `<p><img></p>` as emitted by most markdown renderers
fn is_lone_image(element: &Element) -> bool {
    let mut elements = 0;
    let mut image = false;
    for child in &element.children {
        match child {
            Node::Element(el) => {
                elements += 1;
                image = el.tag == "img";
            }
            Node::Text(text) if !text.trim().is_empty() => return false,
            Node::Text(_) => {}
        }
    }
    elements == 1 && image
}
