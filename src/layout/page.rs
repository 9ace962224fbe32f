//! A single page: an ordered run of blocks materialized into a bounded container

use crate::document::{Block, Element, Node};
use crate::layout::measure::Measurer;
use crate::render::StyleContext;

/// Tolerance for layout measurement jitter
pub const OVERFLOW_EPSILON: f32 = 0.01;

/// Layout information for a page
#[derive(Debug, Clone)]
pub struct Page {
    /// Blocks placed on this page, top to bottom
    blocks: Vec<Block>,
    /// Content container; child `i` is the materialized form of `blocks[i]`
    content: Element,
    /// Measured height of each content child
    heights: Vec<f32>,
    page_number: Option<usize>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Create a new empty page
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            content: Element::new("div").with_class("page-content"),
            heights: Vec::new(),
            page_number: None,
        }
    }

    /// Append a copy of `block` and its rendered form
    pub fn add_block<M: Measurer + ?Sized>(
        &mut self,
        block: &Block,
        measurer: &M,
        style: &StyleContext,
    ) {
        let element = block.materialize();
        let height = measurer.measure(&element, style);
        self.blocks.push(block.clone());
        self.content.children.push(Node::Element(element));
        self.heights.push(height);
    }

    /// Remove the most recently added block and its rendered form
    pub fn remove_last_block(&mut self) -> Option<Block> {
        let block = self.blocks.pop()?;
        self.content.children.pop();
        self.heights.pop();
        Some(block)
    }

    /// Rendered height of the content area
    pub fn visual_height(&self) -> f32 {
        self.heights.iter().sum()
    }

    pub fn is_overflowing(&self, max_height: f32) -> bool {
        self.visual_height() > max_height + OVERFLOW_EPSILON
    }

    /// Record the page number shown in the footer
    pub fn set_page_number(&mut self, page_number: usize) {
        self.page_number = Some(page_number);
    }

    pub fn page_number(&self) -> Option<usize> {
        self.page_number
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The content container holding the placed blocks
    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Visit every heading in the content area in document order, including
    /// headings nested inside wrapper blocks such as callouts.
    ///
    /// Attribute changes made by `visit` are carried back to the source block.
    pub fn visit_headings(&mut self, mut visit: impl FnMut(&mut Element)) {
        for (node, block) in self.content.children.iter_mut().zip(self.blocks.iter_mut()) {
            let Node::Element(element) = node else {
                continue;
            };
            if visit_nested_headings(element, &mut visit) {
                block.sync_rendered(element);
            }
        }
    }

    /// Full page element: content area plus the page-number footer
    pub fn to_element(&self) -> Element {
        let mut page = Element::new("div")
            .with_class("booksmith-page")
            .with_child(self.content.clone());
        if let Some(number) = self.page_number {
            page.set_attr("data-page-number", number.to_string());
            page.children.push(Node::Element(
                Element::new("div").with_class("page-footer").with_child(
                    Element::new("span")
                        .with_class("page-number")
                        .with_text(number.to_string()),
                ),
            ));
        }
        page
    }
}

/// Depth-first heading walk; returns whether any heading was visited
fn visit_nested_headings<F: FnMut(&mut Element)>(element: &mut Element, visit: &mut F) -> bool {
    if element.is_heading() {
        visit(element);
        return true;
    }
    let mut found = false;
    for child in element.child_elements_mut() {
        found |= visit_nested_headings(child, visit);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AtomicBlock, BlockKind, TextBlock};
    use crate::layout::{FixedLineMeasurer, LayoutConstraints};
    use crate::render::Typography;

    fn style() -> StyleContext {
        StyleContext::new(Typography::default(), &LayoutConstraints::default())
    }

    #[test]
    fn test_add_and_remove() {
        let measurer = FixedLineMeasurer::new(10, 10.0);
        let style = style();
        let mut page = Page::new();
        page.add_block(&Block::Text(TextBlock::paragraph("x".repeat(25))), &measurer, &style);
        page.add_block(&Block::Text(TextBlock::paragraph("short")), &measurer, &style);
        assert_eq!(page.len(), 2);
        assert_eq!(page.visual_height(), 40.0);
        assert!(page.is_overflowing(35.0));
        assert!(!page.is_overflowing(40.0));

        let last = page.remove_last_block().unwrap();
        assert_eq!(last.text_content(), "short");
        assert_eq!(page.content().children.len(), 1);
        assert_eq!(page.visual_height(), 30.0);
    }

    #[test]
    fn test_remove_from_empty_page() {
        let mut page = Page::new();
        assert!(page.remove_last_block().is_none());
        assert_eq!(page.visual_height(), 0.0);
    }

    #[test]
    fn test_page_number_footer() {
        let mut page = Page::new();
        assert!(page.to_element().find(&|el: &Element| el.has_class("page-number")).is_none());
        page.set_page_number(7);
        let element = page.to_element();
        let marker = element.find(&|el: &Element| el.has_class("page-number")).unwrap();
        assert_eq!(marker.text_content(), "7");
        assert_eq!(element.attr("data-page-number"), Some("7"));
    }

    #[test]
    fn test_visit_headings_reaches_nested() {
        let measurer = FixedLineMeasurer::new(10, 10.0);
        let style = style();
        let callout = Element::new("div")
            .with_class("callout")
            .with_child(Element::new("h4").with_text("Inside"));
        let mut page = Page::new();
        page.add_block(&Block::Text(TextBlock::heading(1, "One")), &measurer, &style);
        page.add_block(&Block::Text(TextBlock::paragraph("body")), &measurer, &style);
        page.add_block(
            &Block::Atomic(AtomicBlock::new(BlockKind::Callout, callout)),
            &measurer,
            &style,
        );

        let mut seen = Vec::new();
        page.visit_headings(|element| {
            element.set_attr("id", format!("h{}", seen.len()));
            seen.push(element.text_content());
        });
        assert_eq!(seen, vec!["One", "Inside"]);

        assert_eq!(page.blocks()[0].materialize().attr("id"), Some("h0"));
        let nested = page.blocks()[2].materialize();
        let inner = nested.find(&|el: &Element| el.tag == "h4").unwrap();
        assert_eq!(inner.attr("id"), Some("h1"));
    }
}
