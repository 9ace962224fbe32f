//! Height measurement for materialized blocks

use crate::document::{BlockKind, Element, Node};
use crate::layout::font::FontMetrics;
use crate::layout::line_break::LineBreaker;
use crate::render::StyleContext;

/// Indentation width per nesting level
pub const INDENT_WIDTH: f32 = 24.0;

/// Default image aspect ratio (height / width) when no size is recorded
const DEFAULT_IMAGE_ASPECT: f32 = 0.6;

/// Reports the rendered height of an element
pub trait Measurer {
    fn measure(&self, element: &Element, style: &StyleContext) -> f32;
}

impl<M: Measurer + ?Sized> Measurer for &M {
    fn measure(&self, element: &Element, style: &StyleContext) -> f32 {
        (**self).measure(element, style)
    }
}

/// Measurer backed by font metrics and line breaking
#[derive(Debug, Clone, Default)]
pub struct MetricsMeasurer {
    breaker: LineBreaker,
}

impl MetricsMeasurer {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            breaker: LineBreaker::new(metrics),
        }
    }

    fn text_height(&self, text: &str, width: f32, font_size: f32, line_px: f32) -> f32 {
        self.breaker.count_lines(text.trim(), width.max(1.0), font_size) as f32 * line_px
    }

    fn heading_height(&self, element: &Element, level: u8, style: &StyleContext) -> f32 {
        let kind = BlockKind::Heading {
            level,
            depth: level as u32,
        };
        let scale = kind.line_height_multiplier();
        let font_size = style.font_size * scale;
        let line_px = style.line_px() * scale;
        self.text_height(&element.text_content(), style.content_width, font_size, line_px)
            + kind.spacing_after() * style.line_px()
    }

    fn list_height(&self, element: &Element, width: f32, style: &StyleContext) -> f32 {
        let item_width = width - INDENT_WIDTH;
        let items: f32 = element
            .child_elements()
            .map(|item| {
                let nested: f32 = item
                    .child_elements()
                    .filter(|child| matches!(child.tag.as_str(), "ul" | "ol"))
                    .map(|child| self.list_height(child, item_width, style))
                    .sum();
                let own_text: String = item
                    .children
                    .iter()
                    .filter(|child| {
                        !matches!(child, Node::Element(el) if matches!(el.tag.as_str(), "ul" | "ol"))
                    })
                    .map(Node::text_content)
                    .collect();
                self.text_height(&own_text, item_width, style.font_size, style.line_px()) + nested
            })
            .sum();
        items + BlockKind::List { ordered: false }.spacing_after() * style.line_px()
    }

    fn table_height(&self, element: &Element, style: &StyleContext) -> f32 {
        let mut rows = Vec::new();
        collect_rows(element, &mut rows);
        if rows.is_empty() {
            return self.text_height(
                &element.text_content(),
                style.content_width,
                style.font_size,
                style.line_px(),
            );
        }
        let padding = style.font_size * 0.5;
        let body: f32 = rows
            .iter()
            .map(|row| {
                let cells: Vec<&Element> = row.child_elements().collect();
                let cell_width = style.content_width / cells.len().max(1) as f32 - padding;
                cells
                    .iter()
                    .map(|cell| {
                        self.text_height(&cell.text_content(), cell_width, style.font_size, style.line_px())
                    })
                    .fold(style.line_px(), f32::max)
                    + padding
            })
            .sum();
        body + style.line_px()
    }

    fn code_height(&self, element: &Element, style: &StyleContext) -> f32 {
        let text = element.text_content();
        let lines = text.trim_end_matches('\n').lines().count().max(1);
        let line_px = style.line_px() * BlockKind::Code.line_height_multiplier();
        lines as f32 * line_px + style.font_size * 2.0
    }

    fn stack_height(&self, element: &Element, style: &StyleContext) -> f32 {
        element
            .children
            .iter()
            .map(|child| match child {
                Node::Element(el) => self.measure(el, style),
                Node::Text(text) if text.trim().is_empty() => 0.0,
                Node::Text(text) => {
                    self.text_height(text, style.content_width, style.font_size, style.line_px())
                }
            })
            .sum()
    }
}

impl Measurer for MetricsMeasurer {
    fn measure(&self, element: &Element, style: &StyleContext) -> f32 {
        let line = style.line_px();
        if let Some(level) = element.heading_level() {
            return self.heading_height(element, level, style);
        }
        match element.tag.as_str() {
            "ul" | "ol" => self.list_height(element, style.content_width, style),
            "table" => self.table_height(element, style) + line,
            "pre" => self.code_height(element, style) + line,
            "img" => image_height(element, style.content_width) + 0.5 * line,
            "figure" | "p" if element.find(&|el: &Element| el.tag == "img").is_some() => {
                let image = element
                    .find(&|el: &Element| el.tag == "img")
                    .map(|img| image_height(img, style.content_width))
                    .unwrap_or(0.0);
                let caption: String = element
                    .child_elements()
                    .filter(|el| el.tag == "figcaption")
                    .map(Element::text_content)
                    .collect();
                let caption_height = if caption.trim().is_empty() {
                    0.0
                } else {
                    self.text_height(&caption, style.content_width, style.font_size, line)
                };
                image + caption_height + 0.5 * line
            }
            "blockquote" => {
                let width = style.content_width - INDENT_WIDTH * 2.0;
                self.text_height(&element.text_content(), width, style.font_size, line) + line
            }
            "div" if element.has_class("callout") || element.attr("data-callout").is_some() => {
                let width = style.content_width - INDENT_WIDTH * 2.0;
                self.text_height(&element.text_content(), width, style.font_size, line) + 1.5 * line
            }
            "div" | "section" | "article" | "main" | "body" => self.stack_height(element, style),
            _ => {
                self.text_height(&element.text_content(), style.content_width, style.font_size, line)
                    + BlockKind::Paragraph.spacing_after() * line
            }
        }
    }
}

/// Measurer with a fixed number of characters per line.
///
/// Useful for headless runs where no font metrics are available. Images use
/// their `height` attribute; containers stack their children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLineMeasurer {
    pub chars_per_line: usize,
    pub line_height: f32,
}

impl FixedLineMeasurer {
    pub fn new(chars_per_line: usize, line_height: f32) -> Self {
        Self {
            chars_per_line: chars_per_line.max(1),
            line_height,
        }
    }

    fn lines(&self, text: &str) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            1
        } else {
            (chars + self.chars_per_line - 1) / self.chars_per_line
        }
    }
}

impl Measurer for FixedLineMeasurer {
    fn measure(&self, element: &Element, style: &StyleContext) -> f32 {
        if element.tag == "img" {
            return element
                .attr("height")
                .and_then(|h| h.trim_end_matches("px").parse::<f32>().ok())
                .unwrap_or(self.line_height);
        }
        if matches!(element.tag.as_str(), "div" | "ul" | "ol" | "section")
            && element.child_elements().next().is_some()
        {
            return element
                .children
                .iter()
                .map(|child| match child {
                    Node::Element(el) => self.measure(el, style),
                    Node::Text(text) if text.trim().is_empty() => 0.0,
                    Node::Text(text) => self.lines(text) as f32 * self.line_height,
                })
                .sum();
        }
        self.lines(&element.text_content()) as f32 * self.line_height
    }
}

fn collect_rows<'a>(element: &'a Element, rows: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.tag == "tr" {
            rows.push(child);
        } else {
            collect_rows(child, rows);
        }
    }
}

fn parse_px(value: Option<&str>) -> Option<f32> {
    value?
        .trim()
        .trim_end_matches("px")
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Image height scaled down to fit the content width
fn image_height(element: &Element, content_width: f32) -> f32 {
    let width = parse_px(element.attr("width"));
    match (parse_px(element.attr("height")), width) {
        (Some(height), Some(width)) if width > content_width => height * content_width / width,
        (Some(height), _) => height,
        (None, Some(width)) => width.min(content_width) * DEFAULT_IMAGE_ASPECT,
        (None, None) => content_width * DEFAULT_IMAGE_ASPECT,
    }
}
