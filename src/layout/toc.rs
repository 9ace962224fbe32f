//! Table of contents: heading anchors and TOC page layout

use crate::document::{Element, ACTUAL_LEVEL_ATTR, CONTINUATION_ATTR};
use crate::layout::measure::{Measurer, INDENT_WIDTH};
use crate::layout::page::{Page, OVERFLOW_EPSILON};
use crate::render::StyleContext;
use serde::Serialize;

pub const DEFAULT_TOC_TITLE: &str = "Contents";

/// One line of the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Nesting depth, 1 for top-level headings
    pub level: u32,
    pub text: String,
    pub anchor_id: String,
    /// 1-based content page holding the heading
    pub page_number: usize,
}

impl TocEntry {
    pub fn to_element(&self) -> Element {
        let indent = self.level.saturating_sub(1) as f32 * INDENT_WIDTH;
        Element::new("li")
            .with_class("toc-entry")
            .with_attr("style", format!("padding-left: {}px", indent))
            .with_child(
                Element::new("a")
                    .with_attr("href", format!("#{}", self.anchor_id))
                    .with_text(self.text.clone()),
            )
            .with_child(
                Element::new("span")
                    .with_class("toc-page-number")
                    .with_text(self.page_number.to_string()),
            )
    }
}

/// A page of the table of contents
#[derive(Debug, Clone, PartialEq)]
pub struct TocPage {
    title: String,
    entries: Vec<TocEntry>,
}

impl TocPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Content area: the title followed by the entry list
    pub fn content(&self) -> Element {
        let list = self
            .entries
            .iter()
            .fold(Element::new("ul").with_class("toc-list"), |list, entry| {
                list.with_child(entry.to_element())
            });
        Element::new("div")
            .with_class("page-content")
            .with_child(
                Element::new("h1")
                    .with_class("toc-title")
                    .with_text(self.title.clone()),
            )
            .with_child(list)
    }

    pub fn to_element(&self) -> Element {
        Element::new("div")
            .with_class("booksmith-page")
            .with_class("toc-page")
            .with_child(self.content())
    }
}

/// Entries and pages produced by one TOC pass
#[derive(Debug, Clone, Default)]
pub struct TocResult {
    pub entries: Vec<TocEntry>,
    pub pages: Vec<TocPage>,
}

/// Builds TOC pages sized by the same measurer as the content pages
pub struct TocPaginator<'a, M: Measurer + ?Sized> {
    measurer: &'a M,
    style: &'a StyleContext,
    max_height: f32,
    title: String,
}

impl<'a, M: Measurer + ?Sized> TocPaginator<'a, M> {
    pub fn new(measurer: &'a M, style: &'a StyleContext, max_height: f32) -> Self {
        Self {
            measurer,
            style,
            max_height,
            title: DEFAULT_TOC_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Anchor every heading on `pages` and collect the TOC entries in order.
    ///
    /// Headings get `id = heading-{page}-{n}` (0-based page index and
    /// heading index on that page), on both the rendered element and the
    /// stored block. Headings nested in wrapper blocks are included. The
    /// continued tail of a split heading gets no anchor and no entry.
    pub fn collect_entries(&self, pages: &mut [Page]) -> Vec<TocEntry> {
        let mut entries = Vec::new();
        for (page_index, page) in pages.iter_mut().enumerate() {
            let page_number = page.page_number().unwrap_or(page_index + 1);
            let mut heading_index = 0;
            page.visit_headings(|element| {
                if element.attr(CONTINUATION_ATTR).is_some() {
                    return;
                }
                let anchor_id = format!("heading-{}-{}", page_index, heading_index);
                heading_index += 1;
                element.set_attr("id", anchor_id.as_str());
                entries.push(TocEntry {
                    level: heading_depth(element),
                    text: element.text_content().trim().to_string(),
                    anchor_id,
                    page_number,
                });
            });
        }
        entries
    }

    /// Lay entries out on as many TOC pages as needed.
    ///
    /// An entry that does not fit even on an empty TOC page stays there alone.
    pub fn layout(&self, entries: &[TocEntry]) -> Vec<TocPage> {
        if entries.is_empty() {
            return Vec::new();
        }

        let single = TocPage {
            title: self.title.clone(),
            entries: entries.to_vec(),
        };
        if !self.overflows(&single) {
            return vec![single];
        }

        let mut pages = Vec::new();
        let mut current = TocPage::new(self.title.clone());
        for entry in entries {
            current.entries.push(entry.clone());
            if current.entries.len() > 1 && self.overflows(&current) {
                current.entries.pop();
                log::debug!("TOC page {} full with {} entries", pages.len() + 1, current.entries.len());
                pages.push(current);
                current = TocPage::new(self.title.clone());
                current.entries.push(entry.clone());
            }
        }
        pages.push(current);
        pages
    }

    /// Anchor headings on `pages` and lay out the table of contents
    pub fn paginate(&self, pages: &mut [Page]) -> TocResult {
        let entries = self.collect_entries(pages);
        let toc_pages = self.layout(&entries);
        TocResult {
            entries,
            pages: toc_pages,
        }
    }

    fn overflows(&self, page: &TocPage) -> bool {
        self.measurer.measure(&page.content(), self.style) > self.max_height + OVERFLOW_EPSILON
    }
}

/// Recorded nesting depth, falling back to the tag level
fn heading_depth(element: &Element) -> u32 {
    element
        .attr(ACTUAL_LEVEL_ATTR)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|depth| *depth > 0)
        .or_else(|| element.heading_level().map(u32::from))
        .unwrap_or(1)
}
