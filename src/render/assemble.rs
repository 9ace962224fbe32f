//! Final preview: TOC pages spliced ahead of the numbered content pages

use crate::document::Element;
use crate::layout::{LayoutConstraints, Page, PaginationSummary, TocEntry, TocResult};
use crate::render::markup;
use crate::render::StyleContext;
use serde::Serialize;

/// Where a preview page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    Toc,
    Content,
}

/// One page of the assembled preview
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    /// Position in the preview, TOC pages included
    pub page_index: usize,
    pub kind: PageKind,
    /// Printed page number; TOC pages are unnumbered
    pub page_number: Option<usize>,
    pub element: Element,
}

impl DisplayPage {
    pub fn to_html(&self) -> String {
        markup::to_html(&self.element)
    }
}

/// Machine-readable description of a preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport<'a> {
    pub page_count: usize,
    pub toc_pages: usize,
    pub content_pages: usize,
    #[serde(flatten)]
    pub pagination: PaginationSummary,
    pub toc: &'a [TocEntry],
}

/// Assembled book preview
#[derive(Debug, Clone)]
pub struct BookPreview {
    pages: Vec<DisplayPage>,
    toc: Vec<TocEntry>,
    summary: PaginationSummary,
    style: StyleContext,
    constraints: LayoutConstraints,
}

impl BookPreview {
    pub fn pages(&self) -> &[DisplayPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn toc_page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.kind == PageKind::Toc).count()
    }

    pub fn content_page_count(&self) -> usize {
        self.page_count() - self.toc_page_count()
    }

    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn summary(&self) -> PaginationSummary {
        self.summary
    }

    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    /// Markup of each page, in preview order
    pub fn page_html(&self) -> Vec<String> {
        self.pages.iter().map(DisplayPage::to_html).collect()
    }

    pub fn report(&self) -> PreviewReport<'_> {
        PreviewReport {
            page_count: self.page_count(),
            toc_pages: self.toc_page_count(),
            content_pages: self.content_page_count(),
            pagination: self.summary,
            toc: &self.toc,
        }
    }

    /// Standalone HTML document with the theme stylesheet
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
        out.push_str(&self.style.css(&self.constraints));
        out.push_str("</style>\n</head>\n<body>\n<div class=\"booksmith-preview\">\n");
        for page in &self.pages {
            markup::write_element(&page.element, &mut out);
            out.push('\n');
        }
        out.push_str("</div>\n</body>\n</html>\n");
        out
    }
}

/// Build the preview: TOC pages first, then the content pages in order
pub fn assemble(
    toc: TocResult,
    content_pages: &[Page],
    summary: PaginationSummary,
    style: StyleContext,
    constraints: LayoutConstraints,
) -> BookPreview {
    let toc_pages = toc.pages.iter().map(|page| (PageKind::Toc, None, page.to_element()));
    let content = content_pages
        .iter()
        .map(|page| (PageKind::Content, page.page_number(), page.to_element()));

    let pages = toc_pages
        .chain(content)
        .enumerate()
        .map(|(page_index, (kind, page_number, element))| DisplayPage {
            page_index,
            kind,
            page_number,
            element,
        })
        .collect();

    BookPreview {
        pages,
        toc: toc.entries,
        summary,
        style,
        constraints,
    }
}
