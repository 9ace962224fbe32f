//! BookSmith: a paginated typesetting engine for book previews
//!
//! This crate turns a tree of rendered content into fixed-size pages:
//! - Block extraction from an element tree or a chapter outline
//! - Greedy pagination with sentence-aware splitting of long text blocks
//! - Table-of-contents pages with anchors written back onto headings
//! - Themed HTML output, natively or through WASM bindings

pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmTypesetter;

// Re-export primary types
pub use config::TypesetConfig;
pub use document::{
    extract_blocks, AtomicBlock, Block, BlockKind, ChapterId, ChapterTree, Element, ExtractOptions,
    Node, TextBlock,
};
pub use error::{Result, TypesetError};
pub use layout::{
    FixedLineMeasurer, LayoutConstraints, Measurer, MetricsMeasurer, Page, PageSizeClass,
    PaginatedEngine, PaginationMode, PaginationOptions, PaginationSummary, TocEntry,
    TocPaginator,
};
pub use render::{BookPreview, DisplayPage, PageKind, StyleContext, Theme, Typography};

/// Runs the full pipeline: extract, paginate, build the TOC, assemble
#[derive(Debug, Clone)]
pub struct Typesetter<M: Measurer = MetricsMeasurer> {
    config: TypesetConfig,
    measurer: M,
}

impl Typesetter<MetricsMeasurer> {
    /// Create a typesetter using the built-in font metrics
    pub fn new(config: TypesetConfig) -> Result<Self> {
        Self::with_measurer(config, MetricsMeasurer::default())
    }
}

impl<M: Measurer> Typesetter<M> {
    pub fn with_measurer(config: TypesetConfig, measurer: M) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, measurer })
    }

    pub fn config(&self) -> &TypesetConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Typeset the blocks found in `container`
    pub fn typeset(&self, container: &Element) -> Result<BookPreview> {
        let blocks = extract_blocks(container, self.config.extract_options());
        self.typeset_blocks(&blocks)
    }

    /// Typeset a chapter outline, one heading per chapter at its depth
    pub fn typeset_chapters(&self, chapters: &ChapterTree) -> Result<BookPreview> {
        self.typeset(&chapters.to_container())
    }

    /// Typeset an already extracted block sequence
    pub fn typeset_blocks(&self, blocks: &[Block]) -> Result<BookPreview> {
        let options = self.config.pagination_options();
        let constraints = options.constraints();
        let mut engine = PaginatedEngine::new(&self.measurer, self.config.typography, options);
        let summary = engine.paginate(blocks)?;
        log::debug!(
            "paginated {} blocks into {} pages in {} iterations",
            blocks.len(),
            summary.page_count,
            summary.iterations
        );

        let style = engine.style().clone();
        let toc = if self.config.toc {
            TocPaginator::new(&self.measurer, &style, engine.max_height())
                .with_title(self.config.toc_title.as_str())
                .paginate(engine.pages_mut())
        } else {
            Default::default()
        };

        Ok(render::assemble(
            toc,
            engine.pages(),
            summary,
            style,
            constraints,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(config: TypesetConfig) -> Typesetter<FixedLineMeasurer> {
        Typesetter::with_measurer(config, FixedLineMeasurer::new(50, 10.0)).unwrap()
    }

    fn small_pages() -> TypesetConfig {
        TypesetConfig {
            page_height: Some(100.0),
            ..TypesetConfig::default()
        }
    }

    #[test]
    fn test_typeset_container() {
        let container = Element::new("div")
            .with_child(Element::new("h1").with_text("Chapter One"))
            .with_child(Element::new("p").with_text("Opening line. ".repeat(60)))
            .with_child(Element::new("p").with_text("   "))
            .with_child(Element::new("img").with_attr("height", "40"));

        let preview = fixed(small_pages()).typeset(&container).unwrap();
        assert_eq!(preview.toc().len(), 1);
        assert_eq!(preview.toc_page_count(), 1);
        assert!(preview.content_page_count() >= 2);
        assert!(preview.summary().complete);
        assert_eq!(preview.toc()[0].anchor_id, "heading-0-0");
    }

    #[test]
    fn test_empty_container() {
        let preview = fixed(small_pages()).typeset(&Element::new("div")).unwrap();
        assert_eq!(preview.page_count(), 0);
        assert!(preview.toc().is_empty());
    }

    #[test]
    fn test_toc_can_be_disabled() {
        let config = TypesetConfig {
            toc: false,
            ..small_pages()
        };
        let container = Element::new("div").with_child(Element::new("h2").with_text("Heading"));
        let preview = fixed(config).typeset(&container).unwrap();
        assert_eq!(preview.toc_page_count(), 0);
        assert_eq!(preview.page_count(), 1);
    }

    #[test]
    fn test_chapter_depth_reaches_toc() {
        let mut tree = ChapterTree::new();
        let part = tree.add_root("Part", Vec::new());
        let chapter = tree.add_child(part, "Chapter", Vec::new()).unwrap();
        tree.add_child(chapter, "Section", vec![Node::text("Body text.")])
            .unwrap();

        let preview = fixed(small_pages()).typeset_chapters(&tree).unwrap();
        let levels: Vec<_> = preview.toc().iter().map(|entry| entry.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_strict_cap_error_propagates() {
        let config = TypesetConfig {
            iteration_factor: 1,
            ..small_pages()
        };
        let container =
            Element::new("div").with_child(Element::new("p").with_text("A. B. C. D. E. ".repeat(100)));
        let err = fixed(config).typeset(&container).unwrap_err();
        assert!(matches!(err, TypesetError::IterationCapExceeded { .. }));
    }

    #[test]
    fn test_metrics_measurer_pipeline() {
        let container = Element::new("article")
            .with_child(Element::new("h1").with_text("第一章"))
            .with_child(Element::new("p").with_text("这是一个很长的段落。".repeat(400)));
        let typesetter = Typesetter::new(TypesetConfig::default()).unwrap();
        let preview = typesetter.typeset(&container).unwrap();
        assert!(preview.content_page_count() > 1);
        assert!(preview.to_html().contains("第一章"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TypesetConfig {
            page_height: Some(0.0),
            ..TypesetConfig::default()
        };
        assert!(Typesetter::new(config).is_err());
    }
}
