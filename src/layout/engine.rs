//! Pagination engine: greedy page filling with tail splitting and backtracking

use crate::document::{Block, Element, Node, DEFAULT_MIN_TAIL_LENGTH};
use crate::error::{Result, TypesetError};
use crate::layout::measure::Measurer;
use crate::layout::page::Page;
use crate::layout::page_size::{LayoutConstraints, Margins, PageSizeClass};
use crate::render::{StyleContext, Typography};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default bound on engine iterations, as a multiple of the input block count
pub const DEFAULT_ITERATION_FACTOR: usize = 6;

/// What to do when the iteration cap is reached with blocks still unplaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginationMode {
    /// Report an error
    #[default]
    Strict,
    /// Keep the pages produced so far and flag the result as incomplete
    BestEffort,
}

/// Options for a pagination run
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationOptions {
    pub page_size: PageSizeClass,
    /// Explicit maximum content height, overriding the page size table
    pub page_height: Option<f32>,
    pub margins: Margins,
    pub min_tail_length: usize,
    pub iteration_factor: usize,
    pub mode: PaginationMode,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: PageSizeClass::default(),
            page_height: None,
            margins: Margins::default(),
            min_tail_length: DEFAULT_MIN_TAIL_LENGTH,
            iteration_factor: DEFAULT_ITERATION_FACTOR,
            mode: PaginationMode::default(),
        }
    }
}

impl PaginationOptions {
    pub fn constraints(&self) -> LayoutConstraints {
        LayoutConstraints::for_page(self.page_size, self.margins)
    }

    /// Maximum content height of a page
    pub fn max_height(&self) -> f32 {
        self.page_height
            .unwrap_or_else(|| self.constraints().content_height())
    }
}

/// Outcome of a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub page_count: usize,
    /// False when the iteration cap stopped the run early
    pub complete: bool,
    pub unplaced_blocks: usize,
    pub iterations: usize,
}

/// Result of offering a block to a page
enum Placement {
    /// The whole block is on the page
    Committed,
    /// A head now sits on the page; the tail still needs placing
    Split { tail: Block },
    /// Nothing fits; the original block is handed back untouched
    Rejected(Block),
}

/// Paginates a block sequence into pages no taller than the maximum height
#[derive(Debug)]
pub struct PaginatedEngine<M: Measurer> {
    measurer: M,
    style: StyleContext,
    options: PaginationOptions,
    pages: Vec<Page>,
}

impl<M: Measurer> PaginatedEngine<M> {
    pub fn new(measurer: M, typography: Typography, options: PaginationOptions) -> Self {
        let style = StyleContext::new(typography, &options.constraints());
        Self {
            measurer,
            style,
            options,
            pages: Vec::new(),
        }
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    pub fn max_height(&self) -> f32 {
        self.options.max_height()
    }

    /// Pages produced by the last run
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Replace the children of `container` with the rendered pages
    pub fn render_into(&self, container: &mut Element) {
        container.children = self
            .pages
            .iter()
            .map(|page| Node::Element(page.to_element()))
            .collect();
    }

    /// Lay out `blocks` into pages, discarding the result of any previous run.
    ///
    /// The input is cloned, never modified. A split leaves the page open, so
    /// the tail is offered to the same page before a new one is started; a
    /// block rejected by a partly filled page is retried on a fresh page in
    /// the same step. Every step therefore commits content. The loop runs at
    /// most `iteration_factor * blocks.len()` times; if blocks remain after that,
    /// strict mode returns [`TypesetError::IterationCapExceeded`] (the pages
    /// produced so far stay available) and best-effort mode returns an
    /// incomplete summary.
    pub fn paginate(&mut self, blocks: &[Block]) -> Result<PaginationSummary> {
        self.pages.clear();
        if blocks.is_empty() {
            return Ok(PaginationSummary {
                complete: true,
                ..PaginationSummary::default()
            });
        }

        let max_height = self.max_height();
        let cap = blocks
            .len()
            .saturating_mul(self.options.iteration_factor.max(1));
        let mut queue: VecDeque<Block> = blocks.iter().cloned().collect();
        let mut pages = Vec::new();
        let mut current = Page::new();
        let mut iterations = 0;

        while iterations < cap {
            let Some(block) = queue.pop_front() else {
                break;
            };
            iterations += 1;

            let placement = match self.place(&mut current, block, max_height) {
                Placement::Rejected(block) if !current.is_empty() => {
                    log::debug!("page {} full with {} blocks", pages.len() + 1, current.len());
                    pages.push(std::mem::take(&mut current));
                    self.place(&mut current, block, max_height)
                }
                placement => placement,
            };

            match placement {
                Placement::Committed => {}
                Placement::Split { tail } => {
                    // The page stays open: the next round offers the tail to the same page
                    queue.push_front(tail);
                }
                Placement::Rejected(block) => {
                    // Too tall for a blank page and cannot be cut: give it a page of its own
                    log::warn!(
                        "{:?} block exceeds the page height of {}px; placing it alone on page {}",
                        block.kind(),
                        max_height,
                        pages.len() + 1
                    );
                    current.add_block(&block, &self.measurer, &self.style);
                    pages.push(std::mem::take(&mut current));
                }
            }
        }

        if !current.is_empty() {
            pages.push(current);
        }
        for (index, page) in pages.iter_mut().enumerate() {
            page.set_page_number(index + 1);
        }

        let page_count = pages.len();
        let unplaced_blocks = queue.len();
        self.pages = pages;

        if unplaced_blocks > 0 {
            match self.options.mode {
                PaginationMode::Strict => {
                    return Err(TypesetError::IterationCapExceeded {
                        placed_pages: page_count,
                        unplaced_blocks,
                        cap,
                    });
                }
                PaginationMode::BestEffort => {
                    log::warn!(
                        "iteration cap of {} reached; {} block(s) left unplaced",
                        cap,
                        unplaced_blocks
                    );
                }
            }
        }

        Ok(PaginationSummary {
            page_count,
            complete: unplaced_blocks == 0,
            unplaced_blocks,
            iterations,
        })
    }

    /// Offer `block` to `page`, splitting it when it does not fit whole
    fn place(&self, page: &mut Page, block: Block, max_height: f32) -> Placement {
        page.add_block(&block, &self.measurer, &self.style);
        if !page.is_overflowing(max_height) {
            return Placement::Committed;
        }
        page.remove_last_block();
        self.split_onto(page, block, max_height)
    }

    /// Split `block` from the tail until its head fits on `page`.
    ///
    /// Each round cuts another tail off the head and merges the previously
    /// cut tail onto it, so the head shrinks while the tail collects
    /// everything that did not fit.
    fn split_onto(&self, page: &mut Page, block: Block, max_height: f32) -> Placement {
        let min_tail = self.options.min_tail_length;
        let mut head = block.clone();
        let mut tail: Option<Block> = None;

        while let Some(mut cut) = head.split_tail(min_tail) {
            if let Some(previous) = tail.take() {
                cut.merge_tail(previous);
            }

            page.add_block(&head, &self.measurer, &self.style);
            if !page.is_overflowing(max_height) {
                log::debug!(
                    "split a {:?} block on page with {} blocks",
                    head.kind(),
                    page.len()
                );
                return Placement::Split { tail: cut };
            }
            page.remove_last_block();
            tail = Some(cut);
        }

        Placement::Rejected(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AtomicBlock, BlockKind, TextBlock};
    use crate::layout::FixedLineMeasurer;
    use proptest::prelude::*;

    /// 50 characters per 10px line, 100px pages
    fn engine(max_height: f32) -> PaginatedEngine<FixedLineMeasurer> {
        let options = PaginationOptions {
            page_height: Some(max_height),
            ..PaginationOptions::default()
        };
        PaginatedEngine::new(FixedLineMeasurer::new(50, 10.0), Typography::default(), options)
    }

    fn paragraph(text: &str) -> Block {
        Block::Text(TextBlock::paragraph(text))
    }

    fn image(height: u32) -> Block {
        Block::Atomic(AtomicBlock::new(
            BlockKind::Image,
            Element::new("img").with_attr("height", height.to_string()),
        ))
    }

    fn page_texts(engine: &PaginatedEngine<FixedLineMeasurer>) -> String {
        engine
            .pages()
            .iter()
            .flat_map(|page| page.blocks().iter().map(Block::text_content))
            .collect()
    }

    #[test]
    fn test_empty_input_produces_no_pages() {
        let mut engine = engine(100.0);
        let summary = engine.paginate(&[]).unwrap();
        assert_eq!(summary.page_count, 0);
        assert!(summary.complete);
        assert!(engine.pages().is_empty());
    }

    #[test]
    fn test_short_paragraphs_share_one_page() {
        let mut engine = engine(100.0);
        let blocks = vec![paragraph("First."), paragraph("Second."), paragraph("Third.")];
        let summary = engine.paginate(&blocks).unwrap();

        assert_eq!(summary.page_count, 1);
        assert_eq!(engine.pages()[0].blocks(), blocks.as_slice());
        assert_eq!(engine.pages()[0].page_number(), Some(1));
    }

    #[test]
    fn test_long_text_splits_after_periods() {
        let mut engine = engine(100.0);
        let text = "A. B. C. D. E. ".repeat(100);
        let summary = engine.paginate(&[paragraph(&text)]).unwrap();

        assert!(summary.page_count >= 2);
        assert!(summary.complete);
        let pages = engine.pages();
        for page in &pages[..pages.len() - 1] {
            assert!(!page.is_overflowing(100.0));
            let last = page.blocks().last().unwrap().text_content();
            assert!(last.ends_with('.'), "split boundary not after a period: {:?}", last);
        }
        assert_eq!(page_texts(&engine), text);
    }

    #[test]
    fn test_split_tail_keeps_filling_the_page() {
        // No sentence terminals: every cut falls back to the midpoint
        let mut engine = engine(100.0);
        let text = "x".repeat(1400);
        let summary = engine.paginate(&[paragraph(&text)]).unwrap();

        assert_eq!(summary.page_count, 3);
        assert_eq!(summary.iterations, 4);
        let first = &engine.pages()[0];
        assert_eq!(first.len(), 2);
        assert!(first.visual_height() > 90.0, "page 1 left {}px free", 100.0 - first.visual_height());
        assert!(!first.is_overflowing(100.0));
        assert_eq!(page_texts(&engine), text);
    }

    #[test]
    fn test_rejected_block_retried_on_fresh_page_in_one_step() {
        let mut engine = engine(100.0);
        let blocks = vec![paragraph(&"x".repeat(450)), paragraph("y".repeat(60).as_str())];
        let summary = engine.paginate(&blocks).unwrap();

        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.page_count, 2);
        assert_eq!(engine.pages()[1].blocks()[0], blocks[1]);
    }

    #[test]
    fn test_oversized_image_gets_its_own_page() {
        let mut engine = engine(100.0);
        let summary = engine.paginate(&[image(500)]).unwrap();

        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.iterations, 1);
        let page = &engine.pages()[0];
        assert_eq!(page.len(), 1);
        assert_eq!(page.page_number(), Some(1));
        assert!(page.is_overflowing(100.0));
    }

    #[test]
    fn test_oversized_block_between_others() {
        let mut engine = engine(100.0);
        let blocks = vec![paragraph("before"), image(300), paragraph("after")];
        let summary = engine.paginate(&blocks).unwrap();

        assert_eq!(summary.page_count, 3);
        let counts: Vec<_> = engine.pages().iter().map(Page::len).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(engine.pages()[1].blocks()[0].kind(), BlockKind::Image);
    }

    #[test]
    fn test_atomic_block_moves_to_next_page() {
        let mut engine = engine(100.0);
        let blocks = vec![paragraph(&"x".repeat(400)), image(50)];
        engine.paginate(&blocks).unwrap();

        assert_eq!(engine.pages().len(), 2);
        assert_eq!(engine.pages()[0].blocks()[0], blocks[0]);
        assert_eq!(engine.pages()[1].blocks()[0], blocks[1]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let mut engine = engine(100.0);
        let blocks = vec![paragraph(&"Sentence one. ".repeat(80))];
        let before = blocks.clone();
        engine.paginate(&blocks).unwrap();
        assert_eq!(blocks, before);
    }

    #[test]
    fn test_strict_mode_reports_cap_exhaustion() {
        let options = PaginationOptions {
            page_height: Some(100.0),
            iteration_factor: 1,
            ..PaginationOptions::default()
        };
        let mut engine =
            PaginatedEngine::new(FixedLineMeasurer::new(50, 10.0), Typography::default(), options);
        let err = engine
            .paginate(&[paragraph(&"A. B. C. D. E. ".repeat(100))])
            .unwrap_err();

        assert!(matches!(
            err,
            TypesetError::IterationCapExceeded {
                placed_pages: 1,
                unplaced_blocks: 1,
                cap: 1
            }
        ));
        assert_eq!(engine.pages().len(), 1);
    }

    #[test]
    fn test_best_effort_mode_flags_incomplete_output() {
        let options = PaginationOptions {
            page_height: Some(100.0),
            iteration_factor: 1,
            mode: PaginationMode::BestEffort,
            ..PaginationOptions::default()
        };
        let mut engine =
            PaginatedEngine::new(FixedLineMeasurer::new(50, 10.0), Typography::default(), options);
        let summary = engine
            .paginate(&[paragraph(&"A. B. C. D. E. ".repeat(100))])
            .unwrap();

        assert!(!summary.complete);
        assert_eq!(summary.unplaced_blocks, 1);
        assert_eq!(summary.page_count, 1);
    }

    #[test]
    fn test_paginate_resets_previous_run() {
        let mut engine = engine(100.0);
        engine.paginate(&[image(500), image(500)]).unwrap();
        assert_eq!(engine.pages().len(), 2);
        engine.paginate(&[paragraph("only")]).unwrap();
        assert_eq!(engine.pages().len(), 1);
    }

    #[test]
    fn test_render_into_replaces_children() {
        let mut engine = engine(100.0);
        engine.paginate(&[image(80), image(80)]).unwrap();
        let mut container = Element::new("div").with_text("stale");
        engine.render_into(&mut container);
        assert_eq!(container.children.len(), 2);
        assert!(container.child_elements().all(|el| el.has_class("booksmith-page")));
    }

    #[test]
    fn test_page_size_table_sets_max_height() {
        let options = PaginationOptions {
            page_size: PageSizeClass::A5,
            ..PaginationOptions::default()
        };
        assert_eq!(options.max_height(), 794.0 - 144.0);
        let overridden = PaginationOptions {
            page_height: Some(300.0),
            ..options
        };
        assert_eq!(overridden.max_height(), 300.0);
    }

    proptest! {
        #[test]
        fn pages_preserve_content_order_and_height(
            sentences in proptest::collection::vec((1usize..8, 1usize..12), 1..25),
        ) {
            let blocks: Vec<Block> = sentences
                .iter()
                .enumerate()
                .map(|(i, &(count, words))| {
                    let sentence = format!("{} ", vec!["word"; words].join(" "));
                    let text = format!("P{}: {}", i, sentence.replace(' ', ". ").repeat(count));
                    paragraph(text.trim_end())
                })
                .collect();
            let expected: String = blocks.iter().map(Block::text_content).collect();

            let mut engine = engine(100.0);
            let summary = engine.paginate(&blocks).unwrap();
            prop_assert!(summary.complete);
            prop_assert!(summary.iterations <= DEFAULT_ITERATION_FACTOR * blocks.len());
            prop_assert_eq!(page_texts(&engine), expected);

            for (index, page) in engine.pages().iter().enumerate() {
                prop_assert_eq!(page.page_number(), Some(index + 1));
                prop_assert!(page.len() == 1 || !page.is_overflowing(100.0));
            }
        }
    }
}
