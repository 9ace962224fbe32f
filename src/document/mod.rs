//! Content model: element tree, layout blocks and the chapter outline

mod block;
mod chapter;
mod element;
mod extract;

pub use block::{
    AtomicBlock, Block, BlockKind, TextBlock, ACTUAL_LEVEL_ATTR, CONTINUATION_ATTR,
    DEFAULT_MIN_TAIL_LENGTH, MIN_TAIL_RATIO,
};
pub use chapter::{ChapterId, ChapterNode, ChapterSpec, ChapterTree};
pub use element::{Attributes, Element, Node};
pub use extract::{extract_blocks, ExtractOptions};
