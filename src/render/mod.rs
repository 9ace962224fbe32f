//! Render output: typography, HTML markup and the assembled preview

mod assemble;
pub mod markup;
mod theme;

pub use assemble::{assemble, BookPreview, DisplayPage, PageKind, PreviewReport};
pub use theme::{StyleContext, Theme, Typography};
