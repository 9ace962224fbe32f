//! Layout: measurement, pagination and the table of contents

mod engine;
pub mod font;
mod line_break;
mod measure;
mod page;
mod page_size;
mod toc;

pub use engine::{
    PaginatedEngine, PaginationMode, PaginationOptions, PaginationSummary,
    DEFAULT_ITERATION_FACTOR,
};
pub use font::FontMetrics;
pub use line_break::{LineBreaker, LineLayout};
pub use measure::{FixedLineMeasurer, Measurer, MetricsMeasurer, INDENT_WIDTH};
pub use page::{Page, OVERFLOW_EPSILON};
pub use page_size::{LayoutConstraints, Margins, PageSizeClass};
pub use toc::{TocEntry, TocPage, TocPaginator, TocResult, DEFAULT_TOC_TITLE};
