//! Typography themes and the resolved style context passed to layout

use crate::error::TypesetError;
use crate::layout::LayoutConstraints;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Built-in typography presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Classic,
    Modern,
    Compact,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Compact => "compact",
        }
    }

    pub fn font_family(&self) -> &'static str {
        match self {
            Theme::Default => "\"Noto Serif\", \"Source Han Serif\", serif",
            Theme::Classic => "\"Garamond\", \"Songti SC\", serif",
            Theme::Modern => "\"Inter\", \"Source Han Sans\", sans-serif",
            Theme::Compact => "\"Noto Sans\", sans-serif",
        }
    }

    /// Base font size in pixels
    pub fn font_size(&self) -> f32 {
        match self {
            Theme::Default => 16.0,
            Theme::Classic => 17.0,
            Theme::Modern => 16.0,
            Theme::Compact => 14.0,
        }
    }

    /// Line height as a multiple of the font size
    pub fn line_height(&self) -> f32 {
        match self {
            Theme::Default => 1.6,
            Theme::Classic => 1.75,
            Theme::Modern => 1.5,
            Theme::Compact => 1.35,
        }
    }
}

impl FromStr for Theme {
    type Err = TypesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "classic" => Ok(Theme::Classic),
            "modern" => Ok(Theme::Modern),
            "compact" => Ok(Theme::Compact),
            _ => Err(TypesetError::UnknownTheme(s.to_string())),
        }
    }
}

/// User-facing typography choice
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub theme: Theme,
    /// Overrides the theme's base font size
    pub font_size: Option<f32>,
}

/// Resolved typography for one layout run
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContext {
    pub theme: Theme,
    pub font_size: f32,
    /// Line height multiplier
    pub line_height: f32,
    pub content_width: f32,
}

impl StyleContext {
    pub fn new(typography: Typography, constraints: &LayoutConstraints) -> Self {
        let theme = typography.theme;
        Self {
            theme,
            font_size: typography.font_size.unwrap_or_else(|| theme.font_size()),
            line_height: theme.line_height(),
            content_width: constraints.content_width(),
        }
    }

    /// Height of one body line in pixels
    pub fn line_px(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Stylesheet matching the measurements used during layout
    pub fn css(&self, constraints: &LayoutConstraints) -> String {
        let line = self.line_px();
        format!(
            ".booksmith-page {{ width: {pw}px; height: {ph}px; box-sizing: border-box; \
             padding: {mt}px {mr}px {mb}px {ml}px; position: relative; overflow: hidden; \
             font-family: {family}; font-size: {fs}px; line-height: {lh}; page-break-after: always; }}\n\
             .booksmith-page p {{ margin: 0 0 {line}px 0; }}\n\
             .booksmith-page ul, .booksmith-page ol {{ margin: 0 0 {list}px 0; padding-left: 24px; }}\n\
             .page-footer {{ position: absolute; bottom: {footer}px; left: 0; right: 0; text-align: center; }}\n\
             .toc-entry {{ display: flex; list-style: none; }}\n\
             .toc-entry a {{ flex: 1; }}\n\
             .toc-page-number {{ margin-left: auto; }}\n",
            pw = constraints.page_width,
            ph = constraints.page_height,
            mt = constraints.margin_top,
            mr = constraints.margin_right,
            mb = constraints.margin_bottom,
            ml = constraints.margin_left,
            family = self.theme.font_family(),
            fs = self.font_size,
            lh = self.line_height,
            line = line,
            list = line * 0.75,
            footer = constraints.margin_bottom / 3.0,
        )
    }
}
