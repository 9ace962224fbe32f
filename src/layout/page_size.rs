//! Physical page sizes and the layout constraints derived from them

use crate::error::TypesetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named page size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSizeClass {
    #[default]
    A4,
    A5,
    B5,
    /// Chinese 16-kai (184 x 260 mm)
    K16,
    Custom,
}

impl PageSizeClass {
    /// Page width and height in CSS pixels (96 DPI)
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSizeClass::A4 => (794.0, 1123.0),
            PageSizeClass::A5 => (559.0, 794.0),
            PageSizeClass::B5 => (665.0, 945.0),
            PageSizeClass::K16 => (695.0, 983.0),
            PageSizeClass::Custom => (720.0, 960.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageSizeClass::A4 => "A4",
            PageSizeClass::A5 => "A5",
            PageSizeClass::B5 => "B5",
            PageSizeClass::K16 => "16K",
            PageSizeClass::Custom => "custom",
        }
    }
}

impl fmt::Display for PageSizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageSizeClass {
    type Err = TypesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSizeClass::A4),
            "a5" => Ok(PageSizeClass::A5),
            "b5" => Ok(PageSizeClass::B5),
            "16k" => Ok(PageSizeClass::K16),
            "custom" => Ok(PageSizeClass::Custom),
            _ => Err(TypesetError::UnknownPageSize(s.to_string())),
        }
    }
}

impl TryFrom<String> for PageSizeClass {
    type Error = TypesetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageSizeClass> for String {
    fn from(size: PageSizeClass) -> Self {
        size.name().to_string()
    }
}

/// Page margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        // 0.75 inch at 96 DPI
        Self::uniform(72.0)
    }
}

impl Margins {
    pub fn uniform(margin: f32) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }
}

/// Layout constraints for a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self::for_page(PageSizeClass::A4, Margins::default())
    }
}

impl LayoutConstraints {
    pub fn for_page(size: PageSizeClass, margins: Margins) -> Self {
        let (page_width, page_height) = size.dimensions();
        Self {
            page_width,
            page_height,
            margin_top: margins.top,
            margin_bottom: margins.bottom,
            margin_left: margins.left,
            margin_right: margins.right,
        }
    }

    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }
}
