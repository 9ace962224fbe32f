//! Typesetter configuration loaded from JSON

use crate::document::{ExtractOptions, DEFAULT_MIN_TAIL_LENGTH};
use crate::error::{Result, TypesetError};
use crate::layout::{
    Margins, PageSizeClass, PaginationMode, PaginationOptions, DEFAULT_ITERATION_FACTOR,
    DEFAULT_TOC_TITLE,
};
use crate::render::Typography;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one typesetting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypesetConfig {
    pub page_size: PageSizeClass,
    /// Explicit maximum content height in pixels
    pub page_height: Option<f32>,
    pub margins: Margins,
    pub typography: Typography,
    pub min_tail_length: usize,
    pub iteration_factor: usize,
    pub mode: PaginationMode,
    /// Drop paragraphs and headings with no visible text
    pub prune_empty_blocks: bool,
    /// Generate table-of-contents pages
    pub toc: bool,
    pub toc_title: String,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            page_size: PageSizeClass::default(),
            page_height: None,
            margins: Margins::default(),
            typography: Typography::default(),
            min_tail_length: DEFAULT_MIN_TAIL_LENGTH,
            iteration_factor: DEFAULT_ITERATION_FACTOR,
            mode: PaginationMode::default(),
            prune_empty_blocks: true,
            toc: true,
            toc_title: DEFAULT_TOC_TITLE.to_string(),
        }
    }
}

impl TypesetConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject settings that cannot produce a layout
    pub fn validate(&self) -> Result<()> {
        if let Some(height) = self.page_height {
            if !height.is_finite() || height <= 0.0 {
                return Err(TypesetError::InvalidConfig(format!(
                    "pageHeight must be a positive number, got {}",
                    height
                )));
            }
        }
        let margins = [
            self.margins.top,
            self.margins.bottom,
            self.margins.left,
            self.margins.right,
        ];
        if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(TypesetError::InvalidConfig(
                "margins must be non-negative".to_string(),
            ));
        }
        let constraints = self.pagination_options().constraints();
        if constraints.content_width() <= 0.0 || constraints.content_height() <= 0.0 {
            return Err(TypesetError::InvalidConfig(format!(
                "margins leave no content area on a {} page",
                self.page_size
            )));
        }
        if let Some(size) = self.typography.font_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(TypesetError::InvalidConfig(format!(
                    "fontSize must be a positive number, got {}",
                    size
                )));
            }
        }
        if self.iteration_factor == 0 {
            return Err(TypesetError::InvalidConfig(
                "iterationFactor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pagination_options(&self) -> PaginationOptions {
        PaginationOptions {
            page_size: self.page_size,
            page_height: self.page_height,
            margins: self.margins,
            min_tail_length: self.min_tail_length,
            iteration_factor: self.iteration_factor,
            mode: self.mode,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            prune_empty_text: self.prune_empty_blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Theme;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = TypesetConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TypesetConfig::default());
        assert_eq!(config.min_tail_length, 40);
        assert_eq!(config.iteration_factor, 6);
        assert!(config.toc);
    }

    #[test]
    fn test_camel_case_fields() {
        let config = TypesetConfig::from_json_str(
            r#"{
                "pageSize": "16K",
                "pageHeight": 600,
                "margins": { "top": 50 },
                "typography": { "theme": "classic", "fontSize": 18 },
                "mode": "bestEffort",
                "pruneEmptyBlocks": false,
                "tocTitle": "目录"
            }"#,
        )
        .unwrap();
        assert_eq!(config.page_size, PageSizeClass::K16);
        assert_eq!(config.pagination_options().max_height(), 600.0);
        assert_eq!(config.margins.top, 50.0);
        assert_eq!(config.margins.left, 72.0);
        assert_eq!(config.typography.theme, Theme::Classic);
        assert_eq!(config.mode, PaginationMode::BestEffort);
        assert!(!config.extract_options().prune_empty_text);
        assert_eq!(config.toc_title, "目录");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            TypesetConfig::from_json_str(r#"{"pageSize": "letter"}"#),
            Err(TypesetError::Json(_))
        ));
        assert!(matches!(
            TypesetConfig::from_json_str(r#"{"pageHeight": -5}"#),
            Err(TypesetError::InvalidConfig(_))
        ));
        assert!(matches!(
            TypesetConfig::from_json_str(r#"{"margins": {"left": 400, "right": 400}}"#),
            Err(TypesetError::InvalidConfig(_))
        ));
        assert!(matches!(
            TypesetConfig::from_json_str(r#"{"iterationFactor": 0}"#),
            Err(TypesetError::InvalidConfig(_))
        ));
    }
}
