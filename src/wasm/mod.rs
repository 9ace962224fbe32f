//! WASM bindings for the typesetter

use crate::document::{ChapterSpec, ChapterTree, Element};
use crate::render::BookPreview;
use crate::{Typesetter, TypesetConfig, TypesetError};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Content accepted from JS: an element tree or a chapter outline
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    Chapters { chapters: Vec<ChapterSpec> },
    Element(Element),
}

impl ContentInput {
    pub fn from_json_str(json: &str) -> Result<Self, TypesetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Typeset either form of input
    pub fn typeset(&self, typesetter: &Typesetter) -> Result<BookPreview, TypesetError> {
        match self {
            ContentInput::Chapters { chapters } => {
                typesetter.typeset_chapters(&ChapterTree::from_specs(chapters))
            }
            ContentInput::Element(element) => typesetter.typeset(element),
        }
    }
}

fn to_js_error(err: TypesetError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed typesetter wrapper
#[wasm_bindgen]
pub struct WasmTypesetter {
    typesetter: Typesetter,
    preview: Option<BookPreview>,
}

#[wasm_bindgen]
impl WasmTypesetter {
    /// Create a typesetter from a JSON configuration (`"{}"` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmTypesetter, JsValue> {
        let config = if config_json.trim().is_empty() {
            TypesetConfig::default()
        } else {
            TypesetConfig::from_json_str(config_json).map_err(to_js_error)?
        };
        let typesetter = Typesetter::new(config).map_err(to_js_error)?;
        Ok(Self {
            typesetter,
            preview: None,
        })
    }

    /// Typeset JSON content and return the complete HTML document
    pub fn typeset(&mut self, content_json: &str) -> Result<String, JsValue> {
        let input = ContentInput::from_json_str(content_json).map_err(to_js_error)?;
        let preview = input.typeset(&self.typesetter).map_err(to_js_error)?;
        let html = preview.to_html();
        self.preview = Some(preview);
        Ok(html)
    }

    /// Page count of the last preview, TOC pages included
    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.preview.as_ref().map_or(0, BookPreview::page_count)
    }

    /// Markup of each page of the last preview
    #[wasm_bindgen(js_name = pageHtml)]
    pub fn page_html(&self) -> js_sys::Array {
        self.preview
            .iter()
            .flat_map(BookPreview::page_html)
            .map(|html| JsValue::from_str(&html))
            .collect()
    }

    /// Pagination report of the last preview as JSON
    #[wasm_bindgen(js_name = reportJson)]
    pub fn report_json(&self) -> Result<String, JsValue> {
        match &self.preview {
            Some(preview) => serde_json::to_string(&preview.report())
                .map_err(|err| to_js_error(err.into())),
            None => Ok("null".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_input_forms() {
        let element = ContentInput::from_json_str(
            r#"{"tag": "div", "children": [{"tag": "p", "children": ["Hello"]}]}"#,
        )
        .unwrap();
        assert!(matches!(element, ContentInput::Element(_)));

        let chapters = ContentInput::from_json_str(
            r#"{"chapters": [{"title": "One", "children": [{"title": "One.One"}]}]}"#,
        )
        .unwrap();
        let typesetter = Typesetter::new(TypesetConfig::default()).unwrap();
        let preview = chapters.typeset(&typesetter).unwrap();
        assert_eq!(preview.toc().len(), 2);
        assert_eq!(preview.toc()[1].level, 2);
    }

    #[test]
    fn test_malformed_content_is_an_error() {
        assert!(ContentInput::from_json_str("[1, 2]").is_err());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_typeset_across_the_boundary() {
        let mut typesetter = WasmTypesetter::new("{}").unwrap();
        assert_eq!(typesetter.page_count(), 0);
        assert_eq!(typesetter.report_json().unwrap(), "null");

        let html = typesetter
            .typeset(r#"{"tag": "div", "children": [{"tag": "h1", "children": ["Title"]}, {"tag": "p", "children": ["Body"]}]}"#)
            .unwrap();
        assert!(html.contains("heading-0-0"));
        assert_eq!(typesetter.page_count(), 2);
        assert_eq!(typesetter.page_html().length(), 2);
    }

    #[wasm_bindgen_test]
    fn test_bad_config_is_a_js_error() {
        assert!(WasmTypesetter::new("{\"pageSize\": \"Letter\"}").is_err());
    }
}
