//! Line breaking algorithm

use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Layout result for a single line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Byte range within the text this line covers
    pub byte_range: Range<usize>,
    /// Actual width of content
    pub width: f32,
}

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Clone, Default)]
pub struct LineBreaker {
    metrics: FontMetrics,
}

impl LineBreaker {
    pub fn new(metrics: FontMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn grapheme_width(&self, grapheme: &str, font_size: f32) -> f32 {
        if grapheme == "\t" {
            return self.metrics.default_width * 4.0 * font_size;
        }
        self.metrics.text_width(grapheme, font_size)
    }

    fn segment_width(&self, segment: &str, font_size: f32) -> f32 {
        segment
            .graphemes(true)
            .map(|g| self.grapheme_width(g, font_size))
            .sum()
    }

    /// Break text into lines no wider than `max_width`
    pub fn break_lines(&self, text: &str, max_width: f32, font_size: f32) -> Vec<LineLayout> {
        let mut lines = Vec::new();
        if text.is_empty() {
            // Empty paragraph still has one line
            lines.push(LineLayout {
                byte_range: 0..0,
                width: 0.0,
            });
            return lines;
        }

        let mut line_start = 0;
        let mut line_width: f32 = 0.0;
        let mut seg_start = 0;

        for (pos, opportunity) in linebreaks(text) {
            let segment = &text[seg_start..pos];
            // Trailing spaces hang past the margin
            let visible = self.segment_width(segment.trim_end(), font_size);

            if line_width + visible > max_width && line_width > 0.0 {
                lines.push(LineLayout {
                    byte_range: line_start..seg_start,
                    width: line_width,
                });
                line_start = seg_start;
                line_width = 0.0;
            }

            if visible > max_width {
                // Emergency break inside a segment wider than the line
                for (idx, grapheme) in segment.grapheme_indices(true) {
                    let w = self.grapheme_width(grapheme, font_size);
                    if line_width + w > max_width && line_width > 0.0 {
                        lines.push(LineLayout {
                            byte_range: line_start..seg_start + idx,
                            width: line_width,
                        });
                        line_start = seg_start + idx;
                        line_width = 0.0;
                    }
                    line_width += w;
                }
            } else {
                line_width += self.segment_width(segment, font_size);
            }

            if opportunity == BreakOpportunity::Mandatory && pos < text.len() {
                lines.push(LineLayout {
                    byte_range: line_start..pos,
                    width: line_width,
                });
                line_start = pos;
                line_width = 0.0;
            }
            seg_start = pos;
        }

        if line_start < text.len() || lines.is_empty() {
            lines.push(LineLayout {
                byte_range: line_start..text.len(),
                width: line_width,
            });
        }
        lines
    }

    /// Number of lines `text` occupies at `max_width`
    pub fn count_lines(&self, text: &str, max_width: f32, font_size: f32) -> usize {
        self.break_lines(text, max_width, font_size).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_breaker() -> LineBreaker {
        // 0.5em at 16px = 8px per character
        LineBreaker::new(FontMetrics::monospace(0.5))
    }

    #[test]
    fn test_empty_paragraph() {
        let lines = test_breaker().break_lines("", 100.0, 16.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].byte_range, 0..0);
    }

    #[test]
    fn test_single_line() {
        let lines = test_breaker().break_lines("Hello", 100.0, 16.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].byte_range, 0..5);
        assert_eq!(lines[0].width, 40.0);
    }

    #[test]
    fn test_line_wrap() {
        // With 8px per char, 40px width = 5 chars per line
        let lines = test_breaker().break_lines("Hello World", 40.0, 16.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_range, 0..6);
        assert_eq!(lines[1].byte_range, 6..11);
    }

    #[test]
    fn test_explicit_newline() {
        let lines = test_breaker().break_lines("Hello\nWorld", 1000.0, 16.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_range, 0..6);
        assert_eq!(lines[1].byte_range, 6..11);
    }

    #[test]
    fn test_emergency_break() {
        let lines = test_breaker().break_lines("abcdefghij", 40.0, 16.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_range, 0..5);
    }

    #[test]
    fn test_cjk_breaks_between_ideographs() {
        // 16px per ideograph, 48px fits three
        let lines = test_breaker().break_lines("一二三四五六", 48.0, 16.0);
        assert_eq!(lines.len(), 2);
    }
}
