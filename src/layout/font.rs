//! Font metrics for layout

/// Metrics needed for text layout, in em units
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Advance widths of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for other narrow characters
    pub default_width: f32,
    /// Width of East Asian wide characters
    pub wide_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // Rough proportional serif: narrow punctuation, wide capitals
        let mut char_widths = vec![0.5; 128];
        for c in 0u8..128 {
            let width = match c {
                b' ' => 0.25,
                b'i' | b'j' | b'l' | b'.' | b',' | b';' | b':' | b'!' | b'\'' | b'|' => 0.28,
                b'f' | b't' | b'r' | b'(' | b')' | b'[' | b']' | b'-' => 0.35,
                b'm' | b'w' => 0.75,
                b'M' | b'W' => 0.85,
                b'A'..=b'Z' => 0.65,
                b'0'..=b'9' => 0.5,
                _ if c.is_ascii_control() => 0.0,
                _ => 0.5,
            };
            char_widths[c as usize] = width;
        }

        Self {
            char_widths,
            default_width: 0.55,
            wide_width: 1.0,
        }
    }
}

impl FontMetrics {
    pub fn new(char_widths: Vec<f32>, default_width: f32, wide_width: f32) -> Self {
        Self {
            char_widths,
            default_width,
            wide_width,
        }
    }

    /// Monospace metrics where every narrow character has the same advance
    pub fn monospace(advance: f32) -> Self {
        Self::new(vec![advance; 128], advance, advance * 2.0)
    }

    /// Get width of a character in em
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        if c.is_control() {
            0.0
        } else if is_wide(c) {
            self.wide_width
        } else {
            self.default_width
        }
    }

    /// Width of a string in pixels at the given font size
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|c| self.width(c)).sum::<f32>() * font_size
    }
}

/// CJK ideographs, kana, hangul and full-width forms
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        let metrics = FontMetrics::default();
        assert!(metrics.width('M') > metrics.width('i'));
        assert_eq!(metrics.width('中'), 1.0);
        assert_eq!(metrics.width('。'), 1.0);
        assert_eq!(metrics.width('\n'), 0.0);
    }

    #[test]
    fn test_text_width_scales_with_font_size() {
        let metrics = FontMetrics::monospace(0.5);
        assert_eq!(metrics.text_width("abcd", 16.0), 32.0);
        assert_eq!(metrics.text_width("abcd", 8.0), 16.0);
    }
}
