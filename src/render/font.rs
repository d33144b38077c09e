//! Bitmap text metrics over the `font8x8` basic glyph set
//!
//! Glyphs are 8x8 cells where bit 0 of each row is the leftmost column.
//! Row 7 holds descenders, so the baseline sits under row 6. Characters
//! outside the basic set render blank.

use font8x8::{UnicodeFonts, BASIC_FONTS};

pub const GLYPH_SIZE: u32 = 8;
/// Rows drawn above the baseline
pub const GLYPH_ASCENT: u32 = 7;

const BLANK: [u8; 8] = [0; 8];

/// Integer scale that makes glyphs roughly `size` pixels tall
pub fn scale_for(size: f32) -> u32 {
    ((size / GLYPH_SIZE as f32).floor() as u32).max(1)
}

/// Rendered width of `text` at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Row bitmaps for a character
pub fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS.get(c).unwrap_or(BLANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_tracks_font_size() {
        assert_eq!(scale_for(12.0), 1);
        assert_eq!(scale_for(14.0), 1);
        assert_eq!(scale_for(24.0), 3);
        assert_eq!(scale_for(48.0), 6);
        assert_eq!(scale_for(1.0), 1);
    }

    #[test]
    fn hud_text_has_glyphs() {
        for c in "Player 1: 100/100 Wins! Press R (punch/kick) +".chars() {
            if c != ' ' {
                assert_ne!(glyph(c), BLANK, "{c:?}");
            }
        }
    }

    #[test]
    fn characters_outside_the_basic_set_are_blank() {
        assert_eq!(glyph(' '), BLANK);
        assert_eq!(glyph('\u{2603}'), BLANK);
    }

    #[test]
    fn width_counts_characters() {
        assert_eq!(text_width("Wins!", 2), 5 * GLYPH_SIZE * 2);
        assert_eq!(text_width("", 3), 0);
    }
}
