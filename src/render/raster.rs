//! Software rasterizer drawing into an RGBA8 buffer

use super::font::{glyph, scale_for, text_width, GLYPH_ASCENT, GLYPH_SIZE};
use super::{Canvas, Color, Rect, TextAlign, TextStyle};

/// RGBA8 frame, row-major, 4 bytes per pixel, drawn over a borrowed
/// buffer such as a window's pixel surface.
pub struct FrameBuffer<B> {
    buf: B,
    width: u32,
    height: u32,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuffer<B> {
    /// Draw into an existing buffer; returns None when the sizes disagree
    pub fn wrap(buf: B, width: u32, height: u32) -> Option<Self> {
        if buf.as_ref().len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self { buf, width, height })
    }

    /// Pixel span covered by [start, start + len), clipped to [0, limit)
    fn span(start: f32, len: f32, limit: u32) -> (u32, u32) {
        let from = start.round().clamp(0.0, limit as f32) as u32;
        let to = (start + len).round().clamp(0.0, limit as f32) as u32;
        (from, to.max(from))
    }

    fn blend(dst: &mut [u8], color: Color) {
        let a = color.a as u32;
        if a == 0xff {
            dst.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
            return;
        }
        let inv = 0xff - a;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = (a + (dst[3] as u32 * inv + 127) / 255).min(0xff) as u8;
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Canvas for FrameBuffer<B> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color.a == 0 || rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(rect.x, rect.w, self.width);
        let (y0, y1) = Self::span(rect.y, rect.h, self.height);
        let width = self.width;
        let buf = self.buf.as_mut();

        for y in y0..y1 {
            let row = (y * width) as usize * 4;
            for x in x0..x1 {
                let idx = row + x as usize * 4;
                Self::blend(&mut buf[idx..idx + 4], color);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        if line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let outer_x = rect.x - half;
        let outer_w = rect.w + line_width;
        let inner_h = (rect.h - line_width).max(0.0);

        self.fill_rect(Rect::new(outer_x, rect.y - half, outer_w, line_width), color);
        self.fill_rect(
            Rect::new(outer_x, rect.bottom() - half, outer_w, line_width),
            color,
        );
        self.fill_rect(Rect::new(outer_x, rect.y + half, line_width, inner_h), color);
        self.fill_rect(
            Rect::new(rect.right() - half, rect.y + half, line_width, inner_h),
            color,
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let scale = scale_for(style.size);
        let cell = scale as f32;
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - text_width(text, scale) as f32 / 2.0,
        };
        let top = y - (GLYPH_ASCENT * scale) as f32;

        for (i, c) in text.chars().enumerate() {
            let origin_x = left + (i as u32 * GLYPH_SIZE * scale) as f32;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    self.fill_rect(
                        Rect::new(
                            origin_x + col as f32 * cell,
                            top + row as f32 * cell,
                            cell,
                            cell,
                        ),
                        style.color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
impl FrameBuffer<Vec<u8>> {
    /// Owned, fully transparent frame
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            buf: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    pub(crate) fn pixels(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = &self.buf[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}
