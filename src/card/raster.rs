//! Raster drawing surface backed by `image` + `imageproc`, text via `ab_glyph`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use tracing::{debug, info};

use super::{Baseline, Color, DrawingSurface, FontWeight, Rect, TextAlign, TextStyle};
use crate::config::CardConfig;
use crate::errors::{AppError, AppResult};

/// Regular, bold, italic candidates tried when no font path is configured
const SYSTEM_FONT_CANDIDATES: &[(&str, &str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    ),
];

/// Fonts used on the card
pub struct CardFonts {
    regular: FontVec,
    bold: FontVec,
    italic: Option<FontVec>,
}

impl std::fmt::Debug for CardFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardFonts")
            .field("has_italic", &self.italic.is_some())
            .finish()
    }
}

impl CardFonts {
    pub fn new(regular: FontVec, bold: FontVec, italic: Option<FontVec>) -> Self {
        Self {
            regular,
            bold,
            italic,
        }
    }

    fn for_weight(&self, weight: FontWeight) -> &FontVec {
        match weight {
            FontWeight::Regular | FontWeight::Medium => &self.regular,
            FontWeight::Bold => &self.bold,
            FontWeight::Italic => self.italic.as_ref().unwrap_or(&self.regular),
        }
    }
}

fn read_font(path: &Path) -> AppResult<FontVec> {
    let data = fs::read(path)
        .map_err(|e| AppError::FileSystem(format!("Failed to read font {}: {}", path.display(), e)))?;
    FontVec::try_from_vec(data)
        .map_err(|e| AppError::Config(format!("Invalid font {}: {}", path.display(), e)))
}

/// Load the card fonts from the configured paths, falling back to common
/// system font locations
pub fn load_fonts(config: &CardConfig) -> AppResult<CardFonts> {
    if let Some(regular_path) = &config.font_path {
        let regular = read_font(Path::new(regular_path))?;
        let bold = match &config.bold_font_path {
            Some(path) => read_font(Path::new(path))?,
            None => read_font(Path::new(regular_path))?,
        };
        let italic = match &config.italic_font_path {
            Some(path) => Some(read_font(Path::new(path))?),
            None => None,
        };
        info!(font_path = %regular_path, "Loaded configured card fonts");
        return Ok(CardFonts::new(regular, bold, italic));
    }

    for (regular, bold, italic) in SYSTEM_FONT_CANDIDATES {
        if !Path::new(regular).exists() {
            continue;
        }

        let regular_font = read_font(Path::new(regular))?;
        let bold_font = if Path::new(bold).exists() {
            read_font(Path::new(bold))?
        } else {
            read_font(Path::new(regular))?
        };
        let italic_font = if Path::new(italic).exists() {
            Some(read_font(Path::new(italic))?)
        } else {
            None
        };

        info!(font_path = %regular, "Loaded system card fonts");
        return Ok(CardFonts::new(regular_font, bold_font, italic_font));
    }

    Err(AppError::Config(
        "No suitable font found for recipe cards. Set CARD_FONT_PATH to a TrueType font."
            .to_string(),
    ))
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

fn blend(base: Rgba<u8>, color: Color, coverage: f32) -> Rgba<u8> {
    let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * alpha).round() as u8;
    Rgba([
        mix(base[0], color.r),
        mix(base[1], color.g),
        mix(base[2], color.b),
        base[3].max((alpha * 255.0).round() as u8),
    ])
}

/// Card canvas drawn in memory
pub struct RasterSurface<'a> {
    image: RgbaImage,
    fonts: &'a CardFonts,
}

impl<'a> RasterSurface<'a> {
    pub fn new(width: u32, height: u32, fonts: &'a CardFonts) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            fonts,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        let scaled = self.fonts.for_weight(style.weight).as_scaled(PxScale::from(style.size));
        scaled.ascent() - scaled.descent()
    }
}

impl DrawingSurface for RasterSurface<'_> {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn measure_text(&self, text: &str, style: TextStyle) -> f32 {
        let scaled = self.fonts.for_weight(style.weight).as_scaled(PxScale::from(style.size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        width
    }

    fn fill_vertical_gradient(&mut self, top: Color, bottom: Color) {
        let height = self.image.height().max(2) - 1;
        for (_, y, pixel) in self.image.enumerate_pixels_mut() {
            let t = y as f32 / height as f32;
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            *pixel = Rgba([
                lerp(top.r, bottom.r),
                lerp(top.g, bottom.g),
                lerp(top.b, bottom.b),
                lerp(top.a, bottom.a),
            ]);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.width < 1.0 || rect.height < 1.0 {
            return;
        }
        draw_filled_rect_mut(
            &mut self.image,
            imageproc::rect::Rect::at(rect.x.round() as i32, rect.y.round() as i32)
                .of_size(rect.width.round() as u32, rect.height.round() as u32),
            to_rgba(color),
        );
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);

        self.fill_rect(
            Rect {
                x: rect.x + r,
                y: rect.y,
                width: rect.width - 2.0 * r,
                height: rect.height,
            },
            color,
        );
        self.fill_rect(
            Rect {
                x: rect.x,
                y: rect.y + r,
                width: rect.width,
                height: rect.height - 2.0 * r,
            },
            color,
        );

        let radius_px = r.round() as i32;
        let left = (rect.x + r).round() as i32;
        let right = (rect.x + rect.width - r).round() as i32 - 1;
        let top = (rect.y + r).round() as i32;
        let bottom = (rect.y + rect.height - r).round() as i32 - 1;
        for center in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            draw_filled_circle_mut(&mut self.image, center, radius_px, to_rgba(color));
        }
    }

    fn drop_shadow(&mut self, rect: Rect, radius: f32, offset_y: f32, blur: f32, color: Color) {
        let shadow = Rect {
            y: rect.y + offset_y,
            ..rect
        };
        let (width, height) = (self.image.width() as i64, self.image.height() as i64);
        let x0 = ((shadow.x - blur).floor() as i64).max(0);
        let x1 = ((shadow.x + shadow.width + blur).ceil() as i64).min(width);
        let y0 = ((shadow.y - blur).floor() as i64).max(0);
        let y1 = ((shadow.y + shadow.height + blur).ceil() as i64).min(height);

        let inner_left = shadow.x + radius;
        let inner_right = shadow.x + shadow.width - radius;
        let inner_top = shadow.y + radius;
        let inner_bottom = shadow.y + shadow.height - radius;

        for y in y0..y1 {
            for x in x0..x1 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let dx = (inner_left - px).max(px - inner_right).max(0.0);
                let dy = (inner_top - py).max(py - inner_bottom).max(0.0);
                // Signed distance outside the rounded rectangle
                let distance = (dx * dx + dy * dy).sqrt() - radius;
                if distance >= blur {
                    continue;
                }
                let coverage = if distance <= 0.0 {
                    1.0
                } else {
                    1.0 - distance / blur
                };
                let pixel = self.image.get_pixel_mut(x as u32, y as u32);
                *pixel = blend(*pixel, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }
        // Unit normal; parallel 1 px segments make up the stroke width
        let (nx, ny) = (-dy / length, dx / length);
        let strokes = width.round().max(1.0) as i32;
        for i in 0..strokes {
            let offset = i as f32 - (strokes - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + nx * offset, from.1 + ny * offset),
                (to.0 + nx * offset, to.1 + ny * offset),
                to_rgba(color),
            );
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
        align: TextAlign,
        baseline: Baseline,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }

        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - self.measure_text(text, style) / 2.0,
        };
        let top = match baseline {
            Baseline::Top => y,
            Baseline::Middle => y - self.line_height(style) / 2.0,
        };

        draw_text_mut(
            &mut self.image,
            to_rgba(color),
            left.round() as i32,
            top.round() as i32,
            PxScale::from(style.size),
            self.fonts.for_weight(style.weight),
            text,
        );
    }

    fn encode_png(&self) -> Result<Vec<u8>, String> {
        let mut png = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| e.to_string())?;
        debug!(png_bytes = png.len(), "Encoded recipe card");
        Ok(png)
    }
}
