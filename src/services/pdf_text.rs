use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FingertipError, Result};
use crate::text_map::{Glyph, GlyphBounds};

/// Configuration for rendering a PDF page
pub struct PageRenderConfig {
    pub width: i32,
    pub height: i32,
    pub stride: usize,
}

/// A rasterized page in BGRA order
pub struct RenderedPage {
    pub page_index: usize,
    pub pixels: Vec<u8>,
    pub config: PageRenderConfig,
    /// Pixels per PDF point actually used for this page
    pub scale: f64,
}

/// Bind to libpdfium, trying the configured path first, then `./`, then the system library
pub fn bind_pdfium(library: Option<&Path>) -> Result<&'static Pdfium> {
    let bindings = match library {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(FingertipError::PdfiumBinding)?;

    Ok(Box::leak(Box::new(Pdfium::new(bindings))))
}

pub fn load_document(pdfium: &'static Pdfium, path: &Path) -> Result<PdfDocument<'static>> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|source| FingertipError::DocumentLoad {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), pages = page_count(&document), "document loaded");
    Ok(document)
}

pub fn page_count(document: &PdfDocument) -> usize {
    document.pages().len() as usize
}

/// Extract every non-whitespace character of the document in reading order.
///
/// Each pdfium text segment is treated as one laid-out line: its top edge becomes
/// the `line_y` of all of its characters. pdfium may split one visual line into
/// several segments where fonts or styles change, and when those segments report
/// different tops the line is indexed as several lines.
pub fn extract_glyphs(document: &PdfDocument) -> Vec<Glyph> {
    let mut glyphs = Vec::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        let page_height = page.height().value as f64;

        let text_page = match page.text() {
            Ok(tp) => tp,
            Err(e) => {
                warn!(page = page_index, "no text layer: {e}");
                continue;
            }
        };

        let before = glyphs.len();
        for segment in text_page.segments().iter() {
            let line_y = to_page_y(segment.bounds().top().value as f64, page_height);

            let chars = match segment.chars() {
                Ok(chars) => chars,
                Err(e) => {
                    warn!(page = page_index, "unreadable text segment: {e}");
                    continue;
                }
            };

            for char_obj in chars.iter() {
                let Some(character) = char_obj.unicode_char() else {
                    continue;
                };
                if character.is_whitespace() {
                    continue;
                }
                let Ok(bounds) = char_obj.loose_bounds() else {
                    continue;
                };

                glyphs.push(Glyph::new(
                    page_index,
                    character,
                    pdf_rect_to_page_bounds(&bounds, page_height),
                    line_y,
                ));
            }
        }

        debug!(page = page_index, glyphs = glyphs.len() - before, "page text extracted");
    }

    glyphs
}

/// Flip a PDF y coordinate (origin bottom-left) into page space (origin top-left)
pub fn to_page_y(pdf_y: f64, page_height: f64) -> f64 {
    page_height - pdf_y
}

fn pdf_rect_to_page_bounds(rect: &PdfRect, page_height: f64) -> GlyphBounds {
    flip_bounds(
        rect.left().value as f64,
        rect.bottom().value as f64,
        rect.right().value as f64,
        rect.top().value as f64,
        page_height,
    )
}

fn flip_bounds(left: f64, bottom: f64, right: f64, top: f64, page_height: f64) -> GlyphBounds {
    GlyphBounds::new(
        left,
        to_page_y(top, page_height),
        right,
        to_page_y(bottom, page_height),
    )
}

/// Render a page at `scale` pixels per point
pub fn render_page(document: &PdfDocument, page_index: usize, scale: f64) -> Result<RenderedPage> {
    if page_index >= page_count(document) {
        return Err(FingertipError::PageOutOfRange(page_index));
    }

    let render_error = |source| FingertipError::PageRender {
        page: page_index,
        source,
    };

    let page = document
        .pages()
        .get(page_index as u16)
        .map_err(render_error)?;

    let page_width_pts = page.width().value as f64;
    let config = create_render_config(page_width_pts, scale);
    let bitmap = page.render_with_config(&config).map_err(render_error)?;

    let config = calculate_page_dimensions(&bitmap);
    let actual_scale = config.width as f64 / page_width_pts;

    debug!(page = page_index, width = config.width, height = config.height, "page rendered");

    Ok(RenderedPage {
        page_index,
        pixels: bitmap.as_raw_bytes(),
        config,
        scale: actual_scale,
    })
}

fn render_width_for_scale(page_width_pts: f64, scale: f64) -> i32 {
    (page_width_pts * scale).round().max(1.0) as i32
}

pub fn calculate_page_dimensions(bitmap: &PdfBitmap) -> PageRenderConfig {
    let width = bitmap.width();
    let height = bitmap.height();
    PageRenderConfig {
        width,
        height,
        stride: (width * 4) as usize,
    }
}

pub fn create_render_config(page_width_pts: f64, scale: f64) -> PdfRenderConfig {
    PdfRenderConfig::new()
        .set_target_width(render_width_for_scale(page_width_pts, scale))
        .set_format(PdfBitmapFormat::BGRA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_page_y_flips_axis() {
        assert_eq!(to_page_y(792.0, 792.0), 0.0);
        assert_eq!(to_page_y(0.0, 792.0), 792.0);
        assert_eq!(to_page_y(700.0, 792.0), 92.0);
    }

    #[test]
    fn test_flip_bounds_puts_top_first() {
        let bounds = flip_bounds(10.0, 690.0, 16.0, 702.0, 792.0);
        assert_eq!(bounds, GlyphBounds::new(10.0, 90.0, 16.0, 102.0));
        assert!(bounds.y0 < bounds.y1);
        assert_eq!(bounds.y1 - bounds.y0, 12.0);
    }

    #[test]
    fn test_render_width_follows_scale() {
        assert_eq!(render_width_for_scale(612.0, 2.0), 1224);
        assert_eq!(render_width_for_scale(612.0, 0.5), 306);
        assert_eq!(render_width_for_scale(0.0, 2.0), 1);
    }
}
