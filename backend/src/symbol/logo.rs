//! Branding overlay for rendered symbols.
//!
//! The logo is scaled to a fifth of the symbol's side and drawn over the
//! center on top of an opaque white ellipse that keeps contrast against
//! the surrounding dark modules. Compositing necessarily occludes modules,
//! so callers must re-run the readability gate on the result and abort the
//! issuance when it no longer decodes.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Padding of the opaque backing beyond the logo bounding box, in pixels.
const BACKING_PADDING: i64 = 10;

/// Returns a copy of `symbol` with `logo` composited over its center.
pub fn embed(symbol: &RgbaImage, logo: &DynamicImage) -> RgbaImage {
    let (width, height) = symbol.dimensions();

    // Exact-fit scale to 20% of the symbol, matching the backing geometry.
    let logo_w = (width / 5).max(1);
    let logo_h = (height / 5).max(1);
    let scaled = imageops::resize(&logo.to_rgba8(), logo_w, logo_h, FilterType::Lanczos3);

    let mut composited = symbol.clone();

    let corner_x = (width as i64 - logo_w as i64) / 2;
    let corner_y = (height as i64 - logo_h as i64) / 2;
    fill_ellipse(
        &mut composited,
        corner_x - BACKING_PADDING,
        corner_y - BACKING_PADDING,
        logo_w as i64 + 2 * BACKING_PADDING,
        logo_h as i64 + 2 * BACKING_PADDING,
    );

    imageops::overlay(&mut composited, &scaled, corner_x, corner_y);
    composited
}

/// Paints an opaque white ellipse inscribed in the given bounding box,
/// clipped to the image bounds.
fn fill_ellipse(image: &mut RgbaImage, x0: i64, y0: i64, w: i64, h: i64) {
    let (width, height) = image.dimensions();
    let cx = x0 as f64 + w as f64 / 2.0;
    let cy = y0 as f64 + h as f64 / 2.0;
    let rx = w as f64 / 2.0;
    let ry = h as f64 / 2.0;

    for y in y0.max(0)..(y0 + h).min(height as i64) {
        for x in x0.max(0)..(x0 + w).min(width as i64) {
            let nx = (x as f64 + 0.5 - cx) / rx;
            let ny = (y as f64 + 0.5 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                image.put_pixel(x as u32, y as u32, Rgba([255, 255, 255, 255]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::embed;
    use crate::symbol::codec::{encode, verify};
    use image::{DynamicImage, Rgba, RgbaImage};
    use qrcode::EcLevel;

    fn solid_logo(side: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(side, side, Rgba([30, 90, 200, 255])))
    }

    #[test]
    fn composited_symbol_keeps_dimensions() {
        let symbol = encode("https://example.com", 300, EcLevel::M).unwrap();
        let out = embed(&symbol, &solid_logo(128));
        assert_eq!(out.dimensions(), symbol.dimensions());
    }

    #[test]
    fn large_symbol_survives_compositing() {
        // 20% occlusion is well inside what level H can correct.
        let symbol = encode("https://example.com", 400, EcLevel::H).unwrap();
        let out = embed(&symbol, &solid_logo(100));
        assert!(verify(&out));
    }

    #[test]
    fn tiny_symbol_is_destroyed_by_compositing() {
        // At minimum size the backing ellipse swallows nearly the whole
        // symbol; the verifier must report it unreadable.
        let symbol = encode("https://example.com", 1, EcLevel::H).unwrap();
        let out = embed(&symbol, &solid_logo(100));
        assert!(!verify(&out));
    }

    #[test]
    fn center_pixels_are_overwritten() {
        let symbol = encode("https://example.com", 300, EcLevel::H).unwrap();
        let out = embed(&symbol, &solid_logo(64));
        let center = out.get_pixel(150, 150);
        assert_eq!(*center, Rgba([30, 90, 200, 255]));
    }
}
