//! QR symbol codec: payload text to raster image and back.
//!
//! Rendering draws the module matrix directly into an RGBA buffer with a
//! zero quiet-zone margin, scaling modules by an integer factor and
//! centering the symbol inside the requested square. Decoding grayscales
//! the input and re-adds a white border before detection, since zero-margin
//! renders and tightly cropped scans carry no quiet zone of their own.

use crate::error::{Error, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use qrcode::{Color, EcLevel, QrCode};

/// Side length used when the caller does not supply one.
pub const DEFAULT_SIZE: u32 = 300;
/// Error-correction level used when the caller's value is absent or not
/// one of `L`/`M`/`Q`/`H`.
pub const DEFAULT_EC_LEVEL: EcLevel = EcLevel::M;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Maps a caller-supplied error-correction string to a level,
/// case-insensitively. Anything unrecognized falls back to the default.
pub fn level_from_param(value: Option<&str>) -> EcLevel {
    match value {
        None => DEFAULT_EC_LEVEL,
        Some(raw) => match raw.to_ascii_uppercase().as_str() {
            "L" => EcLevel::L,
            "M" => EcLevel::M,
            "Q" => EcLevel::Q,
            "H" => EcLevel::H,
            _ => DEFAULT_EC_LEVEL,
        },
    }
}

/// Canonical single-letter name of a level, as persisted on records.
pub fn level_name(level: EcLevel) -> &'static str {
    match level {
        EcLevel::L => "L",
        EcLevel::M => "M",
        EcLevel::Q => "Q",
        EcLevel::H => "H",
    }
}

/// Renders `payload` as a two-color square symbol of `size` pixels per
/// side (or the matrix width, whichever is larger), zero margin.
///
/// Fails with `InvalidArgument` for an empty payload or zero size, and
/// with `Render` when the payload exceeds the symbol capacity at `level`.
pub fn encode(payload: &str, size: u32, level: EcLevel) -> Result<RgbaImage> {
    if payload.is_empty() {
        return Err(Error::InvalidArgument("payload must not be empty".into()));
    }
    if size == 0 {
        return Err(Error::InvalidArgument("size must be positive".into()));
    }

    let code = QrCode::with_error_correction_level(payload, level)
        .map_err(|e| Error::Render(e.to_string()))?;
    let modules = code.to_colors();
    let width = code.width() as u32;

    // Integer module scaling, symbol centered; the leftover from a
    // non-divisible size becomes an even white frame.
    let side = size.max(width);
    let scale = side / width;
    let offset = (side - width * scale) / 2;

    let mut image = RgbaImage::from_pixel(side, side, WHITE);
    for (index, module) in modules.iter().enumerate() {
        if *module != Color::Dark {
            continue;
        }
        let mx = index as u32 % width;
        let my = index as u32 / width;
        for dy in 0..scale {
            for dx in 0..scale {
                image.put_pixel(offset + mx * scale + dx, offset + my * scale + dy, BLACK);
            }
        }
    }

    Ok(image)
}

/// Recovers the payload text from a rendered or scanned symbol image.
///
/// Best effort: grayscale, pad a white border, detect grids, decode the
/// first one. Fails with `Decode` when no readable symbol is present.
pub fn decode(image: &DynamicImage) -> Result<String> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Decode("empty image".into()));
    }

    // Detection needs a quiet zone; give every input one.
    let border = (width.max(height) / 10).max(8);
    let padded_w = (width + 2 * border) as usize;
    let padded_h = (height + 2 * border) as usize;
    let border = border as usize;

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(padded_w, padded_h, |x, y| {
        if x < border || y < border {
            return 255;
        }
        let (ix, iy) = ((x - border) as u32, (y - border) as u32);
        if ix >= width || iy >= height {
            return 255;
        }
        gray.get_pixel(ix, iy).0[0]
    });

    let grids = prepared.detect_grids();
    let grid = grids
        .first()
        .ok_or_else(|| Error::Decode("no symbol found in image".into()))?;
    let (_meta, content) = grid
        .decode()
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(content)
}

/// Readability gate: attempt a decode of the final rendered artifact.
///
/// No retries and no size escalation: a failure means the issuance as a
/// whole must abort before anything is persisted.
pub fn verify(image: &RgbaImage) -> bool {
    decode(&DynamicImage::ImageRgba8(image.clone())).is_ok()
}

/// Losslessly encodes the rendered symbol for the wire, flattened to RGB.
pub fn to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let (width, height) = rgb.dimensions();
    let raw = rgb.into_raw();

    let mut bytes = Vec::new();
    let mut encoder = PngEncoder::new(&mut bytes, width, height);
    encoder.set_color(PngColorType::Rgb);
    encoder.set_depth(PngBitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| Error::Render(e.to_string()))?;
    writer
        .write_image_data(&raw)
        .map_err(|e| Error::Render(e.to_string()))?;
    drop(writer);

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_default_size() {
        let payload = "https://example.com/path?x=1";
        let image = encode(payload, DEFAULT_SIZE, DEFAULT_EC_LEVEL).unwrap();
        assert_eq!(image.dimensions(), (DEFAULT_SIZE, DEFAULT_SIZE));
        let decoded = decode(&DynamicImage::ImageRgba8(image)).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn round_trips_at_every_level() {
        for level in [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H] {
            let image = encode("https://example.com", 240, level).unwrap();
            let decoded = decode(&DynamicImage::ImageRgba8(image)).unwrap();
            assert_eq!(decoded, "https://example.com");
        }
    }

    #[test]
    fn verify_accepts_fresh_renders() {
        let image = encode("hello", 200, EcLevel::H).unwrap();
        assert!(verify(&image));
    }

    #[test]
    fn tiny_size_falls_back_to_matrix_width() {
        let image = encode("hello", 1, EcLevel::L).unwrap();
        let (w, h) = image.dimensions();
        assert_eq!(w, h);
        assert!(w >= 21, "smallest symbol is 21 modules, got {}", w);
    }

    #[test]
    fn empty_payload_is_invalid() {
        assert!(matches!(
            encode("", 300, DEFAULT_EC_LEVEL),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(matches!(
            encode("hello", 0, DEFAULT_EC_LEVEL),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_payload_is_a_render_error() {
        let payload = "x".repeat(3000);
        assert!(matches!(
            encode(&payload, 300, EcLevel::H),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn level_parsing_is_case_insensitive_with_default() {
        assert_eq!(level_from_param(None), EcLevel::M);
        assert_eq!(level_from_param(Some("h")), EcLevel::H);
        assert_eq!(level_from_param(Some("Q")), EcLevel::Q);
        assert_eq!(level_from_param(Some("l")), EcLevel::L);
        assert_eq!(level_from_param(Some("banana")), EcLevel::M);
    }

    #[test]
    fn decode_rejects_blank_images() {
        let blank = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            120,
            120,
            Rgba([255, 255, 255, 255]),
        ));
        assert!(matches!(decode(&blank), Err(Error::Decode(_))));
    }

    #[test]
    fn png_bytes_reload_to_the_same_symbol() {
        let image = encode("https://example.com", 150, EcLevel::M).unwrap();
        let bytes = to_png_bytes(&image).unwrap();
        let reloaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decode(&reloaded).unwrap(), "https://example.com");
    }
}
