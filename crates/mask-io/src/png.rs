//! PNG format support.
//!
//! Every PNG layout (palette, gray, gray+alpha, RGB, RGBA, 1 to 16 bits) is
//! decoded to RGBA8. Missing alpha becomes 255, gray is replicated into R, G
//! and B. 16-bit samples keep their high byte.
//!
//! Images are always written as 8-bit RGBA. The sRGB chunk is emitted only
//! when the image's [`TextureSettings::srgb`](mask_core::TextureSettings) is set.
//!
//! # Example
//!
//! ```rust,ignore
//! use mask_io::png;
//!
//! let image = png::read("input.png")?;
//! png::write("output.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use mask_core::{Image, TextureSettings};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let file = File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

/// Decodes PNG bytes held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(Cursor::new(bytes))
}

fn decode_from<R: std::io::BufRead + std::io::Seek>(source: R) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let samples = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => samples.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => samples
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            samples.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => samples
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(IoError::DecodeError(format!(
                "unsupported pixel layout {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    let image = Image::from_rgba_bytes(info.width, info.height, &rgba)
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    Ok(image.with_settings(TextureSettings::default()))
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    encode_into(BufWriter::new(file), image)
}

/// Encodes an image to PNG bytes.
pub fn encode(image: &Image) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(&mut out, image)?;
    Ok(out)
}

fn encode_into<W: Write>(writer: W, image: &Image) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    if image.settings().srgb {
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);
    }

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&image.to_rgba_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut w = encoder.write_header().unwrap();
            w.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_roundtrip_rgba() {
        let image = Image::from_fn(16, 8, |x, y| [(x * 16) as u8, (y * 32) as u8, 64, 200]);
        let bytes = encode(&image).unwrap();
        let loaded = decode(&bytes).unwrap();

        assert_eq!(loaded.dimensions(), (16, 8));
        assert_eq!(loaded.pixels(), image.pixels());
    }

    #[test]
    fn test_grayscale_expands_with_opaque_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::Grayscale, &[10, 200]);
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.pixels(), &[[10, 10, 10, 255], [200, 200, 200, 255]]);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, &[1, 2, 3]);
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.pixels(), &[[1, 2, 3, 255]]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
