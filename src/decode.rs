//! Byte buffer → decoded image.
//!
//! The reassembler emits raw byte buffers with no guarantee they form a
//! valid image — packet loss silently corrupts frames.  The decoder's
//! contract is therefore: return `Some` on success, `None` on any failure,
//! and never panic on malformed input.

use log::debug;

use crate::display::u32_color;

/// A decoded image with pixels packed as `0x00RRGGBB`, ready for the
/// display framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries.
    pub pixels: Vec<u32>,
}

impl Frame {
    /// Solid-color frame (overlay tests and placeholders).
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Write one pixel, ignoring out-of-bounds coordinates.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Read one pixel; `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[(y * self.width + x) as usize])
    }
}

/// Decodes an arbitrary byte buffer into a [`Frame`].
pub trait Decoder {
    /// `None` signals "could not decode"; implementations must not panic
    /// on malformed input.
    fn decode(&self, bytes: &[u8]) -> Option<Frame>;
}

/// Decoder backed by the `image` crate.
///
/// The camera sends JPEG, but `image::load_from_memory` sniffs the format
/// from the bytes, so anything the crate understands will display.
#[derive(Debug, Default)]
pub struct JpegDecoder;

impl Decoder for JpegDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<Frame> {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                debug!("decode failed for {}-byte buffer: {e}", bytes.len());
                return None;
            }
        };
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| u32_color(p[0], p[1], p[2]))
            .collect();
        Some(Frame {
            width,
            height,
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::ColorType;

    /// Encode a solid red `w`×`h` image as JPEG bytes.
    fn red_jpeg(w: u32, h: u32) -> Vec<u8> {
        let raw: Vec<u8> = (0..w * h).flat_map(|_| [220u8, 10, 10]).collect();
        let mut out = Vec::new();
        JpegEncoder::new(&mut out)
            .encode(&raw, w, h, ColorType::Rgb8)
            .expect("jpeg encode");
        out
    }

    #[test]
    fn garbage_bytes_decode_to_none() {
        assert_eq!(JpegDecoder.decode(b"definitely not a jpeg"), None);
        assert_eq!(JpegDecoder.decode(&[]), None);
    }

    #[test]
    fn truncated_jpeg_does_not_panic() {
        let bytes = red_jpeg(16, 16);
        // A frame that lost its tail in transit: either result is fine,
        // as long as the decoder does not panic.
        let _ = JpegDecoder.decode(&bytes[..bytes.len() / 2]);
    }

    #[test]
    fn valid_jpeg_decodes_with_correct_dimensions() {
        let frame = JpegDecoder.decode(&red_jpeg(16, 8)).expect("decode");
        assert_eq!((frame.width, frame.height), (16, 8));
        assert_eq!(frame.pixels.len(), 16 * 8);
        // JPEG is lossy; just check the image is predominantly red.
        let p = frame.pixels[0];
        assert!((p >> 16) & 0xff > 0x80, "red channel too low: {p:#08x}");
        assert!((p >> 8) & 0xff < 0x80, "green channel too high: {p:#08x}");
    }

    #[test]
    fn put_and_get_pixel_bounds() {
        let mut frame = Frame::filled(4, 4, 0);
        frame.put_pixel(1, 2, 0xff00ff);
        assert_eq!(frame.get_pixel(1, 2), Some(0xff00ff));
        assert_eq!(frame.get_pixel(4, 0), None);
        // Out-of-bounds writes are ignored, not panics.
        frame.put_pixel(100, 100, 0xffffff);
    }
}
