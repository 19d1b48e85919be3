//! Window rendering, text overlay, and key polling.
//!
//! [`MinifbScreen`] owns the viewer window.  Each [`Screen::show`] call
//! pushes one frame to the window and polls the keyboard with `minifb`'s
//! short non-blocking update, reporting whether Escape was pressed or the
//! window was closed — the viewer loop's cooperative exit check.
//!
//! `minifb` has no text API, so the overlay is rasterised from a built-in
//! 5×7 glyph table covering the characters the FPS readout needs.  Overlay
//! drawing is a pure function over the pixel buffer ([`draw_overlay`]) so
//! it can be tested without opening a window.

use minifb::{Key, Window, WindowOptions};
use thiserror::Error;

use crate::decode::Frame;

/// Pack 8-bit RGB channels into the `0x00RRGGBB` layout minifb expects.
pub fn u32_color(r: u8, g: u8, b: u8) -> u32 {
    u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// A text overlay: string, position, font size, color, thickness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub text: String,
    /// Top-left corner of the first glyph, in frame pixels.
    pub origin: (u32, u32),
    /// Pixel multiplier per glyph cell (1 = 5×7 pixels per character).
    pub scale: u32,
    /// Packed `0x00RRGGBB` text color.
    pub color: u32,
    /// Stroke thickness in pixels; values above 1 bold the glyphs.
    pub thickness: u32,
}

impl Overlay {
    /// Green overlay at the conventional top-left readout position.
    pub fn readout(text: String) -> Self {
        Self {
            text,
            origin: (10, 25),
            scale: 2,
            color: u32_color(0, 255, 0),
            thickness: 2,
        }
    }
}

/// 5×7 bitmap glyphs for the FPS readout character set.  Each byte is one
/// row; bit 4 is the leftmost column.  Unknown characters render as blank.
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'F' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10],
        'P' => [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10],
        'S' => [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e],
        ':' => [0x00, 0x0c, 0x0c, 0x00, 0x0c, 0x0c, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c],
        _ => [0; 7],
    }
}

/// Glyph cell width in font units, including one column of spacing.
const GLYPH_ADVANCE: u32 = 6;

/// Rasterise `overlay` onto `frame`.  Pixels falling outside the frame are
/// clipped silently.
pub fn draw_overlay(frame: &mut Frame, overlay: &Overlay) {
    let scale = overlay.scale.max(1);
    let thickness = overlay.thickness.max(1);
    let (ox, oy) = overlay.origin;

    for (i, c) in overlay.text.chars().enumerate() {
        let rows = glyph(c);
        let cx = ox + i as u32 * GLYPH_ADVANCE * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                // One font pixel becomes a scale×scale block, smeared by
                // the thickness to bold the stroke.
                let px = cx + col * scale;
                let py = oy + row as u32 * scale;
                for dy in 0..scale + thickness - 1 {
                    for dx in 0..scale + thickness - 1 {
                        frame.put_pixel(px + dx, py + dy, overlay.color);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Errors from the windowing layer.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

/// What the key poll observed during a display cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPoll {
    /// No exit-relevant key pressed.
    None,
    /// Escape pressed — the viewer should shut down.
    Escape,
    /// The window was closed by the user; treated like Escape.
    Closed,
}

/// Renders decoded frames and reports key presses.
pub trait Screen {
    fn show(&mut self, frame: &Frame, overlay: Option<&Overlay>) -> Result<KeyPoll, DisplayError>;
}

/// A `minifb` window, created lazily on the first frame so its size can
/// match the stream.
pub struct MinifbScreen {
    title: String,
    window: Option<Window>,
}

impl MinifbScreen {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            window: None,
        }
    }
}

impl Screen for MinifbScreen {
    fn show(&mut self, frame: &Frame, overlay: Option<&Overlay>) -> Result<KeyPoll, DisplayError> {
        let mut window = match self.window.take() {
            Some(w) => w,
            None => Window::new(
                &self.title,
                frame.width as usize,
                frame.height as usize,
                WindowOptions::default(),
            )?,
        };

        if !window.is_open() {
            return Ok(KeyPoll::Closed);
        }

        // Overlay is drawn into a scratch copy; the decoded frame stays
        // untouched.
        let buffer = match overlay {
            Some(overlay) => {
                let mut scratch = frame.clone();
                draw_overlay(&mut scratch, overlay);
                scratch.pixels
            }
            None => frame.pixels.clone(),
        };

        // update_with_buffer also pumps the event loop and key state.
        window.update_with_buffer(&buffer, frame.width as usize, frame.height as usize)?;

        let poll = if window.is_key_down(Key::Escape) {
            KeyPoll::Escape
        } else {
            KeyPoll::None
        };
        self.window = Some(window);
        Ok(poll)
    }
}
