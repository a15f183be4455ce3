//! Indicator colours.
//!
//! A [`Color`] is an immutable `(r, g, b, brightness)` value.  Components
//! are 0–255; brightness is a factor in `[0, 1]` applied when the colour
//! is written out, so the palette can stay at full-scale component values.

/// Colour as (R, G, B) tuple, each 0–255, after brightness scaling.
pub type Rgb = (u8, u8, u8);

/// Brightness of the whole palette (25 %).
const LOW: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub brightness: f32,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, brightness: f32) -> Self {
        Self { r, g, b, brightness }
    }

    /// Same hue at another brightness, clamped to `[0, 1]`.
    pub fn with_brightness(self, brightness: f32) -> Self {
        Self {
            brightness: brightness.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Output components with brightness applied (truncating).
    pub fn scaled(&self) -> Rgb {
        let k = self.brightness.clamp(0.0, 1.0);
        (
            (f32::from(self.r) * k) as u8,
            (f32::from(self.g) * k) as u8,
            (f32::from(self.b) * k) as u8,
        )
    }

    /// True if this colour emits no light once scaled.
    pub fn is_dark(&self) -> bool {
        self.scaled() == (0, 0, 0)
    }
}

// ── Palette ────────────────────────────────────────────────────

pub const OFF: Color = Color::new(0, 0, 0, 0.0);
/// Idle and running cycle.
pub const GREEN_LOW: Color = Color::new(0, 255, 0, LOW);
/// Button held, Training.
pub const BLUE_LOW: Color = Color::new(0, 0, 255, LOW);
/// Stop-to-idle and error flash.
pub const RED_LOW: Color = Color::new(255, 0, 0, LOW);
/// Training saved.
pub const ORANGE_LOW: Color = Color::new(255, 165, 0, LOW);
