use alloc::format;
use alloc::string::String;

use serde_json::Value;

use super::Transform;

// -----------------------------------------------------------------------------
// Rgba

/// A color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

// -----------------------------------------------------------------------------
// HexColorTransform

/// Converts `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA` strings to [`Rgba`].
///
/// The leading `#` is optional on input. Output is `RRGGBB`, with the `#`
/// and the alpha byte only when requested.
///
/// ```
/// use mapkit_model::transform::{HexColorTransform, Rgba, Transform};
/// use serde_json::json;
///
/// let t = HexColorTransform::new(true, false);
/// let red = t.from_document(&json!("#F00")).unwrap();
/// assert_eq!(red, Rgba::new(1.0, 0.0, 0.0, 1.0));
/// assert_eq!(t.to_document(&red), Some(json!("#FF0000")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HexColorTransform {
    prefix: bool,
    alpha: bool,
}

impl HexColorTransform {
    pub const fn new(prefix: bool, alpha: bool) -> Self {
        Self { prefix, alpha }
    }

    fn parse(hex: &str) -> Option<Rgba> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;

        let nibble = |shift: u32| ((value >> shift) & 0xF) as f32 / 15.0;
        let byte = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;

        match hex.len() {
            3 => Some(Rgba::new(nibble(8), nibble(4), nibble(0), 1.0)),
            4 => Some(Rgba::new(nibble(12), nibble(8), nibble(4), nibble(0))),
            6 => Some(Rgba::new(byte(16), byte(8), byte(0), 1.0)),
            8 => Some(Rgba::new(byte(24), byte(16), byte(8), byte(0))),
            _ => None,
        }
    }

    fn render(&self, color: &Rgba) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

        let mut out = String::with_capacity(9);
        if self.prefix {
            out.push('#');
        }
        out.push_str(&format!(
            "{:02X}{:02X}{:02X}",
            channel(color.r),
            channel(color.g),
            channel(color.b)
        ));
        if self.alpha {
            out.push_str(&format!("{:02X}", channel(color.a)));
        }
        out
    }
}

impl Transform for HexColorTransform {
    type Object = Rgba;

    fn from_document(&self, value: &Value) -> Option<Rgba> {
        let text = value.as_str()?;
        Self::parse(text.strip_prefix('#').unwrap_or(text))
    }

    fn to_document(&self, color: &Rgba) -> Option<Value> {
        Some(Value::String(self.render(color)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{HexColorTransform, Rgba, Transform};

    #[test]
    fn parse_lengths() {
        let t = HexColorTransform::default();

        let c = t.from_document(&json!("ff000080")).unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);

        let c = t.from_document(&json!("#0F08")).unwrap();
        assert_eq!(c, Rgba::new(0.0, 1.0, 0.0, 8.0 / 15.0));

        assert!(t.from_document(&json!("#12345")).is_none());
        assert!(t.from_document(&json!("#GG0000")).is_none());
        assert!(t.from_document(&json!("+FFF")).is_none());
        assert!(t.from_document(&json!(0xFFFFFF)).is_none());
    }

    #[test]
    fn render_flags() {
        let color = Rgba::new(0.0, 0.5, 1.0, 0.0);

        let plain = HexColorTransform::new(false, false);
        assert_eq!(plain.to_document(&color), Some(json!("0080FF")));

        let full = HexColorTransform::new(true, true);
        assert_eq!(full.to_document(&color), Some(json!("#0080FF00")));
    }
}
