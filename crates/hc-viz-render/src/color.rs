use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` (leading `#` optional) or a ROOT color name such as `kRed`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(c) = root_named(s) {
            return Some(c);
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Like [`Color::parse`], falling back to black for unparseable input.
    pub fn hex(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(color = s, "unparseable color, using black");
            Self::BLACK
        })
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// --- ROOT base palette ---

/// ROOT's named base colors (`kWhite` .. `kCyan`, plus `kOrange`).
const ROOT_NAMED: &[(&str, Color)] = &[
    ("kWhite", Color::rgb(255, 255, 255)),
    ("kBlack", Color::rgb(0, 0, 0)),
    ("kGray", Color::rgb(204, 204, 204)),
    ("kRed", Color::rgb(255, 0, 0)),
    ("kGreen", Color::rgb(0, 255, 0)),
    ("kBlue", Color::rgb(0, 0, 255)),
    ("kYellow", Color::rgb(255, 255, 0)),
    ("kMagenta", Color::rgb(255, 0, 255)),
    ("kCyan", Color::rgb(0, 255, 255)),
    ("kOrange", Color::rgb(255, 204, 0)),
];

fn root_named(name: &str) -> Option<Color> {
    ROOT_NAMED.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!((c.r, c.g, c.b), (0x1D, 0x4E, 0xD8));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::parse("00ff00"), Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn root_names() {
        assert_eq!(Color::parse("kRed"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::hex("kBlue").to_hex(), "#0000ff");
    }

    #[test]
    fn malformed_is_rejected() {
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#gg0000"), None);
        assert_eq!(Color::parse("#ééé"), None);
        assert_eq!(Color::hex("nonsense"), Color::BLACK);
    }

    #[test]
    fn svg_fill_alpha() {
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
        assert_eq!(Color { a: 0.5, ..Color::rgb(29, 78, 216) }.to_svg_fill(), "rgba(29,78,216,0.500)");
    }
}
