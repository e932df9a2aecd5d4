/// A 24-bit RGB color packed as `0x00RRGGBB`.
///
/// The top byte is always zero for real colors. [`Color::NONE`] sets it,
/// which makes the sentinel unequal to every decodable color.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0x00_0000);
    pub const WHITE: Color = Color(0xFF_FFFF);
    /// "No color": the background of XBM images and `None` XPM entries, and
    /// the color key of every raster that has not been given one.
    pub const NONE: Color = Color(0xFF00_0000);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build from a packed `0xRRGGBB` value. Bits above 24 are dropped.
    pub const fn from_u32(rgb: u32) -> Color {
        Color(rgb & 0xFF_FFFF)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_none(self) -> bool {
        self.0 == Color::NONE.0
    }

    /// Subtract `amount` from every channel, saturating at 0.
    pub fn darken(self, amount: u8) -> Color {
        Color::from_rgb(
            self.r().saturating_sub(amount),
            self.g().saturating_sub(amount),
            self.b().saturating_sub(amount),
        )
    }

    /// Add `amount` to every channel, saturating at 255.
    pub fn brighten(self, amount: u8) -> Color {
        Color::from_rgb(
            self.r().saturating_add(amount),
            self.g().saturating_add(amount),
            self.b().saturating_add(amount),
        )
    }

    /// Parse an X11 hex color: `#RGB`, `#RRGGBB`, `#RRRGGGBBB` or
    /// `#RRRRGGGGBBBB`. Only the most significant 8 bits of each channel are
    /// kept.
    pub fn parse_hex(spec: &[u8]) -> Option<Color> {
        let digits = spec.strip_prefix(b"#")?;
        let per_channel = match digits.len() {
            3 | 6 | 9 | 12 => digits.len() / 3,
            _ => return None,
        };
        let mut channels = [0u8; 3];
        for (channel, chunk) in channels.iter_mut().zip(digits.chunks_exact(per_channel)) {
            let mut value: u32 = 0;
            for &d in chunk {
                value = (value << 4) | hex_digit(d)?;
            }
            let bits = per_channel as u32 * 4;
            *channel = if bits >= 8 {
                (value >> (bits - 8)) as u8
            } else {
                // single digit: replicate the nibble
                (value * 0x11) as u8
            };
        }
        Some(Color::from_rgb(channels[0], channels[1], channels[2]))
    }
}

fn hex_digit(d: u8) -> Option<u32> {
    match d {
        b'0'..=b'9' => Some(u32::from(d - b'0')),
        b'a'..=b'f' => Some(u32::from(d - b'a' + 10)),
        b'A'..=b'F' => Some(u32::from(d - b'A' + 10)),
        _ => None,
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(feature = "rgb")]
impl From<Color> for rgb::RGB8 {
    fn from(c: Color) -> Self {
        rgb::RGB8::new(c.r(), c.g(), c.b())
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGB8> for Color {
    fn from(p: rgb::RGB8) -> Self {
        Color::from_rgb(p.r, p.g, p.b)
    }
}
