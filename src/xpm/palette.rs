//! XPM color table: parsing `<code> <key> <color> ...` lines and looking up
//! pixel codes.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use crate::color::Color;
use crate::error::RasterError;

/// Printable ASCII, the only bytes allowed in pixel codes.
const FIRST_CODE_CHAR: u8 = 32;
const LAST_CODE_CHAR: u8 = 126;
pub(crate) const CODE_CHARS: usize = (LAST_CODE_CHAR - FIRST_CODE_CHAR + 1) as usize;

/// Color keys in the order they are preferred.
const KEY_PRIORITY: [&[u8]; 4] = [b"c", b"g", b"g4", b"m"];
/// Every key that can start a color definition, including symbolic names.
const ALL_KEYS: [&[u8]; 5] = [b"c", b"g", b"g4", b"m", b"s"];

pub(crate) fn is_code_char(b: u8) -> bool {
    (FIRST_CODE_CHAR..=LAST_CODE_CHAR).contains(&b)
}

/// Pixel code to color lookup.
///
/// One-character codes index a flat table; longer codes (up to four bytes)
/// are packed into a `u32` key.
pub(crate) enum CodeTable {
    Single(Box<[Option<Color>; CODE_CHARS]>),
    Multi(BTreeMap<u32, Color>),
}

fn pack(code: &[u8]) -> u32 {
    code.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

impl CodeTable {
    pub(crate) fn new(chars_per_pixel: usize) -> Self {
        if chars_per_pixel == 1 {
            CodeTable::Single(Box::new([None; CODE_CHARS]))
        } else {
            CodeTable::Multi(BTreeMap::new())
        }
    }

    /// Add a code. Callers have checked the code is printable and `cpp` long.
    pub(crate) fn insert(&mut self, code: &[u8], color: Color) {
        let replaced = match self {
            CodeTable::Single(table) => {
                table[usize::from(code[0] - FIRST_CODE_CHAR)].replace(color)
            }
            CodeTable::Multi(map) => map.insert(pack(code), color),
        };
        if replaced.is_some() {
            log::debug!(
                "XPM color code {:?} defined twice, keeping the last",
                alloc::string::String::from_utf8_lossy(code)
            );
        }
    }

    /// Look up a printable code.
    pub(crate) fn get(&self, code: &[u8]) -> Option<Color> {
        match self {
            CodeTable::Single(table) => table[usize::from(code[0] - FIRST_CODE_CHAR)],
            CodeTable::Multi(map) => map.get(&pack(code)).copied(),
        }
    }
}

/// Split a color line into its pixel code and resolved color.
pub(crate) fn parse_color_line(
    line: &[u8],
    chars_per_pixel: usize,
) -> Result<(&[u8], Color), RasterError> {
    let code = line
        .get(..chars_per_pixel)
        .filter(|c| c.iter().all(|&b| is_code_char(b)))
        .ok_or_else(|| {
            RasterError::InvalidData(alloc::format!(
                "XPM color line {:?} has no valid {chars_per_pixel}-character code",
                alloc::string::String::from_utf8_lossy(line)
            ))
        })?;
    let definition = &line[chars_per_pixel..];

    let value = KEY_PRIORITY
        .iter()
        .find_map(|key| key_value(definition, key))
        .ok_or_else(|| {
            RasterError::InvalidData(alloc::format!(
                "XPM color {:?} has no c, g, g4 or m definition",
                alloc::string::String::from_utf8_lossy(code)
            ))
        })?;
    Ok((code, resolve_color_name(value)))
}

/// The value following `key` in a definition such as `s sym c light gray`.
///
/// A value runs until the next key token, so it may contain spaces. The
/// returned slice spans the value's words in the original line.
fn key_value<'a>(definition: &'a [u8], key: &[u8]) -> Option<&'a [u8]> {
    let mut words = words(definition).peekable();
    while let Some((_, word)) = words.next() {
        if word != key {
            continue;
        }
        let (start, first) = words.next_if(|(_, w)| !ALL_KEYS.contains(w))?;
        let mut end = start + first.len();
        while let Some((at, w)) = words.next_if(|(_, w)| !ALL_KEYS.contains(w)) {
            end = at + w.len();
        }
        return Some(&definition[start..end]);
    }
    None
}

/// Whitespace-separated words with their byte offsets.
fn words(text: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    let mut pos = 0;
    core::iter::from_fn(move || {
        while pos < text.len() && text[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= text.len() {
            return None;
        }
        let start = pos;
        while pos < text.len() && !text[pos].is_ascii_whitespace() {
            pos += 1;
        }
        Some((start, &text[start..pos]))
    })
}

/// Resolve an XPM color value.
///
/// `None` is transparent ([`Color::NONE`]). Hex specs are parsed. Only
/// `black` and `white` are known by name; every other name, and malformed
/// hex, resolves to black.
pub(crate) fn resolve_color_name(value: &[u8]) -> Color {
    if value.eq_ignore_ascii_case(b"none") {
        return Color::NONE;
    }
    if value.starts_with(b"#") {
        if let Some(c) = Color::parse_hex(value) {
            return c;
        }
    } else if value.eq_ignore_ascii_case(b"black") {
        return Color::BLACK;
    } else if value.eq_ignore_ascii_case(b"white") {
        return Color::WHITE;
    }
    log::debug!(
        "unknown XPM color {:?}, using black",
        alloc::string::String::from_utf8_lossy(value)
    );
    Color::BLACK
}
