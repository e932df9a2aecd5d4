//! BMP bit unpacking and channel-mask helpers.
//!
//! Palette index expansion and the N-bit to 8-bit scale tables come from
//! zune-bmp 0.5.2 by Caleb Etemesi (MIT/Apache-2.0/Zlib).

/// Expand one scan row of 1, 4 or 8 bit palette indices to one byte per pixel.
///
/// Sub-byte depths are packed most significant bits first. `out.len()` is
/// the row width; trailing bits of the last input byte are ignored.
pub(crate) fn expand_indices(depth: u16, input: &[u8], out: &mut [u8]) {
    match depth {
        1 => {
            let mut in_iter = input.iter();
            let mut out_iter = out.chunks_exact_mut(8);

            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(out_vals, &in_val)| {
                    for (pos, v) in out_vals.iter_mut().enumerate() {
                        *v = (in_val >> (7 - pos)) & 0x01;
                    }
                });

            if let Some(&in_val) = in_iter.next() {
                let remainder_iter = out_iter.into_remainder().iter_mut();
                remainder_iter.enumerate().for_each(|(pos, out_val)| {
                    *out_val = (in_val >> (7 - pos)) & 0x01;
                });
            }
        }
        4 => {
            let mut in_iter = input.iter();
            let mut out_iter = out.chunks_exact_mut(2);

            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(out_vals, &in_val)| {
                    out_vals[0] = in_val >> 4;
                    out_vals[1] = in_val & 0x0f;
                });

            if let Some(&in_val) = in_iter.next() {
                if let Some(out_val) = out_iter.into_remainder().first_mut() {
                    *out_val = in_val >> 4;
                }
            }
        }
        8 => {
            let n = out.len().min(input.len());
            out[..n].copy_from_slice(&input[..n]);
        }
        _ => {}
    }
}

/// Multipliers that replicate an N-bit value across 8 bits.
const MUL_TABLE: [u32; 9] = [
    0,    // 0 bits
    0xff, // 1 bit:  0b11111111
    0x55, // 2 bits: 0b01010101
    0x49, // 3 bits: 0b01001001
    0x11, // 4 bits: 0b00010001
    0x21, // 5 bits: 0b00100001
    0x41, // 6 bits: 0b01000001
    0x81, // 7 bits: 0b10000001
    0x01, // 8 bits: 0b00000001
];

const SHIFT_TABLE: [u32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

/// Number of zero bits below the lowest set bit; 0 for an empty mask.
pub fn trailing_zero_count(mask: u32) -> u32 {
    if mask == 0 { 0 } else { mask.trailing_zeros() }
}

/// Width of the channel once shifted down: position of the highest set bit
/// of `mask >> trailing_zero_count(mask)`, plus one.
pub fn bit_width(mask: u32) -> u32 {
    32 - (mask >> trailing_zero_count(mask)).leading_zeros()
}

/// Scale a `bits`-wide value to the full 0..=255 range.
pub(crate) fn scale_to_u8(value: u32, bits: u32) -> u8 {
    match bits {
        0 => 0,
        1..=8 => ((value * MUL_TABLE[bits as usize]) >> SHIFT_TABLE[bits as usize]) as u8,
        _ => (value >> (bits - 8)) as u8,
    }
}

/// One color channel of a bit-field pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChannelMask {
    mask: u32,
    shift: u32,
    bits: u32,
}

impl ChannelMask {
    pub(crate) fn new(mask: u32) -> Self {
        Self {
            mask,
            shift: trailing_zero_count(mask),
            bits: bit_width(mask),
        }
    }

    pub(crate) fn extract(&self, pixel: u32) -> u8 {
        scale_to_u8((pixel & self.mask) >> self.shift, self.bits)
    }
}
