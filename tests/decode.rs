use zenraster::*;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r, g, b)
}

// ── BMP fixtures ────────────────────────────────────────────────────

/// A Windows BMP with a 40-byte info header. `rows` are in stored order
/// (bottom row first unless `height` is negative) and get padded here.
#[cfg(feature = "bmp")]
struct Bmp {
    width: i32,
    height: i32,
    bpp: u16,
    compression: u32,
    masks: Option<[u32; 3]>,
    palette: Vec<[u8; 3]>,
    rows: Vec<Vec<u8>>,
}

#[cfg(feature = "bmp")]
impl Bmp {
    fn new(width: i32, height: i32, bpp: u16, rows: Vec<Vec<u8>>) -> Self {
        Self {
            width,
            height,
            bpp,
            compression: 0,
            masks: None,
            palette: Vec::new(),
            rows,
        }
    }

    fn palette(mut self, palette: &[[u8; 3]]) -> Self {
        self.palette = palette.to_vec();
        self
    }

    fn bitfields(mut self, masks: [u32; 3]) -> Self {
        self.compression = 3;
        self.masks = Some(masks);
        self
    }

    fn build(&self) -> Vec<u8> {
        let masks_len = if self.masks.is_some() { 12 } else { 0 };
        let data_offset = 54 + masks_len + self.palette.len() as u32 * 4;
        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&0u32.to_le_bytes()); // file size, unused
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&data_offset.to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bpp.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&[0u8; 12]); // image size, resolution
        out.extend_from_slice(&(self.palette.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        if let Some(masks) = self.masks {
            for m in masks {
                out.extend_from_slice(&m.to_le_bytes());
            }
        }
        for &[r, g, b] in &self.palette {
            out.extend_from_slice(&[b, g, r, 0]);
        }
        assert_eq!(out.len(), data_offset as usize);
        for row in &self.rows {
            out.extend_from_slice(row);
            out.resize(out.len() + (4 - row.len() % 4) % 4, 0);
        }
        out
    }
}

// ── BMP ─────────────────────────────────────────────────────────────

#[cfg(feature = "bmp")]
#[test]
fn bmp_24bit_bottom_up() {
    // stored bottom row first, BGR
    let data = Bmp::new(
        2,
        2,
        24,
        vec![
            vec![255, 0, 0, 0, 255, 0], // bottom: blue, green
            vec![0, 0, 255, 9, 9, 9],   // top: red, gray
        ],
    )
    .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!((r.width(), r.height()), (2, 2));
    assert!(!r.is_transparent());
    assert_eq!(r.row(0), &[rgb(255, 0, 0), rgb(9, 9, 9)]);
    assert_eq!(r.row(1), &[rgb(0, 0, 255), rgb(0, 255, 0)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_24bit_top_down() {
    let data = Bmp::new(
        1,
        -3,
        24,
        vec![vec![0, 0, 1], vec![0, 0, 2], vec![0, 0, 3]],
    )
    .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.pixels(), &[rgb(1, 0, 0), rgb(2, 0, 0), rgb(3, 0, 0)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_orientation_at_every_depth() {
    let (red, green, blue) = (rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255));
    let white = Color::WHITE;
    let mut palette = vec![[0u8, 0, 0]; 16];
    palette[1..5].copy_from_slice(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]]);
    let px16 = |a: u16, b: u16| [a.to_le_bytes(), b.to_le_bytes()].concat();

    // (bpp, palette entries, top row, bottom row, expected top row, expected bottom row)
    let cases: [(u16, usize, Vec<u8>, Vec<u8>, [Color; 2], [Color; 2]); 6] = [
        (1, 2, vec![0b1000_0000], vec![0b0100_0000], [red, Color::BLACK], [Color::BLACK, red]),
        (4, 16, vec![0x12], vec![0x34], [red, green], [blue, white]),
        (8, 5, vec![1, 2], vec![3, 4], [red, green], [blue, white]),
        (16, 0, px16(0xF800, 0x07E0), px16(0x001F, 0xFFFF), [red, green], [blue, white]),
        (24, 0, vec![0, 0, 255, 0, 255, 0], vec![255, 0, 0, 255, 255, 255], [red, green], [blue, white]),
        (32, 0, vec![0, 0, 255, 0, 0, 255, 0, 0], vec![255, 0, 0, 0, 255, 255, 255, 0], [red, green], [blue, white]),
    ];

    for (bpp, entries, top, bottom, want_top, want_bottom) in cases {
        for height in [2, -2] {
            let rows = if height > 0 {
                vec![bottom.clone(), top.clone()]
            } else {
                vec![top.clone(), bottom.clone()]
            };
            let data = Bmp::new(2, height, bpp, rows)
                .palette(&palette[..entries])
                .build();
            let r = bmp::decode(&mut SliceStream::new(&data), None)
                .unwrap_or_else(|e| panic!("{bpp} bpp, height {height}: {e}"));
            assert_eq!((r.width(), r.height()), (2, 2));
            assert_eq!(r.get(0, 0), Some(want_top[0]), "{bpp} bpp, height {height}");
            assert_eq!(r.get(1, 1), Some(want_bottom[1]), "{bpp} bpp, height {height}");
            assert_eq!(r.row(0), &want_top, "{bpp} bpp, height {height}");
            assert_eq!(r.row(1), &want_bottom, "{bpp} bpp, height {height}");
        }
    }
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_1bit_palette() {
    let data = Bmp::new(
        10,
        -1,
        1,
        vec![vec![0b1011_0001, 0b1000_0000]],
    )
    .palette(&[[0, 0, 0], [255, 255, 255]])
    .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    let bits: Vec<bool> = r.row(0).iter().map(|&c| c == Color::WHITE).collect();
    assert_eq!(
        bits,
        [true, false, true, true, false, false, false, true, true, false]
    );
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_4bit_palette() {
    let mut palette = [[0u8; 3]; 16];
    for (i, p) in palette.iter_mut().enumerate() {
        *p = [i as u8 * 16, 0, 0];
    }
    let data = Bmp::new(3, 1, 4, vec![vec![0x12, 0x3F]])
        .palette(&palette)
        .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.row(0), &[rgb(16, 0, 0), rgb(32, 0, 0), rgb(48, 0, 0)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_8bit_index_outside_palette() {
    let data = Bmp::new(2, 1, 8, vec![vec![1, 5]])
        .palette(&[[1, 1, 1], [2, 2, 2]])
        .build();
    let mut stream = SliceStream::new(&data);
    let err = bmp::decode(&mut stream, None).unwrap_err();
    assert!(matches!(err, RasterError::InvalidData(_)), "{err:?}");
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_16bit_default_masks_are_565() {
    let px = |v: u16| v.to_le_bytes();
    let row = [px(0xF800), px(0x07E0), px(0x001F), px(0x0000)].concat();
    let data = Bmp::new(4, 1, 16, vec![row]).build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(
        r.row(0),
        &[rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255), Color::BLACK]
    );
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_16bit_bitfields_555() {
    let px = |v: u16| v.to_le_bytes();
    let row = [px(0x7C00), px(0x03E0), px(0x001F)].concat();
    let data = Bmp::new(3, 1, 16, vec![row])
        .bitfields([0x7C00, 0x03E0, 0x001F])
        .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.row(0), &[rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_32bit_default_and_bitfields() {
    let data = Bmp::new(1, 1, 32, vec![vec![0x30, 0x20, 0x10, 0xFF]]).build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.row(0), &[rgb(0x10, 0x20, 0x30)]);

    // bytes stored R, G, B, A
    let data = Bmp::new(1, 1, 32, vec![vec![0x10, 0x20, 0x30, 0x80]])
        .bitfields([0x0000_00FF, 0x0000_FF00, 0x00FF_0000])
        .build();
    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.row(0), &[rgb(0x10, 0x20, 0x30)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_os2_header() {
    // 12-byte core header, 8-bit, three-byte palette entries
    let mut data = Vec::new();
    data.extend_from_slice(b"BM");
    data.extend_from_slice(&[0u8; 8]);
    let palette_len = 256 * 3;
    data.extend_from_slice(&(26u32 + palette_len).to_le_bytes());
    data.extend_from_slice(&12u32.to_le_bytes());
    data.extend_from_slice(&2u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&8u16.to_le_bytes());
    for i in 0..=255u8 {
        data.extend_from_slice(&[i, 0, 255 - i]);
    }
    data.extend_from_slice(&[0, 200, 0, 0]);

    let r = bmp::decode(&mut SliceStream::new(&data), None).unwrap();
    assert_eq!(r.row(0), &[rgb(255, 0, 0), rgb(55, 0, 200)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_rle_rejected_and_rewound() {
    let mut fixture = Bmp::new(1, 1, 8, vec![vec![0]]).palette(&[[0, 0, 0]]);
    fixture.compression = 1;
    let data = fixture.build();
    let mut stream = SliceStream::new(&data);
    let err = bmp::decode(&mut stream, None).unwrap_err();
    assert!(matches!(err, RasterError::UnsupportedVariant(_)), "{err:?}");
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_truncated_pixels() {
    let mut data = Bmp::new(4, 4, 24, vec![vec![0; 12]; 4]).build();
    data.truncate(data.len() - 5);
    let mut stream = SliceStream::new(&data);
    assert!(matches!(
        bmp::decode(&mut stream, None),
        Err(RasterError::UnexpectedEof)
    ));
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_inside_larger_stream() {
    // offsets in the header are relative to the BM magic
    let mut data = b"junk!".to_vec();
    data.extend(Bmp::new(1, 1, 24, vec![vec![3, 2, 1]]).build());
    data.extend_from_slice(b"trailer");
    let mut stream = SliceStream::new(&data);
    stream.seek(SeekFrom::Start(5)).unwrap();
    let r = bmp::decode(&mut stream, None).unwrap();
    assert_eq!(r.row(0), &[rgb(1, 2, 3)]);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_not_a_bmp() {
    let mut stream = SliceStream::new(b"GIF89a");
    assert!(matches!(
        bmp::decode(&mut stream, None),
        Err(RasterError::UnrecognizedFormat)
    ));
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_limits() {
    let data = Bmp::new(8, 8, 24, vec![vec![0; 24]; 8]).build();
    let limits = Limits {
        max_pixels: Some(32),
        ..Limits::default()
    };
    let err = bmp::decode(&mut SliceStream::new(&data), Some(&limits)).unwrap_err();
    assert!(matches!(err, RasterError::LimitExceeded(_)), "{err:?}");
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_probe_restores_position() {
    let data = Bmp::new(7, -3, 24, vec![vec![0; 21]; 3]).build();
    let mut stream = SliceStream::new(&data);
    let info = bmp::probe(&mut stream).unwrap();
    assert_eq!((info.width, info.height, info.format), (7, 3, ImageFormat::Bmp));
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_encode_roundtrip() {
    let mut r = Raster::new(5, 3).unwrap();
    for y in 0..3 {
        for x in 0..5 {
            r.put(x, y, rgb(x as u8 * 50, y as u8 * 80, 7));
        }
    }
    let encoded = bmp::encode(&r).unwrap();
    assert_eq!(&encoded[..2], b"BM");
    // 5 * 3 = 15 bytes per row, padded to 16
    assert_eq!(encoded.len(), 54 + 16 * 3);
    let back = bmp::decode(&mut SliceStream::new(&encoded), None).unwrap();
    assert_eq!(back.pixels(), r.pixels());
}

// ── XPM ─────────────────────────────────────────────────────────────

#[cfg(feature = "xpm")]
const EYES_XPM: &[u8] = b"/* XPM */
static char * eyes_xpm[] = {
/* columns rows colors chars-per-pixel */
\"3 2 3 1\",
\"  c None\",
\"o c #00FF00\",
\"x c white\",
/* pixels */
\" o \",
\"xox\"
};
";

#[cfg(feature = "xpm")]
#[test]
fn xpm_one_char_with_none() {
    let r = xpm::decode(&mut SliceStream::new(EYES_XPM), None).unwrap();
    let green = rgb(0, 255, 0);
    assert_eq!(r.row(0), &[Color::NONE, green, Color::NONE]);
    assert_eq!(r.row(1), &[Color::WHITE, green, Color::WHITE]);
    assert!(r.is_transparent());
    assert_eq!(r.color_key(), Color::NONE);
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_two_chars_per_pixel() {
    let lines = [
        "2 2 3 2",
        "aa c #F00",
        "ab c #0000ff",
        "ba g black",
        "aaab",
        "baaa",
    ];
    let r = xpm::from_lines(&lines, None).unwrap();
    assert_eq!(r.row(0), &[rgb(255, 0, 0), rgb(0, 0, 255)]);
    assert_eq!(r.row(1), &[Color::BLACK, rgb(255, 0, 0)]);
    assert!(!r.is_transparent());
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_unknown_color_names_are_black() {
    let lines = ["1 1 1 1", "q c LightGoldenrodYellow", "q"];
    let r = xpm::from_lines(&lines, None).unwrap();
    assert_eq!(r.row(0), &[Color::BLACK]);
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_short_row_is_error() {
    let lines = ["3 1 1 1", "a c white", "aa"];
    assert!(matches!(
        xpm::from_lines(&lines, None),
        Err(RasterError::InvalidData(_))
    ));
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_undefined_code_is_error() {
    let lines = ["2 1 1 1", "a c white", "ab"];
    assert!(matches!(
        xpm::from_lines(&lines, None),
        Err(RasterError::InvalidData(_))
    ));
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_missing_rows() {
    let lines = ["1 3 1 1", "a c white", "a"];
    assert!(matches!(
        xpm::from_lines(&lines, None),
        Err(RasterError::InvalidData(_))
    ));
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_rewinds_only_on_magic() {
    let mut stream = SliceStream::new(b"/* XBM */ nope");
    assert!(matches!(
        xpm::decode(&mut stream, None),
        Err(RasterError::UnrecognizedFormat)
    ));
    assert_eq!(stream.tell(), 0);

    let mut stream = SliceStream::new(b"/* XPM */ {\"1 1 1\"}");
    assert!(matches!(
        xpm::decode(&mut stream, None),
        Err(RasterError::InvalidHeader(_))
    ));
    assert_ne!(stream.tell(), 0);
}

#[cfg(feature = "xpm")]
#[test]
fn xpm_probe() {
    let mut stream = SliceStream::new(EYES_XPM);
    let info = xpm::probe(&mut stream).unwrap();
    assert_eq!((info.width, info.height, info.format), (3, 2, ImageFormat::Xpm));
    assert_eq!(stream.tell(), 0);
}

// ── XBM ─────────────────────────────────────────────────────────────

#[cfg(feature = "xbm")]
const ARROW_XBM: &[u8] = b"#define arrow_width 8
#define arrow_height 2
#define arrow_x_hot 1
#define arrow_y_hot 0
static unsigned char arrow_bits[] = {
   0x0d, 0x80 };
";

#[cfg(feature = "xbm")]
#[test]
fn xbm_bits_are_lsb_first() {
    let fg = rgb(200, 10, 10);
    let r = xbm::decode(&mut SliceStream::new(ARROW_XBM), fg, None).unwrap();
    let set: Vec<usize> = (0..8).filter(|&x| r.row(0)[x] == fg).collect();
    assert_eq!(set, [0, 2, 3]);
    assert_eq!(r.row(0)[1], Color::NONE);
    assert_eq!(r.row(1)[7], fg);
    assert!(r.is_transparent());
    assert_eq!(r.color_key(), Color::NONE);
}

#[cfg(feature = "xbm")]
#[test]
fn xbm_header_and_hotspot() {
    let mut stream = SliceStream::new(ARROW_XBM);
    let header = xbm::header(&mut stream).unwrap();
    assert_eq!(
        header,
        xbm::XbmHeader {
            width: 8,
            height: 2,
            hotspot: Some((1, 0)),
            x10: false,
        }
    );
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "xbm")]
#[test]
fn xbm_x10_shorts() {
    let data = b"#define wide_width 18
#define wide_height 1
static short wide_bits[] = {
   0x8001, 0x0002 };
";
    let r = xbm::decode(&mut SliceStream::new(data), Color::WHITE, None).unwrap();
    let set: Vec<usize> = (0..18).filter(|&x| r.row(0)[x] == Color::WHITE).collect();
    assert_eq!(set, [0, 15, 17]);
}

#[cfg(feature = "xbm")]
#[test]
fn xbm_too_few_values_rewinds() {
    let data = b"#define t_width 16\n#define t_height 2\nstatic char t_bits[] = { 0x01, 0x02, 0x03 };";
    let mut stream = SliceStream::new(data);
    assert!(matches!(
        xbm::decode(&mut stream, Color::BLACK, None),
        Err(RasterError::InvalidData(_))
    ));
    assert_eq!(stream.tell(), 0);
}

#[cfg(feature = "xbm")]
#[test]
fn xbm_missing_height() {
    let data = b"#define t_width 16\nstatic char t_bits[] = { 0x01, 0x02 };";
    assert!(matches!(
        xbm::decode(&mut SliceStream::new(data), Color::BLACK, None),
        Err(RasterError::InvalidHeader(_))
    ));
}

#[cfg(feature = "xbm")]
#[test]
fn xbm_from_compiled_bits() {
    let bits = [0x01, 0x00, 0xFF, 0x01];
    let r = xbm::from_bits(&bits, 9, 2, Color::WHITE).unwrap();
    assert_eq!(r.get(0, 0), Some(Color::WHITE));
    assert_eq!(r.get(8, 0), Some(Color::NONE));
    assert_eq!(r.get(8, 1), Some(Color::WHITE));

    assert!(matches!(
        xbm::from_bits(&bits[..3], 9, 2, Color::WHITE),
        Err(RasterError::BufferTooSmall { needed: 4, actual: 3 })
    ));
}

// ── Detection ───────────────────────────────────────────────────────

#[cfg(all(feature = "bmp", feature = "xbm", feature = "xpm"))]
#[test]
fn detect_by_magic() {
    assert_eq!(ImageFormat::detect(b"BM\0\0"), Some(ImageFormat::Bmp));
    assert_eq!(ImageFormat::detect(b"/* XPM */\n"), Some(ImageFormat::Xpm));
    assert_eq!(ImageFormat::detect(b"#define x"), Some(ImageFormat::Xbm));
    assert_eq!(ImageFormat::detect(b"\x89PNG"), None);
}

#[cfg(all(feature = "bmp", feature = "xbm", feature = "xpm"))]
#[test]
fn auto_decode_each_format() {
    let data = Bmp::new(1, 1, 24, vec![vec![0, 0, 255]]).build();
    assert_eq!(decode_bytes(&data).unwrap().row(0), &[rgb(255, 0, 0)]);

    let r = decode_bytes(EYES_XPM).unwrap();
    assert_eq!((r.width(), r.height()), (3, 2));

    let r = DecodeRequest::new()
        .with_foreground(Color::WHITE)
        .decode_bytes(ARROW_XBM)
        .unwrap();
    assert_eq!(r.get(0, 0), Some(Color::WHITE));
}

#[cfg(all(feature = "std", feature = "xbm"))]
#[test]
fn io_stream_adapter() {
    let cursor = std::io::Cursor::new(ARROW_XBM.to_vec());
    let mut stream = IoStream::new(cursor).unwrap();
    let r = DecodeRequest::new().decode(&mut stream).unwrap();
    assert_eq!((r.width(), r.height()), (8, 2));
}
