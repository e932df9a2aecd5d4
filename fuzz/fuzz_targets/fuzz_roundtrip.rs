#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::*;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must survive a trip through the BMP encoder
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Limits::default()
    };
    let Ok(decoded) = DecodeRequest::new().with_limits(&limits).decode_bytes(data) else {
        return;
    };

    let encoded = bmp::encode(&decoded).expect("encoding a decoded raster");
    let Ok(back) = bmp::decode(&mut SliceStream::new(&encoded), None) else {
        panic!("re-encoded BMP failed to decode");
    };

    assert_eq!(back.width(), decoded.width());
    assert_eq!(back.height(), decoded.height());
    // BMP has no transparency; the NONE sentinel comes back black
    for (a, b) in decoded.pixels().iter().zip(back.pixels()) {
        let expected = if a.is_none() { Color::BLACK } else { *a };
        assert_eq!(expected, *b, "roundtrip pixel mismatch");
    }
});
