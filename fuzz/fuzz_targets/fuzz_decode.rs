#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::{Color, Limits, SliceStream, Stream, bmp, xbm, xpm};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Limits::default()
    };

    // Auto-detect (BMP, XPM, XBM) must never panic
    let _ = zenraster::DecodeRequest::new()
        .with_limits(&limits)
        .decode_bytes(data);

    // Each decoder explicitly; a failed decode that rewinds must land on
    // the starting position
    let mut stream = SliceStream::new(data);
    if bmp::decode(&mut stream, Some(&limits)).is_err() {
        assert_eq!(stream.tell(), 0);
    }
    let mut stream = SliceStream::new(data);
    if xbm::decode(&mut stream, Color::WHITE, Some(&limits)).is_err() {
        assert_eq!(stream.tell(), 0);
    }
    let mut stream = SliceStream::new(data);
    let _ = xpm::decode(&mut stream, Some(&limits));

    let mut stream = SliceStream::new(data);
    for probe in [bmp::probe, xbm::probe, xpm::probe] {
        let _ = probe(&mut stream);
        assert_eq!(stream.tell(), 0);
    }
});
