#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::{Color, Raster, Rect, ops};

fn int(data: &[u8], at: usize) -> i32 {
    let mut b = [0u8; 4];
    for (i, v) in b.iter_mut().enumerate() {
        *v = data.get(at + i).copied().unwrap_or(0);
    }
    i32::from_le_bytes(b)
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary geometry must clip, never panic or touch pixels outside
    let w = u32::from(data.first().copied().unwrap_or(1) % 32) + 1;
    let h = u32::from(data.get(1).copied().unwrap_or(1) % 32) + 1;
    let rect = Rect::new(int(data, 2), int(data, 6), int(data, 10), int(data, 14));
    let (dx, dy) = (int(data, 18), int(data, 22));

    let mut src = Raster::filled(w, h, Color::WHITE).unwrap();
    if data.get(26).is_some_and(|b| b & 1 == 1) {
        src.set_color_key(Color::WHITE);
    }
    let mut dst = Raster::new(17, 13).unwrap();

    ops::blit(&src, rect, &mut dst, dx, dy);
    ops::blit_within(&mut src, rect, dx, dy);
    ops::fill_rect(&mut dst, rect, Color::from_rgb(1, 2, 3));
    ops::darken_area(&mut dst, rect, 9);
    ops::brighten_area(&mut dst, rect, 9);
    ops::bevel(&mut dst, rect, Color::from_rgb(90, 90, 90), u32::from(data.get(27).copied().unwrap_or(0)), false);
    let _ = ops::extract(&src, rect);
});
