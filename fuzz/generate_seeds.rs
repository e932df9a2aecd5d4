#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Minimal BMP 1x1 24-bit
    let mut bmp = vec![0u8; 58]; // 54 header + 4 pixel (3 + 1 padding)
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&58u32.to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&54u32.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&1i32.to_le_bytes()); // width
    bmp[22..26].copy_from_slice(&1i32.to_le_bytes()); // height
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&24u16.to_le_bytes()); // bpp
    bmp[54] = 0xff; bmp[55] = 0x00; bmp[56] = 0x00; // BGR
    fs::write(format!("{dir}/bmp_1x1.bmp"), &bmp).unwrap();

    // 2x1 1-bit palette BMP
    let mut pal = bmp[..54].to_vec();
    pal[10..14].copy_from_slice(&62u32.to_le_bytes());
    pal[18..22].copy_from_slice(&2i32.to_le_bytes());
    pal[28..30].copy_from_slice(&1u16.to_le_bytes());
    pal[46..50].copy_from_slice(&2u32.to_le_bytes()); // colors used
    pal.extend_from_slice(&[0, 0, 0, 0, 255, 255, 255, 0]);
    pal.extend_from_slice(&[0b0100_0000, 0, 0, 0]);
    fs::write(format!("{dir}/bmp_1bit_2x1.bmp"), pal).unwrap();

    let xbm = "#define dot_width 9\n#define dot_height 2\n#define dot_x_hot 4\n#define dot_y_hot 1\n\
               static unsigned char dot_bits[] = {\n   0x01, 0x01, 0xff, 0x00 };\n";
    fs::write(format!("{dir}/dot_9x2.xbm"), xbm).unwrap();

    let x10 = "#define w_width 17\n#define w_height 1\nstatic short w_bits[] = { 0x8001, 0x0001 };\n";
    fs::write(format!("{dir}/x10_17x1.xbm"), x10).unwrap();

    let xpm = "/* XPM */\nstatic char *face[] = {\n\"3 2 3 1\",\n\"  c None\",\n\"o s eye c #00ff00\",\n\"x c white\",\n\" o \",\n\"xox\"\n};\n";
    fs::write(format!("{dir}/face_3x2.xpm"), xpm).unwrap();

    let xpm2 = "/* XPM */\n{\"2 1 2 2\", \"aa c #F00\", \"ab g4 black\", \"aaab\"}";
    fs::write(format!("{dir}/cpp2_2x1.xpm"), xpm2).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/define_only.bin"), b"#define x_width 4\n").unwrap();
    fs::write(format!("{dir}/xpm_unterminated.bin"), b"/* XPM */ {\"1 1 1 1").unwrap();

    println!("Generated seed corpus in {dir}/");
}
