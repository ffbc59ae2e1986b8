/// The 20-entry categorical "tab20" palette, RGB
pub const TAB20: [[u8; 3]; 20] = [
    [0x1f, 0x77, 0xb4],
    [0xae, 0xc7, 0xe8],
    [0xff, 0x7f, 0x0e],
    [0xff, 0xbb, 0x78],
    [0x2c, 0xa0, 0x2c],
    [0x98, 0xdf, 0x8a],
    [0xd6, 0x27, 0x28],
    [0xff, 0x98, 0x96],
    [0x94, 0x67, 0xbd],
    [0xc5, 0xb0, 0xd5],
    [0x8c, 0x56, 0x4b],
    [0xc4, 0x9c, 0x94],
    [0xe3, 0x77, 0xc2],
    [0xf7, 0xb6, 0xd2],
    [0x7f, 0x7f, 0x7f],
    [0xc7, 0xc7, 0xc7],
    [0xbc, 0xbd, 0x22],
    [0xdb, 0xdb, 0x8d],
    [0x17, 0xbe, 0xcf],
    [0x9e, 0xda, 0xe5],
];

/// Color of entry `index` when the palette is stretched over `count` entries.
///
/// Entry `i` samples the palette at `i / (count - 1)`, so the first and last
/// entries always get the first and last palette colors.
pub fn palette_color(index: usize, count: usize) -> [u8; 3] {
    if count <= 1 {
        return TAB20[0];
    }

    let step = 1.0 / (count - 1) as f64;
    let t = index as f64 * step;
    let slot = ((t * TAB20.len() as f64) as usize).min(TAB20.len() - 1);
    TAB20[slot]
}

/// Colors for `count` contours
pub fn palette(count: usize) -> Vec<[u8; 3]> {
    (0..count).map(|i| palette_color(i, count)).collect()
}
