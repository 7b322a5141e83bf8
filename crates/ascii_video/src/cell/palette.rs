/// The sixteen-color terminal palette, in `black, blue, green, cyan, red, ...`
/// order (blue before red, unlike SGR numbering).
#[derive(Clone, Debug, PartialEq)]
pub struct AnsiPalette {
    colors: [[f32; 3]; 16],
}

const VGA: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0xaa],
    [0x00, 0xaa, 0x00],
    [0x00, 0xaa, 0xaa],
    [0xaa, 0x00, 0x00],
    [0xaa, 0x00, 0xaa],
    [0xaa, 0x55, 0x00],
    [0xaa, 0xaa, 0xaa],
    [0x55, 0x55, 0x55],
    [0x55, 0x55, 0xff],
    [0x55, 0xff, 0x55],
    [0x55, 0xff, 0xff],
    [0xff, 0x55, 0x55],
    [0xff, 0x55, 0xff],
    [0xff, 0xff, 0x55],
    [0xff, 0xff, 0xff],
];

/// Palette slot to SGR color offset within one intensity half.
const SGR_ORDER: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

impl AnsiPalette {
    pub fn vga() -> Self {
        let mut colors = [[0.0; 3]; 16];
        for (slot, rgb) in colors.iter_mut().zip(VGA.iter()) {
            *slot = rgb.map(|channel| f32::from(channel) / 255.0);
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Normalized RGB of palette entry `index`.
    pub fn color(&self, index: u8) -> [f32; 3] {
        self.colors[usize::from(index) & 0x0f]
    }

    /// Index of the entry closest to `rgb` (components in `0.0..=1.0`).
    pub fn nearest(&self, rgb: [f32; 3]) -> u8 {
        let mut best = (0u8, f32::MAX);
        for (index, color) in self.colors.iter().enumerate() {
            let distance = distance_sq(*color, rgb);
            if distance < best.1 {
                best = (index as u8, distance);
            }
        }
        best.0
    }
}

pub(crate) fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// SGR parameter selecting palette entry `index` as foreground.
pub(crate) fn sgr_foreground(index: u8) -> u8 {
    let base = if index < 8 { 30 } else { 90 };
    base + SGR_ORDER[usize::from(index & 0x07)]
}

/// SGR parameter selecting palette entry `index` as background.
pub(crate) fn sgr_background(index: u8) -> u8 {
    sgr_foreground(index) + 10
}
