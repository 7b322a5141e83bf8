use std::fmt;

use crate::stream::header::Header;
use crate::{Result, VideoError};

/// Frame rate stored as a rational, each part fitting a header byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fps {
    pub numerator: u8,
    pub denominator: u8,
}

impl Fps {
    /// Written when the caller never said how fast the frames play.
    pub const UNSPECIFIED: Fps = Fps { numerator: 0, denominator: 0 };

    pub fn new(numerator: u8, denominator: u8) -> Self {
        Self { numerator, denominator }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parse `N` or `N/D` into a frame rate.
///
/// The empty string is the unspecified rate `0/0`. Anything with more than one
/// separator, a non-integer part, or a part above 255 is rejected.
pub fn parse_fps(value: &str) -> Result<Fps> {
    if value.is_empty() {
        return Ok(Fps::UNSPECIFIED);
    }

    let invalid = || VideoError::InvalidFps(value.to_owned());
    let parts: Vec<&str> = value.split('/').collect();
    let (numerator, denominator) = match parts.as_slice() {
        [numerator] => (*numerator, "1"),
        [numerator, denominator] => (*numerator, *denominator),
        _ => return Err(invalid()),
    };

    let parse = |part: &str| part.trim().parse::<u8>().map_err(|_| invalid());
    Ok(Fps::new(parse(numerator)?, parse(denominator)?))
}

/// Immutable description of one output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    img_size: (u32, u32),
    text_size: (u16, u16),
    fps: Fps,
    alpha: bool,
}

impl Settings {
    pub fn new(img_size: (u32, u32), text_size: (u32, u32), fps: Fps, alpha: bool) -> Result<Self> {
        let (columns, rows) = text_size;
        if img_size.0 == 0 || img_size.1 == 0 || columns == 0 || rows == 0 {
            return Err(VideoError::EmptyGrid);
        }

        let (Ok(columns), Ok(rows)) = (u16::try_from(columns), u16::try_from(rows)) else {
            return Err(VideoError::GridTooLarge(columns, rows));
        };

        Ok(Self { img_size, text_size: (columns, rows), fps, alpha })
    }

    /// Source image size in pixels; every frame must match it.
    pub fn img_size(&self) -> (u32, u32) {
        self.img_size
    }

    pub fn text_size(&self) -> (u16, u16) {
        self.text_size
    }

    pub fn columns(&self) -> usize {
        usize::from(self.text_size.0)
    }

    pub fn rows(&self) -> usize {
        usize::from(self.text_size.1)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn alpha(&self) -> bool {
        self.alpha
    }

    pub fn total_cells(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Bytes per source pixel.
    pub fn depth(&self) -> usize {
        if self.alpha {
            4
        } else {
            3
        }
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.depth() as u32 * 8
    }

    /// Channel masks `[red, green, blue, alpha]` for little-endian packed pixels.
    pub fn masks(&self) -> [u32; 4] {
        let alpha = if self.alpha { 0xff00_0000 } else { 0 };
        [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, alpha]
    }

    /// Bytes in one source row.
    pub fn stride(&self) -> usize {
        self.depth() * self.img_size.0 as usize
    }

    /// Bytes in one encoded frame.
    pub fn frame_len(&self) -> usize {
        crate::CELL_BYTES * self.total_cells()
    }

    pub fn header(&self) -> Header {
        Header { width: self.text_size.0, height: self.text_size.1, fps: self.fps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_rational_rates() {
        assert_eq!(parse_fps("30").unwrap(), Fps::new(30, 1));
        assert_eq!(parse_fps("24/1").unwrap(), Fps::new(24, 1));
        assert_eq!(parse_fps("0/0").unwrap(), Fps::UNSPECIFIED);
    }

    #[test]
    fn empty_rate_is_unspecified() {
        assert!(parse_fps("").unwrap().is_unspecified());
    }

    #[test]
    fn rejects_malformed_rates() {
        for value in ["30/1.001", "1/2/3", "/", "abc", "300", "24/256", "-1"] {
            assert!(
                matches!(parse_fps(value), Err(VideoError::InvalidFps(ref v)) if v == value),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn derives_pixel_layout_from_alpha() {
        let rgb = Settings::new((4, 2), (2, 1), Fps::new(30, 1), false).unwrap();
        assert_eq!(rgb.depth(), 3);
        assert_eq!(rgb.bits_per_pixel(), 24);
        assert_eq!(rgb.masks(), [0xff, 0xff00, 0xff_0000, 0]);
        assert_eq!(rgb.stride(), 12);

        let rgba = Settings::new((4, 2), (2, 1), Fps::new(30, 1), true).unwrap();
        assert_eq!(rgba.depth(), 4);
        assert_eq!(rgba.bits_per_pixel(), 32);
        assert_eq!(rgba.masks()[3], 0xff00_0000);
        assert_eq!(rgba.frame_len(), 10);
    }

    #[test]
    fn rejects_oversized_and_empty_grids() {
        assert!(matches!(
            Settings::new((10, 10), (65_536, 1), Fps::UNSPECIFIED, false),
            Err(VideoError::GridTooLarge(65_536, 1))
        ));
        assert!(Settings::new((10, 10), (65_535, 1), Fps::UNSPECIFIED, false).is_ok());
        assert!(matches!(
            Settings::new((10, 10), (0, 4), Fps::UNSPECIFIED, false),
            Err(VideoError::EmptyGrid)
        ));
    }
}
