use crate::cell::codec::CELL_BYTES;
use crate::settings::Fps;

pub const HEADER_LEN: usize = 6;

/// Stream preamble: grid size and frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub fps: Fps,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        [w0, w1, h0, h1, self.fps.numerator, self.fps.denominator]
    }

    pub fn parse(bytes: [u8; HEADER_LEN]) -> Self {
        Self {
            width: u16::from_le_bytes([bytes[0], bytes[1]]),
            height: u16::from_le_bytes([bytes[2], bytes[3]]),
            fps: Fps::new(bytes[4], bytes[5]),
        }
    }

    pub fn total_cells(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Bytes in each frame following the header.
    pub fn frame_len(&self) -> usize {
        CELL_BYTES * self.total_cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::solve;
    use crate::settings::Settings;

    #[test]
    fn serializes_little_endian_fields() {
        let text_size = solve((1920, 1200), Some(80), Some(25), true).unwrap();
        let settings = Settings::new((1920, 1200), text_size, Fps::new(30, 1), false).unwrap();
        assert_eq!(settings.header().to_bytes(), [0x50, 0x00, 0x19, 0x00, 30, 1]);
    }

    #[test]
    fn wide_grids_use_the_high_byte() {
        let header = Header { width: 0x0123, height: 0xff00, fps: Fps::new(24, 1) };
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0x23, 0x01, 0x00, 0xff, 24, 1]);
        assert_eq!(Header::parse(bytes), header);
        assert_eq!(header.frame_len(), 5 * 0x0123 * 0xff00);
    }
}
