//! Five-byte cell records.
//!
//! ```text
//! byte 0..2  u16 LE  fg << 11 | bg << 6 | flags
//! byte 2..5  u24 LE  Unicode code point
//! ```

use super::attribute::StyleFlags;
use crate::{Result, VideoError};

/// Size of one encoded cell.
pub const CELL_BYTES: usize = 5;

const MAX_INDEXED: u8 = 16;
/// Renderer-side value for the default color; it does not fit five bits.
const DEFAULT_SENTINEL: u32 = 32;
/// Wire value the default color is stored as.
const DEFAULT_WIRE: u16 = 17;
const CODEPOINT_LIMIT: u32 = 1 << 24;

const FG_SHIFT: u16 = 11;
const BG_SHIFT: u16 = 6;
const COLOR_FIELD: u16 = 0x1f;
const FLAG_FIELD: u16 = 0x3f;

/// Cell color as seen outside the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Palette entry `0..=16`.
    Indexed(u8),
    /// Terminal default (or transparent) color.
    Default,
}

impl Color {
    /// Interpret a renderer palette value: `0..=16`, or 32 for the default.
    pub fn from_ansi(value: u32) -> Result<Self> {
        match value {
            0..=16 => Ok(Color::Indexed(value as u8)),
            DEFAULT_SENTINEL => Ok(Color::Default),
            _ => Err(VideoError::InvalidColorValue(value)),
        }
    }

    fn to_wire(self) -> Result<u16> {
        match self {
            Color::Indexed(index) if index <= MAX_INDEXED => Ok(u16::from(index)),
            Color::Indexed(index) => Err(VideoError::InvalidColorValue(u32::from(index))),
            Color::Default => Ok(DEFAULT_WIRE),
        }
    }

    /// Readers treat wire values the encoder never emits as the default color.
    fn from_wire(value: u16) -> Self {
        match value {
            0..=16 => Color::Indexed(value as u8),
            _ => Color::Default,
        }
    }
}

/// One character cell of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellInfo {
    pub foreground: Color,
    pub background: Color,
    pub flags: StyleFlags,
    pub codepoint: u32,
}

impl CellInfo {
    /// Validate raw renderer output.
    pub fn from_raw(foreground: u32, background: u32, flags: u32, codepoint: u32) -> Result<Self> {
        let foreground = Color::from_ansi(foreground)?;
        let background = Color::from_ansi(background)?;
        let flags = u8::try_from(flags)
            .ok()
            .and_then(StyleFlags::from_bits)
            .ok_or(VideoError::InvalidFlags(flags))?;
        if codepoint >= CODEPOINT_LIMIT {
            return Err(VideoError::CodepointOverflow(codepoint));
        }

        Ok(Self { foreground, background, flags, codepoint })
    }

    pub fn encode(&self) -> Result<[u8; CELL_BYTES]> {
        if self.codepoint >= CODEPOINT_LIMIT {
            return Err(VideoError::CodepointOverflow(self.codepoint));
        }

        let fg = self.foreground.to_wire()?;
        let bg = self.background.to_wire()?;
        let word = (fg << FG_SHIFT) | (bg << BG_SHIFT) | u16::from(self.flags.bits());
        let [lo, hi] = word.to_le_bytes();
        let [c0, c1, c2, _] = self.codepoint.to_le_bytes();
        Ok([lo, hi, c0, c1, c2])
    }

    pub fn decode(bytes: [u8; CELL_BYTES]) -> Self {
        let word = u16::from_le_bytes([bytes[0], bytes[1]]);
        Self {
            foreground: Color::from_wire((word >> FG_SHIFT) & COLOR_FIELD),
            background: Color::from_wire((word >> BG_SHIFT) & COLOR_FIELD),
            flags: StyleFlags::from_bits_truncate((word & FLAG_FIELD) as u8),
            codepoint: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], 0]),
        }
    }

    /// The glyph, if the code point is a Unicode scalar value.
    pub fn glyph(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

/// Validate and pack one cell in a single step.
pub fn encode(
    foreground: u32,
    background: u32,
    flags: u32,
    codepoint: u32,
) -> Result<[u8; CELL_BYTES]> {
    CellInfo::from_raw(foreground, background, flags, codepoint)?.encode()
}
