use bitflags::bitflags;

use super::palette::AnsiPalette;

bitflags! {
    /// Style bits carried in the low nibble of an [`Attribute`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD = 0b0001;
        const ITALICS = 0b0010;
        const UNDERLINE = 0b0100;
        const BLINK = 0b1000;
    }
}

/// Opaque per-cell style produced by a renderer.
///
/// Layout: bits 0-3 style flags, bits 4-17 background, bits 18-31 foreground.
/// Each 14-bit color is a palette index (`0..16`), [`Attribute::DEFAULT`],
/// [`Attribute::TRANSPARENT`], or an RGB444 true color tagged with bit 12.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attribute(u32);

const FLAG_MASK: u32 = 0x0f;
const COLOR_MASK: u32 = 0x3fff;
const BG_SHIFT: u32 = 4;
const FG_SHIFT: u32 = 18;
const TRUECOLOR_TAG: u16 = 0x1000;

impl Attribute {
    pub const DEFAULT: u16 = 0x10;
    pub const TRANSPARENT: u16 = 0x20;

    /// Palette value reported for [`Attribute::DEFAULT`].
    pub const ANSI_DEFAULT: u8 = 16;
    /// Palette value reported for [`Attribute::TRANSPARENT`] and unknown colors.
    pub const ANSI_TRANSPARENT: u8 = 32;

    pub fn new(foreground: u16, background: u16, flags: StyleFlags) -> Self {
        let fg = u32::from(foreground) & COLOR_MASK;
        let bg = u32::from(background) & COLOR_MASK;
        Self((fg << FG_SHIFT) | (bg << BG_SHIFT) | u32::from(flags.bits()))
    }

    /// Attribute with two palette entries and no style.
    pub fn ansi(foreground: u8, background: u8) -> Self {
        Self::new(u16::from(foreground & 0x0f), u16::from(background & 0x0f), StyleFlags::empty())
    }

    /// Encode an 8-bit RGB triple as a 14-bit true color, keeping four bits per channel.
    pub fn rgb(red: u8, green: u8, blue: u8) -> u16 {
        let [r, g, b] = [red, green, blue].map(|channel| u16::from(channel >> 4));
        TRUECOLOR_TAG | (r << 8) | (g << 4) | b
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn flags(self) -> StyleFlags {
        StyleFlags::from_bits_truncate((self.0 & FLAG_MASK) as u8)
    }

    pub fn foreground(self) -> u16 {
        ((self.0 >> FG_SHIFT) & COLOR_MASK) as u16
    }

    pub fn background(self) -> u16 {
        ((self.0 >> BG_SHIFT) & COLOR_MASK) as u16
    }

    pub fn ansi_fg(self) -> u8 {
        to_ansi(self.foreground())
    }

    pub fn ansi_bg(self) -> u8 {
        to_ansi(self.background())
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new(Self::DEFAULT, Self::TRANSPARENT, StyleFlags::empty())
    }
}

fn to_ansi(color: u16) -> u8 {
    match color {
        0..=0x0f => color as u8,
        Attribute::DEFAULT => Attribute::ANSI_DEFAULT,
        Attribute::TRANSPARENT => Attribute::ANSI_TRANSPARENT,
        _ if color & TRUECOLOR_TAG != 0 => {
            let rgb = [(color >> 8) & 0x0f, (color >> 4) & 0x0f, color & 0x0f]
                .map(|nibble| f32::from(nibble) / 15.0);
            AnsiPalette::vga().nearest(rgb)
        },
        _ => Attribute::ANSI_TRANSPARENT,
    }
}
