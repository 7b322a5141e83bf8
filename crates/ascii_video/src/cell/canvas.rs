use std::fmt::Write as _;

use super::attribute::{Attribute, StyleFlags};
use super::palette::{sgr_background, sgr_foreground};

/// Renderer output surface: one attribute and one glyph per cell, row-major.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u16,
    height: u16,
    attrs: Vec<Attribute>,
    chars: Vec<char>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self { width, height, attrs: vec![Attribute::default(); len], chars: vec![' '; len] }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Reset every cell to a blank with the default attribute.
    pub fn clear(&mut self) {
        self.attrs.fill(Attribute::default());
        self.chars.fill(' ');
    }

    /// Set one cell; writes outside the grid are ignored.
    pub fn put(&mut self, x: usize, y: usize, ch: char, attr: Attribute) {
        if x >= usize::from(self.width) || y >= usize::from(self.height) {
            return;
        }

        let index = y * usize::from(self.width) + x;
        self.chars[index] = ch;
        self.attrs[index] = attr;
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(Attribute, char)> {
        if x >= usize::from(self.width) {
            return None;
        }

        let index = y * usize::from(self.width) + x;
        Some((*self.attrs.get(index)?, self.chars[index]))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Attribute, char)> + '_ {
        self.attrs.iter().copied().zip(self.chars.iter().copied())
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        let width = usize::from(self.width).max(1);
        self.chars.chunks(width).map(|row| row.iter().collect::<String>())
    }

    /// Render the grid as UTF-8 text with SGR color escapes, one line per row.
    pub fn export_ansi(&self) -> String {
        let width = usize::from(self.width).max(1);
        let mut out = String::with_capacity(self.len() * 4);

        for (attrs, chars) in self.attrs.chunks(width).zip(self.chars.chunks(width)) {
            let mut current = None;
            for (&attr, &ch) in attrs.iter().zip(chars) {
                if current != Some(attr) {
                    out.push_str(&sgr(attr));
                    current = Some(attr);
                }
                out.push(ch);
            }
            out.push_str("\x1b[0m\n");
        }

        out
    }
}

fn sgr(attr: Attribute) -> String {
    let mut params = String::from("\x1b[0");
    let flags = attr.flags();
    for (flag, code) in [
        (StyleFlags::BOLD, 1),
        (StyleFlags::ITALICS, 3),
        (StyleFlags::UNDERLINE, 4),
        (StyleFlags::BLINK, 5),
    ] {
        if flags.contains(flag) {
            let _ = write!(params, ";{code}");
        }
    }

    let fg = match attr.ansi_fg() {
        index @ 0..=15 => sgr_foreground(index),
        _ => 39,
    };
    let bg = match attr.ansi_bg() {
        index @ 0..=15 => sgr_background(index),
        _ => 49,
    };
    let _ = write!(params, ";{fg};{bg}m");
    params
}
