pub mod kernel;
pub mod renderer;

use crate::cell::canvas::Canvas;
use crate::settings::Settings;

/// Turns one decoded bitmap into a grid of attributed glyphs.
///
/// `pixels` is row-major RGB24, or RGBA32 when `settings.alpha()` is set, and
/// covers exactly `settings.img_size()`. Implementations write every cell of
/// `canvas`; the caller clears it between frames. Algorithm and glyph set are
/// fixed when the renderer is built.
pub trait FrameRenderer {
    fn render(&mut self, pixels: &[u8], settings: &Settings, canvas: &mut Canvas);
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn render(&mut self, pixels: &[u8], settings: &Settings, canvas: &mut Canvas) {
        (**self).render(pixels, settings, canvas)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    FloydSteinberg,
    Atkinson,
    /// Nearest match per cell, no diffusion.
    None,
}

impl Algorithm {
    pub(crate) fn kernel(self) -> kernel::Kernel {
        match self {
            Algorithm::FloydSteinberg => kernel::FLOYD_STEINBERG,
            Algorithm::Atkinson => kernel::ATKINSON,
            Algorithm::None => kernel::NONE,
        }
    }
}

/// Glyph ramps, ordered from empty to fully inked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Charset {
    #[default]
    Ascii,
    Blocks,
}

impl Charset {
    pub fn glyphs(self) -> &'static [char] {
        match self {
            Charset::Ascii => &[' ', '.', ':', ';', 't', '%', 'S', 'X', '8', '@'],
            Charset::Blocks => &[' ', '░', '▒', '▓', '█'],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DitherConfig {
    pub algorithm: Algorithm,
    pub charset: Charset,
}
