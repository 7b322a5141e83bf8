use super::kernel::ErrorBuffer;
use super::{DitherConfig, FrameRenderer};
use crate::cell::attribute::Attribute;
use crate::cell::canvas::Canvas;
use crate::cell::palette::{distance_sq, AnsiPalette};
use crate::settings::Settings;

/// Accumulated error may push a cell this far outside `0.0..=1.0`.
const ERROR_CLAMP: f32 = 0.5;
/// Cells less opaque than this become transparent blanks.
const ALPHA_THRESHOLD: f32 = 0.5;

/// Error-diffusion renderer over the sixteen-color palette.
///
/// Each cell is the area average of the source pixels it covers. The cell's
/// background is the palette entry nearest to the (error-adjusted) average;
/// the foreground and glyph density are then picked so that the blend of the
/// two colors comes closest, and the remaining error is diffused onward.
#[derive(Debug)]
pub struct ErrorDiffusionRenderer {
    config: DitherConfig,
    palette: AnsiPalette,
    errors: ErrorBuffer,
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    rgb: [f32; 3],
    alpha: f32,
}

#[derive(Clone, Copy, Debug)]
struct Choice {
    fg: u8,
    bg: u8,
    level: usize,
    rendered: [f32; 3],
    distance: f32,
}

impl ErrorDiffusionRenderer {
    pub fn new(config: DitherConfig) -> Self {
        Self { config, palette: AnsiPalette::vga(), errors: ErrorBuffer::new(0, 1) }
    }

    fn best_match(&self, target: [f32; 3], levels: usize) -> Choice {
        let bg = self.palette.nearest(target);
        let background = self.palette.color(bg);
        let mut best = Choice {
            fg: bg,
            bg,
            level: 0,
            rendered: background,
            distance: distance_sq(background, target),
        };

        let steps = (levels - 1) as f32;
        for fg in 0..self.palette.len() as u8 {
            if fg == bg {
                continue;
            }

            let foreground = self.palette.color(fg);
            for level in 1..levels {
                let coverage = level as f32 / steps;
                let rendered = [0, 1, 2]
                    .map(|c| background[c] + (foreground[c] - background[c]) * coverage);
                let distance = distance_sq(rendered, target);
                if distance < best.distance {
                    best = Choice { fg, bg, level, rendered, distance };
                }
            }
        }

        best
    }
}

impl Default for ErrorDiffusionRenderer {
    fn default() -> Self {
        Self::new(DitherConfig::default())
    }
}

impl FrameRenderer for ErrorDiffusionRenderer {
    fn render(&mut self, pixels: &[u8], settings: &Settings, canvas: &mut Canvas) {
        debug_assert_eq!(pixels.len(), settings.stride() * settings.img_size().1 as usize);

        let columns = usize::from(canvas.width());
        let rows = usize::from(canvas.height());
        let kernel = self.config.algorithm.kernel();
        let glyphs = self.config.charset.glyphs();

        if self.errors.fits(columns, kernel.max_dy + 1) {
            self.errors.reset();
        } else {
            self.errors = ErrorBuffer::new(columns, kernel.max_dy + 1);
        }

        for y in 0..rows {
            for x in 0..columns {
                let sample = sample_cell(pixels, settings, (x, y), (columns, rows));
                if settings.alpha() && sample.alpha < ALPHA_THRESHOLD {
                    canvas.put(x, y, ' ', Attribute::default());
                    continue;
                }

                let accumulated = self.errors.accumulated(x);
                let target = [0, 1, 2].map(|c| {
                    (sample.rgb[c] + accumulated[c]).clamp(-ERROR_CLAMP, 1.0 + ERROR_CLAMP)
                });

                let choice = self.best_match(target, glyphs.len());
                canvas.put(x, y, glyphs[choice.level], Attribute::ansi(choice.fg, choice.bg));

                let error = [0, 1, 2].map(|c| target[c] - choice.rendered[c]);
                kernel.diffuse(&mut self.errors, x, error);
            }
            self.errors.advance_row();
        }
    }
}

/// Average the source pixels that fall inside cell `(x, y)`.
fn sample_cell(
    pixels: &[u8],
    settings: &Settings,
    (x, y): (usize, usize),
    (columns, rows): (usize, usize),
) -> Sample {
    let (width, height) = settings.img_size();
    let (width, height) = (width as usize, height as usize);
    let depth = settings.depth();
    let stride = settings.stride();

    let x0 = x * width / columns;
    let x1 = ((x + 1) * width / columns).max(x0 + 1).min(width);
    let y0 = y * height / rows;
    let y1 = ((y + 1) * height / rows).max(y0 + 1).min(height);

    let mut sum = [0u64; 4];
    for py in y0..y1 {
        let row = &pixels[py * stride..(py + 1) * stride];
        for pixel in row[x0 * depth..x1 * depth].chunks_exact(depth) {
            for channel in 0..3 {
                sum[channel] += u64::from(pixel[channel]);
            }
            sum[3] += u64::from(if depth == 4 { pixel[3] } else { u8::MAX });
        }
    }

    let count = ((x1 - x0) * (y1 - y0)) as f32 * 255.0;
    Sample {
        rgb: [sum[0] as f32 / count, sum[1] as f32 / count, sum[2] as f32 / count],
        alpha: sum[3] as f32 / count,
    }
}
