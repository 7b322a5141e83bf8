use std::io::Write;
use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::cell::canvas::Canvas;
use crate::cell::codec::{CellInfo, CELL_BYTES};
use crate::dither::FrameRenderer;
use crate::settings::Settings;
use crate::{Result, VideoError};

/// Renders images and packs the resulting grids into frame records.
///
/// The frame buffer is owned here and reused: the slice returned by
/// [`FrameEncoder::encode_frame`] is overwritten by the next call.
pub struct FrameEncoder<R> {
    settings: Settings,
    renderer: R,
    canvas: Canvas,
    buffer: Vec<u8>,
    preview: Option<Box<dyn Write>>,
}

impl<R: FrameRenderer> FrameEncoder<R> {
    pub fn new(settings: Settings, renderer: R) -> Self {
        let (columns, rows) = settings.text_size();
        Self {
            canvas: Canvas::new(columns, rows),
            buffer: vec![0; settings.frame_len()],
            settings,
            renderer,
            preview: None,
        }
    }

    /// Dump every rendered grid, with colors, to `sink`.
    pub fn with_preview(mut self, sink: Box<dyn Write>) -> Self {
        self.preview = Some(sink);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn encode_frame<P: AsRef<Path>>(&mut self, path: P) -> Result<&[u8]> {
        let path = path.as_ref();
        let image = image::open(path)?;
        debug!("encoding {}", path.display());
        self.encode_image(image)
    }

    pub fn encode_image(&mut self, image: DynamicImage) -> Result<&[u8]> {
        let found = image.dimensions();
        let expected = self.settings.img_size();
        if found != expected {
            return Err(VideoError::SizeMismatch { expected, found });
        }

        let pixels = if self.settings.alpha() {
            image.into_rgba8().into_raw()
        } else {
            image.into_rgb8().into_raw()
        };

        self.renderer.render(&pixels, &self.settings, &mut self.canvas);
        self.write_preview()?;

        let packed = self.pack_canvas();
        self.canvas.clear();
        packed?;

        Ok(&self.buffer)
    }

    fn pack_canvas(&mut self) -> Result<()> {
        let cells = self.buffer.chunks_exact_mut(CELL_BYTES).zip(self.canvas.cells());
        for (slot, (attr, ch)) in cells {
            let info = CellInfo::from_raw(
                u32::from(attr.ansi_fg()),
                u32::from(attr.ansi_bg()),
                u32::from(attr.flags().bits()),
                u32::from(ch),
            )?;
            slot.copy_from_slice(&info.encode()?);
        }
        Ok(())
    }

    fn write_preview(&mut self) -> Result<()> {
        let Some(preview) = self.preview.as_mut() else {
            return Ok(());
        };

        preview.write_all(self.canvas.export_ansi().as_bytes())?;
        preview.write_all("\n".repeat(self.settings.rows()).as_bytes())?;
        preview.flush()?;
        Ok(())
    }
}
