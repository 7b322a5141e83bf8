use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::dither::FrameRenderer;
use crate::encoder::FrameEncoder;
use crate::settings::Settings;
use crate::stream::writer::StreamWriter;
use crate::Result;

/// Encode `frames` in order into `sink` as one stream.
///
/// `on_frame` is called with each frame's index once it is written. On the
/// first failure the frames already written stay in the sink, flushed, and the
/// error is returned.
pub fn encode_stream<R, W, P, F>(
    settings: Settings,
    renderer: R,
    frames: &[P],
    sink: W,
    preview: Option<Box<dyn Write>>,
    mut on_frame: F,
) -> Result<W>
where
    R: FrameRenderer,
    W: Write,
    P: AsRef<Path>,
    F: FnMut(usize),
{
    let mut encoder = FrameEncoder::new(settings, renderer);
    if let Some(preview) = preview {
        encoder = encoder.with_preview(preview);
    }

    let mut writer = StreamWriter::new(sink);
    writer.write_header(&settings)?;

    for (index, path) in frames.iter().enumerate() {
        let frame = match encoder.encode_frame(path) {
            Ok(frame) => frame,
            Err(err) => {
                if let Err(flush_err) = writer.flush() {
                    warn!("failed to flush partial stream: {flush_err}");
                }
                warn!(
                    "stopped at {} after {} frames",
                    path.as_ref().display(),
                    writer.frames_written()
                );
                return Err(err);
            },
        };

        writer.write_frame(frame)?;
        on_frame(index);
    }

    info!("wrote {} frames of {} bytes", writer.frames_written(), settings.frame_len());
    writer.into_inner()
}

/// Expand directories among `inputs` into their files, sorted by path.
pub fn collect_frame_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }

        let mut entries: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .collect();
        if entries.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no image files found in {}", input.display()),
            )
            .into());
        }

        entries.sort();
        paths.extend(entries);
    }
    Ok(paths)
}
