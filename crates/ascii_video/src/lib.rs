mod cell;
mod dither;
mod encoder;
mod geometry;
mod pipeline;
mod settings;
mod stream;

use std::io;

pub use cell::{
    attribute::{Attribute, StyleFlags},
    canvas::Canvas,
    codec::{encode, CellInfo, Color, CELL_BYTES},
    palette::AnsiPalette,
};
pub use dither::{renderer::ErrorDiffusionRenderer, Algorithm, Charset, DitherConfig, FrameRenderer};
pub use encoder::FrameEncoder;
pub use geometry::solve;
pub use pipeline::{collect_frame_paths, encode_stream};
pub use settings::{parse_fps, Fps, Settings};
pub use stream::{
    header::{Header, HEADER_LEN},
    reader::{frame_count_from_len, StreamReader},
    writer::StreamWriter,
};

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("invalid color value {0} (expected 0..=16 or 32)")]
    InvalidColorValue(u32),
    #[error("invalid style flags {0:#x} (expected 0..=15)")]
    InvalidFlags(u32),
    #[error("code point {0:#x} does not fit in 24 bits")]
    CodepointOverflow(u32),
    #[error("frame is {}x{} pixels, expected {}x{}", found.0, found.1, expected.0, expected.1)]
    SizeMismatch { expected: (u32, u32), found: (u32, u32) },
    #[error("no grid size preserves the source aspect ratio within the given bounds")]
    NoFeasibleSize,
    #[error("invalid fps value {0:?}")]
    InvalidFps(String),
    #[error("grid {0}x{1} does not fit the 16-bit header fields")]
    GridTooLarge(u32, u32),
    #[error("grid and image dimensions must be non-zero")]
    EmptyGrid,
    #[error("header must be written exactly once, before any frame")]
    HeaderState,
    #[error("frame is {found} bytes, expected {expected}")]
    FrameLength { expected: usize, found: usize },
    #[error("stream ended inside the header")]
    TruncatedHeader,
    #[error("stream ended inside a frame")]
    TruncatedFrame,
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VideoError>;
