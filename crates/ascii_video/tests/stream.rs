use std::path::{Path, PathBuf};

use ascii_video::{
    collect_frame_paths, encode_stream, frame_count_from_len, solve, ErrorDiffusionRenderer, Fps,
    FrameEncoder, Settings, StreamReader, VideoError, HEADER_LEN,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_rgb(dir: &Path, name: &str, size: (u32, u32), seed: u8) -> PathBuf {
    let image = RgbImage::from_fn(size.0, size.1, |x, y| {
        Rgb([(x * 16) as u8 ^ seed, (y * 24) as u8, seed.wrapping_mul(3)])
    });
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

fn settings_for(size: (u32, u32), alpha: bool) -> Settings {
    let text_size = solve(size, Some(8), Some(8), false).unwrap();
    Settings::new(size, text_size, Fps::new(30, 1), alpha).unwrap()
}

#[test]
fn stream_is_header_followed_by_frames_in_order() {
    let dir = TempDir::new().unwrap();
    let frames: Vec<PathBuf> =
        (0..3).map(|i| write_rgb(dir.path(), &format!("f{i}.png"), (16, 8), i * 40)).collect();
    let settings = settings_for((16, 8), false);
    assert_eq!(settings.text_size(), (8, 4));

    let mut seen = Vec::new();
    let bytes = encode_stream(
        settings,
        ErrorDiffusionRenderer::default(),
        &frames,
        Vec::new(),
        None,
        |index| seen.push(index),
    )
    .unwrap();
    assert_eq!(seen, vec![0, 1, 2]);

    let frame_len = settings.frame_len();
    assert_eq!(frame_len, 5 * 8 * 4);
    assert_eq!(bytes.len(), HEADER_LEN + 3 * frame_len);
    assert_eq!(&bytes[..HEADER_LEN], &[8, 0, 4, 0, 30, 1]);

    // Each frame matches a standalone encode of the same image.
    let mut encoder = FrameEncoder::new(settings, ErrorDiffusionRenderer::default());
    for (index, path) in frames.iter().enumerate() {
        let start = HEADER_LEN + index * frame_len;
        assert_eq!(&bytes[start..start + frame_len], encoder.encode_frame(path).unwrap());
    }
}

#[test]
fn written_stream_reads_back() {
    let dir = TempDir::new().unwrap();
    let frames = vec![
        write_rgb(dir.path(), "a.png", (16, 8), 7),
        write_rgb(dir.path(), "b.png", (16, 8), 99),
    ];
    let settings = settings_for((16, 8), false);

    let renderer = ErrorDiffusionRenderer::default();
    let bytes = encode_stream(settings, renderer, &frames, Vec::new(), None, |_| {}).unwrap();
    assert_eq!(frame_count_from_len(bytes.len() as u64, &settings.header()), 2);

    let reader = StreamReader::new(bytes.as_slice()).unwrap();
    assert_eq!(reader.info(), settings.header());
    let decoded: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 2);
    assert!(decoded.iter().all(|frame| frame.len() == settings.total_cells()));
}

#[test]
fn size_mismatch_stops_before_the_offending_frame() {
    let dir = TempDir::new().unwrap();
    let frames = vec![
        write_rgb(dir.path(), "0.png", (16, 8), 1),
        write_rgb(dir.path(), "1.png", (15, 8), 2),
        write_rgb(dir.path(), "2.png", (16, 8), 3),
    ];
    let settings = settings_for((16, 8), false);

    let mut sink = Vec::new();
    let renderer = ErrorDiffusionRenderer::default();
    let result = encode_stream(settings, renderer, &frames, &mut sink, None, |_| {});
    match result {
        Err(VideoError::SizeMismatch { expected, found }) => {
            assert_eq!(expected, (16, 8));
            assert_eq!(found, (15, 8));
        },
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("mismatched frame was accepted"),
    }
    assert_eq!(sink.len(), HEADER_LEN + settings.frame_len());
}

#[test]
fn alpha_frames_mark_transparent_cells_as_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clear.png");
    RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 0])).save(&path).unwrap();
    let settings = settings_for((8, 8), true);

    let bytes = encode_stream(
        settings,
        ErrorDiffusionRenderer::default(),
        &[path],
        Vec::new(),
        None,
        |_| {},
    )
    .unwrap();

    let mut reader = StreamReader::new(bytes.as_slice()).unwrap();
    let frame = reader.next_frame().unwrap().unwrap();
    for cell in frame {
        assert_eq!(cell.background, ascii_video::Color::Default);
        assert_eq!(cell.glyph(), Some(' '));
    }
}

#[test]
fn directories_expand_to_sorted_files() {
    let dir = TempDir::new().unwrap();
    let frames = dir.path().join("frames");
    std::fs::create_dir(&frames).unwrap();
    for name in ["0002.png", "0001.png", "0010.png"] {
        write_rgb(&frames, name, (4, 4), 0);
    }
    let single = write_rgb(dir.path(), "tail.png", (4, 4), 0);

    let paths = collect_frame_paths(&[frames.clone(), single.clone()]).unwrap();
    assert_eq!(
        paths,
        vec![frames.join("0001.png"), frames.join("0002.png"), frames.join("0010.png"), single]
    );

    let empty = dir.path().join("empty");
    std::fs::create_dir(&empty).unwrap();
    assert!(matches!(collect_frame_paths(&[empty]), Err(VideoError::Io(_))));
}
