use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ascii_video::{
    collect_frame_paths, encode_stream, frame_count_from_len, parse_fps, solve, Algorithm, Charset,
    DitherConfig, ErrorDiffusionRenderer, Settings, StreamReader,
};
use clap::{Parser, Subcommand, ValueEnum};
use image::GenericImageView;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

/// Grid used when neither `--width` nor `--height` is given.
const FALLBACK_TERMINAL: (u32, u32) = (80, 25);

#[derive(Parser, Debug)]
#[command(author, version, about = "Encode image sequences into character-cell video streams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dither a sequence of frames and write them as one stream
    Encode(EncodeArgs),
    /// Print the header and frame count of an existing stream
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input frames, in playback order (directories expand to their sorted files)
    #[arg(required = true)]
    frames: Vec<PathBuf>,
    /// Maximum grid width in cells
    #[arg(long)]
    width: Option<u32>,
    /// Maximum grid height in cells
    #[arg(long)]
    height: Option<u32>,
    /// Use the given size as-is instead of searching for an exact aspect ratio
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Frame rate as `N` or `N/D`
    #[arg(long, default_value = "0/0")]
    fps: String,
    /// Dither with the alpha channel (default: when the first frame has one)
    #[arg(long, conflicts_with = "no_alpha")]
    alpha: bool,
    /// Ignore the alpha channel
    #[arg(long)]
    no_alpha: bool,
    /// Output file, or `-` for stdout
    #[arg(short, long)]
    out: PathBuf,
    /// Show each rendered frame on stderr
    #[arg(long, default_value_t = false)]
    display: bool,
    /// Error diffusion algorithm
    #[arg(long, value_enum, default_value = "fstein")]
    algorithm: AlgorithmChoice,
    /// Glyph set used for shading
    #[arg(long, value_enum, default_value = "ascii")]
    charset: CharsetChoice,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Stream file to read
    input: PathBuf,
    /// Also print the glyphs of this frame
    #[arg(long)]
    frame: Option<usize>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AlgorithmChoice {
    #[value(name = "fstein")]
    FloydSteinberg,
    Atkinson,
    None,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CharsetChoice {
    Ascii,
    Blocks,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Encode(args) => encode(args),
        Commands::Inspect(args) => inspect(args),
    }
}

fn encode(args: EncodeArgs) -> Result<()> {
    let fps = parse_fps(&args.fps)?;
    let frames = collect_frame_paths(&args.frames).context("failed to collect input frames")?;
    let first_path = frames.first().context("no input frames")?;
    let first = image::open(first_path)
        .with_context(|| format!("failed to open image {:?}", first_path))?;

    let (max_width, max_height) = match (args.width, args.height) {
        (None, None) => {
            warn!("no size given, falling back to an 80x25 terminal");
            (Some(FALLBACK_TERMINAL.0), Some(FALLBACK_TERMINAL.1))
        },
        bounds => bounds,
    };
    let img_size = first.dimensions();
    let text_size = solve(img_size, max_width, max_height, args.force)
        .with_context(|| format!("cannot fit a {}x{} image", img_size.0, img_size.1))?;
    let alpha = args.alpha_override().unwrap_or_else(|| first.color().has_alpha());
    drop(first);

    let settings = Settings::new(img_size, text_size, fps, alpha)?;
    if fps.is_unspecified() {
        warn!("no fps given, the header will record 0/0");
    }
    info!(
        "{} frames of {}x{} pixels as {}x{} cells at {} fps (alpha: {})",
        frames.len(),
        img_size.0,
        img_size.1,
        text_size.0,
        text_size.1,
        fps,
        alpha
    );

    let preview: Option<Box<dyn Write>> = if args.display {
        eprintln!("Start?");
        io::stdin().lock().read_line(&mut String::new())?;
        Some(Box::new(io::stderr()))
    } else {
        None
    };

    let progress = if args.display {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(frames.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "Rendering {pos}/{len} ({percent}%) [{bar:40.cyan/blue}] ETA {eta}",
            )?
            .progress_chars("=> "),
        );
        progress
    };

    let renderer = ErrorDiffusionRenderer::new(args.dither_config());
    let on_frame = |_: usize| progress.inc(1);
    if args.out.as_os_str() == "-" {
        let sink = BufWriter::new(io::stdout().lock());
        encode_stream(settings, renderer, &frames, sink, preview, on_frame)
            .context("failed to encode frames to stdout")?;
    } else {
        let file = File::create(&args.out)
            .with_context(|| format!("failed to create {:?}", args.out))?;
        encode_stream(settings, renderer, &frames, BufWriter::new(file), preview, on_frame)
            .with_context(|| format!("failed to encode frames to {:?}", args.out))?;
    }

    progress.finish_and_clear();
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let file =
        File::open(&args.input).with_context(|| format!("failed to open {:?}", args.input))?;
    let total_len = file.metadata()?.len();
    let mut reader = StreamReader::new(BufReader::new(file))
        .with_context(|| format!("failed to read header of {:?}", args.input))?;

    let header = reader.info();
    println!("grid: {}x{}", header.width, header.height);
    println!("fps: {}", header.fps);
    println!("frame bytes: {}", header.frame_len());
    println!("frames: {}", frame_count_from_len(total_len, &header));

    if let Some(index) = args.frame {
        let cells = reader
            .nth(index)
            .transpose()?
            .with_context(|| format!("stream has no frame {}", index))?;
        for row in cells.chunks(usize::from(header.width).max(1)) {
            let line: String = row.iter().map(|cell| cell.glyph().unwrap_or('?')).collect();
            println!("{}", line);
        }
    }

    Ok(())
}

impl EncodeArgs {
    fn alpha_override(&self) -> Option<bool> {
        match (self.alpha, self.no_alpha) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn dither_config(&self) -> DitherConfig {
        DitherConfig {
            algorithm: self.algorithm.to_algorithm(),
            charset: self.charset.to_charset(),
        }
    }
}

impl AlgorithmChoice {
    fn to_algorithm(self) -> Algorithm {
        match self {
            AlgorithmChoice::FloydSteinberg => Algorithm::FloydSteinberg,
            AlgorithmChoice::Atkinson => Algorithm::Atkinson,
            AlgorithmChoice::None => Algorithm::None,
        }
    }
}

impl CharsetChoice {
    fn to_charset(self) -> Charset {
        match self {
            CharsetChoice::Ascii => Charset::Ascii,
            CharsetChoice::Blocks => Charset::Blocks,
        }
    }
}
