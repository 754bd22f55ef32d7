//! Lamina CLI - Layered Raster Image Engine
//!
//! Command-line interface for rendering, converting, and inspecting
//! Netpbm images.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use serde::Serialize;

use lamina::codec::{self, PnmFormat};
use lamina::draw;
use lamina::raster::{Argb, Image, ImageInfo};

/// Lamina - layered raster images with Netpbm output
#[derive(Parser, Debug)]
#[command(name = "lamina")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the demonstration scene and save it
    Demo {
        /// Output file path
        #[arg(short, long, default_value = "output.ppm")]
        output: PathBuf,

        /// Output format (defaults to the output file extension)
        #[arg(short, long)]
        format: Option<FormatArg>,
    },

    /// Decode a Netpbm file and re-encode it in another format
    Convert {
        /// Input Netpbm file
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Output format (defaults to the output file extension)
        #[arg(short, long)]
        format: Option<FormatArg>,
    },

    /// Decode a Netpbm file and print a structural summary
    Info {
        /// Input Netpbm file
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Ppm,
    Pgm,
    Pbm,
}

impl From<FormatArg> for PnmFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ppm => PnmFormat::Pixmap,
            FormatArg::Pgm => PnmFormat::Graymap,
            FormatArg::Pbm => PnmFormat::Bitmap,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Demo { output, format } => run_demo(&output, format),
        Commands::Convert {
            input,
            output,
            format,
        } => run_convert(&input, &output, format),
        Commands::Info { input, json } => run_info(&input, json),
    }
}

/// Pick the output format from the flag, falling back to the file extension
fn output_format(path: &Path, format: Option<FormatArg>) -> anyhow::Result<PnmFormat> {
    if let Some(arg) = format {
        return Ok(arg.into());
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match PnmFormat::from_extension(ext) {
        Some(found) => Ok(found),
        None => bail!(
            "cannot infer output format from '{}'; pass --format",
            path.display()
        ),
    }
}

/// Render the reference scene: a red circle below a half-transparent blue
/// wash carrying a half-transparent green ellipse.
fn run_demo(output: &Path, format: Option<FormatArg>) -> anyhow::Result<()> {
    let format = output_format(output, format)?;

    let mut image = Image::new(100, 100);

    let base = image.add_layer()?;
    draw::circle_filled(&mut base.borrow_mut(), 50, 50, 30, Argb::opaque(255, 0, 0));
    drop(base);

    let overlay = image.add_layer()?;
    {
        let mut layer = overlay.borrow_mut();
        draw::fill(&mut layer, Argb::new(128, 0, 0, 255));
        draw::ellipse_filled(&mut layer, 50, 50, 20, 40, Argb::new(128, 0, 255, 0));
    }
    drop(overlay);

    codec::encode_file(output, &image, format)
        .with_context(|| format!("failed to save {}", output.display()))?;

    info!("wrote demo scene to {} as {}", output.display(), format);
    Ok(())
}

fn run_convert(input: &Path, output: &Path, format: Option<FormatArg>) -> anyhow::Result<()> {
    let target = output_format(output, format)?;

    let (layer, source_format) = codec::decode_file(input)
        .with_context(|| format!("failed to decode {}", input.display()))?;
    info!("decoded {} as {}", input.display(), source_format);

    let mut image = Image::new(layer.width(), layer.height());
    image.add_existing_layer(&layer.into_shared())?;

    codec::encode_file(output, &image, target)
        .with_context(|| format!("failed to save {}", output.display()))?;

    info!("wrote {} as {}", output.display(), target);
    Ok(())
}

/// Summary of one decoded file, for `info` output
#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    format: PnmFormat,
    magic: &'static str,
    image: ImageInfo,
}

fn run_info(input: &Path, json: bool) -> anyhow::Result<()> {
    let (layer, format) = codec::decode_file(input)
        .with_context(|| format!("failed to decode {}", input.display()))?;

    let mut image = Image::new(layer.width(), layer.height());
    image.add_existing_layer(&layer.into_shared())?;

    if json {
        let path_text = input.display().to_string();
        let report = FileReport {
            path: &path_text,
            format,
            magic: format.magic(),
            image: image.info(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}: {}", input.display(), format);
        print!("{}", image.info());
    }
    Ok(())
}
