//! perceptualdiff CLI - perceptual image comparison
//!
//! Compare two images and report whether a human would see a difference.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{ColorChoice, Parser};
use colored::Colorize;
use log::LevelFilter;
use perceptualdiff::{compare, PdiffParams, PdiffResult, RgbaImage};
use serde::Serialize;

/// Perceptual image comparison
///
/// Compares two images of the same size using a model of the human visual
/// system and reports whether they are perceptually indistinguishable.
/// Images that differ in only a few pixels still pass; the allowance is set
/// with --threshold.
#[derive(Parser, Debug)]
#[command(name = "perceptualdiff")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Compare two renders:
        perceptualdiff expected.png actual.png

    Print the viewing parameters and the verdict:
        perceptualdiff -v expected.png actual.png

    Ignore colour, allow up to 500 differing pixels:
        perceptualdiff --luminance-only --threshold 500 expected.png actual.png

    Write the failing pixels to diff.PNG:
        perceptualdiff -o diff expected.png actual.png

    Output JSON for scripting:
        perceptualdiff --json expected.png actual.png

EXIT CODES:
    0 - Images are perceptually indistinguishable
    1 - Images are visibly different (or differ in size)
    2 - Error (file not found, invalid image, etc.)")]
struct Cli {
    /// First image
    #[arg(value_name = "IMAGE_A")]
    image_a: PathBuf,

    /// Second image
    #[arg(value_name = "IMAGE_B")]
    image_b: PathBuf,

    /// Print the viewing parameters and the reason for a pass
    ///
    /// Also enables info-level logging unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,

    /// Only compare luminance; ignore colour differences
    #[arg(long)]
    luminance_only: bool,

    /// Horizontal field of view in degrees (0.1 to 89.9)
    #[arg(long, default_value_t = 45.0, value_name = "DEG", value_parser = parse_fov)]
    fov: f64,

    /// Number of differing pixels at which the images fail
    #[arg(long, default_value_t = 100, value_name = "PIXELS")]
    threshold: usize,

    /// Gamma of the display
    #[arg(long, default_value_t = 2.2, value_name = "G")]
    gamma: f64,

    /// White luminance of the display
    #[arg(long, default_value_t = 100.0, value_name = "CD_M2")]
    luminance: f64,

    /// Weight of colour differences (0.0 to 1.0)
    #[arg(long, default_value_t = 1.0, value_name = "F", value_parser = parse_color_factor)]
    color_factor: f64,

    /// Print the sum of per-pixel errors and its normalised value
    #[arg(long)]
    sum_errors: bool,

    /// Write the difference image to NAME.PNG
    ///
    /// Failing pixels are red, all others are black.
    #[arg(short, long, value_name = "NAME")]
    output: Option<PathBuf>,

    /// Output a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Serialize)]
struct JsonOutput {
    passed: bool,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixels_failed: Option<usize>,
    error_sum: f64,
    normalized_error_sum: f64,
    elapsed_ms: u128,
    image_a: String,
    image_b: String,
    width: usize,
    height: usize,
    params: JsonParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    difference: Option<String>,
}

#[derive(Serialize)]
struct JsonParams {
    luminance_only: bool,
    field_of_view: f64,
    threshold_pixels: usize,
    gamma: f64,
    luminance: f64,
    color_factor: f64,
}

struct Comparison {
    result: PdiffResult,
    width: usize,
    height: usize,
    elapsed_ms: u128,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_colors(&cli);
    init_logger(cli.verbose);

    run(&cli)
}

fn setup_colors(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if verbose {
        builder.filter_level(LevelFilter::Info);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }
    // RUST_LOG takes precedence over --verbose
    builder.parse_default_env();
    let _ = builder.try_init();
}

fn parse_fov(s: &str) -> Result<f64, String> {
    let fov: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.1..=89.9).contains(&fov) {
        Ok(fov)
    } else {
        Err(format!("field of view {fov} is outside 0.1..=89.9"))
    }
}

fn parse_color_factor(s: &str) -> Result<f64, String> {
    let factor: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&factor) {
        Ok(factor)
    } else {
        Err(format!("color factor {factor} is outside 0.0..=1.0"))
    }
}

fn build_params(cli: &Cli) -> PdiffParams {
    PdiffParams::new()
        .with_luminance_only(cli.luminance_only)
        .with_field_of_view(cli.fov)
        .with_threshold_pixels(cli.threshold)
        .with_gamma(cli.gamma)
        .with_luminance(cli.luminance)
        .with_color_factor(cli.color_factor)
        .with_compute_difference(cli.output.is_some())
}

fn run(cli: &Cli) -> ExitCode {
    let params = build_params(cli);

    if cli.verbose && !cli.json {
        print_params(&params);
    }

    let comparison = match compare_images(&cli.image_a, &cli.image_b, &params) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            return ExitCode::from(2);
        }
    };

    let difference_path = match (&cli.output, &comparison.result.difference) {
        (Some(name), Some(difference)) => {
            let path = difference_file_name(name);
            if let Err(e) = save_difference(difference, &path) {
                eprintln!("{}: {}", "error".red().bold(), e);
                return ExitCode::from(2);
            }
            Some(path)
        }
        _ => None,
    };

    let output = if cli.json {
        output_json(cli, &params, &comparison, difference_path.as_deref())
    } else {
        output_text(cli, &comparison, difference_path.as_deref())
    };
    if let Err(e) = output {
        eprintln!("{}: {}", "error".red().bold(), e);
        return ExitCode::from(2);
    }

    if comparison.result.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn print_params(params: &PdiffParams) {
    println!("Field of view is {} degrees", params.field_of_view());
    println!("Threshold pixels is {} pixels", params.threshold_pixels());
    println!("The gamma is {}", params.gamma());
    println!(
        "The display's luminance is {} candela per meter squared",
        params.luminance()
    );
}

fn load_image(path: &Path) -> Result<RgbaImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("failed to load '{}': {}", path.display(), e))?
        .to_rgba8();

    let (width, height) = img.dimensions();
    RgbaImage::from_rgba8(img.as_raw(), width as usize, height as usize)
        .map_err(|e| format!("failed to load '{}': {}", path.display(), e))
}

fn compare_images(
    path_a: &Path,
    path_b: &Path,
    params: &PdiffParams,
) -> Result<Comparison, String> {
    let img_a = load_image(path_a)?;
    let img_b = load_image(path_b)?;

    let start = Instant::now();
    let result = compare(&img_a, &img_b, params).map_err(|e| e.to_string())?;
    let elapsed_ms = start.elapsed().as_millis();

    Ok(Comparison {
        result,
        width: img_a.width(),
        height: img_a.height(),
        elapsed_ms,
    })
}

/// `NAME` becomes `NAME.PNG`.
fn difference_file_name(name: &Path) -> PathBuf {
    let mut file = name.as_os_str().to_owned();
    file.push(".PNG");
    PathBuf::from(file)
}

fn save_difference(difference: &RgbaImage, path: &Path) -> Result<(), String> {
    image::save_buffer_with_format(
        path,
        &difference.to_rgba8(),
        difference.width() as u32,
        difference.height() as u32,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| format!("failed to save difference image: {e}"))
}

fn normalized_error_sum(comparison: &Comparison) -> f64 {
    let denom = (comparison.width * comparison.height) as f64 * 255.0;
    if denom > 0.0 {
        comparison.result.error_sum / denom
    } else {
        0.0
    }
}

fn emit(out: &mut impl Write, line: std::fmt::Arguments<'_>) -> Result<(), String> {
    writeln!(out, "{line}").map_err(|e| format!("failed to write output: {e}"))
}

fn output_text(
    cli: &Cli,
    comparison: &Comparison,
    difference_path: Option<&Path>,
) -> Result<(), String> {
    let mut stdout = io::stdout().lock();
    let result = &comparison.result;

    emit(&mut stdout, format_args!("elapsed: {} ms", comparison.elapsed_ms))?;

    if !result.passed {
        emit(&mut stdout, format_args!("{}: {}", "FAIL".red().bold(), result.reason))?;
    } else if cli.verbose {
        emit(&mut stdout, format_args!("{}: {}", "PASS".green().bold(), result.reason))?;
    }

    if cli.sum_errors {
        emit(&mut stdout, format_args!("{} error sum", result.error_sum))?;
        emit(
            &mut stdout,
            format_args!("{} normalized error sum", normalized_error_sum(comparison)),
        )?;
    }

    if let Some(path) = difference_path {
        eprintln!("Wrote difference image to {}", path.display());
    }

    Ok(())
}

fn output_json(
    cli: &Cli,
    params: &PdiffParams,
    comparison: &Comparison,
    difference_path: Option<&Path>,
) -> Result<(), String> {
    let result = &comparison.result;
    let output = JsonOutput {
        passed: result.passed,
        reason: result.reason.clone(),
        pixels_failed: result.pixels_failed,
        error_sum: result.error_sum,
        normalized_error_sum: normalized_error_sum(comparison),
        elapsed_ms: comparison.elapsed_ms,
        image_a: cli.image_a.display().to_string(),
        image_b: cli.image_b.display().to_string(),
        width: comparison.width,
        height: comparison.height,
        params: JsonParams {
            luminance_only: params.luminance_only(),
            field_of_view: params.field_of_view(),
            threshold_pixels: params.threshold_pixels(),
            gamma: params.gamma(),
            luminance: params.luminance(),
            color_factor: params.color_factor(),
        },
        difference: difference_path.map(|p| p.display().to_string()),
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("failed to serialize JSON: {e}"))?;
    println!("{json}");
    Ok(())
}
