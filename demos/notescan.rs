#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::{Path, PathBuf};

use clap::Parser;
use notescan::{shrink_all_par, NotescanError, ShrinkOptions, ShrinkOutput, ShrinkPipeline};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

/// Shrinks scanned or photographed pages down to a paper color and a few ink colors.
///
/// Every input file is processed independently; a failure is reported for that file only.
#[derive(Parser)]
pub struct Options {
    /// The proportion of pixels sampled to pick the background and learn the ink colors.
    #[arg(long, default_value_t = 0.05)]
    sampling_rate: f64,

    /// Number of low bits cleared in each channel when picking the background color.
    #[arg(long, default_value_t = 2)]
    shift: u8,

    /// Brightness distance from the background above which a pixel is foreground.
    #[arg(long, default_value_t = 0.35)]
    brightness: f64,

    /// Saturation distance from the background above which a pixel is foreground.
    #[arg(long, default_value_t = 0.25)]
    saturation: f64,

    /// Total number of output colors, including the background.
    #[arg(long, default_value_t = 6)]
    foreground_num: u16,

    /// Maximum number of k-means rounds.
    #[arg(long, default_value_t = 40)]
    kmeans_iterations: u32,

    /// Seed for the random sampling; random if not given.
    #[arg(long)]
    seed: Option<u64>,

    /// Suffix appended to the input file name for the output file.
    #[arg(long, default_value = "_processed")]
    suffix: String,

    /// Write a palette-indexed PNG instead of an RGB PNG.
    #[arg(long)]
    indexed: bool,

    /// The images to process.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Options {
    fn shrink_options(&self) -> ShrinkOptions {
        let options = ShrinkOptions::new()
            .sampling_rate(self.sampling_rate)
            .shift(self.shift)
            .brightness(self.brightness)
            .saturation(self.saturation)
            .foreground_num(self.foreground_num)
            .kmeans_iterations(self.kmeans_iterations);

        match self.seed {
            Some(seed) => options.seed(seed),
            None => options,
        }
    }
}

/// Returns `input` with its extension replaced by `suffix` and `.png`.
fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}{suffix}.png"))
}

fn save(input: &Path, output: &ShrinkOutput, options: &Options) -> Result<PathBuf, NotescanError> {
    let path = output_path(input, &options.suffix);
    output.save(&path, options.indexed)?;
    Ok(path)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse();
    let shrink_options = options.shrink_options();
    if let Err(e) = shrink_options.validate() {
        tracing::error!(%e, "invalid options");
        std::process::exit(2);
    }

    let loaded = options
        .inputs
        .par_iter()
        .filter_map(|input| {
            tracing::info!("Shrink: [{}]", input.display());
            match ShrinkPipeline::open(input) {
                Ok(pipeline) => Some((input, pipeline)),
                Err(e) => {
                    tracing::error!(%e, file = %input.display(), "failed to load image");
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    let (inputs, pipelines): (Vec<_>, Vec<_>) = loaded.into_iter().unzip();
    let results = shrink_all_par(&pipelines, shrink_options);

    let failures = inputs
        .par_iter()
        .zip(results)
        .filter(|(input, result)| {
            match result {
                Ok(output) => match save(input, output, &options) {
                    Ok(path) => {
                        tracing::info!("Generated: [{}]", path.display());
                        false
                    }
                    Err(e) => {
                        tracing::error!(%e, file = %input.display(), "failed to write image");
                        true
                    }
                },
                Err(e) => {
                    tracing::error!(%e, file = %input.display(), "failed to shrink image");
                    true
                }
            }
        })
        .count();

    if failures > 0 || inputs.len() < options.inputs.len() {
        std::process::exit(1);
    }
}
