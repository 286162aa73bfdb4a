//! A library for cleaning up scanned or photographed documents.
//!
//! `notescan` reduces a page image to a near-uniform background color and a handful of
//! foreground (ink or highlighter) colors, so the result is easier to read and compresses well.
//!
//! A conversion runs through these steps:
//! 1. A random sample of the pixels is drawn (see [`sample`]).
//! 2. The background color is the most frequent sampled color after coarse quantization
//!    (see [`background_color`]).
//! 3. Sampled pixels far enough from the background in brightness or saturation are foreground
//!    (see [`foreground_mask`]).
//! 4. The foreground colors are learned with k-means (see [`kmeans`]).
//! 5. Every pixel of the image is mapped to the background or its nearest foreground color
//!    (see [`apply`]).
//!
//! # Features
//! - `threads`: exposes parallel batch conversion via [`rayon`].
//! - `image`: enables integration with the [`image`] crate and PNG output.
//!
//! # High-Level API
//! Most users only need [`ShrinkPipeline`] and [`ShrinkOptions`]:
//! ```no_run
//! # use notescan::{ShrinkPipeline, ShrinkOptions};
//! # fn main() -> Result<(), notescan::NotescanError> {
//! let mut pipeline = ShrinkPipeline::open("page.jpg")?;
//! pipeline.options(ShrinkOptions::new().foreground_num(8));
//!
//! let output = pipeline.shrink()?;
//! output.save("page_processed.png", true)?;
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod apply;
mod buffer;
mod classify;
mod pixel;
mod traits;
mod types;

#[cfg(feature = "image")]
mod codec;

#[cfg(test)]
mod tests;

pub mod kmeans;
pub mod sample;

pub use api::*;
pub use apply::apply;
pub use buffer::PixelBuffer;
pub use classify::*;
pub use pixel::{Pixel, CHANNEL_BITS};
pub use traits::Cluster;
pub use types::*;

#[cfg(feature = "image")]
pub use codec::{write_indexed_png, MAX_PREVIEW_COLORS};

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;

/// `MAX_COLORS` as a `usize` for array and `Vec` lengths.
pub(crate) const MAX_K: usize = MAX_COLORS as usize;
