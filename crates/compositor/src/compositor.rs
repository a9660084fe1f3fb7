//! The QR stamp transform and its file-based entry point.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{GenericImage, GrayImage, RgbImage};
use qrmark_common::config::CompositeOptions;
use qrmark_common::error::{QrmarkError, QrmarkResult};

use crate::binarize::{binarize, colorize, resize_square};
use crate::blend::blend;
use crate::placement::{plan_placement, Placement};
use crate::raster::{encode_png, load_host, load_qr, write_atomically};
use crate::{ALPHA, THRESHOLD};

/// A compositing request with an explicit output destination.
#[derive(Debug, Clone)]
pub struct CompositeJob {
    /// Image to stamp onto.
    pub host_path: PathBuf,

    /// QR code image.
    pub qr_path: PathBuf,

    /// Where the PNG result is written. Replaced atomically.
    pub output_path: PathBuf,

    pub options: CompositeOptions,
}

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct CompositeOutcome {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub placement: Placement,
    pub png_bytes: usize,
}

impl CompositeJob {
    pub fn new(
        host_path: impl Into<PathBuf>,
        qr_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        options: CompositeOptions,
    ) -> Self {
        Self {
            host_path: host_path.into(),
            qr_path: qr_path.into(),
            output_path: output_path.into(),
            options,
        }
    }

    /// Load both inputs, stamp, encode, and write the result.
    ///
    /// Nothing is written unless every step before the write succeeds.
    pub fn run(&self) -> QrmarkResult<CompositeOutcome> {
        let started = Instant::now();
        tracing::info!(
            host = %self.host_path.display(),
            qr = %self.qr_path.display(),
            output = %self.output_path.display(),
            "Starting composite"
        );

        let host = load_host(&self.host_path)?;
        let qr = load_qr(&self.qr_path)?;

        let (width, height) = host.dimensions();
        let placement = plan_placement(width, height, &self.options)?;
        let output = stamp(&host, &qr, placement)?;

        let png = encode_png(&output)?;
        write_atomically(&self.output_path, &png)?;

        tracing::info!(
            width,
            height,
            size = placement.size,
            x = placement.x,
            y = placement.y,
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Composite written"
        );

        Ok(CompositeOutcome {
            output_path: self.output_path.clone(),
            width,
            height,
            placement,
            png_bytes: png.len(),
        })
    }
}

/// Stamp `qr_path` onto `host_path` and write the PNG to `output_path`.
pub fn composite(
    host_path: &Path,
    qr_path: &Path,
    output_path: &Path,
    options: &CompositeOptions,
) -> QrmarkResult<PathBuf> {
    CompositeJob::new(host_path, qr_path, output_path, *options)
        .run()
        .map(|outcome| outcome.output_path)
}

/// In-memory form of the transform. The result has the host's dimensions.
pub fn composite_images(
    host: &RgbImage,
    qr: &GrayImage,
    options: &CompositeOptions,
) -> QrmarkResult<RgbImage> {
    let placement = plan_placement(host.width(), host.height(), options)?;
    stamp(host, qr, placement)
}

fn stamp(host: &RgbImage, qr: &GrayImage, placement: Placement) -> QrmarkResult<RgbImage> {
    let binary = binarize(qr, THRESHOLD);
    let patch = colorize(&resize_square(&binary, placement.size));

    let mut overlay = host.clone();
    overlay
        .copy_from(&patch, placement.x, placement.y)
        .map_err(|e| QrmarkError::processing(format!("Failed to place QR patch: {e}")))?;

    blend(&overlay, host, ALPHA)
}
