//! Stamp a QR code onto a host image.

use std::path::PathBuf;

use qrmark_common::config::CompositeOptions;
use qrmark_compositor::CompositeJob;

pub fn run(
    host: PathBuf,
    qr: PathBuf,
    output: PathBuf,
    options: CompositeOptions,
) -> anyhow::Result<()> {
    println!("Compositing {} onto {}", qr.display(), host.display());

    let outcome = CompositeJob::new(host, qr, output, options)
        .run()
        .map_err(|e| anyhow::anyhow!("Composite failed: {e}"))?;

    println!("  Resolution: {}x{}", outcome.width, outcome.height);
    println!(
        "  Stamp: {}px at ({}, {}){}",
        outcome.placement.size,
        outcome.placement.x,
        outcome.placement.y,
        if outcome.placement.clamped {
            " [clamped]"
        } else {
            ""
        }
    );
    println!("\nWrote {} ({} bytes)", outcome.output_path.display(), outcome.png_bytes);

    Ok(())
}
