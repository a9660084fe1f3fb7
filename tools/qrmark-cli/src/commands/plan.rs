//! Show where the stamp would land on a host image.

use std::path::PathBuf;

use qrmark_common::config::CompositeOptions;
use qrmark_compositor::{plan_placement, MARGIN};
use qrmark_compositor::raster::load_host;

pub fn run(host: PathBuf, json: bool, options: CompositeOptions) -> anyhow::Result<()> {
    let image = load_host(&host)?;
    let (width, height) = image.dimensions();
    let placement = plan_placement(width, height, &options)?;

    if json {
        let report = serde_json::json!({
            "host": host,
            "width": width,
            "height": height,
            "margin": MARGIN,
            "policy": options.placement.as_str(),
            "placement": placement,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Host: {} ({width}x{height})", host.display());
    println!("  Stamp size: {}px", placement.size);
    println!("  Offset: ({}, {})", placement.x, placement.y);
    println!("  Margin: {MARGIN}px ({})", options.placement.as_str());
    if placement.clamped {
        println!("  Margin did not fit; offset clamped to the image edge.");
    }
    Ok(())
}
