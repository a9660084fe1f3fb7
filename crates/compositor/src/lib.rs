//! QRMark Compositor
//!
//! Stamps a QR code onto the bottom-right corner of a host image at
//! partial opacity.
//!
//! # Pipeline
//!
//! ```text
//! host.* ──── decode RGB ─────────────────────────────┐
//!                                                     │
//! qr.* ────── decode luma ── binarize (>127) ──┐      │
//!                                              │      │
//!                          plan placement (S, x, y)   │
//!                                              │      │
//!                          resize S×S ── gray → RGB   │
//!                                              │      │
//!                                              ▼      ▼
//!                                     overlay = host + QR patch
//!                                              │
//!                                   blend(overlay, host, 0.5)
//!                                              │
//!                                              ▼
//!                                         output.png
//! ```
//!
//! Every stage except decoding and the final write is pure and operates
//! on in-memory rasters.

pub mod binarize;
pub mod blend;
pub mod compositor;
pub mod placement;
pub mod raster;

/// Gray samples strictly above this become white, the rest black.
pub const THRESHOLD: u8 = 127;

/// Opacity of the QR stamp.
pub const ALPHA: f32 = 0.5;

/// Distance in pixels from the right and bottom edges.
pub const MARGIN: u32 = 10;

/// The stamp side is `min(width, height) / SCALE_DIVISOR`.
pub const SCALE_DIVISOR: u32 = 4;

pub use compositor::{composite, composite_images, CompositeJob, CompositeOutcome};
pub use placement::{plan_placement, Placement};
pub use qrmark_common::config::{CompositeOptions, PlacementPolicy};
