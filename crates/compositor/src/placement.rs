//! Where the QR stamp lands on the host image.

use qrmark_common::config::{CompositeOptions, PlacementPolicy};
use qrmark_common::error::{QrmarkError, QrmarkResult};
use serde::Serialize;

use crate::{MARGIN, SCALE_DIVISOR};

/// A resolved `size × size` square anchored at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Side length of the stamped square in pixels.
    pub size: u32,
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Whether an offset had to be pulled back to zero.
    pub clamped: bool,
}

impl Placement {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.size
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.size
    }

    /// Whether pixel `(px, py)` lies inside the square.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Resolve the stamp square for a `width × height` host.
///
/// The side is `min(width, height) / 4` and the square sits 10 pixels in
/// from the right and bottom edges. When the margin does not fit,
/// [`PlacementPolicy`] decides between clamping the offset to zero and
/// failing.
pub fn plan_placement(
    width: u32,
    height: u32,
    options: &CompositeOptions,
) -> QrmarkResult<Placement> {
    let size = width.min(height) / SCALE_DIVISOR;
    if size == 0 {
        return Err(QrmarkError::DegenerateSize { width, height });
    }

    let footprint = size + MARGIN;
    let clamped = footprint > width || footprint > height;
    if clamped {
        match options.placement {
            PlacementPolicy::Reject => {
                return Err(QrmarkError::OutOfBoundsPlacement {
                    size,
                    margin: MARGIN,
                    width,
                    height,
                });
            }
            PlacementPolicy::Clamp => {
                tracing::warn!(
                    width,
                    height,
                    size,
                    margin = MARGIN,
                    "Margin does not fit, clamping QR placement to the image edge"
                );
            }
        }
    }

    Ok(Placement {
        size,
        x: width.saturating_sub(footprint),
        y: height.saturating_sub(footprint),
        clamped,
    })
}
