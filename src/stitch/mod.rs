//! Window stitching and rescaling
//!
//! The trends provider renormalizes every response onto its own 0-100 scale,
//! so two overlapping windows report the same instant with different numbers.
//! Stitching aligns the incoming window on the last instant of the existing
//! series, rescales the new segment by the ratio of the two values at that
//! instant, and appends it.
//!
//! ```text
//! existing  |_________|
//! incoming    |_______|___|
//!                     ^ alignment point (j)
//! ```
//!
//! The first fetch for a keyword seeds the series as-is.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Series;
use crate::utils::error::StitchError;

/// Tunables for the alignment search and the seam
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchOptions {
    /// Also consider index 0 of the incoming window during the alignment scan.
    /// Off by default: the scan stops at index 1.
    pub scan_first_point: bool,

    /// Skip the incoming alignment point when appending, so the seam instant
    /// appears once instead of twice.
    pub drop_seam_duplicate: bool,
}

/// How the incoming segment's values were reconciled with the existing scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    /// Existing series was empty; incoming stored unmodified
    Seeded,

    /// Alignment values matched; no arithmetic applied
    Unchanged,

    /// Values scaled by `a / b` and rounded up; `multiplier` is that ratio
    Rescaled { multiplier: f64 },

    /// Existing alignment value was 0; values appended unscaled
    ZeroNumerator,

    /// Incoming alignment value was 0 (ratio undefined); values appended unscaled
    ZeroDenominator,
}

impl Scaling {
    /// Whether this outcome is a degenerate case worth surfacing
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::ZeroNumerator | Self::ZeroDenominator)
    }
}

/// Result of a successful stitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StitchReport {
    /// Index of the alignment point in the incoming window (`None` when seeded)
    pub alignment: Option<usize>,

    /// How values were reconciled
    pub scaling: Scaling,

    /// Number of points appended to the existing series
    pub appended: usize,
}

/// Find the index in `incoming` whose timestamp equals the last timestamp of
/// `existing`, scanning backward from the end.
///
/// Returns `None` when either series is empty or there is no shared instant.
#[must_use]
pub fn find_alignment(existing: &Series, incoming: &Series, opts: &StitchOptions) -> Option<usize> {
    let target = existing.last()?.timestamp;
    let lowest = if opts.scan_first_point { 0 } else { 1 };

    (lowest..incoming.len())
        .rev()
        .find(|&i| incoming[i].timestamp == target)
}

/// `ceil(value * a / b)` in integer arithmetic
///
/// Returns `None` when the result does not fit in `u32`.
fn rescale(value: u32, a: u32, b: u32) -> Option<u32> {
    let scaled = (u64::from(value) * u64::from(a)).div_ceil(u64::from(b));
    u32::try_from(scaled).ok()
}

/// Stitch `incoming` onto `existing`
///
/// On error `existing` is left untouched.
///
/// # Errors
///
/// Returns `StitchError::NoOverlap` if the incoming window does not contain
/// the last instant of `existing`.
pub fn stitch(
    existing: &mut Series,
    mut incoming: Series,
    opts: &StitchOptions,
) -> Result<StitchReport, StitchError> {
    if existing.is_empty() {
        let appended = incoming.len();
        *existing = incoming;
        return Ok(StitchReport {
            alignment: None,
            scaling: Scaling::Seeded,
            appended,
        });
    }

    let Some(j) = find_alignment(existing, &incoming, opts) else {
        // existing is non-empty here
        let last_timestamp = existing[existing.len() - 1].timestamp;
        return Err(StitchError::NoOverlap { last_timestamp });
    };

    let a = existing[existing.len() - 1].value;
    let b = incoming[j].value;

    let scaling = if a == 0 {
        warn!(alignment = j, "Existing alignment value is 0, appending unscaled");
        Scaling::ZeroNumerator
    } else if b == 0 {
        warn!(
            alignment = j,
            existing_value = a,
            "Incoming alignment value is 0, ratio undefined; appending unscaled"
        );
        Scaling::ZeroDenominator
    } else if a == b {
        Scaling::Unchanged
    } else {
        let mut saturated = 0usize;
        for point in &mut incoming.points_mut()[j..] {
            point.value = rescale(point.value, a, b).unwrap_or_else(|| {
                saturated += 1;
                u32::MAX
            });
        }
        if saturated > 0 {
            warn!(
                alignment = j,
                saturated,
                "Rescaled values exceed u32 range, saturating"
            );
        }
        Scaling::Rescaled {
            multiplier: f64::from(a) / f64::from(b),
        }
    };

    let start = if opts.drop_seam_duplicate { j + 1 } else { j };
    let segment = &incoming[start..];
    existing.extend_from_slice(segment);

    debug!(
        alignment = j,
        appended = segment.len(),
        scaling = ?scaling,
        "Stitched window"
    );

    Ok(StitchReport {
        alignment: Some(j),
        scaling,
        appended: segment.len(),
    })
}
