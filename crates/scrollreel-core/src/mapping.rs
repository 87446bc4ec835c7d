//! Continuous scroll progress to discrete section mapping

use crate::{Error, Result};

/// Bias added before flooring so progress computed from an exact boundary
/// offset lands on that boundary's section despite float rounding.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Map normalized progress within the pinned region to a section index
///
/// `clamp(floor(progress * section_count), 0, section_count - 1)`. NaN maps to
/// the first section; infinities clamp like any other out-of-range value.
/// Monotonic non-decreasing in `progress`.
pub fn section_for_progress(progress: f64, section_count: usize) -> usize {
    if section_count == 0 {
        return 0;
    }
    let last = section_count - 1;
    if progress.is_nan() {
        return 0;
    }
    let p = progress.clamp(0.0, 1.0);
    let raw = (p * section_count as f64 + BOUNDARY_EPSILON).floor();
    (raw as usize).min(last)
}

/// Where each chapter begins inside the pinned scroll region
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollMapping {
    section_count: usize,
    boundaries: Vec<f64>,
    region_length: f64,
    /// Boundaries are evenly spaced from zero
    uniform: bool,
}

impl ScrollMapping {
    /// Evenly spaced boundaries: chapter `i` begins at `region_length * i / n`
    pub fn uniform(section_count: usize, region_length: f64) -> Result<Self> {
        if section_count == 0 {
            return Err(Error::InvalidMapping(
                "section count must be at least 1".to_string(),
            ));
        }
        let boundaries = (0..section_count)
            .map(|i| region_length * i as f64 / section_count as f64)
            .collect();
        let mut mapping = Self::new(boundaries, region_length)?;
        mapping.uniform = true;
        Ok(mapping)
    }

    /// Explicit boundaries; they must start inside the region and strictly increase
    pub fn new(boundaries: Vec<f64>, region_length: f64) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(Error::InvalidMapping("no boundaries given".to_string()));
        }
        if !region_length.is_finite() || region_length <= 0.0 {
            return Err(Error::InvalidMapping(format!(
                "region length must be positive, got {}",
                region_length
            )));
        }
        for (i, b) in boundaries.iter().enumerate() {
            if !b.is_finite() || *b < 0.0 || *b > region_length {
                return Err(Error::InvalidMapping(format!(
                    "boundary {} ({}) lies outside the region [0, {}]",
                    i, b, region_length
                )));
            }
        }
        if let Some(i) = boundaries.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidMapping(format!(
                "boundaries must strictly increase (index {} -> {})",
                i,
                i + 1
            )));
        }
        Ok(Self {
            section_count: boundaries.len(),
            boundaries,
            region_length,
            uniform: false,
        })
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Scroll offset where `section` begins; out-of-range indices clamp to the last section
    pub fn boundary(&self, section: usize) -> f64 {
        let idx = section.min(self.section_count - 1);
        self.boundaries[idx]
    }

    /// Clamp an arbitrary index into the valid section range
    #[inline]
    pub fn clamp_section(&self, index: usize) -> usize {
        index.min(self.section_count - 1)
    }

    /// Normalized progress for a scroll offset
    pub fn progress_at(&self, offset: f64) -> f64 {
        (offset / self.region_length).clamp(0.0, 1.0)
    }

    /// Section targeted by a progress sample: the last chapter whose
    /// boundary lies at or before the sampled offset
    pub fn section_at(&self, progress: f64) -> usize {
        if self.uniform {
            return section_for_progress(progress, self.section_count);
        }
        if progress.is_nan() {
            return 0;
        }
        let offset = progress.clamp(0.0, 1.0) * self.region_length;
        let tolerance = BOUNDARY_EPSILON * self.region_length;
        self.boundaries
            .partition_point(|b| *b <= offset + tolerance)
            .saturating_sub(1)
            .min(self.section_count - 1)
    }
}
