use std::cmp::Ordering;

/// Relative slack when comparing a requested resolution against a level, so
/// that values a hair below a level (from repeated zoom arithmetic) still
/// select it.
const RESOLUTION_TOLERANCE: f64 = 0.01;

/// One level of a map pyramid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lod {
    resolution: f64,
    z: u32,
}

impl Lod {
    /// Returns `None` for a non-finite or non-positive resolution.
    pub fn new(resolution: f64, z: u32) -> Option<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return None;
        }
        Some(Self { resolution, z })
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[inline]
    pub fn z_index(&self) -> u32 {
        self.z
    }
}

impl Eq for Lod {}

impl Ord for Lod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resolution
            .total_cmp(&other.resolution)
            .then(self.z.cmp(&other.z))
    }
}

impl PartialOrd for Lod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Discrete set of resolutions, kept sorted from finest to coarsest.
#[derive(Debug, Clone, PartialEq)]
pub struct LodSet {
    lods: Vec<Lod>,
    max_scale: f64,
}

impl LodSet {
    /// Resolution of level 0 of the web-mercator pyramid (metres per pixel at
    /// 256 px tiles).
    pub const WEB_TOP_RESOLUTION: f64 = 156543.03392800014;

    /// Builds a set from arbitrary levels.
    ///
    /// `max_scale` bounds how far a request may be from the nearest level
    /// (as a ratio, in either direction) before `select` gives up.
    pub fn new(lods: impl IntoIterator<Item = Lod>, max_scale: f64) -> Self {
        let mut lods: Vec<Lod> = lods.into_iter().collect();
        lods.sort();
        lods.dedup();
        Self { lods, max_scale }
    }

    /// The standard web-mercator pyramid: `count` levels, halving the
    /// resolution at each step.
    pub fn web(count: u32) -> Self {
        let lods = (0..count).filter_map(|z| {
            Lod::new(Self::WEB_TOP_RESOLUTION / 2f64.powi(z as i32), z)
        });
        Self::new(lods, 8.0)
    }

    pub fn len(&self) -> usize {
        self.lods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lods.is_empty()
    }

    /// Levels from finest to coarsest.
    pub fn iter(&self) -> impl Iterator<Item = &Lod> {
        self.lods.iter()
    }

    pub fn resolution_of(&self, z: u32) -> Option<f64> {
        self.lods.iter().find(|l| l.z == z).map(Lod::resolution)
    }

    fn select_index(&self, resolution: f64) -> Option<usize> {
        if !resolution.is_finite() || resolution <= 0.0 || self.lods.is_empty() {
            return None;
        }

        // Coarsest level that is not (meaningfully) coarser than the request.
        let idx = self
            .lods
            .iter()
            .skip(1)
            .take_while(|l| l.resolution * (1.0 - RESOLUTION_TOLERANCE) <= resolution)
            .count();

        let lod = self.lods[idx];
        if lod.resolution / resolution > self.max_scale
            || resolution / lod.resolution > self.max_scale
        {
            None
        } else {
            Some(idx)
        }
    }

    /// Level to use for `resolution`, or `None` if it is not finite or lies
    /// more than `max_scale` away from every level.
    pub fn select(&self, resolution: f64) -> Option<Lod> {
        self.select_index(resolution).map(|i| self.lods[i])
    }

    /// Level one step finer than the one selected for `resolution`.
    ///
    /// Stays on the finest level at the bottom of the pyramid.
    pub fn finer(&self, resolution: f64) -> Option<Lod> {
        let i = self.select_index(resolution)?;
        Some(self.lods[i.saturating_sub(1)])
    }

    /// Level one step coarser than the one selected for `resolution`.
    ///
    /// Stays on the coarsest level at the top of the pyramid.
    pub fn coarser(&self, resolution: f64) -> Option<Lod> {
        let i = self.select_index(resolution)?;
        Some(self.lods[(i + 1).min(self.lods.len() - 1)])
    }
}
