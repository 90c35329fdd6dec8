use super::point::PointI;

/// Outcome of reading one cell for a bubble mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// No bubble-shaped contour in the region
    NotFound,
    /// A bubble outline was found but it is not filled in
    Unfilled(PointI),
    /// A filled bubble, centered at the given region-relative point
    Filled(PointI),
}

impl Mark {
    /// Whether the bubble is filled in
    pub fn is_filled(&self) -> bool {
        matches!(self, Mark::Filled(_))
    }

    /// Region-relative center of the located bubble, if any
    pub fn point(&self) -> Option<PointI> {
        match self {
            Mark::NotFound => None,
            Mark::Unfilled(p) | Mark::Filled(p) => Some(*p),
        }
    }

    /// Legacy `{filled, point}` pair where `(0, 0)` stands for "not found"
    pub fn legacy(&self) -> (bool, PointI) {
        (self.is_filled(), self.point().unwrap_or_default())
    }
}
