//! Named groupings of places.

/// A named grouping of place names, e.g. "North Chennai".
///
/// Places may belong to more than one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub name: String,
    pub places: Vec<String>,
}

impl Area {
    pub fn new(name: impl Into<String>, places: Vec<String>) -> Self {
        Self {
            name: name.into(),
            places,
        }
    }
}
