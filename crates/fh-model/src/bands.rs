//! Categorical bands derived from numeric source columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aircraft range class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Haul {
    /// Maximum range of 1200 or less.
    #[serde(rename = "Short Haul")]
    Short,
    /// Above 1200 and below 8000.
    #[serde(rename = "Medium Haul")]
    Medium,
    /// 8000 and above.
    #[serde(rename = "Long Haul")]
    Long,
}

impl Haul {
    /// Upper bound (inclusive) of a short-haul range.
    pub const SHORT_MAX: f64 = 1200.0;
    /// Lower bound (inclusive) of a long-haul range.
    pub const LONG_MIN: f64 = 8000.0;

    /// Classify an aircraft by its maximum range.
    ///
    /// ```
    /// use fh_model::Haul;
    ///
    /// assert_eq!(Haul::from_max_range(1200.0), Haul::Short);
    /// assert_eq!(Haul::from_max_range(1200.5), Haul::Medium);
    /// assert_eq!(Haul::from_max_range(8000.0), Haul::Long);
    /// ```
    pub fn from_max_range(max_range: f64) -> Self {
        if max_range <= Self::SHORT_MAX {
            Self::Short
        } else if max_range < Self::LONG_MIN {
            Self::Medium
        } else {
            Self::Long
        }
    }

    /// Display label stored in the `haul` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "Short Haul",
            Self::Medium => "Medium Haul",
            Self::Long => "Long Haul",
        }
    }
}

impl fmt::Display for Haul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered passenger age band.
///
/// Bands are right-closed: `(13, 19]`, `(19, 30]`, `(30, 65]`, `(65, 105]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Teen,
    #[serde(rename = "Young Adult")]
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Every band in order.
    pub const ALL: [Self; 4] = [Self::Teen, Self::YoungAdult, Self::Adult, Self::Senior];

    /// Band edges; band `i` covers `(EDGES[i], EDGES[i + 1]]`.
    pub const EDGES: [f64; 5] = [13.0, 19.0, 30.0, 65.0, 105.0];

    /// Bucket an age, returning `None` outside `(13, 105]` or for NaN.
    ///
    /// ```
    /// use fh_model::AgeGroup;
    ///
    /// assert_eq!(AgeGroup::from_age(19.0), Some(AgeGroup::Teen));
    /// assert_eq!(AgeGroup::from_age(19.5), Some(AgeGroup::YoungAdult));
    /// assert_eq!(AgeGroup::from_age(13.0), None);
    /// ```
    pub fn from_age(age: f64) -> Option<Self> {
        if age.is_nan() {
            return None;
        }
        Self::ALL
            .iter()
            .zip(Self::EDGES.windows(2))
            .find(|(_, edges)| age > edges[0] && age <= edges[1])
            .map(|(band, _)| *band)
    }

    /// Display label stored in the `passenger_age` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teen => "Teen",
            Self::YoungAdult => "Young Adult",
            Self::Adult => "Adult",
            Self::Senior => "Senior",
        }
    }

    /// Parse a stored label back into its band.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|band| band.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
