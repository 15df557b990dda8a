//! Scene filters understood by catalog backends.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::scene::SceneProperties;

/// A month outside 1..=12 (or an unparsable month list).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month '{0}' (expected 1-12)")]
pub struct InvalidMonth(pub String);

/// A set of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MonthSet(u16);

impl MonthSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn new<I: IntoIterator<Item = u32>>(months: I) -> Result<Self, InvalidMonth> {
        let mut bits = 0u16;
        for month in months {
            if !(1..=12).contains(&month) {
                return Err(InvalidMonth(month.to_string()));
            }
            bits |= 1 << month;
        }
        Ok(Self(bits))
    }

    pub fn contains(&self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0 & (1 << month) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Months in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=12).filter(move |m| self.contains(*m))
    }
}

impl fmt::Display for MonthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let months: Vec<String> = self.iter().map(|m| m.to_string()).collect();
        f.write_str(&months.join(","))
    }
}

impl FromStr for MonthSet {
    type Err = InvalidMonth;

    /// Parses a comma-separated list such as `5,6,7`. An empty string is the
    /// empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut months = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let month = part
                .parse::<u32>()
                .map_err(|_| InvalidMonth(part.to_string()))?;
            months.push(month);
        }
        Self::new(months)
    }
}

/// One predicate of a collection query.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneFilter {
    /// Acquisition date in `[start, end)`.
    DateRange { start: NaiveDate, end: NaiveDate },
    /// Exact WRS-2 path.
    Path(u16),
    /// Exact WRS-2 row.
    Row(u16),
    /// Acquisition month is any of the set.
    Months(MonthSet),
    /// Acquisition month is none of the set.
    ExcludeMonths(MonthSet),
    /// `min <= CLOUD_COVER <= max`.
    CloudCover { min: f64, max: f64 },
}

impl SceneFilter {
    pub fn matches(&self, properties: &SceneProperties) -> bool {
        match self {
            SceneFilter::DateRange { start, end } => {
                properties.acquired >= *start && properties.acquired < *end
            }
            SceneFilter::Path(path) => properties.path == *path,
            SceneFilter::Row(row) => properties.row == *row,
            SceneFilter::Months(months) => months.contains(properties.month()),
            SceneFilter::ExcludeMonths(months) => !months.contains(properties.month()),
            SceneFilter::CloudCover { min, max } => {
                properties.cloud_cover >= *min && properties.cloud_cover <= *max
            }
        }
    }
}

impl fmt::Display for SceneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneFilter::DateRange { start, end } => write!(f, "date in [{start}, {end})"),
            SceneFilter::Path(path) => write!(f, "WRS_PATH = {path}"),
            SceneFilter::Row(row) => write!(f, "WRS_ROW = {row}"),
            SceneFilter::Months(months) => write!(f, "month in {{{months}}}"),
            SceneFilter::ExcludeMonths(months) => write!(f, "month not in {{{months}}}"),
            SceneFilter::CloudCover { min, max } => write!(f, "CLOUD_COVER in [{min}%, {max}%]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::properties;

    #[test]
    fn test_month_set_rejects_out_of_range() {
        assert!(MonthSet::new([0]).is_err());
        assert!(MonthSet::new([13]).is_err());
        assert_eq!(MonthSet::new([1, 12]).unwrap().len(), 2);
    }

    #[test]
    fn test_month_set_parse_and_display() {
        let months: MonthSet = "7, 5,6".parse().unwrap();
        assert_eq!(months.to_string(), "5,6,7");
        assert!("".parse::<MonthSet>().unwrap().is_empty());
        assert!("5,x".parse::<MonthSet>().is_err());
    }

    #[test]
    fn test_date_range_is_half_open() {
        let filter = SceneFilter::DateRange {
            start: "2022-09-01".parse().unwrap(),
            end: "2022-10-01".parse().unwrap(),
        };
        assert!(filter.matches(&properties("2022-09-01", 0.0)));
        assert!(filter.matches(&properties("2022-09-30", 0.0)));
        assert!(!filter.matches(&properties("2022-10-01", 0.0)));
        assert!(!filter.matches(&properties("2022-08-31", 0.0)));
    }

    #[test]
    fn test_cloud_cover_bounds_inclusive() {
        let filter = SceneFilter::CloudCover {
            min: 50.0,
            max: 50.0,
        };
        assert!(filter.matches(&properties("2022-09-01", 50.0)));
        assert!(!filter.matches(&properties("2022-09-01", 49.9)));
        assert!(!filter.matches(&properties("2022-09-01", 50.1)));
    }

    #[test]
    fn test_month_filters() {
        let summer = MonthSet::new([6, 7]).unwrap();
        assert!(SceneFilter::Months(summer).matches(&properties("2022-06-10", 0.0)));
        assert!(!SceneFilter::Months(summer).matches(&properties("2022-08-10", 0.0)));
        assert!(!SceneFilter::ExcludeMonths(summer).matches(&properties("2022-07-10", 0.0)));
        assert!(SceneFilter::ExcludeMonths(summer).matches(&properties("2022-01-10", 0.0)));
    }

    #[test]
    fn test_path_row() {
        assert!(SceneFilter::Path(122).matches(&properties("2022-06-10", 0.0)));
        assert!(!SceneFilter::Row(45).matches(&properties("2022-06-10", 0.0)));
    }
}
