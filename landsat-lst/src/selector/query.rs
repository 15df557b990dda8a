//! Scene query parameters.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::MonthSet;
use crate::sensor::SensorId;

/// Invalid query parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Missing required query parameter '{0}'")]
    Missing(&'static str),

    #[error("Start date {start} must be before end date {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Cloud cover {0}% is outside 0-100")]
    CloudCoverOutOfRange(f64),

    #[error("Minimum cloud cover {min}% exceeds maximum {max}%")]
    CloudCoverInverted { min: f64, max: f64 },
}

/// Which month predicate a query applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    None,
    Include(MonthSet),
    Exclude(MonthSet),
}

/// Immutable, validated parameters of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneQuery {
    sensor: SensorId,
    collection_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    path: u16,
    row: u16,
    include_months: MonthSet,
    exclude_months: MonthSet,
    cloud_cover_min: f64,
    cloud_cover_max: f64,
}

impl SceneQuery {
    pub fn builder() -> SceneQueryBuilder {
        SceneQueryBuilder::default()
    }

    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn path(&self) -> u16 {
        self.path
    }

    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn include_months(&self) -> MonthSet {
        self.include_months
    }

    pub fn exclude_months(&self) -> MonthSet {
        self.exclude_months
    }

    pub fn cloud_cover_range(&self) -> (f64, f64) {
        (self.cloud_cover_min, self.cloud_cover_max)
    }

    /// The effective month predicate. A non-empty include set wins and the
    /// exclude set is ignored.
    pub fn month_filter(&self) -> MonthFilter {
        if !self.include_months.is_empty() {
            MonthFilter::Include(self.include_months)
        } else if !self.exclude_months.is_empty() {
            MonthFilter::Exclude(self.exclude_months)
        } else {
            MonthFilter::None
        }
    }
}

impl fmt::Display for SceneQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}) path {} row {} cloud {}-{}%",
            self.collection_id,
            self.start_date,
            self.end_date,
            self.path,
            self.row,
            self.cloud_cover_min,
            self.cloud_cover_max
        )?;
        match self.month_filter() {
            MonthFilter::Include(months) => write!(f, " months {{{months}}}"),
            MonthFilter::Exclude(months) => write!(f, " excluding months {{{months}}}"),
            MonthFilter::None => Ok(()),
        }
    }
}

/// Builder for [`SceneQuery`].
///
/// Sensor, dates, path and row are required. Cloud cover defaults to the
/// unrestricted range 0-100 and month sets default to empty.
#[derive(Debug, Clone, Default)]
pub struct SceneQueryBuilder {
    sensor: Option<SensorId>,
    collection_id: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    path: Option<u16>,
    row: Option<u16>,
    include_months: MonthSet,
    exclude_months: MonthSet,
    cloud_cover_min: Option<f64>,
    cloud_cover_max: Option<f64>,
}

impl SceneQueryBuilder {
    pub fn sensor(mut self, sensor: SensorId) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Override the collection the sensor profile names.
    pub fn collection_id(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn path_row(mut self, path: u16, row: u16) -> Self {
        self.path = Some(path);
        self.row = Some(row);
        self
    }

    pub fn include_months(mut self, months: MonthSet) -> Self {
        self.include_months = months;
        self
    }

    pub fn exclude_months(mut self, months: MonthSet) -> Self {
        self.exclude_months = months;
        self
    }

    pub fn cloud_cover(mut self, min: f64, max: f64) -> Self {
        self.cloud_cover_min = Some(min);
        self.cloud_cover_max = Some(max);
        self
    }

    /// Single-sided cloud limit; the minimum is 0.
    pub fn max_cloud_cover(mut self, max: f64) -> Self {
        self.cloud_cover_min = Some(0.0);
        self.cloud_cover_max = Some(max);
        self
    }

    pub fn build(self) -> Result<SceneQuery, QueryError> {
        let sensor = self.sensor.ok_or(QueryError::Missing("sensor"))?;
        let start_date = self.start_date.ok_or(QueryError::Missing("start_date"))?;
        let end_date = self.end_date.ok_or(QueryError::Missing("end_date"))?;
        let path = self.path.ok_or(QueryError::Missing("path"))?;
        let row = self.row.ok_or(QueryError::Missing("row"))?;

        if start_date >= end_date {
            return Err(QueryError::EmptyDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let cloud_cover_min = self.cloud_cover_min.unwrap_or(0.0);
        let cloud_cover_max = self.cloud_cover_max.unwrap_or(100.0);
        for value in [cloud_cover_min, cloud_cover_max] {
            if !(0.0..=100.0).contains(&value) {
                return Err(QueryError::CloudCoverOutOfRange(value));
            }
        }
        if cloud_cover_min > cloud_cover_max {
            return Err(QueryError::CloudCoverInverted {
                min: cloud_cover_min,
                max: cloud_cover_max,
            });
        }

        Ok(SceneQuery {
            sensor,
            collection_id: self
                .collection_id
                .unwrap_or_else(|| sensor.profile().collection_id.to_string()),
            start_date,
            end_date,
            path,
            row,
            include_months: self.include_months,
            exclude_months: self.exclude_months,
            cloud_cover_min,
            cloud_cover_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn base() -> SceneQueryBuilder {
        SceneQuery::builder()
            .sensor(SensorId::Landsat9)
            .date_range(date("2022-09-01"), date("2022-10-01"))
            .path_row(122, 44)
    }

    #[test]
    fn test_defaults() {
        let query = base().build().unwrap();
        assert_eq!(query.collection_id(), "LANDSAT/LC09/C02/T1_L2");
        assert_eq!(query.cloud_cover_range(), (0.0, 100.0));
        assert_eq!(query.month_filter(), MonthFilter::None);
    }

    #[test]
    fn test_missing_fields() {
        let err = SceneQuery::builder().build().unwrap_err();
        assert_eq!(err, QueryError::Missing("sensor"));
        let err = SceneQuery::builder()
            .sensor(SensorId::Landsat8)
            .date_range(date("2022-09-01"), date("2022-10-01"))
            .build()
            .unwrap_err();
        assert_eq!(err, QueryError::Missing("path"));
    }

    #[test]
    fn test_include_months_take_precedence() {
        let query = base()
            .include_months(MonthSet::new([6, 7]).unwrap())
            .exclude_months(MonthSet::new([6]).unwrap())
            .build()
            .unwrap();
        assert_eq!(
            query.month_filter(),
            MonthFilter::Include(MonthSet::new([6, 7]).unwrap())
        );
    }

    #[test]
    fn test_exclude_months_used_when_include_empty() {
        let query = base()
            .exclude_months(MonthSet::new([1, 2, 12]).unwrap())
            .build()
            .unwrap();
        assert!(matches!(query.month_filter(), MonthFilter::Exclude(_)));
    }

    #[test]
    fn test_cloud_cover_validation() {
        assert_eq!(
            base().cloud_cover(60.0, 40.0).build().unwrap_err(),
            QueryError::CloudCoverInverted {
                min: 60.0,
                max: 40.0
            }
        );
        assert_eq!(
            base().cloud_cover(0.0, 101.0).build().unwrap_err(),
            QueryError::CloudCoverOutOfRange(101.0)
        );
        assert_eq!(
            base().max_cloud_cover(30.0).build().unwrap().cloud_cover_range(),
            (0.0, 30.0)
        );
    }

    #[test]
    fn test_date_range_validation() {
        let err = base()
            .date_range(date("2022-10-01"), date("2022-10-01"))
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::EmptyDateRange { .. }));
    }

    #[test]
    fn test_collection_override() {
        let query = base().collection_id("LANDSAT/LC09/C02/T2_L2").build().unwrap();
        assert_eq!(query.collection_id(), "LANDSAT/LC09/C02/T2_L2");
    }

    #[test]
    fn test_display_summarizes_query() {
        let text = base()
            .include_months(MonthSet::new([6, 7]).unwrap())
            .build()
            .unwrap()
            .to_string();
        assert!(text.contains("path 122 row 44"));
        assert!(text.contains("months {6,7}"));
    }
}
