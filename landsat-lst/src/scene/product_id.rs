//! Landsat Collection 2 product identifier parsing.
//!
//! Product IDs follow `LXSS_LLLL_PPPRRR_YYYYMMDD_yyyymmdd_CC_TX`:
//!
//! - `LXSS`: mission code (`LT05`, `LE07`, `LC08`, `LC09`)
//! - `LLLL`: processing level (`L2SP` for surface temperature products)
//! - `PPPRRR`: WRS-2 path and row
//! - `YYYYMMDD`: acquisition date
//! - `yyyymmdd`: processing date
//! - `CC`: collection number
//! - `TX`: collection category (`T1`, `T2`, `RT`)

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::sensor::SensorId;

/// Error parsing a product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductIdError {
    #[error("'{0}' is not a Landsat Collection 2 product ID")]
    InvalidPattern(String),
    #[error("Unsupported mission code '{0}'")]
    UnknownMission(String),
    #[error("Invalid acquisition date '{0}'")]
    InvalidDate(String),
}

/// Parsed Landsat product identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductId {
    raw: String,
    pub sensor: SensorId,
    pub path: u16,
    pub row: u16,
    pub acquired: NaiveDate,
    /// Collection category, e.g. `T1`.
    pub category: String,
}

fn product_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(L[CTEO]0\d)_(L\d[A-Z]{2})_(\d{3})(\d{3})_(\d{8})_(\d{8})_(\d{2})_(T1|T2|RT)$")
            .unwrap()
    })
}

impl ProductId {
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let captures = product_pattern()
            .captures(s.trim())
            .ok_or_else(|| ProductIdError::InvalidPattern(s.to_string()))?;

        let mission = &captures[1];
        let sensor = SensorId::from_product_prefix(mission)
            .ok_or_else(|| ProductIdError::UnknownMission(mission.to_string()))?;

        // Both groups are exactly three digits.
        let path = captures[3].parse::<u16>().unwrap_or_default();
        let row = captures[4].parse::<u16>().unwrap_or_default();

        let date = &captures[5];
        let acquired = NaiveDate::parse_from_str(date, "%Y%m%d")
            .map_err(|_| ProductIdError::InvalidDate(date.to_string()))?;

        Ok(Self {
            raw: s.trim().to_string(),
            sensor,
            path,
            row,
            acquired,
            category: captures[8].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_landsat9_product() {
        let id = ProductId::parse("LC09_L2SP_122044_20220915_20220916_02_T1").unwrap();
        assert_eq!(id.sensor, SensorId::Landsat9);
        assert_eq!(id.path, 122);
        assert_eq!(id.row, 44);
        assert_eq!(id.acquired, NaiveDate::from_ymd_opt(2022, 9, 15).unwrap());
        assert_eq!(id.category, "T1");
        assert_eq!(id.to_string(), "LC09_L2SP_122044_20220915_20220916_02_T1");
    }

    #[test]
    fn test_parse_landsat5_product() {
        let id: ProductId = "LT05_L2SP_122044_20080714_20200829_02_T1".parse().unwrap();
        assert_eq!(id.sensor, SensorId::Landsat5);
        assert_eq!(id.acquired.to_string(), "2008-07-14");
    }

    #[test]
    fn test_reject_malformed() {
        assert!(matches!(
            ProductId::parse("LC09_122044"),
            Err(ProductIdError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_reject_unknown_mission() {
        assert_eq!(
            ProductId::parse("LC07_L2SP_122044_20220915_20220916_02_T1"),
            Err(ProductIdError::UnknownMission("LC07".to_string()))
        );
    }

    #[test]
    fn test_reject_invalid_date() {
        assert!(matches!(
            ProductId::parse("LC08_L2SP_122044_20221341_20221342_02_T1"),
            Err(ProductIdError::InvalidDate(_))
        ));
    }
}
