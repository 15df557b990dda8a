//! Collection selection.
//!
//! Turns a [`SceneQuery`] into the ordered list of candidate scenes. Filters
//! are applied in a fixed order:
//!
//! 1. collection lookup
//! 2. acquisition date in `[start, end)`
//! 3. exact WRS path, then exact WRS row
//! 4. month filter (include wins over exclude)
//! 5. cloud cover in `[min, max]`
//!
//! The selector asks the catalog for the match count once and then fetches
//! that many scenes in a single listing, so callers iterate a local list
//! rather than paying a catalog round trip per scene. An empty result is a
//! valid answer here; the pipeline decides what to do with it.

mod query;

pub use query::{MonthFilter, QueryError, SceneQuery, SceneQueryBuilder};

use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{CatalogError, SceneCatalog, SceneFilter};
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Build the catalog filters of a query, in application order.
pub fn query_filters(query: &SceneQuery) -> Vec<SceneFilter> {
    let mut filters = vec![
        SceneFilter::DateRange {
            start: query.start_date(),
            end: query.end_date(),
        },
        SceneFilter::Path(query.path()),
        SceneFilter::Row(query.row()),
    ];

    match query.month_filter() {
        MonthFilter::Include(months) => {
            info!(months = %months, "Including only acquisition months");
            filters.push(SceneFilter::Months(months));
        }
        MonthFilter::Exclude(months) => {
            info!(months = %months, "Excluding acquisition months");
            filters.push(SceneFilter::ExcludeMonths(months));
        }
        MonthFilter::None => {}
    }

    let (min, max) = query.cloud_cover_range();
    info!(min, max, "Cloud cover range");
    filters.push(SceneFilter::CloudCover { min, max });

    filters
}

/// Selects scenes from a catalog.
pub struct CollectionSelector<'a, C: SceneCatalog> {
    catalog: &'a C,
}

impl<'a, C: SceneCatalog> CollectionSelector<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Select the scenes matching `query`, in catalog order.
    pub fn select(&self, query: &SceneQuery) -> Result<Vec<Scene>, SelectError> {
        let filters = query_filters(query);
        for filter in &filters {
            debug!(%filter, "Applying scene filter");
        }

        let count = self.catalog.size(query.collection_id(), &filters)?;
        info!(
            collection = query.collection_id(),
            count, "Scenes matching query"
        );
        if count == 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .catalog
            .list(query.collection_id(), &filters, count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, MonthSet};
    use crate::sensor::SensorId;
    use crate::test_support::{record, L9};

    fn year_catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::landsat();
        for month in 1..=12 {
            let id = format!("m{month:02}");
            let date = format!("2022-{month:02}-15");
            catalog.insert(record(&id, &date, (month * 8) as f64));
        }
        catalog
    }

    fn query() -> SceneQueryBuilder {
        SceneQuery::builder()
            .sensor(SensorId::Landsat9)
            .date_range(
                "2022-01-01".parse().unwrap(),
                "2023-01-01".parse().unwrap(),
            )
            .path_row(122, 44)
    }

    fn ids(scenes: &[Scene]) -> Vec<&str> {
        scenes.iter().map(|s| s.id().as_str()).collect()
    }

    #[test]
    fn test_include_months_ignore_exclude() {
        let catalog = year_catalog();
        let query = query()
            .include_months(MonthSet::new([6, 7]).unwrap())
            .exclude_months(MonthSet::new([6, 7, 8]).unwrap())
            .build()
            .unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert_eq!(ids(&scenes), vec!["m06", "m07"]);
    }

    #[test]
    fn test_exclude_months() {
        let catalog = year_catalog();
        let query = query()
            .exclude_months(MonthSet::new([1, 2, 12]).unwrap())
            .build()
            .unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert_eq!(scenes.len(), 9);
        assert!(!ids(&scenes).contains(&"m12"));
    }

    #[test]
    fn test_full_cloud_range_admits_all() {
        let catalog = year_catalog();
        let query = query().cloud_cover(0.0, 100.0).build().unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert_eq!(scenes.len(), 12);
    }

    #[test]
    fn test_exact_cloud_cover() {
        let mut catalog = year_catalog();
        catalog.insert(record("half", "2022-03-02", 50.0));
        let query = query().cloud_cover(50.0, 50.0).build().unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert_eq!(ids(&scenes), vec!["half"]);
    }

    #[test]
    fn test_path_row_must_match() {
        let catalog = year_catalog();
        let query = query().path_row(122, 45).build().unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert!(scenes.is_empty());
        // No listing round trip when nothing matched.
        assert_eq!(catalog.list_calls(), 0);
    }

    #[test]
    fn test_single_count_and_listing_round_trip() {
        let catalog = year_catalog();
        let query = query().build().unwrap();
        CollectionSelector::new(&catalog).select(&query).unwrap();
        assert_eq!(catalog.size_calls(), 1);
        assert_eq!(catalog.list_calls(), 1);
    }

    #[test]
    fn test_other_collection_is_empty() {
        let catalog = year_catalog();
        let query = query().sensor(SensorId::Landsat8).build().unwrap();
        let scenes = CollectionSelector::new(&catalog).select(&query).unwrap();
        assert!(scenes.is_empty());
        assert_ne!(query.collection_id(), L9);
    }

    #[test]
    fn test_filter_order() {
        let query = query()
            .exclude_months(MonthSet::new([1]).unwrap())
            .build()
            .unwrap();
        let filters = query_filters(&query);
        assert!(matches!(filters[0], SceneFilter::DateRange { .. }));
        assert_eq!(filters[1], SceneFilter::Path(122));
        assert_eq!(filters[2], SceneFilter::Row(44));
        assert!(matches!(filters[3], SceneFilter::ExcludeMonths(_)));
        assert!(matches!(filters[4], SceneFilter::CloudCover { .. }));
    }
}
