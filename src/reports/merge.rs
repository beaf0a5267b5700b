// src/reports/merge.rs

use std::collections::{HashMap, HashSet};

use crate::models::{DeviceHealthRecord, FacilityRecord};

/// Attaches the windowed min/max envelope to the live per-facility counts,
/// keyed by facility name. Facilities missing from the aggregate get 0/0;
/// the row order of `live` (the primary query's ORDER BY) is preserved.
pub fn attach_min_max(
    live: Vec<(String, i64)>,
    min_max: &HashMap<String, (i64, i64)>,
) -> Vec<FacilityRecord> {
    live.into_iter()
        .map(|(facility, count)| {
            let (min, max) = min_max.get(&facility).copied().unwrap_or((0, 0));
            FacilityRecord {
                location: facility,
                city: None,
                emp_count: count,
                min,
                max,
            }
        })
        .collect()
}

/// One keyed device aggregate: `(city, building) → count`, remembering the
/// order rows came back in.
#[derive(Debug, Default)]
pub struct SiteAggregate {
    order: Vec<(String, String)>,
    counts: HashMap<(String, String), i64>,
}

impl SiteAggregate {
    pub fn from_rows(rows: Vec<(String, String, i64)>) -> Self {
        let mut agg = Self::default();
        for (city, building, count) in rows {
            let key = (city, building);
            if !agg.counts.contains_key(&key) {
                agg.order.push(key.clone());
            }
            agg.counts.insert(key, count);
        }
        agg
    }

    fn get(&self, key: &(String, String)) -> i64 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

/// Union merge over the four device aggregates: every key seen in any of
/// them yields one record, missing metrics default to 0. Keys keep
/// first-seen order across the aggregates in the order given, so the
/// readers query's ORDER BY drives the overall ordering.
pub fn merge_device_health(
    readers: &SiteAggregate,
    controllers: &SiteAggregate,
    offline_controllers: &SiteAggregate,
    offline_readers: &SiteAggregate,
) -> Vec<DeviceHealthRecord> {
    let mut keys: Vec<&(String, String)> = Vec::new();
    let mut seen: HashSet<&(String, String)> = HashSet::new();
    for agg in [readers, controllers, offline_controllers, offline_readers] {
        for key in &agg.order {
            if seen.insert(key) {
                keys.push(key);
            }
        }
    }

    keys.into_iter()
        .map(|key| DeviceHealthRecord {
            city: key.0.clone(),
            location: key.1.clone(),
            total_controllers: controllers.get(key),
            offline_controllers: offline_controllers.get(key),
            total_readers: readers.get(key),
            offline_readers: offline_readers.get(key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(rows: &[(&str, &str, i64)]) -> SiteAggregate {
        SiteAggregate::from_rows(
            rows.iter()
                .map(|(c, b, n)| (c.to_string(), b.to_string(), *n))
                .collect(),
        )
    }

    #[test]
    fn min_max_defaults_to_zero_for_unseen_facilities() {
        let live = vec![("01 - Pune".to_string(), 12), ("02 - Chennai".to_string(), 7)];
        let mut min_max = HashMap::new();
        min_max.insert("01 - Pune".to_string(), (3, 40));

        let merged = attach_min_max(live, &min_max);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].min, merged[0].max), (3, 40));
        assert_eq!((merged[1].min, merged[1].max), (0, 0));
        assert_eq!(merged[1].emp_count, 7);
    }

    #[test]
    fn min_max_preserves_primary_order() {
        let live = vec![
            ("B".to_string(), 1),
            ("A".to_string(), 2),
            ("C".to_string(), 3),
        ];
        let merged = attach_min_max(live, &HashMap::new());
        let order: Vec<&str> = merged.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(order, ["B", "A", "C"]);
    }

    #[test]
    fn device_merge_is_a_union_over_all_key_sets() {
        let readers = agg(&[("Pune", "Tower A", 10)]);
        let controllers = agg(&[("Pune", "Tower A", 4), ("Delhi", "Main", 2)]);
        let offline_controllers = agg(&[("Delhi", "Main", 1)]);
        let offline_readers = agg(&[("Goa", "Annex", 3)]);

        let merged =
            merge_device_health(&readers, &controllers, &offline_controllers, &offline_readers);

        // Every key from every aggregate is present exactly once.
        let keys: Vec<(&str, &str)> = merged
            .iter()
            .map(|r| (r.city.as_str(), r.location.as_str()))
            .collect();
        assert_eq!(
            keys,
            [("Pune", "Tower A"), ("Delhi", "Main"), ("Goa", "Annex")]
        );
    }

    #[test]
    fn device_merge_fills_missing_metrics_with_zero() {
        let readers = agg(&[("Pune", "Tower A", 10)]);
        let controllers = agg(&[]);
        let offline_controllers = agg(&[]);
        let offline_readers = agg(&[("Goa", "Annex", 3)]);

        let merged =
            merge_device_health(&readers, &controllers, &offline_controllers, &offline_readers);

        let pune = &merged[0];
        assert_eq!(pune.total_readers, 10);
        assert_eq!(pune.total_controllers, 0);
        assert_eq!(pune.offline_controllers, 0);
        assert_eq!(pune.offline_readers, 0);

        let goa = &merged[1];
        assert_eq!(goa.total_readers, 0);
        assert_eq!(goa.offline_readers, 3);
    }

    #[test]
    fn device_merge_keeps_latest_count_for_duplicate_rows() {
        let readers = agg(&[("Pune", "Tower A", 1), ("Pune", "Tower A", 5)]);
        let merged = merge_device_health(
            &readers,
            &SiteAggregate::default(),
            &SiteAggregate::default(),
            &SiteAggregate::default(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].total_readers, 5);
    }
}
