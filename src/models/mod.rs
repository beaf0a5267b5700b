// src/models/mod.rs

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

// ───────────────────────────────────────
// Response envelopes
// ───────────────────────────────────────
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub statuscode: u16,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            statuscode: 200,
            data,
        }
    }
}

/// Two-list envelope for the branch day-wise report.
#[derive(Debug, Serialize)]
pub struct BranchEnvelope {
    pub statuscode: u16,
    pub branches: Vec<String>,
    #[serde(rename = "accessRecords")]
    pub access_records: Vec<DailyAccessRecord>,
}

// ───────────────────────────────────────
// Report records (wire keys pinned to what the dashboards consume)
// ───────────────────────────────────────

/// One facility's occupancy snapshot: live headcount plus the historical
/// min/max envelope over the requested trailing window.
#[derive(Debug, Serialize)]
pub struct FacilityRecord {
    pub location: String,
    pub city: Option<String>, // reserved, always null
    #[serde(rename = "Emp_Count")]
    pub emp_count: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Serialize)]
pub struct RegionalCount {
    pub name: &'static str,
    pub value: i64,
}

/// Per-facility seat capacity row. Everything but the city and the capacity
/// is a reserved slot the frontend fills from other sources.
#[derive(Debug, Serialize)]
pub struct SeatCapacityRecord {
    #[serde(rename = "City")]
    pub city: String,
    pub location: Option<String>,
    #[serde(rename = "Average Jan-Dec'22")]
    pub avg_2022: Option<f64>,
    #[serde(rename = "Average Jan-Dec'23")]
    pub avg_2023: Option<f64>,
    #[serde(rename = "1st Week")]
    pub week_1: Option<f64>,
    #[serde(rename = "2nd Week")]
    pub week_2: Option<f64>,
    #[serde(rename = "3rd Week")]
    pub week_3: Option<f64>,
    #[serde(rename = "22-Jan")]
    pub jan_22: Option<f64>,
    #[serde(rename = "23-Jan")]
    pub jan_23: Option<f64>,
    #[serde(rename = "24-Jan")]
    pub jan_24: Option<f64>,
    #[serde(rename = "Occupancy % on 24-Jan")]
    pub occupancy_jan_24: Option<f64>,
    #[serde(rename = "Seat Capacity")]
    pub seat_capacity: String,
}

impl SeatCapacityRecord {
    pub fn reserved(city: String, seat_capacity: String) -> Self {
        Self {
            city,
            location: None,
            avg_2022: None,
            avg_2023: None,
            week_1: None,
            week_2: None,
            week_3: None,
            jan_22: None,
            jan_23: None,
            jan_24: None,
            occupancy_jan_24: None,
            seat_capacity,
        }
    }
}

/// One calendar day's distinct-employee access count.
#[derive(Debug, Serialize, FromRow)]
pub struct DailyAccessRecord {
    pub date: NaiveDate,
    #[serde(rename = "totalEmployee")]
    pub total_employee: i64,
}

/// One hour bucket's count, used by both today's per-location report and the
/// fixed-branch hour-wise report.
#[derive(Debug, Serialize, FromRow)]
pub struct HourlyAccessRecord {
    pub hour: i32,
    #[serde(rename = "TotalCount")]
    pub total_count: i64,
}

/// One (city, building) pair's device health snapshot, merged from the four
/// reader/controller aggregates.
#[derive(Debug, Serialize)]
pub struct DeviceHealthRecord {
    pub city: String,
    pub location: String,
    #[serde(rename = "total controllers")]
    pub total_controllers: i64,
    #[serde(rename = "offline controllers")]
    pub offline_controllers: i64,
    #[serde(rename = "total readers")]
    pub total_readers: i64,
    #[serde(rename = "offline readers")]
    pub offline_readers: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_record_keeps_wire_keys() {
        let json = serde_json::to_string(&FacilityRecord {
            location: "01 - Pune".into(),
            city: None,
            emp_count: 42,
            min: 1,
            max: 9,
        })
        .unwrap();
        assert!(json.contains("\"Emp_Count\":42"));
        assert!(json.contains("\"city\":null"));
    }

    #[test]
    fn seat_capacity_reserved_slots_serialize_as_null() {
        let json = serde_json::to_string(&SeatCapacityRecord::reserved(
            "02 - Chennai".into(),
            "350".into(),
        ))
        .unwrap();
        assert!(json.contains("\"Seat Capacity\":\"350\""));
        assert!(json.contains("\"Occupancy % on 24-Jan\":null"));
        assert!(json.contains("\"1st Week\":null"));
    }

    #[test]
    fn branch_envelope_uses_camel_case_record_list() {
        let json = serde_json::to_string(&BranchEnvelope {
            statuscode: 200,
            branches: vec!["02 - Chennai".into()],
            access_records: vec![DailyAccessRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 24).unwrap(),
                total_employee: 17,
            }],
        })
        .unwrap();
        assert!(json.contains("\"accessRecords\""));
        assert!(json.contains("\"totalEmployee\":17"));
        assert!(json.contains("\"date\":\"2024-01-24\""));
    }

    #[test]
    fn device_health_record_keeps_spaced_keys() {
        let json = serde_json::to_string(&DeviceHealthRecord {
            city: "Pune".into(),
            location: "Tower A".into(),
            total_controllers: 4,
            offline_controllers: 1,
            total_readers: 12,
            offline_readers: 0,
        })
        .unwrap();
        assert!(json.contains("\"total controllers\":4"));
        assert!(json.contains("\"offline readers\":0"));
    }
}
