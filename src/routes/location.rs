// src/routes/location.rs

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use sqlx::query_as;

use crate::extractors::Json;
use crate::models::{BranchEnvelope, DailyAccessRecord, Envelope, HourlyAccessRecord};
use crate::reports::date_range::DateRange;
use crate::{error::ApiError, AppState};

use super::home::OVERSEAS_ZONES;
use super::timed;

/// Branch whose turnstiles feed the fixed hour-wise report.
const HOUR_WISE_BRANCH: &str = "Head Office";

#[derive(Deserialize)]
pub struct LocationBody {
    #[serde(rename = "Location")]
    pub location: String,
}

#[derive(Deserialize)]
pub struct BranchBody {
    #[serde(rename = "Branch", default)]
    pub branch: String,
    #[serde(rename = "DateRange", default)]
    pub date_range: String,
}

/// POST /api/location/GetLocationWiseEmployeeCount
///
/// Per-hour swipe counts for today at one location. The location name is
/// everything after the first '-' in the zone description, whitespace
/// trimmed, so multi-dash descriptions keep their tail intact.
pub async fn get_location_wise_employee_count(
    State(state): State<AppState>,
    Json(body): Json<LocationBody>,
) -> Result<Json<Envelope<HourlyAccessRecord>>, ApiError> {
    let rows = timed(
        query_as::<_, HourlyAccessRecord>(
            r#"
            SELECT EXTRACT(HOUR FROM e.eclbtimestamp)::int AS hour,
                   COUNT(*) AS total_count
            FROM if_if_empcurronl e
            JOIN if_if_raumzone r ON e.accesszonedor = r.guid
            WHERE r.rzrzwonl = 'B'
              AND e.eclbtimestamp >= CURRENT_DATE
              AND r.rznr <> ALL($1)
              AND ltrim(substring(r.rzdesc from position('-' in r.rzdesc) + 1)) = $2
            GROUP BY e.accesszonedor, r.rzdesc, EXTRACT(HOUR FROM e.eclbtimestamp)
            ORDER BY r.rzdesc DESC, EXTRACT(HOUR FROM e.eclbtimestamp)
            "#,
        )
        .bind(&OVERSEAS_ZONES[..])
        .bind(&body.location)
        .fetch_all(&state.pool),
    )
    .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(Envelope::ok(rows)))
}

/// POST /api/location/get-branch-and-employee-data-day-wise
///
/// Always returns the branch list; when a branch is named, also returns its
/// per-day distinct-employee entry counts over the resolved date range.
pub async fn get_branch_and_employee_data_day_wise(
    State(state): State<AppState>,
    Json(body): Json<BranchBody>,
) -> Result<Json<BranchEnvelope>, ApiError> {
    let branches: Vec<String> = timed(
        query_as::<_, (String,)>(
            r#"
            SELECT DISTINCT rzdesc
            FROM if_if_raumzone
            WHERE rzrzwonl = 'B' AND rznr <> ALL($1) AND rzfeld1 <> ''
            ORDER BY rzdesc DESC
            "#,
        )
        .bind(&OVERSEAS_ZONES[..])
        .fetch_all(&state.pool),
    )
    .await?
    .into_iter()
    .map(|(branch,)| branch)
    .collect();

    let mut access_records = Vec::new();
    if !body.branch.trim().is_empty() {
        let range = DateRange::parse(&body.date_range)
            .ok_or_else(|| ApiError::Validation("Invalid date range.".into()))?;
        let (start, end) = range.resolve(Utc::now());

        // Entry events only (zuevent = 0), one count per calendar day.
        access_records = timed(
            query_as::<_, DailyAccessRecord>(
                r#"
                SELECT a.zudate::date AS date,
                       COUNT(DISTINCT p.stssnr) AS total_employee
                FROM if_if_accessarchive a
                JOIN if_if_tdf t ON t.tddesc = a.zrtddesc
                JOIN if_person p ON p.stpersnr = a.zrstpersnr
                JOIN if_if_arealterminals lt ON lt.terminaldor = t.guid
                JOIN if_if_areal ar ON lt.arealdor = ar.guid
                WHERE a.zudate >= $1 AND a.zudate < $2
                  AND a.zuevent = 0
                  AND ar.areacustomerfield1 = $3
                GROUP BY a.zudate::date
                ORDER BY a.zudate::date
                "#,
            )
            .bind(start)
            .bind(end)
            .bind(body.branch.trim())
            .fetch_all(&state.pool),
        )
        .await?;
    }

    Ok(Json(BranchEnvelope {
        statuscode: 200,
        branches,
        access_records,
    }))
}

/// POST /api/location/get-hour-wise-employee-count
///
/// Today's entries at the fixed branch, bucketed by hour. Each employee
/// counts once, in the hour of their first swipe of the day.
pub async fn get_hour_wise_employee_count(
    State(state): State<AppState>,
) -> Result<Json<Envelope<HourlyAccessRecord>>, ApiError> {
    let rows = timed(
        query_as::<_, HourlyAccessRecord>(
            r#"
            WITH first_events AS (
                SELECT a.zrstpersnr, MIN(a.zudate) AS first_event
                FROM if_if_accessarchive a
                JOIN if_if_tdf t ON t.tddesc = a.zrtddesc
                JOIN if_if_arealterminals lt ON lt.terminaldor = t.guid
                JOIN if_if_areal ar ON lt.arealdor = ar.guid
                WHERE a.zudate >= CURRENT_DATE
                  AND a.zuevent = 0
                  AND ar.areacustomerfield1 = $1
                GROUP BY a.zrstpersnr
            )
            SELECT EXTRACT(HOUR FROM first_event)::int AS hour,
                   COUNT(*) AS total_count
            FROM first_events
            GROUP BY EXTRACT(HOUR FROM first_event)
            ORDER BY EXTRACT(HOUR FROM first_event)
            "#,
        )
        .bind(HOUR_WISE_BRANCH)
        .fetch_all(&state.pool),
    )
    .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(Envelope::ok(rows)))
}
