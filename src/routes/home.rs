// src/routes/home.rs

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Deserialize;
use sqlx::query_as;

use crate::extractors::Query;
use crate::models::{Envelope, FacilityRecord, RegionalCount, SeatCapacityRecord};
use crate::reports::merge::attach_min_max;
use crate::{error::ApiError, AppState};

use super::timed;

/// Zone numbers booked against overseas facilities; every other zone is
/// an India site.
pub const OVERSEAS_ZONES: [i32; 3] = [281, 309, 310];

#[derive(Deserialize)]
pub struct SitesQ {
    pub hours: i32,
}

/// GET /api/home/GetAllSitesInfo?hours=N
///
/// Live per-facility headcounts plus the min/max envelope of hour-of-day
/// swipe counts over the trailing `hours` window. Facilities with no swipes
/// in the window still appear, with min/max 0.
pub async fn get_all_sites_info(
    State(state): State<AppState>,
    Query(q): Query<SitesQ>,
) -> Result<Json<Envelope<FacilityRecord>>, ApiError> {
    if q.hours < 1 {
        return Err(ApiError::Validation("hours must be at least 1".into()));
    }

    let live = timed(
        query_as::<_, (String, i64)>(
            r#"
            SELECT r.rzdesc, COUNT(*)
            FROM if_if_empcurronl e
            JOIN if_if_raumzone r ON e.accesszonedor = r.guid
            WHERE r.rzrzwonl = 'B' AND r.rznr <> ALL($1)
            GROUP BY e.accesszonedor, r.rzdesc
            ORDER BY r.rzdesc
            "#,
        )
        .bind(&OVERSEAS_ZONES[..])
        .fetch_all(&state.pool),
    )
    .await?;

    let min_max_rows = timed(
        query_as::<_, (String, i64, i64)>(
            r#"
            WITH cte AS (
                SELECT r.rznr, r.rzdesc,
                       EXTRACT(HOUR FROM e.eclbtimestamp)::int AS hour,
                       COUNT(*) AS total
                FROM if_if_empcurronl e
                JOIN if_if_raumzone r ON e.accesszonedor = r.guid
                WHERE e.eclbtimestamp >= now() - make_interval(hours => $1)
                  AND r.rznr <> ALL($2)
                GROUP BY EXTRACT(HOUR FROM e.eclbtimestamp), r.rznr, r.rzdesc
            )
            SELECT rzdesc, MIN(total), MAX(total)
            FROM cte
            GROUP BY rzdesc
            "#,
        )
        .bind(q.hours)
        .bind(&OVERSEAS_ZONES[..])
        .fetch_all(&state.pool),
    )
    .await?;

    let min_max: HashMap<String, (i64, i64)> = min_max_rows
        .into_iter()
        .map(|(facility, min, max)| (facility, (min, max)))
        .collect();

    let records = attach_min_max(live, &min_max);
    if records.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(Envelope::ok(records)))
}

/// GET /api/home/GetIndiaAndOverseasCounts
pub async fn get_india_and_overseas_counts(
    State(state): State<AppState>,
) -> Result<Json<Envelope<RegionalCount>>, ApiError> {
    let india = occupied_facility_count(&state, false).await?;
    let overseas = occupied_facility_count(&state, true).await?;

    Ok(Json(Envelope::ok(vec![
        RegionalCount {
            name: "India",
            value: india,
        },
        RegionalCount {
            name: "Overseas",
            value: overseas,
        },
    ])))
}

/// Number of distinct facilities with anyone currently on site, on one side
/// of the overseas zone split.
async fn occupied_facility_count(state: &AppState, overseas: bool) -> Result<i64, ApiError> {
    // The two bucket queries differ only in the zone-number filter.
    let zone_filter = if overseas {
        "r.rznr = ANY($1)"
    } else {
        "r.rznr <> ALL($1)"
    };
    let sql = format!(
        r#"
        WITH occupied AS (
            SELECT r.rzdesc
            FROM if_if_empcurronl e
            JOIN if_if_raumzone r ON e.accesszonedor = r.guid
            WHERE r.rzrzwonl = 'B' AND {zone_filter}
            GROUP BY r.rzdesc
        )
        SELECT COUNT(*) FROM occupied
        "#
    );

    let (count,) = timed(
        query_as::<_, (i64,)>(&sql)
            .bind(&OVERSEAS_ZONES[..])
            .fetch_one(&state.pool),
    )
    .await?;
    Ok(count)
}

/// GET /api/home/EmployeeCountBySite
pub async fn employee_count_by_site(
    State(state): State<AppState>,
) -> Result<Json<Envelope<SeatCapacityRecord>>, ApiError> {
    let rows = timed(
        query_as::<_, (String, String)>(
            r#"
            SELECT rzdesc, rzfeld1
            FROM if_if_raumzone
            WHERE rzrzwonl = 'B' AND rznr <> ALL($1) AND rzfeld1 <> ''
            ORDER BY rzdesc DESC
            "#,
        )
        .bind(&OVERSEAS_ZONES[..])
        .fetch_all(&state.pool),
    )
    .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }

    let records = rows
        .into_iter()
        .map(|(city, seats)| SeatCapacityRecord::reserved(city, seats))
        .collect();
    Ok(Json(Envelope::ok(records)))
}
