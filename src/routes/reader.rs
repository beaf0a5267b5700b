// src/routes/reader.rs

use axum::{extract::State, Json};
use sqlx::query_as;

use crate::models::{DeviceHealthRecord, Envelope};
use crate::reports::merge::{merge_device_health, SiteAggregate};
use crate::{error::ApiError, AppState};

use super::timed;

// Status-transition event codes in the access archive.
const CONTROLLER_OFFLINE: i32 = 120;
const CONTROLLER_ONLINE: i32 = 121;
const READER_OFFLINE: i32 = 17;
const READER_ONLINE: i32 = 18;

/// GET /api/reader/controllersAndReadersBySite
///
/// Four aggregates (total readers, total controllers, offline controllers,
/// offline readers) merged into one row per (city, building). A site seen
/// by any aggregate appears in the output.
pub async fn controllers_and_readers_by_site(
    State(state): State<AppState>,
) -> Result<Json<Envelope<DeviceHealthRecord>>, ApiError> {
    let readers = SiteAggregate::from_rows(
        timed(
            query_as::<_, (String, String, i64)>(
                r#"
                SELECT tdlocation, tdbuilding, COUNT(tdnr)
                FROM if_if_tdf
                WHERE tdbuilding <> ' '
                GROUP BY tdlocation, tdbuilding
                ORDER BY tdlocation, tdbuilding
                "#,
            )
            .fetch_all(&state.pool),
        )
        .await?,
    );

    let controllers = SiteAggregate::from_rows(
        timed(
            query_as::<_, (String, String, i64)>(
                r#"
                SELECT t.tdlocation, t.tdbuilding, COUNT(DISTINCT p.ponr)
                FROM if_if_portdef p
                JOIN if_if_tdf t ON p.guid = t.portdor
                WHERE t.tdbuilding <> ''
                GROUP BY t.tdbuilding, t.tdlocation
                "#,
            )
            .fetch_all(&state.pool),
        )
        .await?,
    );

    let offline_controllers = SiteAggregate::from_rows(
        offline_counts(&state, CONTROLLER_OFFLINE, CONTROLLER_ONLINE, "p.podesc").await?,
    );
    let offline_readers = SiteAggregate::from_rows(
        offline_counts(&state, READER_OFFLINE, READER_ONLINE, "t.tddesc").await?,
    );

    let records = merge_device_health(
        &readers,
        &controllers,
        &offline_controllers,
        &offline_readers,
    );
    if records.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(Envelope::ok(records)))
}

/// Sites with devices whose latest went-offline event (`down`) is newer than
/// their latest came-online event (`up`). `device_col` names the column that
/// identifies one device of that kind in the archive joins.
async fn offline_counts(
    state: &AppState,
    down: i32,
    up: i32,
    device_col: &str,
) -> Result<Vec<(String, String, i64)>, ApiError> {
    let sql = format!(
        r#"
        WITH offline AS (
            SELECT t.tdlocation, t.tdbuilding
            FROM if_if_accessarchive a
            JOIN if_if_tdf t ON t.tddesc = a.zrtddesc
            JOIN if_if_portdef p ON p.guid = t.portdor
            WHERE a.zuevent IN ($1, $2)
            GROUP BY {device_col}, t.tdlocation, t.tdbuilding
            HAVING MAX(CASE WHEN a.zuevent = $1 THEN a.zudate END)
                 > MAX(CASE WHEN a.zuevent = $2 THEN a.zudate END)
        )
        SELECT tdlocation, tdbuilding, COUNT(*)
        FROM offline
        GROUP BY tdlocation, tdbuilding
        "#
    );

    timed(
        query_as::<_, (String, String, i64)>(&sql)
            .bind(down)
            .bind(up)
            .fetch_all(&state.pool),
    )
    .await
}
