use super::models::EventsQuery;
use crate::error::{config_error, GatewayResult};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone the room calendars are queried in
pub const QUERY_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Events updated at or after this instant (2014-01-01T00:00:00Z) are dropped
pub const STALENESS_CUTOFF_TIMESTAMP: i64 = 1_388_534_400;

/// The fixed staleness cutoff as a UTC instant
pub fn staleness_cutoff() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(STALENESS_CUTOFF_TIMESTAMP)
}

/// Date window queried for every room, bounded by local midnights
#[derive(Debug, Clone, PartialEq)]
pub struct QueryWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl QueryWindow {
    /// Window from local midnight of `start` up to local midnight of `end`
    pub fn new(start: NaiveDate, end: NaiveDate, tz: Tz) -> GatewayResult<Self> {
        if end <= start {
            return Err(config_error("Query window must end after it starts"));
        }
        Ok(Self {
            start: local_midnight(start, tz)?,
            end: local_midnight(end, tz)?,
        })
    }

    /// August 2014 in São Paulo, the window the room audit covers
    pub fn room_audit() -> GatewayResult<Self> {
        let start = NaiveDate::from_ymd_opt(2014, 8, 1)
            .ok_or_else(|| config_error("Invalid query window start"))?;
        let end = NaiveDate::from_ymd_opt(2014, 9, 1)
            .ok_or_else(|| config_error("Invalid query window end"))?;
        Self::new(start, end, QUERY_TIMEZONE)
    }

    pub fn time_min(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn time_max(&self) -> String {
        self.end.to_rfc3339()
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Events list query covering this window
    pub fn events_query(&self) -> EventsQuery {
        EventsQuery {
            time_min: self.time_min(),
            time_max: self.time_max(),
            time_zone: self.timezone().name().to_string(),
            order_by: "startTime".to_string(),
            single_events: true,
            show_deleted: false,
        }
    }
}

/// Resolve midnight of `date` in `tz`
fn local_midnight(date: NaiveDate, tz: Tz) -> GatewayResult<DateTime<Tz>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| config_error("Failed to create datetime"))?;
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(_, _) => Err(config_error(&format!(
            "Midnight of {} is ambiguous in {}",
            date,
            tz.name()
        ))),
        LocalResult::None => Err(config_error(&format!(
            "Midnight of {} does not exist in {}",
            date,
            tz.name()
        ))),
    }
}
