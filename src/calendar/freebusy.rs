//! Chunked free/busy retrieval.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directory::Resource;
use crate::error::{Result, UpstreamError};
use crate::interval::Interval;
use crate::sources::FreeBusySource;

/// Per-item error reason meaning the calendar simply does not exist; the
/// resource is omitted from results rather than failing the run.
pub const NOT_FOUND: &str = "notFound";

/// One calendar's answer in a bulk free/busy response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusyCalendar {
    #[serde(default)]
    pub busy: Vec<Interval>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FreeBusyError>,
}

/// A per-calendar error carried inside an otherwise successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeBusyError {
    pub reason: String,
}

/// A bulk free/busy response, keyed by calendar address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeBusyResponse {
    pub calendars: HashMap<String, BusyCalendar>,
}

/// Fetch busy intervals for every resource, `chunk_size` calendars per
/// upstream call. A `notFound` per-item error drops that resource from the
/// result; any other per-item error fails the run.
pub async fn fetch_free_busy(
    source: &dyn FreeBusySource,
    resources: &[Resource],
    window: Interval,
    chunk_size: usize,
) -> Result<HashMap<String, Vec<Interval>>> {
    let mut map = HashMap::with_capacity(resources.len());
    for chunk in resources.chunks(chunk_size.max(1)) {
        let emails: Vec<String> = chunk.iter().map(|r| r.email.clone()).collect();
        let response = source.query(&emails, window).await?;
        for (email, calendar) in response.calendars {
            let mut missing = false;
            for err in &calendar.errors {
                if err.reason == NOT_FOUND {
                    missing = true;
                    continue;
                }
                return Err(UpstreamError::FreeBusy {
                    calendar: email.clone(),
                    reason: err.reason.clone(),
                }
                .into());
            }
            if missing {
                debug!(calendar = %email, "free/busy calendar not found, omitting");
                continue;
            }
            map.insert(email, calendar.busy);
        }
    }
    Ok(map)
}
