use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use sathi_seva::config::MarketplaceConfig;
use sathi_seva::marketplace::{
    Clock, InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository,
    Marketplace,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

pub(crate) type MemoryMarketplace =
    Marketplace<InMemoryJobRepository, InMemoryApplicationRepository, InMemoryProfileRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Marketplace over fresh in-memory stores.
///
/// No remote tag suggester ships with this service, so suggestions always come from the
/// keyword table.
pub(crate) fn in_memory_marketplace(
    config: &MarketplaceConfig,
    clock: Arc<dyn Clock>,
) -> Arc<MemoryMarketplace> {
    if config.tags_api_key.is_some() {
        warn!("SATHI_TAGS_API_KEY is set but no remote tag suggester is available, using keywords");
    }

    Arc::new(Marketplace::new(
        Arc::new(InMemoryJobRepository::default()),
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryProfileRepository::default()),
        clock,
        config,
        None,
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

/// UTC instant at which the marketplace's local wall clock reads `date time`.
pub(crate) fn local_instant(
    config: &MarketplaceConfig,
    date: NaiveDate,
    time: NaiveTime,
) -> DateTime<Utc> {
    let offset = chrono::Duration::seconds(i64::from(config.utc_offset().local_minus_utc()));
    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(time) - offset, Utc)
}
