use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) const COMPLETION_REQUESTS_TOTAL: &str = "completion_requests_total";
pub(crate) const COMPLETION_DURATION_SECONDS: &str = "completion_duration_seconds";
pub(crate) const QUESTION_SHORTFALL_TOTAL: &str = "question_generation_shortfall_total";
pub(crate) const SUBMISSIONS_SCORED_TOTAL: &str = "assignment_submissions_scored_total";

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);

    metrics::describe_counter!(
        COMPLETION_REQUESTS_TOTAL,
        "Outbound text completion calls by outcome"
    );
    metrics::describe_histogram!(
        COMPLETION_DURATION_SECONDS,
        "Latency of outbound text completion calls"
    );
    metrics::describe_counter!(
        QUESTION_SHORTFALL_TOTAL,
        "Generation requests that parsed fewer questions than requested"
    );
    metrics::describe_counter!(SUBMISSIONS_SCORED_TOTAL, "Assignment submissions scored");

    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
