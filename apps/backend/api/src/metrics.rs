use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_metrics() -> Result<(), BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus recorder was already initialized");
        return Ok(());
    }

    metrics::describe_counter!(
        "scratchoff_saves_total",
        "Daily snapshot saves by outcome"
    );
    metrics::describe_counter!(
        "scratchoff_settings_saves_total",
        "Denomination settings saves by outcome"
    );
    metrics::describe_counter!(
        "scratchoff_loads_total",
        "Tracker opens and date selections by outcome"
    );

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

pub async fn handler() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
