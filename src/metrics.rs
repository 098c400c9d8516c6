use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and describe the service counters.
    /// Call once from the binary; counter macros elsewhere are no-ops until
    /// the recorder is installed, which keeps tests recorder-free.
    pub fn init() -> Self {
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "risk_assessments_total",
            "Flood risk assessments served via /api/predict-risk"
        );
        describe_counter!(
            "weather_proxy_errors_total",
            "Failed upstream calls to the weather provider"
        );
        describe_counter!(
            "news_proxy_errors_total",
            "Failed upstream calls to the news provider"
        );

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
