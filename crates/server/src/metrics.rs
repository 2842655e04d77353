use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramTimer, HistogramVec,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bookshelf_operations_total",
        "Book operations handled, by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("register operations_total")
});

pub static OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "bookshelf_operation_duration_seconds",
        "Book operation duration in seconds",
        &["operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("register operation_duration")
});

/// Times one operation and counts its outcome when finished.
pub struct OperationMetrics {
    operation: &'static str,
    timer: HistogramTimer,
}

impl OperationMetrics {
    pub fn start(operation: &'static str) -> Self {
        let timer = OPERATION_DURATION.with_label_values(&[operation]).start_timer();
        Self { operation, timer }
    }

    pub fn finish(self, outcome: &str) {
        self.timer.observe_duration();
        OPERATIONS_TOTAL.with_label_values(&[self.operation, outcome]).inc();
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_operations_show_up_in_exposition() {
        let before = OPERATIONS_TOTAL.with_label_values(&["metrics_test", "ok"]).get();
        OperationMetrics::start("metrics_test").finish("ok");
        assert_eq!(OPERATIONS_TOTAL.with_label_values(&["metrics_test", "ok"]).get(), before + 1);

        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("bookshelf_operations_total"));
        assert!(body.contains("bookshelf_operation_duration_seconds"));
    }
}
