pub use metrics::*;
use std::sync::LazyLock;

/*
 * Provisioning pipeline
 */
pub static PROVISIONER_VALIDATORS_TOTAL: LazyLock<Result<IntCounterVec>> = LazyLock::new(|| {
    try_create_int_counter_vec(
        "provisioner_validators_total",
        "Count of validators that reached a terminal state, by status",
        &["status"],
    )
});
pub static PROVISIONER_VALIDATORS_SKIPPED_TOTAL: LazyLock<Result<IntCounter>> =
    LazyLock::new(|| {
        try_create_int_counter(
            "provisioner_validators_skipped_total",
            "Count of validators skipped because they were registered by an earlier run",
        )
    });
pub static PROVISIONER_SPLIT_SECONDS: LazyLock<Result<Histogram>> = LazyLock::new(|| {
    try_create_histogram(
        "provisioner_split_seconds",
        "Time taken to decrypt a keystore and split it into encrypted shares",
    )
});
pub static PROVISIONER_CHAIN_SUBMISSION_SECONDS: LazyLock<Result<HistogramVec>> =
    LazyLock::new(|| {
        try_create_histogram_vec(
            "provisioner_chain_submission_seconds",
            "Time taken for a transaction to be submitted and confirmed",
            &["kind"],
        )
    });

/// Render every registered metric in the Prometheus text format
pub fn encode_metrics() -> std::result::Result<String, String> {
    let mut buffer = vec![];
    TextEncoder::new()
        .encode(&gather(), &mut buffer)
        .map_err(|e| format!("Unable to encode metrics: {e:?}"))?;
    String::from_utf8(buffer).map_err(|e| format!("Metrics are not valid UTF-8: {e}"))
}
