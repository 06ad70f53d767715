use human_bytes::human_bytes;

/// Installs the fmt subscriber. `RUST_LOG` wins over the `--debug` default.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

pub fn physical_memory_label() -> String {
    match memory_stats::memory_stats() {
        Some(usage) => human_bytes(usage.physical_mem as f64),
        None => "n/a".to_string(),
    }
}

pub fn size_label(bytes: usize) -> String {
    human_bytes(bytes as f64)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
