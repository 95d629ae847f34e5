use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries the response bodies.
pub fn tracing_subscriber_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn ort_init() -> Result<(), ort::Error> {
    ort::init().with_name("korotu-scoring").commit()
}
