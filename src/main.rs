use std::io;

use anyhow::Context;
use tracing::info;

use korotu_scoring::host::serve_lines;
use korotu_scoring::utils::{ort_init, tracing_subscriber_init};
use korotu_scoring::ScoringContext;

fn main() -> anyhow::Result<()> {
    tracing_subscriber_init();
    ort_init().context("failed to initialize ONNX Runtime")?;

    // A load failure exits non-zero so the instance is never marked ready.
    let context = ScoringContext::from_env().context("failed to load scoring artifacts")?;
    info!("ready for requests");

    serve_lines(&context, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
