//! Minimal local host: one request body per input line, one response per output line.

use std::io::{self, BufRead, Write};

use serde_json::json;
use tracing::{error, info};

use crate::scoring::ScoringContext;

/// Feeds every non-blank line of `reader` through [`ScoringContext::run`].
///
/// A failed request produces `{"error": <kind>, "message": <reason>}` in its
/// place, so responses stay aligned with requests. Returns the number of
/// requests handled.
pub fn serve_lines<R: BufRead, W: Write>(
    context: &ScoringContext,
    reader: R,
    mut writer: W,
) -> io::Result<usize> {
    let mut handled = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        handled += 1;

        let reply = match context.run(&line) {
            Ok(body) => body,
            Err(err) => {
                error!(request = handled, kind = err.kind(), "{err}");
                json!({ "error": err.kind(), "message": err.to_string() }).to_string()
            }
        };
        writeln!(writer, "{reply}")?;
        writer.flush()?;
    }
    info!(handled, "input closed");
    Ok(handled)
}
