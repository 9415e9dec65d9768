// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Output sinks for formatted network logs

use std::io::Write;
use std::sync::Arc;

/// Destination for formatted log items
///
/// Called with the items of one record, the separator placed between them and
/// the terminator written after the last one.
pub type OutputSink = Arc<dyn Fn(&[String], &str, &str) + Send + Sync>;

/// Join items the way every bundled sink renders a record
pub fn render(items: &[String], separator: &str, terminator: &str) -> String {
    let mut out = items.join(separator);
    out.push_str(terminator);
    out
}

/// Sink writing each record to stdout
pub fn stdout_output() -> OutputSink {
    Arc::new(|items: &[String], separator: &str, terminator: &str| {
        let record = render(items, separator, terminator);
        let mut stdout = std::io::stdout().lock();
        // Logging is best effort; a closed stdout must not take the caller down.
        let _ = stdout.write_all(record.as_bytes());
        let _ = stdout.flush();
    })
}

/// Sink forwarding each record to `tracing` at info level
pub fn tracing_output() -> OutputSink {
    Arc::new(|items: &[String], separator: &str, _terminator: &str| {
        tracing::info!(target: "reqtap::network", "{}", items.join(separator));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render(&items, ", ", "\n"), "a, b\n");
        assert_eq!(render(&[], ", ", "\n"), "\n");
    }

    #[test]
    fn test_sinks_are_callable() {
        let items = vec!["line".to_string()];
        stdout_output()(&items, ", ", "\n");
        tracing_output()(&items, ", ", "\n");
    }
}
