//! Report and message rendering
//!
//! One formatter per output mode. The sync report is rendered here rather
//! than in the command so both modes share the same counter and error
//! presentation rules.

use cloudmirror_core::SyncReport;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Renders CLI messages and the final sync report
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);

    /// Renders the outcome of a sync run
    fn report(&self, report: &SyncReport, dry_run: bool);
}

/// Human-readable formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {message}");
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn print_json(&self, _value: &serde_json::Value) {
        // Human formatter doesn't print JSON
    }

    fn report(&self, report: &SyncReport, dry_run: bool) {
        if report.is_cancelled() {
            self.warn(&format!(
                "{} ({} completed before the stop)",
                report.summary(dry_run),
                report.total_actions()
            ));
        } else {
            self.success(&format!(
                "{} [{}]",
                report.summary(dry_run),
                duration_display(report.duration_ms)
            ));
        }

        if report.ignored > 0 {
            self.info(&format!("Ignored:  {}", report.ignored));
        }
        if report.skipped > 0 {
            self.info(&format!("In sync:  {}", report.skipped));
        }

        if !report.errors.is_empty() {
            self.error(&format!(
                "{} item{} failed:",
                report.errors.len(),
                if report.errors.len() == 1 { "" } else { "s" }
            ));
            for err in &report.errors {
                self.info(&format!("  - {err}"));
            }
        }
    }
}

/// JSON formatter: one JSON document per message
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }

    fn report(&self, report: &SyncReport, dry_run: bool) {
        self.print_json(&report_json(report, dry_run));
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// Builds the machine-readable report document
fn report_json(report: &SyncReport, dry_run: bool) -> serde_json::Value {
    serde_json::json!({
        "cancelled": report.is_cancelled(),
        "dry_run": dry_run,
        "summary": report.summary(dry_run),
        "uploaded": report.uploaded,
        "downloaded": report.downloaded,
        "deleted_local": report.deleted_local,
        "deleted_remote": report.deleted_remote,
        "ignored": report.ignored,
        "skipped": report.skipped,
        "errors": report.errors,
        "duration_ms": report.duration_ms,
    })
}

fn duration_display(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}
