//! Formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stages stay free of
//! presentation concerns and output changes are localized.

use crate::app::pipeline::RunOutput;
use crate::domain::PipelineConfig;

/// Format the run summary (ingest counts + stage outputs + per-pharmacy table).
pub fn format_run_summary(run: &RunOutput, config: &PipelineConfig) -> String {
    let mut out = String::new();
    let ingest = &run.ingest;

    out.push_str("=== rxp - pharmacy projections ===\n");
    out.push_str(&format!("Data root: {}\n", config.data_root.display()));
    out.push_str(&format!("Snapshot : {}\n", config.output.display()));
    out.push_str(&format!(
        "Files: found={} parsed={} failed={} unsupported={}\n",
        ingest.files_found,
        ingest.files_parsed,
        ingest.file_failures.len(),
        ingest.files_unsupported,
    ));
    out.push_str(&format!(
        "Rows : read={} undecodable={} records={}\n",
        ingest.rows_read, ingest.row_errors, ingest.records,
    ));
    for failure in &ingest.file_failures {
        out.push_str(&format!(
            "  (failed {}) {}: {}\n",
            failure.pharmacy,
            failure.path.display(),
            failure.message
        ));
    }

    out.push_str(&format!(
        "\nWeekly buckets: {} | Monthly buckets: {} | Projections: {} ({} weeks ahead)\n",
        run.weekly.len(),
        run.monthly.len(),
        run.projections.len(),
        config.horizon,
    ));

    out.push('\n');
    out.push_str(&format_summary_table(run));
    out
}

fn format_summary_table(run: &RunOutput) -> String {
    let mut out = String::new();
    if run.summary.is_empty() {
        out.push_str("No pharmacy data.\n");
        return out;
    }

    out.push_str(
        format!(
            "{:<10} {:>8} {:>14} {:>16} {:>14} {:<24}\n",
            "pharmacy", "skus", "quantity", "revenue", "avg/week", "top sku"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<8} {:-<14} {:-<16} {:-<14} {:-<24}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (pharmacy, s) in &run.summary {
        let top = s.top_skus.first().map(|t| t.sku.as_str()).unwrap_or("");
        out.push_str(
            format!(
                "{:<10} {:>8} {:>14.1} {:>16.2} {:>14.1} {:<24}\n",
                pharmacy.display_name(),
                s.total_skus,
                s.total_quantity,
                s.total_revenue,
                s.avg_weekly_quantity,
                truncate(top, 24),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
