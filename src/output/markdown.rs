//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including run information, totals, the broken links and the full result
//! list.

use crate::crawler::{CrawlReport, CrawlResult};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary of a crawl
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Markdown summary written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Link Check Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", report.seed));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));

    // Totals
    let total = report.total();
    let broken = report.broken_count();
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **URLs Checked**: {}\n", total));
    md.push_str(&format!("- **OK**: {}\n", report.ok_count()));
    md.push_str(&format!("- **Broken**: {}\n", broken));
    if total > 0 {
        md.push_str(&format!(
            "- **Broken Rate**: {:.2}%\n",
            broken as f64 * 100.0 / total as f64
        ));
    }
    md.push('\n');

    // Broken links
    md.push_str("## Broken Links\n\n");
    if broken == 0 {
        md.push_str("No broken links found!\n\n");
    } else {
        md.push_str("| URL | Status | Error |\n");
        md.push_str("|-----|--------|-------|\n");
        for result in report.broken() {
            md.push_str(&table_row(result));
        }
        md.push('\n');
    }

    // Every result
    if total > 0 {
        md.push_str("## All Results\n\n");
        md.push_str("| URL | Status | Error |\n");
        md.push_str("|-----|--------|-------|\n");
        for result in &report.results {
            md.push_str(&table_row(result));
        }
        md.push('\n');
    }

    md
}

fn table_row(result: &CrawlResult) -> String {
    let status = match result.status {
        0 => "-".to_string(),
        status => status.to_string(),
    };
    let error = result
        .error
        .as_ref()
        .map(|e| escape_cell(&e.to_string()))
        .unwrap_or_default();

    format!(
        "| {} | {} | {} |\n",
        escape_cell(result.url.as_str()),
        status,
        error
    )
}

/// Escapes text for use inside a markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
