//! Plain-text crawl report
//!
//! One line per result followed by a summary of the broken links, the way
//! the report is printed to stdout at the end of a crawl.

use crate::crawler::{CrawlReport, CrawlResult};
use crate::output::OutputResult;
use std::io::Write;

/// Formats the report line of a single result
///
/// # Example
///
/// ```
/// use linkwalk::crawler::CrawlResult;
/// use linkwalk::output::format_result_line;
/// use url::Url;
///
/// let result = CrawlResult::fetched(Url::parse("https://a.com/").unwrap(), 200);
/// assert_eq!(format_result_line(&result), "[OK] https://a.com/ -> HTTP 200");
/// ```
pub fn format_result_line(result: &CrawlResult) -> String {
    match &result.error {
        Some(error) => format!("[BROKEN] {} -> Error: {}", result.url, error),
        None if result.is_broken() => format!("[BROKEN] {} -> HTTP {}", result.url, result.status),
        None => format!("[OK] {} -> HTTP {}", result.url, result.status),
    }
}

/// Formats the entry of a broken result in the summary list
fn format_broken_entry(result: &CrawlResult) -> String {
    match &result.error {
        Some(error) => format!(" - {} ({})", result.url, error),
        None => format!(" - {} (Status: {})", result.url, result.status),
    }
}

/// Formats the full report: every result, then the broken-link summary
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::from("Crawl finished. Results:\n");

    for result in &report.results {
        out.push_str(&format_result_line(result));
        out.push('\n');
    }

    let broken = report.broken_count();
    if broken == 0 {
        out.push_str("No broken links found!\n");
    } else {
        out.push_str(&format!("Found {} broken links:\n", broken));
        for result in report.broken() {
            out.push_str(&format_broken_entry(result));
            out.push('\n');
        }
    }

    out
}

/// Writes the full report to `writer`
pub fn write_report<W: Write>(report: &CrawlReport, writer: &mut W) -> OutputResult<()> {
    writer.write_all(format_report(report).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Prints the full report to stdout
pub fn print_report(report: &CrawlReport) -> OutputResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_report(report, &mut handle)
}
