//! Fleet comparison table and summary.

use crate::compare::{ComparisonData, ComparisonStatus, ComparisonSummary};
use crate::ui::{Table, WatcherTheme};

/// Status label colored by severity.
pub fn styled_status(status: ComparisonStatus, theme: &WatcherTheme) -> String {
    let style = match status {
        ComparisonStatus::Same => &theme.success,
        ComparisonStatus::Diff | ComparisonStatus::Partial => &theme.warning,
        ComparisonStatus::Missing | ComparisonStatus::Error => &theme.error,
    };
    style.apply_to(status.as_str()).to_string()
}

/// One row per runtime, one column per host, then the status.
pub fn comparison_table(data: &ComparisonData, theme: &WatcherTheme) -> String {
    let mut headers = vec!["Runtime"];
    headers.extend(data.hosts.iter().map(String::as_str));
    headers.push("Status");

    let mut table = Table::new(headers);
    for row in &data.runtimes {
        let mut cells = Vec::with_capacity(row.versions.len() + 2);
        cells.push(row.name.clone());
        cells.extend(row.versions.iter().cloned());
        cells.push(styled_status(row.status, theme));
        table.add_row(cells);
    }
    table.render()
}

/// Summary lines printed under the comparison table.
pub fn comparison_summary(summary: &ComparisonSummary) -> Vec<String> {
    let mut lines = vec![
        "Summary:".to_string(),
        format!("- Total runtimes compared: {}", summary.total),
        format!("- Matching runtimes: {}", summary.same),
        format!(
            "- Mismatched runtimes: {}",
            summary.diff + summary.partial
        ),
        format!(
            "- Missing or unreachable: {}",
            summary.missing + summary.error
        ),
    ];

    if summary.has_drift() {
        lines.push(String::new());
        lines.push("Recommendation:".to_string());
        lines.push(
            "- Review mismatched runtimes and plan upgrades to standardize versions.".to_string(),
        );
    }

    lines
}
