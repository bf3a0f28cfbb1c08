//! Terminal output for release runs.
//!
//! Formatting lives in pure `format_*` functions; the `display_*` functions
//! only print what they return.

use console::style;

use crate::cli::{Outcome, ReleaseReport};
use crate::notice::ReleaseNotice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a notice. Notices that end the run early are shown as successes.
pub fn display_notice(notice: &ReleaseNotice) {
    if notice.is_skip() {
        display_success(&notice.to_string());
    } else {
        println!("{} {}", style("ℹ").yellow(), notice);
    }
}

/// Lines summarising a created release
pub fn format_report(report: &ReleaseReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Published release {} (id {})",
        report.tag_name, report.release_id
    )];
    for update in &report.tags {
        lines.push(format!("  tag {} {}", update.tag_name, update.action));
    }
    for asset in &report.assets {
        lines.push(format!("  asset {}", asset));
    }
    lines
}

/// Print the terminal state of a run
pub fn display_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Created(report) => {
            let lines = format_report(report);
            if let Some((headline, details)) = lines.split_first() {
                display_success(headline);
                for line in details {
                    println!("{}", line);
                }
            }
            for notice in &report.notices {
                display_notice(notice);
            }
        }
        Outcome::Skipped(notice) => display_notice(notice),
        Outcome::Failed { error, .. } => display_error(&error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TagUpdate;
    use crate::tagging::TagAction;

    #[test]
    fn test_format_report() {
        let report = ReleaseReport {
            release_id: 7,
            tag_name: "v1.0.1".to_string(),
            tags: vec![
                TagUpdate {
                    tag_name: "v1.0.1".to_string(),
                    action: TagAction::Created,
                },
                TagUpdate {
                    tag_name: "v1.0".to_string(),
                    action: TagAction::Moved,
                },
            ],
            assets: vec!["Release v1.0.1 - a.txt".to_string()],
            notices: vec![],
        };

        assert_eq!(
            format_report(&report),
            vec![
                "Published release v1.0.1 (id 7)",
                "  tag v1.0.1 created",
                "  tag v1.0 moved",
                "  asset Release v1.0.1 - a.txt",
            ]
        );
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed
        display_status("test status");
        display_success("test success");
        display_error("test error");
        display_notice(&ReleaseNotice::ValidationOnly {
            version: "1.0.0".to_string(),
        });
        display_notice(&ReleaseNotice::MajorAliasHeld {
            major_tag: "v1".to_string(),
            next_minor_tag: "v1.1".to_string(),
        });
    }
}
