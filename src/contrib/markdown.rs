use super::types::{ContributionSection, RepositoryReport};

pub const CREATED_PULL_REQUESTS_LABEL: &str = "Total Pull Requests Created";
pub const CREATED_ISSUES_LABEL: &str = "Total Issues Opened";
pub const REVIEWED_PULL_REQUESTS_LABEL: &str = "Total Pull Requests Reviewed";

/// Render one repository block.
///
/// The header ends with a newline, every following line starts with one, and the block
/// closes with a blank line so consecutive repositories stay separated.
pub fn render_repository(org: &str, report: &RepositoryReport) -> String {
    let mut out = format!("**Repository: {}**\n", report.repository);
    push_section(
        &mut out,
        CREATED_PULL_REQUESTS_LABEL,
        org,
        &report.repository,
        &report.created_pull_requests,
    );
    push_section(
        &mut out,
        CREATED_ISSUES_LABEL,
        org,
        &report.repository,
        &report.created_issues,
    );
    push_section(
        &mut out,
        REVIEWED_PULL_REQUESTS_LABEL,
        org,
        &report.repository,
        &report.reviewed_not_authored_pull_requests,
    );
    out.push_str("\n\n");
    out
}

fn push_section(
    out: &mut String,
    label: &str,
    org: &str,
    repo: &str,
    section: &ContributionSection,
) {
    if section.has_summary() {
        out.push_str(&format!("\n{label}: {}", section.total));
    }
    for (i, record) in section.records.iter().enumerate() {
        // [org/repo#number](url) - title
        out.push_str(&format!(
            "\n{}. [{org}/{repo}#{}]({}) - {}",
            i + 1,
            record.number,
            record.url,
            record.title
        ));
    }
}
