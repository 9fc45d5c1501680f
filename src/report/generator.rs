//! Markdown report generation.
//!
//! This module renders the dashboard report from the aggregated results:
//! cohort header, score tables, derived insights, and the feedback wall.

use crate::models::{AggregateMeans, FeedbackWall, Insights, Report, ReportMetadata, WallEntry};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, title: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", title));

    output.push_str(&generate_metadata_section(&report.metadata));

    match (&report.means, &report.insights) {
        (Some(means), Some(insights)) => {
            output.push_str(&generate_confidence_section(means, insights));
            output.push_str(&generate_competency_section(means));
            output.push_str(&generate_satisfaction_section(means));
            output.push_str(&generate_insights_section(insights));
        }
        _ => {
            // Zero responses: say so explicitly instead of rendering NaN.
            output.push_str("## Scores\n\n");
            output.push_str("目前沒有數據可供分析 — no responses have been received yet.\n\n");
        }
    }

    output.push_str(&generate_wall_section(&report.wall));
    output.push_str(&generate_footer());

    output
}

/// Generate the cohort metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Cohort\n\n");
    section.push_str(&format!("- **Endpoint:** {}\n", metadata.endpoint));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Trainees:** {}\n", metadata.total_trainees));
    section.push_str(&format!("- **Responses:** {}\n", metadata.record_count));
    section.push_str(&format!(
        "- **Response Rate:** {}%\n",
        metadata.response_rate_percent
    ));
    section.push('\n');

    section
}

/// Generate the pre/post confidence section with ASCII bars.
fn generate_confidence_section(means: &AggregateMeans, insights: &Insights) -> String {
    let mut section = String::new();

    section.push_str("## Confidence (1-10)\n\n");
    section.push_str("```\n");
    section.push_str(&format!(
        "訓前信心 {:<10} {:.1}\n",
        bar(means.q8_pre),
        means.q8_pre
    ));
    section.push_str(&format!(
        "訓後信心 {:<10} {:.1}\n",
        bar(means.q8_post),
        means.q8_post
    ));
    section.push_str("```\n\n");
    section.push_str(&format!(
        "Change: **{:+.1}**\n\n",
        insights.confidence_growth
    ));

    section
}

fn bar(value: f64) -> String {
    // Clamp so out-of-scale data cannot blow up the rendering.
    let blocks = value.round().clamp(0.0, 10.0) as usize;
    "█".repeat(blocks)
}

/// Generate the five-competency score table.
fn generate_competency_section(means: &AggregateMeans) -> String {
    let mut section = String::new();

    section.push_str("## Core Competencies (1-5)\n\n");
    section.push_str("| # | Competency | Mean |\n");
    section.push_str("|:---:|:---|:---:|\n");

    for (i, (name, score)) in means.competencies().iter().enumerate() {
        section.push_str(&format!("| Q{} | {} | {:.1} |\n", i + 3, name, score));
    }
    section.push('\n');

    section
}

/// Generate the satisfaction cards.
fn generate_satisfaction_section(means: &AggregateMeans) -> String {
    let mut section = String::new();

    section.push_str("## Satisfaction (1-5)\n\n");
    section.push_str("| 價值認同感 (Q10) | 行政安排 (Q12) | 場地教材 (Q13) |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.1} | {:.1} | {:.1} |\n\n",
        means.q10, means.q12, means.q13
    ));

    section
}

/// Generate the derived-insights section.
fn generate_insights_section(insights: &Insights) -> String {
    let mut section = String::new();

    section.push_str("## Insights\n\n");
    section.push_str(&format!(
        "- **信心成長:** {:+.1} (post-training minus pre-training mean)\n",
        insights.confidence_growth
    ));
    section.push_str(&format!(
        "- **最強核心指標:** {} ({:.1})\n",
        insights.top_competency.name, insights.top_competency.score
    ));
    section.push('\n');

    section
}

/// Generate the feedback wall section.
fn generate_wall_section(wall: &FeedbackWall) -> String {
    let mut section = String::new();

    section.push_str("## 學員心聲回饋牆\n\n");

    if wall.is_empty() {
        section.push_str("No displayable comments were submitted.\n\n");
        return section;
    }

    if !wall.touching.is_empty() {
        section.push_str("### 感觸時刻 (Q14)\n\n");
        for entry in &wall.touching {
            section.push_str(&generate_quote(entry));
        }
    }

    if !wall.suggestions.is_empty() {
        section.push_str("### 建議回饋 (Q15)\n\n");
        for entry in &wall.suggestions {
            section.push_str(&generate_quote(entry));
        }
    }

    section
}

fn generate_quote(entry: &WallEntry) -> String {
    format!("> {}\n> — 學員 #{}\n\n", entry.text, entry.id)
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by spdash — 數據來源：雲端問卷即時連動*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
