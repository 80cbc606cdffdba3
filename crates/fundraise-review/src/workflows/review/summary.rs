use std::fmt::Write as _;

use super::scoring::{format_number, ReviewSnapshot};

/// Renders the text shown to the admin before a review is submitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewSummaryGenerator;

impl ReviewSummaryGenerator {
    /// Sections with neither a score nor a comment are left out; the rest
    /// keep rubric order.
    pub fn generate(campaign_title: &str, snapshot: &ReviewSnapshot) -> String {
        let total = snapshot.total_score();
        let max_total = snapshot.max_total_score();

        let mut text = String::new();
        let _ = write!(
            text,
            "Review Summary for \"{}\"\n\nTotal Rating: {}% ({}/{})\n\nSection Breakdown:\n",
            campaign_title,
            format_number(snapshot.overall_percentage()),
            format_number(total),
            format_number(max_total),
        );

        let breakdown: Vec<String> = snapshot
            .sections
            .iter()
            .filter(|section| section.has_feedback())
            .map(|section| {
                let mut line = format!(
                    "{}: {}% ({}/{})",
                    section.title,
                    format_number(section.percentage()),
                    format_number(section.score),
                    format_number(section.max_score),
                );
                if !section.comment.is_empty() {
                    let _ = write!(line, "\n- {}", section.comment);
                }
                line
            })
            .collect();
        text.push_str(&breakdown.join("\n\n"));

        let final_comment = snapshot.final_comment.trim();
        if !final_comment.is_empty() {
            let _ = write!(text, "\n\nFinal Comment:\n{final_comment}");
        }

        text
    }
}
