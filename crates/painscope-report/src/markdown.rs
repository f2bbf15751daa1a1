//! Markdown rendering of a [`Report`].

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::Report;

struct Markdown<'a>(&'a Report);

impl Report {
    /// Render as markdown with the fixed section order.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        Markdown(self).to_string()
    }

    /// Render as pretty-printed JSON with the same field set.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn day(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Escape characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "# Pain Point Report: {} to {}",
            day(&report.period_start),
            day(&report.period_end)
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "_Generated {}_",
            report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(f)?;

        write_summary(f, report)?;
        write_themes(f, report)?;
        write_underserved(f, report)?;
        write_saturation(f, report)?;
        write_lead_magnet(f, report)?;
        write_next_steps(f, report)
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    let summary = &report.summary;
    writeln!(f, "## Summary")?;
    writeln!(f)?;
    writeln!(
        f,
        "- **Period:** {} to {}",
        day(&report.period_start),
        day(&report.period_end)
    )?;
    writeln!(f, "- **Signals analysed:** {}", summary.signal_count)?;
    let sources = if summary.sources.is_empty() {
        "none".to_string()
    } else {
        summary.sources.join(", ")
    };
    writeln!(f, "- **Sources:** {sources}")?;
    writeln!(f, "- **Themes found:** {}", report.clusters.len())?;
    writeln!(f, "- **Niches scored:** {}", report.niche_scores.len())?;
    if summary.warnings.is_empty() {
        writeln!(f, "- **Warnings:** none")?;
    } else {
        writeln!(f, "- **Warnings:** {}", summary.warnings.len())?;
        for warning in &summary.warnings {
            writeln!(f, "  - {warning}")?;
        }
    }
    writeln!(f)
}

fn write_themes(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    writeln!(f, "## Themes")?;
    writeln!(f)?;
    if report.clusters.is_empty() {
        writeln!(f, "_No themes found for this period._")?;
        return writeln!(f);
    }
    for (i, cluster) in report.clusters.iter().enumerate() {
        writeln!(f, "### {}. {}", i + 1, cluster.name)?;
        writeln!(f)?;
        writeln!(f, "- **Market size:** {}", cluster.market_size)?;
        writeln!(f, "- **Urgency:** {}", cluster.urgency)?;
        writeln!(f, "- **Solution complexity:** {}", cluster.solution_complexity)?;
        writeln!(f, "- **Target personas:** {}", cluster.target_personas)?;
        writeln!(f)?;
        writeln!(f, "{}", cluster.opportunity_summary)?;
        writeln!(f)?;
        writeln!(f, "Pain points:")?;
        writeln!(f)?;
        for pain_point in &cluster.pain_points {
            writeln!(f, "- {pain_point}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_underserved(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    writeln!(f, "## Underserved Niches")?;
    writeln!(f)?;
    if report.underserved_niches.is_empty() {
        let marker = if report.niche_scores.is_empty() {
            "_No niches scored._"
        } else {
            "_No underserved niches: every scored niche is crowded._"
        };
        writeln!(f, "{marker}")?;
        return writeln!(f);
    }
    writeln!(f, "| Niche | Score | Label |")?;
    writeln!(f, "|---|---|---|")?;
    for niche in &report.underserved_niches {
        writeln!(
            f,
            "| {} | {:.1} | {} |",
            cell(&niche.query),
            niche.opportunity_score,
            niche.label
        )?;
    }
    writeln!(f)
}

fn write_saturation(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    writeln!(f, "## Saturation Check")?;
    writeln!(f)?;
    if report.niche_scores.is_empty() {
        writeln!(f, "_No niches scored._")?;
        return writeln!(f);
    }
    writeln!(f, "| Niche | Competitors | Score | Label | Top domains |")?;
    writeln!(f, "|---|---|---|---|---|")?;
    for niche in &report.niche_scores {
        let domains = if niche.top_domains.is_empty() {
            "-".to_string()
        } else {
            niche.top_domains.join(", ")
        };
        writeln!(
            f,
            "| {} | {} | {:.1} | {} | {} |",
            cell(&niche.query),
            niche.competitor_count,
            niche.opportunity_score,
            niche.label,
            cell(&domains)
        )?;
    }
    writeln!(f)
}

fn write_lead_magnet(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    let magnet = &report.lead_magnet;
    writeln!(f, "## Lead Magnet")?;
    writeln!(f)?;
    writeln!(f, "**{}**", magnet.title)?;
    writeln!(f)?;
    for (i, item) in magnet.outline.iter().enumerate() {
        writeln!(f, "{}. {}", i + 1, item)?;
    }
    writeln!(f)?;
    match &magnet.source_cluster {
        Some(name) => writeln!(f, "_Built from the most urgent theme: {name}._")?,
        None => writeln!(f, "_No themes this period; generic research checklist._")?,
    }
    writeln!(f)
}

fn write_next_steps(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    writeln!(f, "## Next Steps")?;
    writeln!(f)?;
    for (i, step) in report.next_steps.iter().enumerate() {
        writeln!(f, "{}. {}", i + 1, step)?;
    }
    Ok(())
}
