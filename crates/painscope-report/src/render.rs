//! Pure assembly of a [`Report`] from the outputs of the earlier stages.

use painscope_core::{NicheScore, OpportunityLabel, ThemeCluster};

use crate::model::{LeadMagnet, Report, ReportMetadata, ReportSummary};

const MAX_NICHES_TO_VALIDATE: usize = 3;
const MAX_OUTLINE_FIXES: usize = 3;

/// Build the report. Performs no I/O.
///
/// Every cluster and every niche score passed in appears in the result, in
/// the order given. Identical inputs always yield identical reports.
#[must_use]
pub fn render(
    clusters: &[ThemeCluster],
    niche_scores: &[NicheScore],
    metadata: &ReportMetadata,
) -> Report {
    let underserved_niches = underserved(niche_scores);
    let lead_magnet = lead_magnet(clusters);
    let next_steps = next_steps(clusters, &underserved_niches, &lead_magnet, metadata);

    Report {
        generated_at: metadata.generated_at,
        period_start: metadata.period.start,
        period_end: metadata.period.end,
        summary: ReportSummary {
            signal_count: metadata.signal_count,
            sources: metadata.sources.clone(),
            warnings: metadata.warnings.clone(),
        },
        clusters: clusters.to_vec(),
        underserved_niches,
        niche_scores: niche_scores.to_vec(),
        lead_magnet,
        next_steps,
    }
}

/// Non-crowded niches, highest score first. Equal scores keep input order.
fn underserved(niche_scores: &[NicheScore]) -> Vec<NicheScore> {
    let mut niches: Vec<NicheScore> = niche_scores
        .iter()
        .filter(|n| n.label != OpportunityLabel::Crowded)
        .cloned()
        .collect();
    niches.sort_by(|a, b| b.opportunity_score.total_cmp(&a.opportunity_score));
    niches
}

/// The most urgent cluster; the earliest one wins a tie.
fn most_urgent(clusters: &[ThemeCluster]) -> Option<&ThemeCluster> {
    let mut best: Option<&ThemeCluster> = None;
    for cluster in clusters {
        if best.is_none_or(|b| cluster.urgency > b.urgency) {
            best = Some(cluster);
        }
    }
    best
}

fn lead_magnet(clusters: &[ThemeCluster]) -> LeadMagnet {
    let Some(cluster) = most_urgent(clusters) else {
        return LeadMagnet {
            title: "The Pain-Point Research Checklist".to_string(),
            outline: vec![
                "Where your buyers complain: communities and search queries to watch".to_string(),
                "How to tell a recurring pain from a one-off rant".to_string(),
                "Scoring a niche by how crowded its search results are".to_string(),
                "A one-week plan to validate a pain point with real conversations".to_string(),
            ],
            source_cluster: None,
        };
    };

    let mut outline = Vec::new();
    if let Some(first) = cluster.pain_points.first() {
        outline.push(format!("The problem in their words: \"{first}\""));
    }
    for pain_point in cluster.pain_points.iter().skip(1).take(MAX_OUTLINE_FIXES) {
        outline.push(format!("Quick fix: {pain_point}"));
    }
    outline.push(format!("Who this is for: {}", cluster.target_personas));
    outline.push(format!("The opportunity: {}", cluster.opportunity_summary));
    outline.push(format!(
        "Checklist: {} steps to take this week",
        cluster.name.to_lowercase()
    ));

    LeadMagnet {
        title: format!("The {} Playbook", cluster.name),
        outline,
        source_cluster: Some(cluster.name.clone()),
    }
}

fn next_steps(
    clusters: &[ThemeCluster],
    underserved_niches: &[NicheScore],
    lead_magnet: &LeadMagnet,
    metadata: &ReportMetadata,
) -> Vec<String> {
    let mut steps = Vec::new();

    for niche in underserved_niches.iter().take(MAX_NICHES_TO_VALIDATE) {
        steps.push(format!(
            "Validate \"{}\" ({}, {:.1}/10): talk to five people who raised this pain",
            niche.query, niche.label, niche.opportunity_score
        ));
    }

    match &lead_magnet.source_cluster {
        Some(name) => steps.push(format!(
            "Publish \"{}\" and share it where the {} complaints were found",
            lead_magnet.title, name
        )),
        None => steps.push(
            "Broaden the queries or widen the window: no themes emerged this period".to_string(),
        ),
    }

    if !clusters.is_empty() && underserved_niches.is_empty() {
        steps.push(
            "Every scored niche is crowded: look for an underserved persona inside the top theme"
                .to_string(),
        );
    }

    if !metadata.warnings.is_empty() {
        steps.push(format!(
            "Re-run once degraded inputs recover ({} warning{} this run)",
            metadata.warnings.len(),
            if metadata.warnings.len() == 1 { "" } else { "s" }
        ));
    }

    steps.push("Record leads, replies and revenue from outreach in the metrics log".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use painscope_core::{DateRange, MarketSize, RunWarning, SolutionComplexity, Urgency};

    use super::*;

    fn cluster(name: &str, urgency: Urgency) -> ThemeCluster {
        ThemeCluster {
            name: name.to_string(),
            pain_points: vec![format!("{name} one"), format!("{name} two")],
            market_size: MarketSize::Medium,
            urgency,
            solution_complexity: SolutionComplexity::Simple,
            target_personas: "Founders".to_string(),
            opportunity_summary: "A gap".to_string(),
        }
    }

    fn niche(query: &str, count: u32) -> NicheScore {
        NicheScore::new(query, count, vec![], 10.0 - f64::from(count) * 1.3)
    }

    fn metadata(warnings: Vec<RunWarning>) -> ReportMetadata {
        let end = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();
        ReportMetadata {
            generated_at: end,
            period: DateRange::last_days(end, 7),
            signal_count: 12,
            sources: vec!["reddit".to_string()],
            warnings,
        }
    }

    #[test]
    fn keeps_every_cluster_and_score_in_order() {
        let clusters = vec![cluster("A", Urgency::Low), cluster("B", Urgency::High)];
        let scores = vec![niche("x", 7), niche("y", 2)];
        let report = render(&clusters, &scores, &metadata(vec![]));
        assert_eq!(report.clusters, clusters);
        assert_eq!(report.niche_scores, scores);
    }

    #[test]
    fn underserved_excludes_crowded_and_sorts_by_score() {
        let scores = vec![niche("mid", 3), niche("crowded", 7), niche("best", 1), niche("tie", 3)];
        let report = render(&[], &scores, &metadata(vec![]));
        let queries: Vec<&str> = report.underserved_niches.iter().map(|n| n.query.as_str()).collect();
        assert_eq!(queries, vec!["best", "mid", "tie"]);
    }

    #[test]
    fn lead_magnet_uses_most_urgent_first_on_tie() {
        let clusters = vec![
            cluster("Low", Urgency::Low),
            cluster("First", Urgency::Critical),
            cluster("Second", Urgency::Critical),
        ];
        let report = render(&clusters, &[], &metadata(vec![]));
        assert_eq!(report.lead_magnet.source_cluster.as_deref(), Some("First"));
        assert_eq!(report.lead_magnet.title, "The First Playbook");
        assert_eq!(report.lead_magnet.outline[0], "The problem in their words: \"First one\"");
    }

    #[test]
    fn generic_lead_magnet_without_clusters() {
        let report = render(&[], &[], &metadata(vec![]));
        assert!(report.lead_magnet.source_cluster.is_none());
        assert!(!report.lead_magnet.outline.is_empty());
        assert!(report.next_steps[0].starts_with("Broaden the queries"));
    }

    #[test]
    fn warnings_add_a_rerun_step() {
        let warning = RunWarning::SourceUnavailable {
            source_id: "hackernews".to_string(),
            query: "crm".to_string(),
            reason: "HTTP 503".to_string(),
        };
        let report = render(&[], &[], &metadata(vec![warning]));
        assert!(report
            .next_steps
            .iter()
            .any(|s| s == "Re-run once degraded inputs recover (1 warning this run)"));
        assert_eq!(report.summary.warnings.len(), 1);
    }
}
