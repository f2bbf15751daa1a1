//! Deterministic keyword-frequency summarizer.
//!
//! Texts are first assigned to a fixed category lexicon by keyword hits.
//! Texts that match no category are grouped by their most widely shared
//! salient term; such a group only becomes a cluster when at least two texts
//! share it. All ordering decisions use sorted maps so identical input
//! always yields identical clusters.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use painscope_core::{MarketSize, SolutionComplexity, ThemeCluster, Urgency};

use crate::error::ExtractError;
use crate::lexicon::{categorize, is_salient, is_urgent, tokenize, CATEGORIES, PERSONA_WORDS};
use crate::summarizer::Summarizer;

const MAX_PAIN_POINTS: usize = 5;
const PAIN_POINT_CHARS: usize = 160;
const SUMMARY_TERMS: usize = 3;
const FALLBACK_PERSONAS: &str = "Small-business operators";

/// Keyword-frequency clustering with no external dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSummarizer;

impl HeuristicSummarizer {
    pub const NAME: &'static str = "heuristic";

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Cluster `texts` synchronously.
    #[must_use]
    pub fn cluster(&self, texts: &[String]) -> Vec<ThemeCluster> {
        let docs: Vec<(&str, Vec<String>)> = texts
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| (t, tokenize(t)))
            .collect();

        let mut by_category: Vec<Vec<usize>> = vec![Vec::new(); CATEGORIES.len()];
        let mut unmatched = Vec::new();
        for (index, (_, tokens)) in docs.iter().enumerate() {
            match categorize(tokens) {
                Some(category) => by_category[category].push(index),
                None => unmatched.push(index),
            }
        }

        let mut groups: Vec<Group> = by_category
            .into_iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(category, members)| Group {
                name: CATEGORIES[category].name.to_string(),
                complexity: CATEGORIES[category].complexity,
                default_personas: CATEGORIES[category].personas,
                members,
            })
            .collect();

        groups.extend(group_by_shared_term(&docs, &unmatched));

        let mut clusters: Vec<(usize, ThemeCluster)> = groups
            .into_iter()
            .map(|group| (group.members.len(), build_cluster(&docs, group)))
            .collect();
        clusters.sort_by(|(a_len, a), (b_len, b)| b_len.cmp(a_len).then_with(|| a.name.cmp(&b.name)));

        tracing::debug!(
            texts = docs.len(),
            clusters = clusters.len(),
            uncategorized = unmatched.len(),
            "heuristic clustering finished"
        );

        clusters.into_iter().map(|(_, cluster)| cluster).collect()
    }
}

#[async_trait]
impl Summarizer for HeuristicSummarizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn summarize(&self, texts: &[String]) -> Result<Vec<ThemeCluster>, ExtractError> {
        Ok(self.cluster(texts))
    }
}

struct Group {
    name: String,
    complexity: SolutionComplexity,
    default_personas: &'static str,
    members: Vec<usize>,
}

fn salient_terms(tokens: &[String]) -> BTreeSet<&str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| is_salient(t))
        .collect()
}

/// Group uncategorized texts by the salient term the most texts share.
fn group_by_shared_term(docs: &[(&str, Vec<String>)], unmatched: &[usize]) -> Vec<Group> {
    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for &index in unmatched {
        for term in salient_terms(&docs[index].1) {
            *doc_freq.entry(term).or_default() += 1;
        }
    }

    let mut by_term: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &index in unmatched {
        let best = salient_terms(&docs[index].1)
            .into_iter()
            .filter(|term| doc_freq.get(term).copied().unwrap_or(0) >= 2)
            // Highest document frequency, alphabetical on ties.
            .max_by(|a, b| doc_freq[a].cmp(&doc_freq[b]).then_with(|| b.cmp(a)));
        if let Some(term) = best {
            by_term.entry(term).or_default().push(index);
        }
    }

    by_term
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(term, members)| Group {
            name: format!("{} Pain Points", title_case(term)),
            complexity: SolutionComplexity::Moderate,
            default_personas: FALLBACK_PERSONAS,
            members,
        })
        .collect()
}

fn build_cluster(docs: &[(&str, Vec<String>)], group: Group) -> ThemeCluster {
    let count = group.members.len();

    let mut seen = BTreeSet::new();
    let pain_points: Vec<String> = group
        .members
        .iter()
        .map(|&i| docs[i].0)
        .filter(|text| seen.insert(text.to_lowercase()))
        .take(MAX_PAIN_POINTS)
        .map(|text| truncate(text, PAIN_POINT_CHARS))
        .collect();

    let urgent = group
        .members
        .iter()
        .filter(|&&i| is_urgent(&docs[i].1))
        .count();

    let mut personas: Vec<&str> = Vec::new();
    for &(word, label) in PERSONA_WORDS {
        let mentioned = group
            .members
            .iter()
            .any(|&i| docs[i].1.iter().any(|t| t == word));
        if mentioned && !personas.contains(&label) {
            personas.push(label);
        }
    }
    let target_personas = if personas.is_empty() {
        group.default_personas.to_string()
    } else {
        personas.join(", ")
    };

    let mut term_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in &group.members {
        for term in salient_terms(&docs[i].1) {
            *term_freq.entry(term).or_default() += 1;
        }
    }
    let mut terms: Vec<(&str, usize)> = term_freq.into_iter().collect();
    terms.sort_by(|(a, a_n), (b, b_n)| b_n.cmp(a_n).then_with(|| a.cmp(b)));
    let top_terms: Vec<&str> = terms.into_iter().take(SUMMARY_TERMS).map(|(t, _)| t).collect();

    let noun = if count == 1 { "signal describes" } else { "signals describe" };
    let mut opportunity_summary = format!("{count} {noun} {} pain", group.name.to_lowercase());
    if !top_terms.is_empty() {
        opportunity_summary.push_str(", most often mentioning ");
        opportunity_summary.push_str(&top_terms.join(", "));
    }
    opportunity_summary.push('.');

    ThemeCluster {
        name: group.name,
        pain_points,
        market_size: market_size(count),
        urgency: urgency(urgent, count),
        solution_complexity: group.complexity,
        target_personas,
        opportunity_summary,
    }
}

fn market_size(count: usize) -> MarketSize {
    match count {
        20.. => MarketSize::Massive,
        10..=19 => MarketSize::Large,
        4..=9 => MarketSize::Medium,
        _ => MarketSize::Small,
    }
}

/// Band the share of urgent texts: 75 %+ critical, 50 %+ high, 25 %+ medium.
fn urgency(urgent: usize, total: usize) -> Urgency {
    if total == 0 || urgent == 0 {
        Urgency::Low
    } else if urgent * 4 >= total * 3 {
        Urgency::Critical
    } else if urgent * 2 >= total {
        Urgency::High
    } else if urgent * 4 >= total {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        assert!(HeuristicSummarizer::new().cluster(&[]).is_empty());
        assert!(HeuristicSummarizer::new().cluster(&texts(&["   "])).is_empty());
    }

    #[test]
    fn groups_by_category_and_orders_by_size() {
        let input = texts(&[
            "Chasing overdue invoices every month is a nightmare",
            "Our calendar booking page double-books appointments",
            "Clients ignore payment reminders on invoices",
            "Refund requests eat our whole billing afternoon",
        ]);
        let clusters = HeuristicSummarizer::new().cluster(&input);
        let names: Vec<&str> = clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Billing & Invoicing", "Scheduling & Booking"]);
        assert_eq!(clusters[0].pain_points.len(), 3);
        assert_eq!(clusters[0].solution_complexity, SolutionComplexity::Moderate);
        assert_eq!(clusters[1].pain_points.len(), 1);
    }

    #[test]
    fn single_theme_is_not_padded() {
        let input = texts(&["Invoices are late", "Billing is slow"]);
        let clusters = HeuristicSummarizer::new().cluster(&input);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let input = texts(&[
            "Payroll errors every cycle",
            "Need better dashboards for KPIs",
            "Pricing pages confuse customers",
            "Pricing changes break quotes",
        ]);
        let a = HeuristicSummarizer::new().cluster(&input);
        let b = HeuristicSummarizer::new().cluster(&input);
        assert_eq!(a, b);
    }

    #[test]
    fn uncategorized_texts_group_on_shared_term() {
        let input = texts(&[
            "Pricing pages confuse customers",
            "Pricing changes break quotes",
            "Weather is nice",
        ]);
        let clusters = HeuristicSummarizer::new().cluster(&input);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "Pricing Pain Points");
        assert_eq!(clusters[0].pain_points.len(), 2);
    }

    #[test]
    fn duplicate_texts_collapse_in_pain_points() {
        let input = texts(&["Invoices are late", "invoices are late", "Billing is slow"]);
        let clusters = HeuristicSummarizer::new().cluster(&input);
        assert_eq!(clusters[0].pain_points, vec!["Invoices are late", "Billing is slow"]);
        assert!(clusters[0].opportunity_summary.starts_with("3 signals describe"));
    }

    #[test]
    fn personas_detected_from_text() {
        let input = texts(&["As a freelancer my invoices go unpaid", "Agencies hate billing"]);
        let clusters = HeuristicSummarizer::new().cluster(&input);
        assert_eq!(clusters[0].target_personas, "Freelancers, Agencies");
    }

    #[test]
    fn urgency_bands() {
        assert_eq!(urgency(0, 4), Urgency::Low);
        assert_eq!(urgency(1, 4), Urgency::Medium);
        assert_eq!(urgency(2, 4), Urgency::High);
        assert_eq!(urgency(3, 4), Urgency::Critical);
        assert_eq!(urgency(1, 5), Urgency::Low);
    }

    #[test]
    fn market_size_bands() {
        assert_eq!(market_size(1), MarketSize::Small);
        assert_eq!(market_size(4), MarketSize::Medium);
        assert_eq!(market_size(10), MarketSize::Large);
        assert_eq!(market_size(25), MarketSize::Massive);
    }

    #[test]
    fn long_pain_points_are_truncated() {
        let long = format!("invoice {}", "x".repeat(400));
        let clusters = HeuristicSummarizer::new().cluster(&[long]);
        assert_eq!(clusters[0].pain_points[0].chars().count(), PAIN_POINT_CHARS + 1);
    }
}
