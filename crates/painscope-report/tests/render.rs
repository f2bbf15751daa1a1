//! End-to-end rendering properties and the file writer.

use std::path::Path;

use chrono::{TimeZone, Utc};
use painscope_core::{
    DateRange, MarketSize, NicheScore, SolutionComplexity, ThemeCluster, Urgency,
};
use painscope_report::{
    default_output_path, render, write_report, Report, ReportFormat, ReportMetadata,
};

fn metadata() -> ReportMetadata {
    let end = Utc.with_ymd_and_hms(2025, 3, 8, 6, 30, 0).unwrap();
    ReportMetadata {
        generated_at: end,
        period: DateRange::last_days(end, 7),
        signal_count: 0,
        sources: vec![],
        warnings: vec![],
    }
}

fn cluster(name: &str, urgency: Urgency) -> ThemeCluster {
    ThemeCluster {
        name: name.to_string(),
        pain_points: vec![format!("{name} is painful")],
        market_size: MarketSize::Small,
        urgency,
        solution_complexity: SolutionComplexity::Simple,
        target_personas: "Founders".to_string(),
        opportunity_summary: "Room for a focused tool.".to_string(),
    }
}

#[test]
fn rendering_is_byte_identical_for_identical_input() {
    let clusters = vec![cluster("Scheduling", Urgency::High), cluster("Billing", Urgency::Low)];
    let scores = vec![
        NicheScore::new("scheduling software", 2, vec!["calendly.com".into()], 7.4),
        NicheScore::new("billing software", 6, vec![], 2.2),
    ];
    let meta = metadata();

    let first = render(&clusters, &scores, &meta);
    let second = render(&clusters, &scores, &meta);

    assert_eq!(first.to_markdown(), second.to_markdown());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn empty_run_still_renders_every_section_with_markers() {
    let report = render(&[], &[], &metadata());
    let md = report.to_markdown();

    assert!(md.contains("## Themes\n\n_No themes found for this period._"));
    assert!(md.contains("## Underserved Niches\n\n_No niches scored._"));
    assert!(md.contains("## Saturation Check\n\n_No niches scored._"));
    assert!(md.contains("## Lead Magnet"));
    assert!(md.contains("## Next Steps\n\n1. "));
    assert!(md.contains("- **Sources:** none"));
}

#[tokio::test]
async fn writes_markdown_and_json_files() {
    let dir = std::env::temp_dir().join(format!("painscope-report-{}", uuid::Uuid::new_v4()));
    let meta = metadata();
    let report = render(&[cluster("Payroll", Urgency::Critical)], &[], &meta);

    let md_path = default_output_path(&dir, meta.period.end, ReportFormat::Markdown);
    assert!(md_path.ends_with(Path::new("pain-points-2025-03-08.md")));
    let written_path = write_report(&report, &md_path, ReportFormat::Markdown).await.unwrap();
    assert_eq!(written_path, md_path);
    let written = std::fs::read_to_string(&md_path).unwrap();
    assert_eq!(written, report.to_markdown());

    let json_path = default_output_path(&dir, meta.period.end, ReportFormat::Json);
    write_report(&report, &json_path, ReportFormat::Json).await.unwrap();
    let parsed: Report = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed, report);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn second_report_on_the_same_day_keeps_the_first() {
    let dir = std::env::temp_dir().join(format!("painscope-report-{}", uuid::Uuid::new_v4()));

    let morning = metadata();
    let mut evening = metadata();
    evening.generated_at = Utc.with_ymd_and_hms(2025, 3, 8, 20, 0, 0).unwrap();
    evening.period = DateRange::last_days(evening.generated_at, 7);
    evening.signal_count = 22;

    let first = render(&[cluster("Payroll", Urgency::Critical)], &[], &morning);
    let second = render(&[cluster("Invoicing", Urgency::High)], &[], &evening);

    let first_path = default_output_path(&dir, morning.period.end, ReportFormat::Markdown);
    let second_default = default_output_path(&dir, evening.period.end, ReportFormat::Markdown);
    assert_eq!(first_path, second_default);

    let first_written = write_report(&first, &first_path, ReportFormat::Markdown).await.unwrap();
    let before = std::fs::read(&first_written).unwrap();
    let second_written = write_report(&second, &second_default, ReportFormat::Markdown)
        .await
        .unwrap();

    assert_ne!(first_written, second_written);
    assert!(second_written.ends_with(Path::new("pain-points-2025-03-08-1.md")));
    assert_eq!(std::fs::read(&first_written).unwrap(), before);
    assert_eq!(
        std::fs::read_to_string(&second_written).unwrap(),
        second.to_markdown()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn format_parses_from_cli_strings() {
    assert_eq!("markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
    assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
    assert!("pdf".parse::<ReportFormat>().is_err());
}
