//! Command-line interface for casefuse.
//!
//! Provides commands for analysing a case, printing its timeline only,
//! and showing the resolved configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use crate::adapters::HeuristicModels;
use crate::config;
use crate::core::CaseAnalyzer;
use crate::domain::{CaseAnalysis, EvidenceRecord, Severity};
use crate::ingest::DocumentExtractor;

/// casefuse - Evidence fusion: timelines, conflicts and missing evidence
#[derive(Parser, Debug)]
#[command(name = "casefuse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Evidence sources shared by `analyze` and `timeline`
#[derive(clap::Args, Debug, Default)]
pub struct EvidenceArgs {
    /// Evidence record files (JSON array, single JSON object, or JSONL)
    pub records: Vec<PathBuf>,

    /// Plain-text documents to extract into records
    #[arg(short, long)]
    pub document: Vec<PathBuf>,

    /// Image files to add as records (no capture time)
    #[arg(short, long)]
    pub image: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a case: timeline, conflicts and recommendations
    Analyze {
        #[command(flatten)]
        evidence: EvidenceArgs,

        /// Case ID (generated if not provided)
        #[arg(long)]
        case_id: Option<String>,

        /// Case type, e.g. robbery or assault
        #[arg(long)]
        case_type: Option<String>,

        /// Never call the reasoning oracle
        #[arg(long)]
        no_oracle: bool,

        /// Write the analysis JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the merged timeline only
    Timeline {
        #[command(flatten)]
        evidence: EvidenceArgs,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze {
                evidence,
                case_id,
                case_type,
                no_oracle,
                output,
            } => analyze_case(evidence, case_id, case_type, no_oracle, output).await,
            Commands::Timeline { evidence } => print_timeline(evidence).await,
            Commands::Config => show_config(),
        }
    }
}

/// Parse evidence records from file content.
///
/// `.jsonl` files hold one record per line; anything else is a JSON array
/// or a single record.
pub fn parse_records(content: &str, jsonl: bool) -> Result<Vec<EvidenceRecord>> {
    if jsonl {
        return content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Invalid evidence record on line {}", n + 1))
            })
            .collect();
    }

    if content.trim_start().starts_with('[') {
        serde_json::from_str(content).context("Invalid evidence record array")
    } else {
        let record = serde_json::from_str(content).context("Invalid evidence record")?;
        Ok(vec![record])
    }
}

async fn load_record_file(path: &Path) -> Result<Vec<EvidenceRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read records: {}", path.display()))?;
    let jsonl = path.extension().is_some_and(|ext| ext == "jsonl");
    parse_records(&content, jsonl).with_context(|| format!("In {}", path.display()))
}

/// Collect every record named on the command line, in argument order
async fn collect_records(args: &EvidenceArgs) -> Result<Vec<EvidenceRecord>> {
    let mut records = Vec::new();
    for path in &args.records {
        records.extend(load_record_file(path).await?);
    }

    let extractor = DocumentExtractor::new(Arc::new(HeuristicModels::new()));
    for path in &args.document {
        records.push(extractor.load_document(path).await?.into());
    }
    for path in &args.image {
        records.push(extractor.load_image(path).await?.into());
    }

    info!(count = records.len(), "Loaded evidence records");
    Ok(records)
}

async fn analyze_case(
    evidence: EvidenceArgs,
    case_id: Option<String>,
    case_type: Option<String>,
    no_oracle: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::config()?;
    let records = collect_records(&evidence).await?;

    let oracle = if no_oracle { None } else { cfg.oracle() };
    if oracle.is_none() {
        info!("Reasoning oracle not configured, using heuristics only");
    }

    let analyzer = CaseAnalyzer::new(oracle).with_limits(cfg.limits.clone());
    let case_id = case_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let case_type = case_type.unwrap_or_else(|| cfg.case_type.clone());

    let analysis = analyzer
        .analyze(&case_id, &case_type, &records)
        .await
        .with_context(|| format!("Case {} failed", case_id))?;

    let json = serde_json::to_string_pretty(&analysis).context("Failed to serialize analysis")?;
    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_summary(&analysis);
            eprintln!("   Output: {}", path.display());
        }
        None => {
            println!("{}", json);
            print_summary(&analysis);
        }
    }

    Ok(())
}

fn print_summary(analysis: &CaseAnalysis) {
    eprintln!("\n[Case {} analysed]", analysis.case_id);
    eprintln!("   Events:          {}", analysis.timeline.len());
    eprintln!(
        "   Conflicts:       {} ({} critical)",
        analysis.conflicts.len(),
        analysis.count_by_severity(Severity::Critical)
    );
    eprintln!("   Recommendations: {}", analysis.recommendations.len());
}

async fn print_timeline(evidence: EvidenceArgs) -> Result<()> {
    let cfg = config::config()?;
    let records = collect_records(&evidence).await?;

    let analyzer = CaseAnalyzer::new(None).with_limits(cfg.limits.clone());
    let (_, events) = analyzer.timeline(&records)?;

    if events.is_empty() {
        println!("No events");
        return Ok(());
    }

    println!("{:<21} {:<12} DESCRIPTION", "TIMESTAMP", "SOURCE");
    println!("{}", "-".repeat(75));
    for event in &events {
        println!(
            "{:<21} {:<12} {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.source,
            event.description
        );
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("casefuse configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Oracle:");
    println!("  Enabled:   {}", cfg.oracle.enabled);
    println!("  Available: {}", cfg.oracle.is_available());
    println!("  Model:     {}", cfg.oracle.model);
    println!("  Base URL:  {}", cfg.oracle.base_url);
    println!();
    println!("Analysis:");
    println!("  Default case type: {}", cfg.case_type);
    println!("  Max records:       {}", cfg.limits.max_records);
    println!("  Max text size:     {} bytes", cfg.limits.max_text_bytes);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = r#"{"kind": "image", "timestamp": "2024-01-05T20:12:00",
        "location": "MG Road", "classification": {"label": "cctv", "confidence": 0.9}}"#;

    #[test]
    fn test_parse_single_and_array() {
        assert_eq!(parse_records(IMAGE, false).unwrap().len(), 1);
        let array = format!("[{}, {}]", IMAGE, IMAGE);
        assert_eq!(parse_records(&array, false).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_jsonl_reports_line() {
        let line = IMAGE.replace('\n', " ");
        let content = format!("{}\n\n{}\n", line, line);
        assert_eq!(parse_records(&content, true).unwrap().len(), 2);

        let bad = format!("{}\n{{\"kind\": \"video\"}}\n", line);
        let err = parse_records(&bad, true).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "casefuse",
            "analyze",
            "case.json",
            "--document",
            "witness.txt",
            "--case-type",
            "robbery",
            "--no-oracle",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                evidence,
                case_type,
                no_oracle,
                ..
            } => {
                assert_eq!(evidence.records, vec![PathBuf::from("case.json")]);
                assert_eq!(evidence.document, vec![PathBuf::from("witness.txt")]);
                assert_eq!(case_type.as_deref(), Some("robbery"));
                assert!(no_oracle);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
