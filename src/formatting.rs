use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::guardrail::risk::RiskLevel;
use crate::kb::types::{KnowledgeStats, RetrievalHit};
use crate::verify::types::{FactCheckReport, RagResponse};

pub fn format_hits(hits: &[RetrievalHit]) -> String {
    if hits.is_empty() {
        return "No results found".to_string();
    }

    let mut output = String::new();

    for hit in hits {
        output.push_str(&"━".repeat(60));
        output.push('\n');

        output.push_str(&hit.metadata.source.blue().bold().to_string());
        output.push('\n');
        output.push_str(
            &format!("{} · chunk {}", hit.collection, hit.metadata.chunk_index)
                .bright_black()
                .to_string(),
        );
        output.push('\n');

        // Content preview (first 200 chars)
        let content = if hit.content.chars().count() > 200 {
            format!("{}...", truncate_chars(&hit.content, 200))
        } else {
            hit.content.clone()
        };
        output.push_str(&content);
        output.push('\n');

        let score_pct = (hit.similarity * 100.0) as u32;
        output.push_str(&format!("{}% relevant", score_pct).green().to_string());
        output.push_str("\n\n");
    }

    output
}

pub fn format_report(report: &FactCheckReport) -> String {
    let mut output = String::new();

    output.push_str(&"Fact-Check Report".bold().to_string());
    output.push('\n');

    let verdict = if report.verified {
        "verified".green().to_string()
    } else {
        "not verified".red().to_string()
    };
    output.push_str(&format!(
        "Verdict: {} (confidence {:.0}%)",
        verdict,
        report.confidence * 100.0
    ));
    output.push('\n');
    output.push_str(&format!("Risk level: {}", format_risk(report.risk_level)));
    output.push('\n');

    if !report.sources.is_empty() {
        output.push_str("Sources:\n");
        for source in &report.sources {
            output.push_str(&format!(
                "  {} ({:.0}%): {}\n",
                source.source.blue(),
                source.similarity * 100.0,
                source.content_preview
            ));
        }
    }

    for warning in &report.warnings {
        output.push_str(&warning.yellow().to_string());
        output.push('\n');
    }

    for disclaimer in &report.disclaimers {
        output.push_str(disclaimer);
        output.push('\n');
    }

    if let Some(nlu) = &report.nlu_analysis {
        let status = if nlu.analysis_successful {
            format!(
                "NLU enrichment: {} concepts, {} keywords",
                nlu.concepts.len(),
                nlu.keywords.len()
            )
        } else {
            format!(
                "NLU enrichment failed: {}",
                nlu.error.as_deref().unwrap_or("unknown error")
            )
        };
        output.push_str(&status.bright_black().to_string());
        output.push('\n');
    }

    output
}

pub fn format_rag_response(response: &RagResponse) -> String {
    let mut output = String::new();

    output.push_str(&response.response);
    output.push_str("\n\n");
    output.push_str(&format_report(&response.fact_check));

    if !response.context_used {
        output.push_str(&"Answered without knowledge base context".yellow().to_string());
        output.push('\n');
    }

    output
}

pub fn format_stats(stats: &KnowledgeStats) -> String {
    let mut output = String::new();

    output.push_str(&"Knowledge Base Statistics".bold().to_string());
    output.push('\n');
    output.push_str(&format!("Backend: {}", stats.backend));
    output.push('\n');
    output.push_str(&format!("Total Documents: {}", stats.total_documents));
    output.push('\n');
    output.push_str(&format!("Total Chunks: {}", stats.total_chunks));
    output.push('\n');

    for (collection, count) in &stats.collections {
        output.push_str(&format!("  {}: {} chunks", collection, count));
        output.push('\n');
    }

    if let Some(newest) = stats.newest_ingested {
        output.push_str(&format!("Newest Ingested: {}", format_relative_time(newest)));
        output.push('\n');
    }

    output
}

fn format_risk(level: RiskLevel) -> String {
    match level {
        RiskLevel::Low => level.to_string().green().to_string(),
        RiskLevel::Medium => level.to_string().yellow().to_string(),
        RiskLevel::High | RiskLevel::Critical => level.to_string().red().bold().to_string(),
        RiskLevel::Unknown => level.to_string().bright_black().to_string(),
    }
}

fn format_relative_time(dt: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{} days ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
