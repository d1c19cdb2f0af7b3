//! Statistics commands — `revq stats`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use console::style;

use revq::ui::icons::DISK;
use revq::ui::render;

use super::Ctx;
use crate::StatsCommands;

pub async fn cmd_stats(ctx: &Ctx, command: Option<StatsCommands>) -> Result<()> {
    match command {
        None => {
            let stats = ctx.client.get_statistics().await?;
            render::print_stats(&stats);
        }
        Some(StatsCommands::Summary) => {
            let summary = ctx.client.stats_summary().await?;
            render::print_stats_summary(&summary);
        }
        Some(StatsCommands::Languages) => {
            let breakdown = ctx.client.language_stats().await?;
            if breakdown.language_stats.is_empty() {
                println!("No completed reviews yet.");
                return Ok(());
            }
            println!("{}", style("By language").bold());
            for lang in &breakdown.language_stats {
                println!(
                    "  {:<12} {:>5} reviews, avg {:.1}/10",
                    lang.language, lang.count, lang.average_score
                );
            }
        }
        Some(StatsCommands::Trends) => {
            let trends = ctx.client.trends().await?;
            if trends.daily_stats.is_empty() {
                println!("No activity recorded yet.");
                return Ok(());
            }
            println!("{}", style("Daily activity").bold());
            for day in &trends.daily_stats {
                println!(
                    "  {}  {:>4} reviews, avg {:.1}/10",
                    day.date, day.count, day.average_score
                );
            }
            if !trends.score_distribution.is_empty() {
                println!("\n{}", style("Score distribution").bold());
                let mut scores: Vec<_> = trends.score_distribution.iter().collect();
                scores.sort_by_key(|(score, _)| score.parse::<u8>().unwrap_or(0));
                for (score, count) in scores {
                    println!("  {:>2}/10: {}", score, count);
                }
            }
        }
        Some(StatsCommands::Issues) => {
            let issues = ctx.client.common_issues().await?;
            if issues.common_issues.is_empty() {
                println!("No issues reported yet.");
                return Ok(());
            }
            println!("{}", style("Common issues").bold());
            for issue in &issues.common_issues {
                println!("  {:>4}x {}", issue.count, issue.issue);
            }
        }
        Some(StatsCommands::Export { output }) => {
            let bytes = ctx.client.export_stats_csv().await?;
            let path = output.unwrap_or_else(default_stats_filename);
            write_export(&path, &bytes)?;
        }
    }
    Ok(())
}

fn default_stats_filename() -> PathBuf {
    PathBuf::from(format!(
        "statistics_{}.csv",
        Local::now().format("%Y-%m-%d")
    ))
}

pub(crate) fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}Saved {} bytes to {}", DISK, bytes.len(), path.display());
    Ok(())
}
