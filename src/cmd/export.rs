//! Review history CSV export — `revq export`.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::{Duration, Local, NaiveDate};

use revq::api::models::{ExportFilters, ProgrammingLanguage};

use super::Ctx;
use super::stats::write_export;

/// Exports default to the trailing 30 days when no range is given.
const DEFAULT_RANGE_DAYS: i64 = 30;

pub async fn cmd_export(
    ctx: &Ctx,
    output: Option<&Path>,
    start: Option<String>,
    end: Option<String>,
    languages: Vec<ProgrammingLanguage>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let end_date = match end {
        Some(raw) => parse_date(&raw)?,
        None => today,
    };
    let start_date = match start {
        Some(raw) => parse_date(&raw)?,
        None => end_date - Duration::days(DEFAULT_RANGE_DAYS),
    };
    if start_date > end_date {
        bail!("Start date {} is after end date {}", start_date, end_date);
    }

    let filters = ExportFilters {
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        languages,
        min_score: 1,
        max_score: 10,
    };
    let bytes = ctx.client.export_reviews_csv(&filters).await?;

    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(format!("reviews_{}_{}.csv", start_date, end_date)),
    };
    write_export(&path, &bytes)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{}'. Expected YYYY-MM-DD.", raw))
}
