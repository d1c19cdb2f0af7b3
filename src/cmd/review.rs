//! Review lifecycle commands — submit, show, watch, list, delete.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::Confirm;

use revq::api::models::{
    CodeSubmission, ProgrammingLanguage, ReviewFilters, ReviewStatus,
};
use revq::errors::PollError;
use revq::ui::render;
use revq::ui::watch::WatchUI;

use super::Ctx;

pub async fn cmd_submit(
    ctx: &Ctx,
    file: Option<&Path>,
    language: Option<ProgrammingLanguage>,
    description: Option<String>,
    watch: bool,
) -> Result<()> {
    let code = read_code(file)?;
    let language = resolve_language(language, file)?;

    let submission = CodeSubmission {
        code,
        language,
        description,
    };
    let response = ctx.client.submit_review(&submission).await?;
    println!(
        "Submitted review {} ({})",
        style(&response.id).bold(),
        response.status.as_str()
    );

    if watch {
        watch_review(ctx, &response.id).await?;
    } else {
        println!("Run `revq watch {}` to follow progress.", response.id);
    }
    Ok(())
}

fn read_code(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read code from stdin")?;
            Ok(code)
        }
    }
}

fn resolve_language(
    language: Option<ProgrammingLanguage>,
    file: Option<&Path>,
) -> Result<ProgrammingLanguage> {
    if let Some(language) = language {
        return Ok(language);
    }
    if let Some(ext) = file.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        if let Some(inferred) = ProgrammingLanguage::from_extension(ext) {
            tracing::debug!(language = inferred.as_str(), "inferred language from extension");
            return Ok(inferred);
        }
    }
    bail!("Could not infer the language. Pass one with --language.")
}

pub async fn cmd_show(ctx: &Ctx, id: &str) -> Result<()> {
    let review = ctx.client.get_review(id).await?;
    render::print_review(&review);
    Ok(())
}

pub async fn cmd_watch(ctx: &Ctx, id: &str) -> Result<()> {
    watch_review(ctx, id).await
}

/// Drive the polling session with a live spinner, then print the outcome.
async fn watch_review(ctx: &Ctx, id: &str) -> Result<()> {
    let ui = WatchUI::new(id);
    let result = ctx.session.run(id, |review| ui.update(review)).await;
    match result {
        Ok(review) => {
            ui.clear();
            render::print_review(&review);
            if review.status == ReviewStatus::Failed || review.has_error() {
                bail!("Review failed");
            }
            Ok(())
        }
        Err(PollError::AttemptsExhausted { attempts }) => {
            ui.finish_failed("Gave up waiting for the review.");
            bail!(
                "The review is still running after {} checks. Try `revq show {}` later.",
                attempts,
                id
            )
        }
        Err(PollError::DeadlineExceeded { .. }) => {
            ui.finish_failed("Gave up waiting for the review.");
            bail!("Watch time budget exhausted. Try `revq show {}` later.", id)
        }
        Err(err) => {
            ui.finish_failed("Watch aborted.");
            Err(err.into())
        }
    }
}

pub async fn cmd_list(
    ctx: &Ctx,
    page: u32,
    per_page: u32,
    language: Option<ProgrammingLanguage>,
    status: Option<&str>,
) -> Result<()> {
    let status = match status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    let filters = ReviewFilters {
        page: Some(page),
        per_page: Some(per_page),
        language,
        status,
        ..Default::default()
    };
    let listing = ctx.client.list_reviews(&filters).await?;
    render::print_review_list(&listing);
    Ok(())
}

fn parse_status(s: &str) -> Result<ReviewStatus> {
    match s {
        "pending" => Ok(ReviewStatus::Pending),
        "in_progress" => Ok(ReviewStatus::InProgress),
        "completed" => Ok(ReviewStatus::Completed),
        "failed" => Ok(ReviewStatus::Failed),
        other => bail!(
            "Invalid status '{}'. Valid values: pending, in_progress, completed, failed",
            other
        ),
    }
}

pub async fn cmd_delete(ctx: &Ctx, id: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete review {}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }
    ctx.client.delete_review(id).await?;
    println!("Review deleted successfully!");
    Ok(())
}
