//! Rendering of reviews and statistics to the terminal.

use console::style;

use crate::api::models::{
    HealthCheck, Review, ReviewFeedback, ReviewListResponse, ReviewStatus, StatsResponse,
    StatsSummary, User,
};
use crate::ui::icons::{CHART, COMPLETED, FAILED, HEART, IN_PROGRESS, LOCK, PENDING};

const WRAP_WIDTH: usize = 80;

/// Human label for a 1-10 quality score.
pub fn quality_label(score: u8) -> &'static str {
    match score {
        1 => "Very Poor",
        2 => "Poor",
        3 => "Weak",
        4 => "Below Average",
        5 => "Average",
        6 => "Above Average",
        7 => "Good",
        8 => "Very Good",
        9 => "Excellent",
        10 => "Perfect",
        _ => "Unknown",
    }
}

fn status_icon(status: ReviewStatus) -> console::Emoji<'static, 'static> {
    match status {
        ReviewStatus::Pending => PENDING,
        ReviewStatus::InProgress => IN_PROGRESS,
        ReviewStatus::Completed => COMPLETED,
        ReviewStatus::Failed | ReviewStatus::Unknown => FAILED,
    }
}

fn styled_status(status: ReviewStatus) -> String {
    let label = status.as_str();
    match status {
        ReviewStatus::Pending => style(label).yellow().to_string(),
        ReviewStatus::InProgress => style(label).blue().to_string(),
        ReviewStatus::Completed => style(label).green().to_string(),
        ReviewStatus::Failed | ReviewStatus::Unknown => style(label).red().to_string(),
    }
}

fn styled_score(score: u8) -> String {
    let text = format!("{}/10 ({})", score, quality_label(score));
    match score {
        1..=4 => style(text).red().to_string(),
        5..=6 => style(text).yellow().to_string(),
        _ => style(text).green().to_string(),
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", style(title).bold());
    for item in items {
        let wrapped = textwrap::fill(
            item,
            textwrap::Options::new(WRAP_WIDTH)
                .initial_indent("  • ")
                .subsequent_indent("    "),
        );
        println!("{}", wrapped);
    }
}

/// Full single-review view.
pub fn print_review(review: &Review) {
    println!(
        "{}{} {}",
        status_icon(review.status),
        style(&review.id).bold(),
        styled_status(review.status)
    );
    println!("  Language:  {}", review.language.label());
    if let Some(desc) = review.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  About:     {}", desc);
    }
    println!("  Submitted: {}", review.created_at);
    if let Some(completed) = &review.completed_at {
        println!("  Completed: {}", completed);
    }
    if let Some(secs) = review.processing_time {
        println!("  Took:      {:.1}s", secs);
    }
    if review.has_error() {
        println!(
            "\n{} {}",
            style("Error:").red().bold(),
            review.error_message.as_deref().unwrap_or_default()
        );
    }
    if let Some(feedback) = &review.feedback {
        print_feedback(feedback);
    }
}

pub fn print_feedback(feedback: &ReviewFeedback) {
    println!(
        "\n{} {}",
        style("Quality:").bold(),
        styled_score(feedback.quality_score)
    );
    print_list("Issues", &feedback.issues);
    print_list("Suggestions", &feedback.suggestions);
    print_list("Security concerns", &feedback.security_concerns);
    print_list(
        "Performance recommendations",
        &feedback.performance_recommendations,
    );
    print_list("What's good", &feedback.positive_aspects);
}

/// One-line-per-review history table.
pub fn print_review_list(page: &ReviewListResponse) {
    if page.reviews.is_empty() {
        println!("No reviews found.");
        return;
    }
    println!(
        "{:<26} {:<12} {:<12} {:<6} {}",
        style("ID").bold(),
        style("LANGUAGE").bold(),
        style("STATUS").bold(),
        style("SCORE").bold(),
        style("SUBMITTED").bold()
    );
    for review in &page.reviews {
        let score = review
            .feedback
            .as_ref()
            .map(|f| format!("{}/10", f.quality_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26} {:<12} {:<12} {:<6} {}",
            review.id,
            review.language.as_str(),
            styled_status(review.status),
            score,
            review.created_at
        );
    }
    println!(
        "\nPage {} of {} ({} total)",
        page.page, page.total_pages, page.total
    );
}

/// Full statistics view.
pub fn print_stats(stats: &StatsResponse) {
    println!("{}{}", CHART, style("Review statistics").bold());
    println!("  Total reviews:    {}", stats.total_reviews);
    println!("  Completed:        {}", stats.total_completed);
    println!("  Failed:           {}", stats.total_failed);
    println!("  Average score:    {:.1}/10", stats.average_quality_score);
    println!("  Average duration: {:.1}s", stats.average_processing_time);

    if !stats.language_stats.is_empty() {
        println!("\n{}", style("By language").bold());
        for lang in &stats.language_stats {
            println!(
                "  {:<12} {:>5} reviews, avg {:.1}/10",
                lang.language, lang.count, lang.average_score
            );
        }
    }
    if !stats.common_issues.is_empty() {
        println!("\n{}", style("Common issues").bold());
        for issue in stats.common_issues.iter().take(10) {
            println!("  {:>4}x {}", issue.count, issue.issue);
        }
    }
    if !stats.daily_stats.is_empty() {
        println!("\n{}", style("Recent activity").bold());
        for day in stats.daily_stats.iter().rev().take(7).rev() {
            println!(
                "  {}  {:>4} reviews, avg {:.1}/10",
                day.date, day.count, day.average_score
            );
        }
    }
}

/// Condensed dashboard summary.
pub fn print_stats_summary(summary: &StatsSummary) {
    println!("{}{}", CHART, style("Summary").bold());
    println!("  Total reviews: {}", summary.total_reviews);
    println!("  Completed:     {}", summary.total_completed);
    println!("  Success rate:  {:.1}%", summary.success_rate);
    println!("  Average score: {:.1}/10", summary.average_score);
    println!("  Top language:  {}", summary.top_language);
    println!("  Common issue:  {}", summary.most_common_issue);
}

pub fn print_health(health: &HealthCheck) {
    let (icon, status) = if health.is_healthy() {
        (HEART, style(health.status.as_str()).green())
    } else {
        (FAILED, style(health.status.as_str()).red())
    };
    println!("{}Service is {}", icon, status);
    println!("  Version:     {}", health.version);
    println!("  Environment: {}", health.environment);
    println!("  MongoDB:     {}", health.services.mongodb);
    println!("  OpenAI:      {}", health.services.openai_configured);
    println!("  Checked at:  {}", health.timestamp);
}

pub fn print_user(user: &User) {
    println!("{}Logged in as {}", LOCK, style(&user.name).bold());
    println!("  Email:  {}", user.email);
    println!("  Since:  {}", user.created_at);
}
