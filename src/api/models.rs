//! Wire types for the review service's JSON contract.
//!
//! The contract is owned by the remote service; these types are read-only
//! snapshots on the client side. Timestamps are kept as the ISO strings the
//! service sends rather than parsed datetimes, since the service emits naive
//! timestamps without an offset.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Maximum accepted source length, enforced client-side before submission.
pub const MAX_CODE_LENGTH: usize = 10_000;
/// Maximum accepted description length.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Lifecycle status of a review, as reported by the service.
///
/// `Unknown` absorbs any wire value outside the documented set so a new
/// server-side status stops polling instead of looping forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// Terminal statuses: no further transitions expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!(
                "Invalid status '{}'. Valid values: pending, in_progress, completed, failed",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Languages accepted by the review service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgrammingLanguage {
    Python,
    Javascript,
    Typescript,
    Java,
    Cpp,
    Csharp,
    Go,
    Rust,
    Php,
    Ruby,
    Other,
}

impl ProgrammingLanguage {
    pub const ALL: &'static [ProgrammingLanguage] = &[
        Self::Python,
        Self::Javascript,
        Self::Typescript,
        Self::Java,
        Self::Cpp,
        Self::Csharp,
        Self::Go,
        Self::Rust,
        Self::Php,
        Self::Ruby,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Csharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Other => "other",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Javascript => "JavaScript",
            Self::Typescript => "TypeScript",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::Csharp => "C#",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Php => "PHP",
            Self::Ruby => "Ruby",
            Self::Other => "Other",
        }
    }

    /// Canonical source file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Javascript => "js",
            Self::Typescript => "ts",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Csharp => "cs",
            Self::Go => "go",
            Self::Rust => "rs",
            Self::Php => "php",
            Self::Ruby => "rb",
            Self::Other => "txt",
        }
    }

    /// Infer the language from a file extension (without the dot).
    /// Returns `None` for extensions outside the known set; callers decide
    /// whether to fall back to `Other` or ask the user.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .filter(|l| *l != Self::Other)
            .find(|l| l.extension() == ext)
    }
}

impl FromStr for ProgrammingLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|l| l.as_str()).collect();
                format!("Invalid language '{}'. Valid values: {}", s, valid.join(", "))
            })
    }
}

impl std::fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code sample prepared for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSubmission {
    pub code: String,
    pub language: ProgrammingLanguage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CodeSubmission {
    /// Validate shape client-side. A failing submission never reaches the
    /// network.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.code.trim().is_empty() {
            return Err(ApiError::Validation("Code cannot be empty".to_string()));
        }
        let code_len = self.code.chars().count();
        if code_len > MAX_CODE_LENGTH {
            return Err(ApiError::Validation(format!(
                "Code is {} characters; the maximum is {}",
                code_len, MAX_CODE_LENGTH
            )));
        }
        if let Some(desc) = &self.description {
            let desc_len = desc.chars().count();
            if desc_len > MAX_DESCRIPTION_LENGTH {
                return Err(ApiError::Validation(format!(
                    "Description is {} characters; the maximum is {}",
                    desc_len, MAX_DESCRIPTION_LENGTH
                )));
            }
        }
        Ok(())
    }
}

/// AI-generated feedback attached to a completed review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewFeedback {
    /// Quality score, 1-10.
    pub quality_score: u8,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub security_concerns: Vec<String>,
    #[serde(default)]
    pub performance_recommendations: Vec<String>,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
}

/// A submitted code sample plus its lifecycle state and (eventually) its
/// feedback. Client-held copies are read-only snapshots refreshed by polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub code: String,
    pub language: ProgrammingLanguage,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ReviewStatus,
    #[serde(default)]
    pub feedback: Option<ReviewFeedback>,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Processing duration in seconds.
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Review {
    /// Whether the record carries a non-empty error message. The service
    /// sometimes sets this before flipping the status to `failed`; a present
    /// message is treated as a terminal failure signal regardless of the
    /// status field. Known contract ambiguity, preserved as-is.
    pub fn has_error(&self) -> bool {
        self.error_message
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty())
    }
}

/// Acknowledgement returned on submission. Only the identifier is
/// client-visible state; the review itself lives server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub status: ReviewStatus,
    pub message: String,
}

/// One page of review history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Filters for the review list endpoint. Serialized as query parameters;
/// unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ProgrammingLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}

/// Filters for the CSV export endpoint.
#[derive(Debug, Clone)]
pub struct ExportFilters {
    /// ISO date, inclusive.
    pub start_date: String,
    /// ISO date, exclusive.
    pub end_date: String,
    pub languages: Vec<ProgrammingLanguage>,
    pub min_score: u8,
    pub max_score: u8,
}

impl ExportFilters {
    /// Query pairs with repeated `languages` keys. Built by hand because the
    /// endpoint expects repeated keys for the list parameter.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
            ("min_score", self.min_score.to_string()),
            ("max_score", self.max_score.to_string()),
        ];
        for lang in &self.languages {
            pairs.push(("languages", lang.as_str().to_string()));
        }
        pairs
    }
}

// ========== STATISTICS ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language: String,
    pub count: u64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub count: u64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonIssue {
    pub issue: String,
    pub count: u64,
}

/// Aggregate statistics across all reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_reviews: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub average_quality_score: f64,
    /// Seconds.
    pub average_processing_time: f64,
    #[serde(default)]
    pub language_stats: Vec<LanguageStats>,
    #[serde(default)]
    pub daily_stats: Vec<DailyStats>,
    #[serde(default)]
    pub common_issues: Vec<CommonIssue>,
    /// Histogram keyed by score ("1".."10").
    #[serde(default)]
    pub score_distribution: HashMap<String, u64>,
}

/// Condensed dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_reviews: u64,
    pub total_completed: u64,
    pub success_rate: f64,
    pub average_score: f64,
    pub top_language: String,
    pub most_common_issue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    #[serde(default)]
    pub language_stats: Vec<LanguageStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendData {
    #[serde(default)]
    pub daily_stats: Vec<DailyStats>,
    #[serde(default)]
    pub score_distribution: HashMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonIssuesResponse {
    #[serde(default)]
    pub common_issues: Vec<CommonIssue>,
}

// ========== HEALTH ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatuses {
    pub mongodb: String,
    pub openai_configured: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub services: ServiceStatuses,
    pub environment: String,
}

impl HealthCheck {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ========== AUTHENTICATION ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Bearer token issued by login/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(code: &str) -> CodeSubmission {
        CodeSubmission {
            code: code.to_string(),
            language: ProgrammingLanguage::Python,
            description: None,
        }
    }

    // ── ReviewStatus ─────────────────────────────────────────────────

    #[test]
    fn status_wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<ReviewStatus>("\"completed\"").unwrap(),
            ReviewStatus::Completed
        );
    }

    #[test]
    fn unrecognized_status_deserializes_to_unknown() {
        let status: ReviewStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ReviewStatus::Unknown);
    }

    #[test]
    fn terminal_statuses() {
        assert!(ReviewStatus::Completed.is_terminal());
        assert!(ReviewStatus::Failed.is_terminal());
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(!ReviewStatus::InProgress.is_terminal());
        assert!(!ReviewStatus::Unknown.is_terminal());
    }

    #[test]
    fn status_from_str_rejects_unknown_values() {
        assert!("archived".parse::<ReviewStatus>().is_err());
        assert_eq!(
            "in_progress".parse::<ReviewStatus>().unwrap(),
            ReviewStatus::InProgress
        );
    }

    // ── ProgrammingLanguage ──────────────────────────────────────────

    #[test]
    fn language_round_trips_through_wire_names() {
        for lang in ProgrammingLanguage::ALL {
            let json = serde_json::to_string(lang).unwrap();
            let back: ProgrammingLanguage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *lang);
        }
    }

    #[test]
    fn language_from_str_is_case_insensitive() {
        assert_eq!(
            "CSharp".parse::<ProgrammingLanguage>().unwrap(),
            ProgrammingLanguage::Csharp
        );
        assert!("cobol".parse::<ProgrammingLanguage>().is_err());
    }

    #[test]
    fn language_inferred_from_extension() {
        assert_eq!(
            ProgrammingLanguage::from_extension("rs"),
            Some(ProgrammingLanguage::Rust)
        );
        assert_eq!(
            ProgrammingLanguage::from_extension("PY"),
            Some(ProgrammingLanguage::Python)
        );
        assert_eq!(ProgrammingLanguage::from_extension("zig"), None);
        // "txt" belongs to Other, which is excluded from inference
        assert_eq!(ProgrammingLanguage::from_extension("txt"), None);
    }

    // ── CodeSubmission validation ────────────────────────────────────

    #[test]
    fn valid_submission_passes() {
        assert!(submission("print('hello')").validate().is_ok());
    }

    #[test]
    fn empty_code_is_rejected() {
        let err = submission("").validate().unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn whitespace_only_code_is_rejected() {
        assert!(submission("   \n\t  ").validate().is_err());
    }

    #[test]
    fn code_at_maximum_length_passes() {
        let code = "x".repeat(MAX_CODE_LENGTH);
        assert!(submission(&code).validate().is_ok());
    }

    #[test]
    fn code_over_maximum_length_is_rejected() {
        let code = "x".repeat(MAX_CODE_LENGTH + 1);
        let err = submission(&code).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("maximum"));
    }

    #[test]
    fn overlong_description_is_rejected() {
        let mut sub = submission("fn main() {}");
        sub.description = Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1));
        assert!(sub.validate().is_err());

        sub.description = Some("d".repeat(MAX_DESCRIPTION_LENGTH));
        assert!(sub.validate().is_ok());
    }

    // ── Review ───────────────────────────────────────────────────────

    #[test]
    fn review_deserializes_with_optional_fields_absent() {
        let json = r#"{
            "id": "abc123",
            "code": "print(1)",
            "language": "python",
            "status": "pending",
            "created_at": "2024-01-01T00:00:00"
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, "abc123");
        assert!(review.feedback.is_none());
        assert!(review.completed_at.is_none());
        assert!(!review.has_error());
    }

    #[test]
    fn blank_error_message_is_not_an_error_signal() {
        let json = r#"{
            "id": "abc",
            "code": "x",
            "language": "go",
            "status": "in_progress",
            "created_at": "2024-01-01T00:00:00",
            "error_message": "   "
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert!(!review.has_error());
    }

    #[test]
    fn feedback_lists_default_to_empty() {
        let json = r#"{"quality_score": 7}"#;
        let feedback: ReviewFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.quality_score, 7);
        assert!(feedback.issues.is_empty());
        assert!(feedback.security_concerns.is_empty());
    }

    // ── Filters ──────────────────────────────────────────────────────

    #[test]
    fn unset_filters_emit_no_keys() {
        let filters = ReviewFilters::default();
        assert_eq!(serde_json::to_string(&filters).unwrap(), "{}");
    }

    #[test]
    fn set_filters_serialize_their_wire_names() {
        let filters = ReviewFilters {
            page: Some(2),
            status: Some(ReviewStatus::Completed),
            language: Some(ProgrammingLanguage::Rust),
            ..Default::default()
        };
        let json = serde_json::to_string(&filters).unwrap();
        assert!(json.contains("\"page\":2"));
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("\"language\":\"rust\""));
        assert!(!json.contains("search_text"));
    }

    #[test]
    fn export_filters_repeat_language_keys() {
        let filters = ExportFilters {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-02-01".to_string(),
            languages: vec![ProgrammingLanguage::Python, ProgrammingLanguage::Go],
            min_score: 1,
            max_score: 10,
        };
        let pairs = filters.to_query();
        let languages: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "languages")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(languages, vec!["python", "go"]);
    }

    // ── Stats / health / auth payloads ───────────────────────────────

    #[test]
    fn stats_response_deserializes() {
        let json = r#"{
            "total_reviews": 42,
            "total_completed": 40,
            "total_failed": 2,
            "average_quality_score": 7.2,
            "average_processing_time": 12.5,
            "language_stats": [{"language": "python", "count": 20, "average_score": 7.5}],
            "daily_stats": [{"date": "2024-01-01", "count": 3, "average_score": 6.0}],
            "common_issues": [{"issue": "missing error handling", "count": 11}],
            "score_distribution": {"7": 15, "8": 10}
        }"#;
        let stats: StatsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_reviews, 42);
        assert_eq!(stats.language_stats[0].language, "python");
        assert_eq!(stats.score_distribution.get("7"), Some(&15));
    }

    #[test]
    fn health_check_status_helper() {
        let json = r#"{
            "status": "healthy",
            "timestamp": "2024-01-01T00:00:00",
            "version": "1.0.0",
            "services": {"mongodb": "up", "openai_configured": "yes"},
            "environment": "production"
        }"#;
        let health: HealthCheck = serde_json::from_str(json).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.services.mongodb, "up");
    }

    #[test]
    fn auth_token_deserializes_with_default_token_type() {
        let json = r#"{
            "access_token": "jwt-token",
            "expires_in": 3600,
            "user": {
                "id": "u1",
                "email": "dev@example.com",
                "name": "Dev",
                "created_at": "2024-01-01T00:00:00"
            }
        }"#;
        let token: AuthToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.user.email, "dev@example.com");
    }
}
