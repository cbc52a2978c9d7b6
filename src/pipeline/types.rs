//! Data carried between pipeline stages and persisted as JSON artifacts

use crate::web::ScrapeMethod;
use serde::{Deserialize, Serialize};

/// Deserializers that accept the loose shapes model output tends to take
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_text(value: Value) -> Option<String> {
        let text = match value {
            Value::Null => return None,
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Object(ref map) => match map.get("name").and_then(Value::as_str) {
                Some(name) => name.to_string(),
                None => value.to_string(),
            },
            Value::Array(_) => value.to_string(),
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Any scalar or object as an optional string; blank strings become `None`
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_text(Value::deserialize(deserializer)?))
    }

    /// A list of strings, a single string, or null
    pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
            other => value_to_text(other).into_iter().collect(),
        })
    }

    fn value_to_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_start_matches('$').trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }

    /// A number, or a numeric string such as `"0.8"` or `"$0.350"`
    pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_f64(&Value::deserialize(deserializer)?))
    }

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_number(deserializer)?.unwrap_or_default())
    }
}

/// Facts and claims extracted from the deck.
///
/// Every field is optional since the model decides what it can find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckAnalysis {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub founders: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub funding_ask: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub problem: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub solution: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub traction: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub claims: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub team_info: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub competitors_mentioned: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub website: Option<String>,
}

impl DeckAnalysis {
    /// Placeholder used when only a company name is known
    pub fn minimal(company_name: impl Into<String>) -> Self {
        Self {
            company_name: Some(company_name.into()),
            ..Default::default()
        }
    }

    pub fn company(&self) -> &str {
        self.company_name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Research,
    Validator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Deal breakers
    Critical,
    High,
    Medium,
    /// Background information
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchTask {
    pub task_id: String,
    pub agent: AgentType,
    pub priority: Priority,
    pub query: String,
    #[serde(default)]
    pub context: String,
    /// Why the task matters to the investment decision
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub company_name: String,
    #[serde(default)]
    pub deck_summary: String,
    #[serde(default)]
    pub critical_gaps: Vec<String>,
    pub tasks: Vec<ResearchTask>,
    #[serde(default, alias = "estimated_cost", deserialize_with = "lenient::number")]
    pub estimated_cost_usd: f64,
}

impl ResearchPlan {
    /// Tasks the research stage executes; validator tasks are only carried
    pub fn research_tasks(&self) -> impl Iterator<Item = &ResearchTask> {
        self.tasks.iter().filter(|t| t.agent == AgentType::Research)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchStatus {
    Success,
    Partial,
    Failed,
}

impl ResearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// A search hit together with whatever content could be fetched for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub content: String,
    pub method: ScrapeMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub task_id: String,
    pub query: String,
    pub status: ResearchStatus,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResults {
    pub company_name: String,
    pub research_completed_at: String,
    pub tasks_executed: usize,
    pub total_cost: f64,
    pub results: Vec<ResearchResult>,
}

impl ResearchResults {
    pub fn red_flags(&self) -> Vec<&str> {
        self.results
            .iter()
            .flat_map(|r| r.red_flags.iter().map(String::as_str))
            .collect()
    }

    /// First two findings of every result with confidence above 0.7
    pub fn high_confidence_findings(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.confidence_score > 0.7)
            .flat_map(|r| r.key_findings.iter().take(2).map(String::as_str))
            .collect()
    }
}

/// Research output attached to a claim for validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub task_id: String,
    pub query: String,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_flags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationTask {
    pub validation_id: String,
    pub claim: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub requires_verification: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPlan {
    pub company_name: String,
    pub validation_tasks: Vec<ValidationTask>,
    #[serde(default)]
    pub total_tasks: usize,
}

impl ValidationPlan {
    pub fn new(company_name: impl Into<String>, validation_tasks: Vec<ValidationTask>) -> Self {
        Self {
            company_name: company_name.into(),
            total_tasks: validation_tasks.len(),
            validation_tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Supported by strong evidence
    Verified,
    /// Evidence directly conflicts with the claim
    Contradicted,
    /// Not enough evidence either way
    Unverified,
    /// Evidence raises concerns without a direct contradiction
    Suspicious,
}

/// Three-way reading of a validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Supported,
    Unsupported,
    Uncertain,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Supported => "Supported",
            Verdict::Unsupported => "Unsupported",
            Verdict::Uncertain => "Uncertain",
        }
    }
}

impl ValidationStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "verified" => Some(Self::Verified),
            "contradicted" => Some(Self::Contradicted),
            "unverified" => Some(Self::Unverified),
            "suspicious" => Some(Self::Suspicious),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Contradicted => "contradicted",
            Self::Unverified => "unverified",
            Self::Suspicious => "suspicious",
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Verified => Verdict::Supported,
            Self::Contradicted => Verdict::Unsupported,
            Self::Unverified | Self::Suspicious => Verdict::Uncertain,
        }
    }

    /// Contradicted and suspicious results can become critical issues
    pub fn is_concern(&self) -> bool {
        matches!(self, Self::Contradicted | Self::Suspicious)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn is_serious(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validation_id: String,
    pub claim: String,
    pub status: ValidationStatus,
    pub severity: Severity,
    #[serde(default)]
    pub evidence_for: Vec<String>,
    #[serde(default)]
    pub evidence_against: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub recommendation: String,
}

impl ValidationResult {
    /// Result recorded when the model could not produce a usable verdict
    pub fn failed(task: &ValidationTask, error: &str) -> Self {
        Self {
            validation_id: task.validation_id.clone(),
            claim: task.claim.clone(),
            status: ValidationStatus::Unverified,
            severity: Severity::Medium,
            evidence_for: Vec::new(),
            evidence_against: Vec::new(),
            reasoning: format!("Validation failed due to error: {}", error),
            confidence: 0.0,
            recommendation: "Manual review required - automated validation failed".to_string(),
        }
    }

    pub fn is_critical_issue(&self) -> bool {
        self.severity.is_serious() && self.status.is_concern()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIssue {
    pub claim: String,
    pub status: ValidationStatus,
    pub severity: Severity,
    pub reasoning: String,
    pub recommendation: String,
}

impl From<&ValidationResult> for CriticalIssue {
    fn from(result: &ValidationResult) -> Self {
        Self {
            claim: result.claim.clone(),
            status: result.status,
            severity: result.severity,
            reasoning: result.reasoning.clone(),
            recommendation: result.recommendation.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_claims_checked: usize,
    pub verified: usize,
    pub contradicted: usize,
    pub unverified: usize,
    pub suspicious: usize,
}

impl ValidationSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Self {
            total_claims_checked: results.len(),
            verified: count(ValidationStatus::Verified),
            contradicted: count(ValidationStatus::Contradicted),
            unverified: count(ValidationStatus::Unverified),
            suspicious: count(ValidationStatus::Suspicious),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub company_name: String,
    pub summary: ValidationSummary,
    pub critical_issues: Vec<CriticalIssue>,
    pub validation_results: Vec<ValidationResult>,
    pub overall_assessment: String,
    pub investment_recommendation: String,
}

impl ValidationReport {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::classify(&self.investment_recommendation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Pass,
    ProceedWithCaution,
    Reject,
}

impl Recommendation {
    /// Reads the leading keyword of a free-text recommendation. Text that
    /// names none of the keywords is treated as a rejection.
    pub fn classify(text: &str) -> Self {
        let upper = text.trim().to_uppercase();

        if upper.starts_with("PASS") {
            Self::Pass
        } else if upper.starts_with("PROCEED") {
            Self::ProceedWithCaution
        } else if upper.starts_with("REJECT") {
            Self::Reject
        } else if upper.contains("PASS") {
            Self::Pass
        } else if upper.contains("CAUTION") {
            Self::ProceedWithCaution
        } else {
            Self::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::ProceedWithCaution => "PROCEED_WITH_CAUTION",
            Self::Reject => "REJECT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deck_analysis_lenient_fields() {
        let analysis: DeckAnalysis = serde_json::from_value(json!({
            "company_name": "Acme Robotics",
            "founders": [{"name": "Jane Doe", "role": "CEO"}, "John Roe"],
            "funding_ask": 2000000,
            "traction": {"users": 10000},
            "claims": "10,000 active users",
            "website": "",
            "stage": null
        }))
        .unwrap();

        assert_eq!(analysis.company(), "Acme Robotics");
        assert_eq!(analysis.founders, vec!["Jane Doe", "John Roe"]);
        assert_eq!(analysis.funding_ask.as_deref(), Some("2000000"));
        assert_eq!(analysis.traction.as_deref(), Some(r#"{"users":10000}"#));
        assert_eq!(analysis.claims, vec!["10,000 active users"]);
        assert!(analysis.website.is_none());
        assert!(analysis.stage.is_none());
        assert!(analysis.competitors_mentioned.is_empty());
    }

    #[test]
    fn test_deck_analysis_empty_object() {
        let analysis: DeckAnalysis = serde_json::from_str("{}").unwrap();
        assert_eq!(analysis.company(), "Unknown");
    }

    #[test]
    fn test_research_plan_accepts_dollar_cost() {
        let plan: ResearchPlan = serde_json::from_value(json!({
            "company_name": "Acme",
            "deck_summary": "Robots | Stage: Seed",
            "critical_gaps": [],
            "tasks": [
                {"task_id": "T001", "agent": "research", "priority": "critical",
                 "query": "q1", "context": "c", "reasoning": "r"},
                {"task_id": "T002", "agent": "validator", "priority": "critical",
                 "query": "q2", "context": "c", "reasoning": "r"}
            ],
            "estimated_cost": "$0.350"
        }))
        .unwrap();

        assert!((plan.estimated_cost_usd - 0.35).abs() < 1e-9);
        let ids: Vec<_> = plan.research_tasks().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids, vec!["T001"]);
    }

    #[test]
    fn test_source_method_names() {
        let source: Source = serde_json::from_value(json!({
            "url": "https://a.example", "title": "A", "snippet": "", "content": "", "method": "none"
        }))
        .unwrap();
        assert_eq!(source.method, ScrapeMethod::None);
    }

    #[test]
    fn test_verdict_mapping() {
        assert_eq!(ValidationStatus::Verified.verdict(), Verdict::Supported);
        assert_eq!(ValidationStatus::Contradicted.verdict(), Verdict::Unsupported);
        assert_eq!(ValidationStatus::Unverified.verdict(), Verdict::Uncertain);
        assert_eq!(ValidationStatus::Suspicious.verdict(), Verdict::Uncertain);
    }

    #[test]
    fn test_status_and_severity_parse() {
        assert_eq!(ValidationStatus::parse(" Verified "), Some(ValidationStatus::Verified));
        assert_eq!(ValidationStatus::parse("maybe"), None);
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("severe"), None);
    }

    #[test]
    fn test_failed_validation_result() {
        let task = ValidationTask {
            validation_id: "V001".to_string(),
            claim: "10k users".to_string(),
            source: "pitch_deck".to_string(),
            evidence: vec![],
            requires_verification: true,
        };
        let result = ValidationResult::failed(&task, "timeout");

        assert_eq!(result.status, ValidationStatus::Unverified);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reasoning, "Validation failed due to error: timeout");
        assert!(!result.is_critical_issue());
    }

    #[test]
    fn test_critical_issue_requires_serious_concern() {
        let mut result = ValidationResult::failed(
            &ValidationTask {
                validation_id: "V001".to_string(),
                claim: "c".to_string(),
                source: String::new(),
                evidence: vec![],
                requires_verification: true,
            },
            "x",
        );
        result.status = ValidationStatus::Contradicted;
        result.severity = Severity::High;
        assert!(result.is_critical_issue());

        result.severity = Severity::Low;
        assert!(!result.is_critical_issue());

        result.severity = Severity::Critical;
        result.status = ValidationStatus::Unverified;
        assert!(!result.is_critical_issue());
    }

    #[test]
    fn test_recommendation_classify() {
        assert_eq!(
            Recommendation::classify("PASS - Claims appear valid"),
            Recommendation::Pass
        );
        assert_eq!(
            Recommendation::classify("PROCEED_WITH_CAUTION - verify revenue"),
            Recommendation::ProceedWithCaution
        );
        assert_eq!(
            Recommendation::classify("REJECT - founders could not be found"),
            Recommendation::Reject
        );
        assert_eq!(
            Recommendation::classify("We recommend to proceed with caution"),
            Recommendation::ProceedWithCaution
        );
        assert_eq!(Recommendation::classify("unclear"), Recommendation::Reject);
    }

    #[test]
    fn test_summary_counts() {
        let task = ValidationTask {
            validation_id: "V001".to_string(),
            claim: "c".to_string(),
            source: String::new(),
            evidence: vec![],
            requires_verification: true,
        };
        let mut verified = ValidationResult::failed(&task, "x");
        verified.status = ValidationStatus::Verified;
        let unverified = ValidationResult::failed(&task, "x");

        let summary = ValidationSummary::from_results(&[verified, unverified.clone(), unverified]);
        assert_eq!(summary.total_claims_checked, 3);
        assert_eq!(summary.verified, 1);
        assert_eq!(summary.unverified, 2);
        assert_eq!(summary.contradicted, 0);
    }

    #[test]
    fn test_research_results_summaries() {
        let result = |conf: f64, findings: &[&str], flags: &[&str]| ResearchResult {
            task_id: "T001".to_string(),
            query: "q".to_string(),
            status: ResearchStatus::Success,
            sources: vec![],
            summary: String::new(),
            key_findings: findings.iter().map(|s| s.to_string()).collect(),
            red_flags: flags.iter().map(|s| s.to_string()).collect(),
            confidence_score: conf,
        };
        let results = ResearchResults {
            company_name: "Acme".to_string(),
            research_completed_at: "2025-01-01 00:00:00".to_string(),
            tasks_executed: 2,
            total_cost: 0.0,
            results: vec![
                result(0.9, &["a", "b", "c"], &[]),
                result(0.7, &["d"], &["flag"]),
            ],
        };

        assert_eq!(results.high_confidence_findings(), vec!["a", "b"]);
        assert_eq!(results.red_flags(), vec!["flag"]);
    }
}
