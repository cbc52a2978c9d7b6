//! Markdown rendering of the validation report

use super::types::{DeckAnalysis, Severity, ValidationReport, ValidationResult, ValidationStatus};
use crate::util::text::percent;
use std::fmt::{self, Write};

/// Unverified and verified claims listed in detail before summarising the rest
const DETAIL_LIMIT: usize = 5;
const SUPPORTING_EVIDENCE_LIMIT: usize = 3;

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟡",
        Severity::Medium => "🟢",
        Severity::Low => "⚪",
    }
}

fn status_marker(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Contradicted => "❌",
        ValidationStatus::Suspicious => "⚠️",
        ValidationStatus::Unverified => "❓",
        ValidationStatus::Verified => "✅",
    }
}

fn write_detail(md: &mut String, result: &ValidationResult, brief: bool) -> fmt::Result {
    write!(
        md,
        "#### {}\n\n**Verdict:** {}  \n**Confidence:** {:.0}%  \n**Severity:** {}\n\n",
        result.claim,
        result.status.verdict().label(),
        result.confidence * 100.0,
        result.severity.as_str().to_uppercase()
    )?;

    if !brief {
        if !result.evidence_for.is_empty() {
            md.push_str("**Evidence Supporting:**\n");
            for evidence in result.evidence_for.iter().take(SUPPORTING_EVIDENCE_LIMIT) {
                writeln!(md, "- {}", evidence)?;
            }
            md.push('\n');
        }

        if !result.evidence_against.is_empty() {
            md.push_str("**Evidence Against:**\n");
            for evidence in &result.evidence_against {
                writeln!(md, "- {}", evidence)?;
            }
            md.push('\n');
        }

        write!(md, "**Analysis:** {}\n\n", result.reasoning)?;
    }

    write!(md, "**Recommendation:** {}\n\n---\n\n", result.recommendation)
}

fn write_group(
    md: &mut String,
    heading: &str,
    results: &[&ValidationResult],
    limit: Option<usize>,
    brief: bool,
    noun: &str,
) -> fmt::Result {
    if results.is_empty() {
        return Ok(());
    }

    write!(md, "### {} ({})\n\n", heading, results.len())?;

    let shown = limit.unwrap_or(results.len());
    for result in results.iter().take(shown) {
        write_detail(md, result, brief)?;
    }

    if results.len() > shown {
        write!(
            md,
            "\n*...and {} more {} claims*\n\n",
            results.len() - shown,
            noun
        )?;
    }
    Ok(())
}

fn write_company_overview(md: &mut String, analysis: &DeckAnalysis) -> fmt::Result {
    let founders = if analysis.founders.is_empty() {
        "Not specified".to_string()
    } else {
        analysis.founders.join(", ")
    };

    write!(
        md,
        "## 🏢 Company Overview\n\n\
         **Stage:** {}  \n\
         **Funding Ask:** {}  \n\
         **Website:** {}\n\n\
         **Problem:** {}\n\n\
         **Solution:** {}\n\n\
         **Founders:** {}\n\n---\n\n",
        analysis.stage.as_deref().unwrap_or("Unknown"),
        analysis.funding_ask.as_deref().unwrap_or("Not specified"),
        analysis.website.as_deref().unwrap_or("Not provided"),
        analysis.problem.as_deref().unwrap_or("Not specified"),
        analysis.solution.as_deref().unwrap_or("Not specified"),
        founders
    )
}

fn with_status(report: &ValidationReport, status: ValidationStatus) -> Vec<&ValidationResult> {
    report
        .validation_results
        .iter()
        .filter(|r| r.status == status)
        .collect()
}

fn write_critical_issues(md: &mut String, report: &ValidationReport) -> fmt::Result {
    if report.critical_issues.is_empty() {
        return Ok(());
    }

    write!(
        md,
        "## 🚨 Critical Issues ({})\n\n",
        report.critical_issues.len()
    )?;
    for (i, issue) in report.critical_issues.iter().enumerate() {
        write!(
            md,
            "### {}. {} {}\n\n\
             **Status:** {} {}  \n\
             **Severity:** {}\n\n\
             **Analysis:**  \n{}\n\n\
             **Recommendation:**  \n{}\n\n---\n\n",
            i + 1,
            severity_marker(issue.severity),
            issue.claim,
            status_marker(issue.status),
            issue.status.as_str().to_uppercase(),
            issue.severity.as_str().to_uppercase(),
            issue.reasoning,
            issue.recommendation
        )?;
    }
    Ok(())
}

/// Renders the human-readable due diligence report
pub fn render_markdown(
    report: &ValidationReport,
    analysis: Option<&DeckAnalysis>,
    generated_at: &str,
) -> Result<String, fmt::Error> {
    let summary = &report.summary;
    let mut md = String::new();

    write!(
        md,
        "# Investment Due Diligence Report\n## {}\n\n---\n\n\
         ## 🎯 Executive Summary\n\n\
         **Investment Recommendation:** `{}`\n\n\
         ### Quick Stats\n\
         - **Claims Verified:** {}/{} ({:.0}%)\n\
         - **Contradicted Claims:** {}\n\
         - **Suspicious Findings:** {}\n\
         - **Unverified Claims:** {}\n\
         - **Critical Issues:** {}\n\n---\n\n\
         ## 📊 Overall Assessment\n\n{}\n\n---\n\n",
        report.company_name,
        report.investment_recommendation,
        summary.verified,
        summary.total_claims_checked,
        percent(summary.verified, summary.total_claims_checked),
        summary.contradicted,
        summary.suspicious,
        summary.unverified,
        report.critical_issues.len(),
        report.overall_assessment
    )?;

    if let Some(analysis) = analysis {
        write_company_overview(&mut md, analysis)?;
    }

    write_critical_issues(&mut md, report)?;

    md.push_str("## 📋 Detailed Validation Results\n\n");

    write_group(
        &mut md,
        "❌ Contradicted Claims",
        &with_status(report, ValidationStatus::Contradicted),
        None,
        false,
        "contradicted",
    )?;
    write_group(
        &mut md,
        "⚠️  Suspicious Claims",
        &with_status(report, ValidationStatus::Suspicious),
        None,
        false,
        "suspicious",
    )?;
    write_group(
        &mut md,
        "❓ Unverified Claims",
        &with_status(report, ValidationStatus::Unverified),
        Some(DETAIL_LIMIT),
        false,
        "unverified",
    )?;
    write_group(
        &mut md,
        "✅ Verified Claims",
        &with_status(report, ValidationStatus::Verified),
        Some(DETAIL_LIMIT),
        true,
        "verified",
    )?;

    write!(
        md,
        "---\n\n## 📝 Notes\n\n\
         This report was generated by an automated validation system. All findings should be reviewed by investment professionals before making final decisions.\n\n\
         **Report Generated:** {}\n\n---\n",
        generated_at
    )?;

    Ok(md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{CriticalIssue, ValidationSummary};

    fn result(id: &str, claim: &str, status: ValidationStatus, severity: Severity) -> ValidationResult {
        ValidationResult {
            validation_id: id.to_string(),
            claim: claim.to_string(),
            status,
            severity,
            evidence_for: vec!["for 1".into(), "for 2".into(), "for 3".into(), "for 4".into()],
            evidence_against: vec!["against".into()],
            reasoning: format!("reasoning for {}", claim),
            confidence: 0.8,
            recommendation: format!("act on {}", claim),
        }
    }

    fn report(results: Vec<ValidationResult>) -> ValidationReport {
        let critical_issues = results
            .iter()
            .filter(|r| r.is_critical_issue())
            .map(CriticalIssue::from)
            .collect();
        ValidationReport {
            company_name: "Acme Robotics".to_string(),
            summary: ValidationSummary::from_results(&results),
            critical_issues,
            validation_results: results,
            overall_assessment: "Mixed picture.".to_string(),
            investment_recommendation: "PROCEED_WITH_CAUTION - verify revenue".to_string(),
        }
    }

    #[test]
    fn test_header_and_stats() {
        let md = render_markdown(
            &report(vec![
                result("V001", "10k users", ValidationStatus::Verified, Severity::Low),
                result("V002", "$1M ARR", ValidationStatus::Contradicted, Severity::Critical),
            ]),
            None,
            "2025-03-01 12:00:00",
        )
        .unwrap();

        assert!(md.starts_with("# Investment Due Diligence Report\n## Acme Robotics\n"));
        assert!(md.contains("**Investment Recommendation:** `PROCEED_WITH_CAUTION - verify revenue`"));
        assert!(md.contains("- **Claims Verified:** 1/2 (50%)"));
        assert!(md.contains("- **Critical Issues:** 1"));
        assert!(md.contains("## 🚨 Critical Issues (1)"));
        assert!(md.contains("### 1. 🔴 $1M ARR"));
        assert!(md.contains("**Status:** ❌ CONTRADICTED"));
        assert!(md.contains("**Report Generated:** 2025-03-01 12:00:00"));
        assert!(!md.contains("Company Overview"));
    }

    #[test]
    fn test_group_order_and_brief_verified() {
        let md = render_markdown(
            &report(vec![
                result("V001", "verified claim", ValidationStatus::Verified, Severity::Low),
                result("V002", "unverified claim", ValidationStatus::Unverified, Severity::Medium),
                result("V003", "suspicious claim", ValidationStatus::Suspicious, Severity::Medium),
                result("V004", "contradicted claim", ValidationStatus::Contradicted, Severity::Low),
            ]),
            None,
            "now",
        )
        .unwrap();

        let pos = |needle: &str| md.find(needle).unwrap();
        assert!(pos("### ❌ Contradicted Claims (1)") < pos("### ⚠️  Suspicious Claims (1)"));
        assert!(pos("### ⚠️  Suspicious Claims (1)") < pos("### ❓ Unverified Claims (1)"));
        assert!(pos("### ❓ Unverified Claims (1)") < pos("### ✅ Verified Claims (1)"));

        assert!(md.contains("- for 3"));
        assert!(!md.contains("- for 4"));
        assert!(!md.contains("reasoning for verified claim"));
        assert!(md.contains("**Recommendation:** act on verified claim"));
        assert!(md.contains("**Analysis:** reasoning for contradicted claim"));
        assert!(md.contains("#### contradicted claim\n\n**Verdict:** Unsupported"));
        assert!(md.contains("#### suspicious claim\n\n**Verdict:** Uncertain"));
        assert!(md.contains("#### verified claim\n\n**Verdict:** Supported"));
    }

    #[test]
    fn test_unverified_overflow_note() {
        let results: Vec<_> = (1..=7)
            .map(|i| {
                result(
                    &format!("V{:03}", i),
                    &format!("claim {}", i),
                    ValidationStatus::Unverified,
                    Severity::Medium,
                )
            })
            .collect();

        let md = render_markdown(&report(results), None, "now").unwrap();
        assert!(md.contains("#### claim 5"));
        assert!(!md.contains("#### claim 6"));
        assert!(md.contains("*...and 2 more unverified claims*"));
        assert!(!md.contains("Critical Issues ("));
    }

    #[test]
    fn test_company_overview() {
        let analysis = DeckAnalysis {
            stage: Some("Series A".to_string()),
            funding_ask: Some("$5M".to_string()),
            founders: vec!["Jane Doe".to_string(), "John Roe".to_string()],
            ..DeckAnalysis::minimal("Acme Robotics")
        };

        let md = render_markdown(&report(vec![]), Some(&analysis), "now").unwrap();
        assert!(md.contains("## 🏢 Company Overview"));
        assert!(md.contains("**Stage:** Series A"));
        assert!(md.contains("**Funding Ask:** $5M"));
        assert!(md.contains("**Website:** Not provided"));
        assert!(md.contains("**Founders:** Jane Doe, John Roe"));
        assert!(md.contains("- **Claims Verified:** 0/0 (0%)"));
    }
}
