//! The final output of one verification call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A link to one piece of supporting evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    /// Display name of the source (evidence title or domain)
    pub source: String,

    /// Link to the evidence
    pub url: String,
}

/// A structured judgment of a claim.
///
/// Produced either by an AI analyst or by the deterministic heuristic in
/// [`crate::aggregate::heuristic_analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Analysis {
    /// How likely the claim is accurate (0.0-1.0)
    pub accuracy: f32,

    /// How sure the analysis is of its own accuracy figure (0.0-1.0)
    pub confidence: f32,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(default)]
    pub explanation: String,
}

/// Coarse status label derived from a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Verified,
    LikelyTrue,
    Uncertain,
    LikelyFalse,
    False,
}

impl VerdictStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerdictStatus::Verified => "verified",
            VerdictStatus::LikelyTrue => "likely true",
            VerdictStatus::Uncertain => "uncertain",
            VerdictStatus::LikelyFalse => "likely false",
            VerdictStatus::False => "false",
        }
    }
}

/// The outcome of verifying a statement.
///
/// Built once by [`VerdictBuilder`] and never mutated afterwards; cached
/// copies are clones of the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Final confidence that the statement is accurate (0.0-1.0)
    pub confidence: f32,

    /// Whether the caller should flag the statement
    pub has_issues: bool,

    /// Problems found, deduplicated
    pub issues: Vec<String>,

    /// Suggested follow-ups, deduplicated
    pub suggestions: Vec<String>,

    /// Source names in order of first appearance, deduplicated
    pub sources: Vec<String>,

    /// Links to evidence, unique by URL
    pub source_links: Vec<SourceLink>,

    pub explanation: String,

    /// Number of evidence items the verdict was built from
    pub source_count: usize,

    /// When the verdict was produced
    pub checked_at: DateTime<Utc>,
}

impl Verdict {
    /// Start building a verdict with the given confidence.
    pub fn builder(confidence: f32) -> VerdictBuilder {
        VerdictBuilder::new(confidence)
    }

    /// Status label for this verdict.
    pub fn status(&self) -> VerdictStatus {
        match self.confidence {
            c if c >= 0.85 && !self.has_issues => VerdictStatus::Verified,
            c if c >= 0.6 => VerdictStatus::LikelyTrue,
            c if c >= 0.4 => VerdictStatus::Uncertain,
            c if c >= 0.2 => VerdictStatus::LikelyFalse,
            _ => VerdictStatus::False,
        }
    }
}

/// Accumulates verdict fields, deduplicating as it goes.
#[derive(Debug, Clone)]
pub struct VerdictBuilder {
    confidence: f32,
    has_issues: Option<bool>,
    issues: Vec<String>,
    suggestions: Vec<String>,
    sources: Vec<String>,
    source_links: Vec<SourceLink>,
    explanation: String,
    source_count: usize,
}

impl VerdictBuilder {
    /// Start a verdict. Confidence is clamped to `[0, 1]`; NaN becomes 0.
    pub fn new(confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            confidence,
            has_issues: None,
            issues: Vec::new(),
            suggestions: Vec::new(),
            sources: Vec::new(),
            source_links: Vec::new(),
            explanation: String::new(),
            source_count: 0,
        }
    }

    /// Add an issue (ignored if already present).
    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        push_unique(&mut self.issues, issue.into());
        self
    }

    pub fn issues(mut self, issues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for issue in issues {
            push_unique(&mut self.issues, issue.into());
        }
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        push_unique(&mut self.suggestions, suggestion.into());
        self
    }

    pub fn suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        for suggestion in suggestions {
            push_unique(&mut self.suggestions, suggestion.into());
        }
        self
    }

    /// Add a source name (first appearance wins).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        push_unique(&mut self.sources, source.into());
        self
    }

    /// Add a link; links with an already seen URL are dropped.
    pub fn link(mut self, source: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        if !self.source_links.iter().any(|l| l.url == url) {
            self.source_links.push(SourceLink {
                source: source.into(),
                url,
            });
        }
        self
    }

    pub fn explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn source_count(mut self, count: usize) -> Self {
        self.source_count = count;
        self
    }

    /// Force the `has_issues` flag. Defaults to "any issue recorded".
    pub fn has_issues(mut self, has_issues: bool) -> Self {
        self.has_issues = Some(has_issues);
        self
    }

    pub fn build(self) -> Verdict {
        let has_issues = self.has_issues.unwrap_or(!self.issues.is_empty());
        Verdict {
            confidence: self.confidence,
            has_issues,
            issues: self.issues,
            suggestions: self.suggestions,
            sources: self.sources,
            source_links: self.source_links,
            explanation: self.explanation,
            source_count: self.source_count,
            checked_at: Utc::now(),
        }
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    let item = item.trim().to_string();
    if item.is_empty() {
        return;
    }
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Remove duplicate strings, keeping first occurrences.
pub(crate) fn dedupe_strings(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_dedupes_everything() {
        let verdict = Verdict::builder(0.7)
            .issue("Outdated figure")
            .issue("Outdated figure")
            .suggestions(["Check the census", "Check the census"])
            .source("census.gov")
            .source("wikipedia.org")
            .source("census.gov")
            .link("Census", "https://census.gov/a")
            .link("Census again", "https://census.gov/a")
            .build();

        assert_eq!(verdict.issues, vec!["Outdated figure"]);
        assert_eq!(verdict.suggestions.len(), 1);
        assert_eq!(verdict.sources, vec!["census.gov", "wikipedia.org"]);
        assert_eq!(verdict.source_links.len(), 1);
        assert_eq!(verdict.source_links[0].source, "Census");
        assert!(verdict.has_issues);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Verdict::builder(1.4).build().confidence, 1.0);
        assert_eq!(Verdict::builder(-0.2).build().confidence, 0.0);
        assert_eq!(Verdict::builder(f32::NAN).build().confidence, 0.0);
        assert_eq!(Verdict::builder(f32::INFINITY).build().confidence, 1.0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Verdict::builder(0.9).build().status(), VerdictStatus::Verified);
        assert_eq!(
            Verdict::builder(0.9).issue("x").build().status(),
            VerdictStatus::LikelyTrue
        );
        assert_eq!(Verdict::builder(0.5).build().status(), VerdictStatus::Uncertain);
        assert_eq!(Verdict::builder(0.25).build().status(), VerdictStatus::LikelyFalse);
        assert_eq!(Verdict::builder(0.1).build().status(), VerdictStatus::False);
    }

    #[test]
    fn test_dedupe_strings_keeps_order() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedupe_strings(items), vec!["b", "a"]);
    }
}
