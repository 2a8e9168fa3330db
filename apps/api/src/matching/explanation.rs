//! Per-posting explanations: a deterministic template, optionally replaced by
//! generated text. Generation failures never reach the caller.

use tracing::warn;

use crate::llm_client::prompts::PLAIN_PROSE_SYSTEM;
use crate::llm_client::{ChatTurn, TextGeneration};
use crate::matching::profile::QueryProfile;
use crate::matching::prompts::{EXPLANATION_PROMPT_TEMPLATE, NOT_SPECIFIED};
use crate::matching::scorer::ScoredPosting;
use crate::models::Posting;

/// At most this many matched skills are named in the fallback text.
const MAX_NAMED_SKILLS: usize = 3;

pub fn fallback_explanation(scored: &ScoredPosting<'_>) -> String {
    let mut text = format!(
        "This internship at {} aligns with your profile. ",
        scored.posting.organization
    );
    if !scored.matched_skills.is_empty() {
        let named: Vec<&str> = scored
            .matched_skills
            .iter()
            .take(MAX_NAMED_SKILLS)
            .map(String::as_str)
            .collect();
        text.push_str(&format!(
            "Your skills in {} match the requirements. ",
            named.join(", ")
        ));
    }
    if scored.interest_match {
        text.push_str(&format!(
            "It also relates to your interest in {}. ",
            scored.posting.sector.to_lowercase()
        ));
    }
    text.push_str("This experience will help you develop professionally and build your resume.");
    text
}

pub fn explanation_prompt(posting: &Posting, profile: &QueryProfile) -> String {
    let required_skills = join_or_unspecified(posting.required_skills.iter(), "; ");
    let skills = join_or_unspecified(profile.skills.iter(), ", ");

    EXPLANATION_PROMPT_TEMPLATE
        .replace("{title}", &posting.title)
        .replace("{organization}", &posting.organization)
        .replace("{sector}", or_unspecified(&posting.sector))
        .replace("{required_skills}", &required_skills)
        .replace("{skills}", &skills)
        .replace("{interests}", or_unspecified(&profile.interests))
        .replace("{education}", or_unspecified(&profile.education))
        .replace("{description}", or_unspecified(&posting.description))
}

/// Generated explanation when available and successful, otherwise the template.
pub async fn explain(
    generation: &TextGeneration,
    scored: &ScoredPosting<'_>,
    profile: &QueryProfile,
) -> String {
    let fallback = fallback_explanation(scored);

    let TextGeneration::Enabled(generator) = generation else {
        return fallback;
    };

    let prompt = explanation_prompt(scored.posting, profile);
    match generator
        .complete(Some(PLAIN_PROSE_SYSTEM), &[ChatTurn::user(prompt)])
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!(posting_id = %scored.posting.id, "Empty generated explanation, using fallback");
            fallback
        }
        Err(e) => {
            warn!(posting_id = %scored.posting.id, "Explanation generation failed, using fallback: {e}");
            fallback
        }
    }
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

fn join_or_unspecified<'a>(items: impl Iterator<Item = &'a String>, sep: &str) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(sep);
    if joined.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::catalog::CatalogIndex;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::matching::scorer::CandidateScorer;
    use crate::models::GeoPoint;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn complete(&self, _: Option<&str>, _: &[ChatTurn]) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn complete(&self, _: Option<&str>, _: &[ChatTurn]) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn data_profile() -> QueryProfile {
        QueryProfile::new(
            "B.Com",
            "python;excel;sql;pandas",
            "Data",
            "",
            GeoPoint::new(28.6139, 77.2090),
        )
    }

    #[test]
    fn test_fallback_names_org_skills_and_sector() {
        let index = CatalogIndex::sample().unwrap();
        let profile = data_profile();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);
        let analyst = ranked.iter().find(|r| r.posting.id == "3").unwrap();

        let text = fallback_explanation(analyst);
        assert!(text.starts_with("This internship at AgriTech aligns with your profile. "));
        // four matches, only the first three (sorted) are named
        assert!(text.contains("Your skills in excel, pandas, python match the requirements. "));
        assert!(text.contains("It also relates to your interest in data. "));
        assert!(text.ends_with("build your resume."));
    }

    #[test]
    fn test_fallback_without_matches() {
        let index = CatalogIndex::sample().unwrap();
        let profile = QueryProfile::default();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);

        let text = fallback_explanation(&ranked[0]);
        assert!(!text.contains("Your skills"));
        assert!(!text.contains("interest in"));
        assert!(text.ends_with("build your resume."));
    }

    #[test]
    fn test_prompt_embeds_posting_and_profile() {
        let index = CatalogIndex::sample().unwrap();
        let posting = &index.postings()[2];
        let prompt = explanation_prompt(posting, &data_profile());
        assert!(prompt.contains("Internship: Data Analyst Intern at AgriTech"));
        assert!(prompt.contains("Required Skills: excel; pandas; python; sql"));
        assert!(prompt.contains("- Skills: excel, pandas, python, sql"));
        assert!(prompt.contains("- Education: B.Com"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_marks_blank_fields() {
        let index = CatalogIndex::sample().unwrap();
        let prompt = explanation_prompt(&index.postings()[0], &QueryProfile::default());
        assert!(prompt.contains("- Skills: Not specified"));
        assert!(prompt.contains("- Interests: Not specified"));
    }

    #[tokio::test]
    async fn test_disabled_generation_uses_fallback() {
        let index = CatalogIndex::sample().unwrap();
        let profile = data_profile();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);
        let text = explain(&TextGeneration::Disabled, &ranked[0], &profile).await;
        assert_eq!(text, fallback_explanation(&ranked[0]));
    }

    #[tokio::test]
    async fn test_generated_explanation_replaces_fallback() {
        let index = CatalogIndex::sample().unwrap();
        let profile = data_profile();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);
        let generation = TextGeneration::Enabled(Arc::new(FixedGenerator("  A great match.  ")));
        assert_eq!(explain(&generation, &ranked[0], &profile).await, "A great match.");
    }

    #[tokio::test]
    async fn test_failures_fall_back_for_every_result() {
        let index = CatalogIndex::sample().unwrap();
        let profile = data_profile();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);
        let failing = Arc::new(FailingGenerator {
            calls: AtomicUsize::new(0),
        });
        let generation = TextGeneration::Enabled(failing.clone());

        for scored in &ranked {
            let text = explain(&generation, scored, &profile).await;
            assert!(!text.is_empty());
            assert_eq!(text, fallback_explanation(scored));
        }
        assert_eq!(failing.calls.load(Ordering::SeqCst), ranked.len());
    }

    #[tokio::test]
    async fn test_blank_generation_falls_back() {
        let index = CatalogIndex::sample().unwrap();
        let profile = data_profile();
        let ranked = CandidateScorer::default().top_matches(&index, &profile);
        let generation = TextGeneration::Enabled(Arc::new(FixedGenerator("   ")));
        assert_eq!(
            explain(&generation, &ranked[0], &profile).await,
            fallback_explanation(&ranked[0])
        );
    }
}
