//! Embedding-text templates for positions and applicants.
//!
//! The exact textual template fed to the embedding model affects the
//! resulting vector, so both templates are load-bearing: once any vectors
//! are persisted, changing a template invalidates every previously stored
//! vector for ranking purposes and requires a full re-embed pass
//! (`EmbeddingService::re_embed_all`). The tests below pin the format.

use crate::models::{Applicant, JobPosition};

/// Combine the ranking-relevant fields of a position into a single
/// labeled document, in fixed order.
pub fn position_embedding_text(position: &JobPosition) -> String {
    format!(
        "Job Title: {}\nDescription: {}\nRequirements: {}",
        position.title, position.description, position.requirements
    )
}

/// The applicant embedding is derived solely from the resume text.
pub fn applicant_embedding_text(applicant: &Applicant) -> &str {
    &applicant.resume_text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Source, Stage};
    use chrono::Utc;
    use uuid::Uuid;

    fn position(title: &str, description: &str, requirements: &str) -> JobPosition {
        JobPosition {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: description.to_string(),
            requirements: requirements.to_string(),
            tags: String::new(),
            is_active: true,
            created_at: Utc::now(),
            embedding: None,
        }
    }

    fn applicant(resume_text: &str) -> Applicant {
        Applicant {
            id: Uuid::now_v7(),
            name: "Test Applicant".to_string(),
            email: "test@example.com".to_string(),
            phone: String::new(),
            position_id: None,
            stage: Stage::Submitted,
            source: Source::Other,
            tags: String::new(),
            resume_text: resume_text.to_string(),
            interviewers: String::new(),
            interview_dates: String::new(),
            overall_feedback: String::new(),
            final_decision: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            embedding: None,
        }
    }

    #[test]
    fn position_template_is_stable() {
        let p = position("Backend Engineer", "Build services.", "Rust, SQL");
        assert_eq!(
            position_embedding_text(&p),
            "Job Title: Backend Engineer\nDescription: Build services.\nRequirements: Rust, SQL"
        );
    }

    #[test]
    fn position_template_is_deterministic() {
        let p = position("Data Engineer", "Pipelines.", "Python");
        assert_eq!(position_embedding_text(&p), position_embedding_text(&p));
    }

    #[test]
    fn applicant_text_is_resume_passthrough() {
        let a = applicant("Ten years of Rust.");
        assert_eq!(applicant_embedding_text(&a), "Ten years of Rust.");
    }

    #[test]
    fn applicant_text_empty_when_resume_empty() {
        let a = applicant("");
        assert!(applicant_embedding_text(&a).is_empty());
    }
}
