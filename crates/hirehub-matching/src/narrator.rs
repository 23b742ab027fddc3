//! Per-candidate match narration.
//!
//! For each top-ranked candidate, the narrator asks a generation backend
//! for a short structured fit assessment of the resume against the
//! position. Which model serves it is a deployment choice behind the
//! `GenerationBackend` trait: a hosted chat-completions endpoint, a local
//! Ollama server, or the deterministic mock in tests.
//!
//! This is presentation-layer enrichment of a ranking that already
//! happened, so the failure contract is unusual: `narrate` returns
//! `String`, never `Result`. Any backend error is folded into a
//! descriptive error string that lands in that candidate's narrative slot
//! and affects nothing else.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use hirehub_core::{Applicant, GenerationBackend, JobPosition};

/// Builds the recruiter prompt and narrates candidates through a
/// generation backend.
#[derive(Clone)]
pub struct MatchNarrator {
    backend: Arc<dyn GenerationBackend>,
}

impl MatchNarrator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// The recruiter prompt, combining the position's hiring text with
    /// the candidate's resume.
    ///
    /// The response format is dictated here rather than parsed back out:
    /// the narrative is stored and displayed as opaque text.
    pub fn build_prompt(position: &JobPosition, applicant: &Applicant) -> String {
        format!(
            "You are an expert technical recruiter. Your task is to evaluate a candidate's resume for a specific job position.\n\
             Provide a concise analysis in the following format:\n\
             - **Relevancy Score (1-10):** [Your score here]\n\
             - **Summary:** [A brief, one-sentence summary of the candidate's fit.]\n\
             - **Strengths:** [A bulleted list of 2-3 key skills or experiences from the resume that directly match the job requirements.]\n\
             - **Potential Gaps:** [A bulleted list of 1-2 areas where the resume doesn't align with the job requirements or seems weak.]\n\
             \n\
             ---\n\
             **Job Position Details:**\n\
             **Title:** {}\n\
             **Description:** {}\n\
             **Requirements:** {}\n\
             ---\n\
             **Candidate's Resume:**\n\
             {}\n\
             ---\n\
             \n\
             Now, provide your analysis.",
            position.title, position.description, position.requirements, applicant.resume_text
        )
    }

    /// Produce a fit assessment, or an error-description string.
    #[instrument(skip_all, fields(subsystem = "matching", component = "narrator", op = "narrate", position_id = %position.id, applicant_id = %applicant.id))]
    pub async fn narrate(&self, position: &JobPosition, applicant: &Applicant) -> String {
        let start = Instant::now();
        let prompt = Self::build_prompt(position, applicant);

        match self.backend.generate(&prompt).await {
            Ok(content) => {
                debug!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    model = self.backend.model_name(),
                    "narration complete"
                );
                content
            }
            Err(e) => {
                warn!(
                    error = %e,
                    model = self.backend.model_name(),
                    "narration failed, substituting error text"
                );
                format!("Error communicating with AI agent: {e}")
            }
        }
    }

    /// Narrate a batch of candidates, one result per input.
    ///
    /// Runs sequentially; with `n` candidates the worst case is `n` full
    /// round-trip timeouts. One failed call never affects the others.
    pub async fn narrate_batch(
        &self,
        position: &JobPosition,
        applicants: &[Applicant],
    ) -> Vec<String> {
        let mut narratives = Vec::with_capacity(applicants.len());
        for applicant in applicants {
            narratives.push(self.narrate(position, applicant).await);
        }
        narratives
    }
}
