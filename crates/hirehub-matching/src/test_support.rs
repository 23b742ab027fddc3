//! In-memory repository fakes for service tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use hirehub_core::{
    Applicant, ApplicantRepository, CreateApplicantRequest, CreatePositionRequest, Error,
    JobPosition, ListApplicantsRequest, ListPositionsRequest, PositionRepository, Result,
    UpdateApplicantRequest, UpdatePositionRequest, Vector,
};

#[derive(Default)]
pub struct InMemoryPositions {
    items: Mutex<BTreeMap<Uuid, JobPosition>>,
}

impl InMemoryPositions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionRepository for InMemoryPositions {
    async fn insert(&self, req: CreatePositionRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let position = JobPosition {
            id,
            title: req.title,
            description: req.description,
            requirements: req.requirements,
            tags: req.tags,
            is_active: req.is_active,
            created_at: Utc::now(),
            embedding: None,
        };
        self.items.lock().unwrap().insert(id, position);
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<JobPosition> {
        self.items
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::PositionNotFound(id))
    }

    async fn fetch_optional(&self, id: Uuid) -> Result<Option<JobPosition>> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, req: ListPositionsRequest) -> Result<Vec<JobPosition>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| !req.active_only || p.is_active)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, req: UpdatePositionRequest) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let position = items.get_mut(&id).ok_or(Error::PositionNotFound(id))?;
        if let Some(title) = req.title {
            position.title = title;
        }
        if let Some(description) = req.description {
            position.description = description;
        }
        if let Some(requirements) = req.requirements {
            position.requirements = requirements;
        }
        if let Some(tags) = req.tags {
            position.tags = tags;
        }
        if let Some(is_active) = req.is_active {
            position.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::PositionNotFound(id))
    }

    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let position = items.get_mut(&id).ok_or(Error::PositionNotFound(id))?;
        position.embedding = Some(vector.clone());
        Ok(())
    }

    async fn list_all_ids(&self) -> Result<Vec<Uuid>> {
        Ok(self.items.lock().unwrap().keys().copied().collect())
    }
}

#[derive(Default)]
pub struct InMemoryApplicants {
    items: Mutex<BTreeMap<Uuid, Applicant>>,
}

impl InMemoryApplicants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directly overwrite a stored resume, bypassing `updated_at`.
    pub fn set_resume(&self, id: Uuid, resume: &str) {
        if let Some(applicant) = self.items.lock().unwrap().get_mut(&id) {
            applicant.resume_text = resume.to_string();
        }
    }
}

#[async_trait]
impl ApplicantRepository for InMemoryApplicants {
    async fn insert(&self, req: CreateApplicantRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let applicant = Applicant {
            id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            position_id: req.position_id,
            stage: req.stage,
            source: req.source,
            tags: req.tags,
            resume_text: req.resume_text,
            interviewers: req.interviewers,
            interview_dates: req.interview_dates,
            overall_feedback: req.overall_feedback,
            final_decision: req.final_decision,
            created_at: now,
            updated_at: now,
            embedding: None,
        };
        self.items.lock().unwrap().insert(id, applicant);
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Applicant> {
        self.items
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::ApplicantNotFound(id))
    }

    async fn list(&self, req: ListApplicantsRequest) -> Result<Vec<Applicant>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|a| req.stage.is_none_or(|s| a.stage == s))
            .filter(|a| req.source.is_none_or(|s| a.source == s))
            .filter(|a| req.position_id.is_none_or(|p| a.position_id == Some(p)))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, req: UpdateApplicantRequest) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let applicant = items.get_mut(&id).ok_or(Error::ApplicantNotFound(id))?;
        if let Some(name) = req.name {
            applicant.name = name;
        }
        if let Some(email) = req.email {
            applicant.email = email;
        }
        if let Some(phone) = req.phone {
            applicant.phone = phone;
        }
        if let Some(position_id) = req.position_id {
            applicant.position_id = position_id;
        }
        if let Some(stage) = req.stage {
            applicant.stage = stage;
        }
        if let Some(source) = req.source {
            applicant.source = source;
        }
        if let Some(tags) = req.tags {
            applicant.tags = tags;
        }
        if let Some(resume_text) = req.resume_text {
            applicant.resume_text = resume_text;
        }
        if let Some(interviewers) = req.interviewers {
            applicant.interviewers = interviewers;
        }
        if let Some(interview_dates) = req.interview_dates {
            applicant.interview_dates = interview_dates;
        }
        if let Some(overall_feedback) = req.overall_feedback {
            applicant.overall_feedback = overall_feedback;
        }
        if let Some(final_decision) = req.final_decision {
            applicant.final_decision = final_decision;
        }
        applicant.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::ApplicantNotFound(id))
    }

    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let applicant = items.get_mut(&id).ok_or(Error::ApplicantNotFound(id))?;
        applicant.embedding = Some(vector.clone());
        Ok(())
    }

    async fn list_embedded(&self, position_id: Option<Uuid>) -> Result<Vec<(Uuid, Vector)>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|a| position_id.is_none_or(|p| a.position_id == Some(p)))
            .filter_map(|a| a.embedding.clone().map(|v| (a.id, v)))
            .collect())
    }

    async fn list_all_ids(&self) -> Result<Vec<Uuid>> {
        Ok(self.items.lock().unwrap().keys().copied().collect())
    }
}
