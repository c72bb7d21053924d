//! Structured drafting: job postings and cover letters.
//!
//! Both flows build a prompt asking for a JSON reply, run one completion
//! through the gateway, and assemble a typed result. Replies that are not
//! valid JSON never fail the request; each missing field falls back on
//! its own to something derived from the request or the raw reply.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::extract::extract_json;
use crate::types::{CompletionRequest, CompletionResponse, Message};
use crate::{HeimdallError, Result};

/// Token budget for drafting completions.
pub const DRAFT_MAX_TOKENS: u32 = 1500;

/// Sampling temperature for drafting completions.
pub const DRAFT_TEMPERATURE: f32 = 0.7;

/// Characters of the job description quoted in a cover letter prompt.
const JOB_DESCRIPTION_PROMPT_CHARS: usize = 2000;

/// Skills used as highlights when the reply cannot be parsed.
const FALLBACK_HIGHLIGHTS: usize = 3;

// ============================================================================
// Job drafts
// ============================================================================

/// Input for a generated job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraftRequest {
    pub title: String,
    pub category: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub budget_min: Option<u64>,
    #[serde(default)]
    pub budget_max: Option<u64>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
    /// Preferred provider name.
    #[serde(default)]
    pub provider: Option<String>,
}

/// A generated job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub description: String,
    pub requirements: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub model: String,
    pub provider: String,
}

#[derive(Deserialize)]
struct JobDraftReply {
    description: Option<String>,
    requirements: Option<Vec<String>>,
    nice_to_have: Option<Vec<String>>,
}

impl JobDraftRequest {
    pub fn new(title: impl Into<String>, category: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            skills,
            budget_min: None,
            budget_max: None,
            timeline: None,
            additional_context: None,
            provider: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let title_len = self.title.chars().count();
        if !(5..=200).contains(&title_len) {
            return Err(HeimdallError::InvalidInput(
                "title must be 5 to 200 characters".to_string(),
            ));
        }
        if self.skills.is_empty() {
            return Err(HeimdallError::InvalidInput(
                "at least one skill is required".to_string(),
            ));
        }
        if self
            .additional_context
            .as_ref()
            .is_some_and(|c| c.chars().count() > 1000)
        {
            return Err(HeimdallError::InvalidInput(
                "additional_context must be at most 1000 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Fields fingerprinted for the `job_draft` cache tag.
    pub fn cache_fields(&self) -> Value {
        json!({
            "title": self.title,
            "category": self.category,
            "skills": sorted(&self.skills),
        })
    }

    fn budget_line(&self) -> Option<String> {
        // zero means "not given"
        let min = self.budget_min.filter(|v| *v > 0);
        let max = self.budget_max.filter(|v| *v > 0);
        match (min, max) {
            (Some(min), Some(max)) => Some(format!("Budget: ${min} - ${max}")),
            (None, Some(max)) => Some(format!("Budget: Up to ${max}")),
            _ => None,
        }
    }

    pub fn prompt(&self) -> String {
        let mut details = format!(
            "- Title: {}\n- Category: {}\n- Required Skills: {}\n",
            self.title,
            self.category,
            self.skills.join(", ")
        );
        if let Some(budget) = self.budget_line() {
            details.push_str(&format!("- {budget}\n"));
        }
        if let Some(timeline) = &self.timeline {
            details.push_str(&format!("- Timeline: {timeline}\n"));
        }
        if let Some(context) = &self.additional_context {
            details.push_str(&format!("- Additional Context: {context}\n"));
        }

        format!(
            "You are a professional job posting writer. Create a compelling job posting for a freelance marketplace.

Job Details:
{details}
Generate a response in this exact JSON format:
{{
    \"description\": \"A compelling 2-3 paragraph job description that attracts top talent\",
    \"requirements\": [\"requirement 1\", \"requirement 2\", \"requirement 3\", \"...\"],
    \"nice_to_have\": [\"nice to have 1\", \"nice to have 2\", \"...\"]
}}

Make the description engaging, professional, and specific. Include what the freelancer will accomplish.
Requirements should be essential skills/experience. Nice-to-have are bonus qualifications."
        )
    }

    pub fn completion_request(&self) -> CompletionRequest {
        draft_completion(self.prompt())
    }

    /// Assemble a draft from the model's reply.
    pub fn parse_reply(&self, response: &CompletionResponse) -> JobDraft {
        let reply = extract_json::<JobDraftReply>(&response.content).unwrap_or(JobDraftReply {
            description: None,
            requirements: None,
            nice_to_have: None,
        });
        JobDraft {
            description: reply
                .description
                .unwrap_or_else(|| response.content.clone()),
            requirements: reply.requirements.unwrap_or_else(|| self.skills.clone()),
            nice_to_have: reply.nice_to_have.unwrap_or_default(),
            model: response.model.clone(),
            provider: response.provider.clone(),
        }
    }
}

// ============================================================================
// Cover letters
// ============================================================================

/// Input for a generated cover letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub job_description: String,
    pub freelancer_name: String,
    pub freelancer_skills: Vec<String>,
    #[serde(default)]
    pub freelancer_experience: Option<String>,
    /// Preferred provider name.
    #[serde(default)]
    pub provider: Option<String>,
}

/// A generated cover letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub cover_letter: String,
    pub highlights: Vec<String>,
    pub model: String,
    pub provider: String,
}

#[derive(Deserialize)]
struct CoverLetterReply {
    cover_letter: Option<String>,
    highlights: Option<Vec<String>>,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.job_description.chars().count() > 5000 {
            return Err(HeimdallError::InvalidInput(
                "job_description must be at most 5000 characters".to_string(),
            ));
        }
        if self
            .freelancer_experience
            .as_ref()
            .is_some_and(|e| e.chars().count() > 2000)
        {
            return Err(HeimdallError::InvalidInput(
                "freelancer_experience must be at most 2000 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Fields fingerprinted for the `cover_letter` cache tag.
    pub fn cache_fields(&self) -> Value {
        json!({
            "job_title": self.job_title,
            "skills": sorted(&self.freelancer_skills),
        })
    }

    pub fn prompt(&self) -> String {
        let experience = self
            .freelancer_experience
            .as_ref()
            .map(|e| format!("**Relevant Experience:** {e}\n"))
            .unwrap_or_default();
        let description: String = self
            .job_description
            .chars()
            .take(JOB_DESCRIPTION_PROMPT_CHARS)
            .collect();

        format!(
            "You are an expert career coach helping freelancers write compelling cover letters.

Write a cover letter for the following application:

**Freelancer:** {name}
**Skills:** {skills}
{experience}
**Applying For:** {title}
**Job Description:**
{description}

Generate a response in this exact JSON format:
{{
    \"cover_letter\": \"A professional, personalized cover letter (3-4 paragraphs)\",
    \"highlights\": [\"key selling point 1\", \"key selling point 2\", \"key selling point 3\"]
}}

Make the cover letter:
- Personal and engaging (not generic)
- Highlight specific skills matching the job
- Show enthusiasm for the project
- Be concise but impactful
- End with a call to action",
            name = self.freelancer_name,
            skills = self.freelancer_skills.join(", "),
            title = self.job_title,
        )
    }

    pub fn completion_request(&self) -> CompletionRequest {
        draft_completion(self.prompt())
    }

    /// Assemble a letter from the model's reply.
    pub fn parse_reply(&self, response: &CompletionResponse) -> CoverLetter {
        let (cover_letter, highlights) = match extract_json::<CoverLetterReply>(&response.content)
        {
            Some(reply) => (reply.cover_letter, reply.highlights.unwrap_or_default()),
            None => (
                None,
                self.freelancer_skills
                    .iter()
                    .take(FALLBACK_HIGHLIGHTS)
                    .cloned()
                    .collect(),
            ),
        };
        CoverLetter {
            cover_letter: cover_letter.unwrap_or_else(|| response.content.clone()),
            highlights,
            model: response.model.clone(),
            provider: response.provider.clone(),
        }
    }
}

fn draft_completion(prompt: String) -> CompletionRequest {
    CompletionRequest::new(vec![Message::user(prompt)])
        .max_tokens(DRAFT_MAX_TOKENS)
        .temperature(DRAFT_TEMPERATURE)
}

fn sorted(items: &[String]) -> Vec<&str> {
    let mut items: Vec<&str> = items.iter().map(String::as_str).collect();
    items.sort_unstable();
    items
}
