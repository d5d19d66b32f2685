//! AI collaborator — the single point of entry for generated content.
//!
//! The backend returns untrusted JSON; every response is deserialized
//! into a typed shape before it reaches a caller, and any transport or
//! parse failure surfaces as a recoverable `GenerationFailed`. With no
//! API key configured the portal runs on the deterministic offline
//! backend, exactly like the original's no-key demo mode.

pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::PortalError;
use crate::resume::{ResumeDocument, ResumePatch};

/// The model used for all generation calls.
pub const MODEL: &str = "gemini-1.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// Typed response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyGuide {
    pub guides: Vec<GuideSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideSection {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub q: String,
    pub a: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub role: String,
    pub steps: Vec<RoadmapStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub phase: String,
    pub topics: Vec<String>,
    pub estimated_time: String,
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeCritique {
    pub score: u32,
    pub feedback: Vec<String>,
    pub suggestions: String,
}

// ---------------------------------------------------------------------------
// Trait definition
// ---------------------------------------------------------------------------

/// Content generation backend. The portal holds an `Arc<dyn
/// ContentGenerator>`, chosen at construction: `GeminiClient` when an API
/// key is available, `OfflineGenerator` otherwise.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn study_guide(&self, topic: &str) -> Result<StudyGuide, PortalError>;
    async fn practice_questions(&self, topic: &str) -> Result<Vec<PracticeQuestion>, PortalError>;
    async fn roadmap(&self, role: &str) -> Result<Roadmap, PortalError>;
    async fn review_resume(&self, resume: &ResumeDocument) -> Result<ResumeCritique, PortalError>;
    async fn parse_resume(&self, raw_text: &str) -> Result<ResumePatch, PortalError>;
}

// ---------------------------------------------------------------------------
// Gemini backend
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
enum GenError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned empty content")]
    EmptyContent,
}

impl From<GenError> for PortalError {
    fn from(e: GenError) -> Self {
        PortalError::GenerationFailed(e.to_string())
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Google Generative Language API client, shared by every generation
/// path. Retries 429 and 5xx responses with exponential backoff.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| PortalError::GenerationFailed(format!("http client: {e}")))?;
        Ok(Self { client, api_key })
    }

    async fn call(&self, prompt: &str) -> Result<String, GenError> {
        let url = format!("{API_BASE}/{MODEL}:generateContent?key={}", self.api_key);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let mut last_error: Option<GenError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Generation attempt {attempt} failed, retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GenError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Generation API returned {status}: {message}");
                last_error = Some(GenError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(GenError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GeminiResponse = response.json().await?;
            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
                .ok_or(GenError::EmptyContent)?;

            debug!("Generation call succeeded ({} chars)", text.len());
            return Ok(text);
        }

        Err(last_error.unwrap_or(GenError::EmptyContent))
    }

    /// Calls the model and deserializes its text output as JSON. The
    /// prompt must instruct the model to return valid JSON; fences are
    /// stripped before parsing in case it wraps the payload anyway.
    async fn call_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, GenError> {
        let text = self.call(prompt).await?;
        let json = strip_json_fences(&text);
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn study_guide(&self, topic: &str) -> Result<StudyGuide, PortalError> {
        let prompt = prompts::STUDY_GUIDE_PROMPT.replace("{topic}", topic);
        Ok(self.call_json(&prompt).await?)
    }

    async fn practice_questions(&self, topic: &str) -> Result<Vec<PracticeQuestion>, PortalError> {
        let prompt = prompts::PRACTICE_QUESTIONS_PROMPT.replace("{topic}", topic);
        Ok(self.call_json(&prompt).await?)
    }

    async fn roadmap(&self, role: &str) -> Result<Roadmap, PortalError> {
        let prompt = prompts::ROADMAP_PROMPT.replace("{role}", role);
        Ok(self.call_json(&prompt).await?)
    }

    async fn review_resume(&self, resume: &ResumeDocument) -> Result<ResumeCritique, PortalError> {
        let resume_json = serde_json::to_string(resume)
            .map_err(|e| PortalError::GenerationFailed(format!("resume serialization: {e}")))?;
        let prompt = prompts::REVIEW_RESUME_PROMPT.replace("{resume_json}", &resume_json);
        Ok(self.call_json(&prompt).await?)
    }

    async fn parse_resume(&self, raw_text: &str) -> Result<ResumePatch, PortalError> {
        let prompt = prompts::PARSE_RESUME_PROMPT.replace("{raw_text}", raw_text);
        Ok(self.call_json(&prompt).await?)
    }
}

/// Strips a leading/trailing markdown code fence from model output.
fn strip_json_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json") up to the first newline.
        text = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
        if let Some(body) = text.trim_end().strip_suffix("```") {
            text = body;
        }
    }
    text.trim()
}

// ---------------------------------------------------------------------------
// Offline backend
// ---------------------------------------------------------------------------

/// Deterministic canned content, used when no API key is configured.
/// Mirrors the original portal's demo mode and doubles as the test
/// backend.
pub struct OfflineGenerator;

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    async fn study_guide(&self, topic: &str) -> Result<StudyGuide, PortalError> {
        Ok(StudyGuide {
            guides: vec![
                GuideSection {
                    title: format!("Basics of {topic}"),
                    content: format!(
                        "This guide covers the fundamental principles of {topic}. You should \
                         focus on syntax, core concepts, and common use cases."
                    ),
                    code: Some(format!(
                        "// Example code for {topic}\nconsole.log(\"Learning {topic}\");"
                    )),
                },
                GuideSection {
                    title: format!("Intermediate {topic}"),
                    content: format!(
                        "Diving deeper into {topic}, we look at architectural patterns, \
                         optimization, and advanced features."
                    ),
                    code: Some("/* Advanced pattern */".to_string()),
                },
                GuideSection {
                    title: format!("Expert {topic}"),
                    content: format!(
                        "Mastering {topic} involves understanding low-level implementations \
                         and complex integrations."
                    ),
                    code: None,
                },
            ],
        })
    }

    async fn practice_questions(&self, topic: &str) -> Result<Vec<PracticeQuestion>, PortalError> {
        Ok(vec![
            PracticeQuestion {
                q: format!("What is a primary feature of {topic}?"),
                a: "The primary feature is its versatility in modern development environments."
                    .to_string(),
            },
            PracticeQuestion {
                q: format!("Which of these is best practice for {topic}?"),
                a: "Following modular design patterns and ensuring code readability.".to_string(),
            },
            PracticeQuestion {
                q: format!("How does {topic} handle asynchronous operations?"),
                a: "It typically uses promises or equivalent patterns to manage non-blocking tasks."
                    .to_string(),
            },
        ])
    }

    async fn roadmap(&self, role: &str) -> Result<Roadmap, PortalError> {
        let step = |phase: &str, topics: [&str; 3], time: &str, importance: &str| RoadmapStep {
            phase: phase.to_string(),
            topics: topics.map(String::from).to_vec(),
            estimated_time: time.to_string(),
            importance: importance.to_string(),
        };
        Ok(Roadmap {
            role: role.to_string(),
            steps: vec![
                step(
                    "Fundamentals",
                    ["Core Theory", "Syntax basics", "Tooling"],
                    "1-2 weeks",
                    "High",
                ),
                step(
                    "Advanced Deep Dive",
                    ["Performance", "Security", "Testing"],
                    "3 weeks",
                    "High",
                ),
                step(
                    "Real-world Projects",
                    ["Portfolio pieces", "Open source", "Optimization"],
                    "Ongoing",
                    "Medium",
                ),
                step(
                    "Interview Readiness",
                    ["System Design", "Algorithms", "Soft Skills"],
                    "1 week",
                    "High",
                ),
            ],
        })
    }

    async fn review_resume(&self, _resume: &ResumeDocument) -> Result<ResumeCritique, PortalError> {
        Ok(ResumeCritique {
            score: 85,
            feedback: vec![
                "Strong presentation of technical expertise.".to_string(),
                "Clear and concise professional summary.".to_string(),
                "Achievements are well-defined but could use more metrics.".to_string(),
                "Design is highly modern and recruiter-friendly.".to_string(),
            ],
            suggestions: "To reach 100%, try adding more quantitative results (e.g., 'Improved \
                          performance by 30%') in your experience section."
                .to_string(),
        })
    }

    async fn parse_resume(&self, _raw_text: &str) -> Result<ResumePatch, PortalError> {
        // A basic canned extraction, enough for the demo flow.
        serde_json::from_str(
            r#"{
                "personalInfo": { "fullName": "Extracted Name", "role": "Software Developer", "summary": "Analysis complete from raw text..." },
                "experience": [{ "company": "Old Corp", "role": "Developer", "duration": "2020-2022", "desc": "Built various features." }],
                "education": [{ "school": "University", "degree": "B.S. CS", "year": "2019" }],
                "skills": [{ "name": "JavaScript" }, { "name": "React" }]
            }"#,
        )
        .map_err(|e| PortalError::GenerationFailed(format!("canned extraction: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_info_string() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_bare() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_json_fences(input), "[1, 2]");
    }

    #[test]
    fn test_strip_json_fences_unfenced_passthrough() {
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_malformed_payload_is_rejected_before_merge() {
        // The validating parse at the response boundary: a payload that
        // does not match the expected shape must fail, not merge.
        let fenced = "```json\n{\"guides\": \"not a list\"}\n```";
        let result: Result<StudyGuide, _> = serde_json::from_str(strip_json_fences(fenced));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_offline_study_guide_mentions_topic() {
        let guide = OfflineGenerator.study_guide("Rust").await.unwrap();
        assert_eq!(guide.guides.len(), 3);
        assert!(guide.guides[0].title.contains("Rust"));
        assert!(guide.guides[0].code.is_some());
    }

    #[tokio::test]
    async fn test_offline_roadmap_shape() {
        let roadmap = OfflineGenerator.roadmap("Backend Engineer").await.unwrap();
        assert_eq!(roadmap.role, "Backend Engineer");
        assert_eq!(roadmap.steps.len(), 4);
        assert_eq!(roadmap.steps[0].importance, "High");
    }

    #[tokio::test]
    async fn test_offline_parse_resume_patch() {
        let patch = OfflineGenerator.parse_resume("some resume text").await.unwrap();
        let personal = patch.personal_info.as_ref().unwrap();
        assert_eq!(personal.full_name.as_deref(), Some("Extracted Name"));
        assert!(patch.projects.is_none());
        assert_eq!(patch.skills.as_ref().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_offline_critique_is_deterministic() {
        let doc = ResumeDocument::default();
        let a = OfflineGenerator.review_resume(&doc).await.unwrap();
        let b = OfflineGenerator.review_resume(&doc).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.score, 85);
    }
}
