// AI collaborator prompt templates.
// All prompts sent to the generation backend are defined here.

pub const STUDY_GUIDE_PROMPT: &str = "Create a detailed study guide for: \"{topic}\". \
Return JSON ONLY, no code fences, in this format: \
{\"guides\": [{\"title\": \"string\", \"content\": \"string\", \"code\": \"string or omit\"}]}. \
Exactly 3 concepts, ordered from basics to expert.";

pub const PRACTICE_QUESTIONS_PROMPT: &str = "Generate 3 MCQ practice questions for \"{topic}\". \
Return a JSON array ONLY, no code fences: [{\"q\": \"string\", \"a\": \"string\"}].";

pub const ROADMAP_PROMPT: &str = "Create an interview preparation roadmap for the role: \"{role}\". \
Return JSON ONLY, no code fences, in this format: \
{\"role\": \"string\", \"steps\": [{\"phase\": \"string\", \"topics\": [\"string\"], \
\"estimatedTime\": \"string\", \"importance\": \"High\" | \"Medium\" | \"Low\"}]}.";

pub const REVIEW_RESUME_PROMPT: &str = "Review this resume: {resume_json}. \
Return JSON ONLY, no code fences, in this format: \
{\"score\": 0-100, \"feedback\": [\"string\"], \"suggestions\": \"string\"}.";

pub const PARSE_RESUME_PROMPT: &str = r#"Extract resume data from this text: "{raw_text}".
Return JSON ONLY, no code fences, in this format: {
  "personalInfo": {"fullName": "", "role": "", "summary": "", "email": "", "phone": "", "location": ""},
  "experience": [{"company": "", "role": "", "duration": "", "desc": ""}],
  "projects": [{"title": "", "duration": "", "stack": "", "desc": ""}],
  "education": [{"school": "", "degree": "", "year": ""}],
  "skills": [{"name": "", "level": 50}],
  "achievements": [{"title": ""}],
  "languages": [{"name": "", "label": ""}]
}. Omit any section you cannot fill. Fill as much as possible."#;
