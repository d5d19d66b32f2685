//! Resume data shapes.
//!
//! Field names serialize in the original portal's camelCase layout so a
//! resume saved by either implementation loads in the other. Item ids
//! are strings here but the original wrote numeric timestamps, so id
//! fields accept both on the way in.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Linkedin,
    Github,
    Portfolio,
    Twitter,
    Email,
    Phone,
    #[serde(rename = "link", other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub philosophy: String,
    #[serde(rename = "customLinks")]
    pub links: Vec<ContactLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub company: String,
    pub role: String,
    pub duration: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub title: String,
    pub duration: String,
    pub stack: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillItem {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementItem {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageItem {
    pub name: String,
    pub label: String,
}

/// "A day in my life" breakdown, percentages summing to 100 by convention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayLifeItem {
    pub activity: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub title: String,
    pub content: String,
}

/// One user's full, section-ordered resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<ProjectItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillItem>,
    pub achievements: Vec<AchievementItem>,
    pub languages: Vec<LanguageItem>,
    pub day_life: Vec<DayLifeItem>,
    pub custom_sections: Vec<CustomSection>,
    /// Section ids in display order. Every id must name a built-in
    /// section or an existing custom section.
    pub section_order: Vec<String>,
    pub section_titles: HashMap<String, String>,
    pub template: String,
}

impl Default for ResumeDocument {
    /// The hard-coded skeleton persisted documents are merged over, so a
    /// missing section never surfaces as absent.
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            projects: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            achievements: Vec::new(),
            languages: Vec::new(),
            day_life: Vec::new(),
            custom_sections: Vec::new(),
            section_order: [
                "projects",
                "experience",
                "skills",
                "education",
                "achievements",
                "languages",
            ]
            .map(String::from)
            .to_vec(),
            section_titles: [
                ("projects", "PROJECTS"),
                ("experience", "EXPERIENCE"),
                ("skills", "TECHNICAL SKILLS"),
                ("education", "EDUCATION"),
                ("achievements", "HONORS & AWARDS"),
                ("languages", "LANGUAGES"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            template: "elite".to_string(),
        }
    }
}

/// Partial update over a `ResumeDocument`: present fields replace the
/// target's wholesale, absent fields leave it untouched. Personal info
/// merges at field granularity so an extraction without contact links
/// never wipes the links already on file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumePatch {
    pub personal_info: Option<PersonalPatch>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub projects: Option<Vec<ProjectItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub skills: Option<Vec<SkillItem>>,
    pub achievements: Option<Vec<AchievementItem>>,
    pub languages: Option<Vec<LanguageItem>>,
    pub day_life: Option<Vec<DayLifeItem>>,
    pub custom_sections: Option<Vec<CustomSection>>,
    pub section_order: Option<Vec<String>>,
    pub section_titles: Option<HashMap<String, String>>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalPatch {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub philosophy: Option<String>,
    #[serde(rename = "customLinks")]
    pub links: Option<Vec<ContactLink>>,
}

pub(crate) fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn new_custom_section_id() -> String {
    format!("custom_{}", Uuid::new_v4())
}

/// The original wrote `Date.now()` numbers as ids; accept both.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Default for ExperienceItem {
    fn default() -> Self {
        Self {
            id: new_item_id(),
            company: String::new(),
            role: String::new(),
            duration: String::new(),
            desc: String::new(),
        }
    }
}

impl Default for ProjectItem {
    fn default() -> Self {
        Self {
            id: new_item_id(),
            title: String::new(),
            duration: String::new(),
            stack: String::new(),
            desc: String::new(),
        }
    }
}

impl Default for EducationItem {
    fn default() -> Self {
        Self {
            id: new_item_id(),
            school: String::new(),
            degree: String::new(),
            year: String::new(),
        }
    }
}

impl Default for AchievementItem {
    fn default() -> Self {
        Self {
            id: new_item_id(),
            title: String::new(),
        }
    }
}

impl Default for CustomSection {
    fn default() -> Self {
        Self {
            id: new_custom_section_id(),
            title: "New Section".to_string(),
            content: String::new(),
        }
    }
}
