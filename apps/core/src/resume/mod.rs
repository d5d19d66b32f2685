//! Resume Document Model — structured, section-ordered resume editing.
//!
//! All operations act on a single in-memory document owned by the
//! current user. Nothing is persisted until an explicit `save`; `load`
//! merges the persisted document over the hard-coded skeleton so a
//! missing section never surfaces as absent.

pub mod model;

use anyhow::Context;
use tracing::{debug, warn};

use crate::ai::ContentGenerator;
use crate::errors::PortalError;
use crate::store::{keys, SharedStore};

pub use model::{
    AchievementItem, ContactLink, CustomSection, DayLifeItem, EducationItem, ExperienceItem,
    LanguageItem, LinkKind, PersonalInfo, PersonalPatch, ProjectItem, ResumeDocument, ResumePatch,
    SkillItem,
};

/// Addresses one repeatable section for positional edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Experience,
    Projects,
    Education,
    Skills,
    Achievements,
    Languages,
    DayLife,
    /// Contact links inside personal info; edited with the same
    /// positional operations as the repeatable sections.
    Links,
    /// User-created sections, positional within `custom_sections`.
    Custom,
}

impl SectionKind {
    fn name(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Achievements => "achievements",
            SectionKind::Languages => "languages",
            SectionKind::DayLife => "dayLife",
            SectionKind::Links => "links",
            SectionKind::Custom => "custom",
        }
    }
}

impl ResumeDocument {
    /// Appends a blank item with a fresh id to the matching section.
    /// Custom sections are created with [`ResumeDocument::add_custom_section`].
    pub fn add_item(&mut self, kind: SectionKind) {
        match kind {
            SectionKind::Experience => self.experience.push(ExperienceItem::default()),
            SectionKind::Projects => self.projects.push(ProjectItem::default()),
            SectionKind::Education => self.education.push(EducationItem::default()),
            SectionKind::Skills => self.skills.push(SkillItem {
                name: String::new(),
                level: 50,
            }),
            SectionKind::Achievements => self.achievements.push(AchievementItem::default()),
            SectionKind::Languages => self.languages.push(LanguageItem::default()),
            SectionKind::DayLife => self.day_life.push(DayLifeItem::default()),
            SectionKind::Links => self.personal_info.links.push(ContactLink {
                kind: LinkKind::Other,
                url: String::new(),
            }),
            SectionKind::Custom => {
                self.add_custom_section();
            }
        }
    }

    /// Creates a new custom section, appends its id to the section order,
    /// and returns the id.
    pub fn add_custom_section(&mut self) -> String {
        let section = CustomSection::default();
        let id = section.id.clone();
        self.custom_sections.push(section);
        self.section_order.push(id.clone());
        id
    }

    /// Removes one item by position. Removing a custom section also
    /// strips its id from the section order.
    pub fn remove_item(&mut self, kind: SectionKind, index: usize) -> Result<(), PortalError> {
        match kind {
            SectionKind::Experience => {
                remove_at(&mut self.experience, index)?;
            }
            SectionKind::Projects => {
                remove_at(&mut self.projects, index)?;
            }
            SectionKind::Education => {
                remove_at(&mut self.education, index)?;
            }
            SectionKind::Skills => {
                remove_at(&mut self.skills, index)?;
            }
            SectionKind::Achievements => {
                remove_at(&mut self.achievements, index)?;
            }
            SectionKind::Languages => {
                remove_at(&mut self.languages, index)?;
            }
            SectionKind::DayLife => {
                remove_at(&mut self.day_life, index)?;
            }
            SectionKind::Links => {
                remove_at(&mut self.personal_info.links, index)?;
            }
            SectionKind::Custom => {
                let removed = remove_at(&mut self.custom_sections, index)?;
                self.section_order.retain(|id| id != &removed.id);
                self.section_titles.remove(&removed.id);
            }
        }
        Ok(())
    }

    /// Sets one field in one item, addressed by position and form field
    /// name. Bad positions and unknown field names are rejected without
    /// touching the document.
    pub fn update_field(
        &mut self,
        kind: SectionKind,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), PortalError> {
        let unknown = || PortalError::UnknownField {
            section: kind.name().to_string(),
            field: field.to_string(),
        };

        match kind {
            SectionKind::Experience => {
                let item = item_at(&mut self.experience, index)?;
                match field {
                    "company" => item.company = value.to_string(),
                    "role" => item.role = value.to_string(),
                    "duration" => item.duration = value.to_string(),
                    "desc" => item.desc = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Projects => {
                let item = item_at(&mut self.projects, index)?;
                match field {
                    "title" => item.title = value.to_string(),
                    "duration" => item.duration = value.to_string(),
                    "stack" => item.stack = value.to_string(),
                    "desc" => item.desc = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Education => {
                let item = item_at(&mut self.education, index)?;
                match field {
                    "school" => item.school = value.to_string(),
                    "degree" => item.degree = value.to_string(),
                    "year" => item.year = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Skills => {
                let item = item_at(&mut self.skills, index)?;
                match field {
                    "name" => item.name = value.to_string(),
                    "level" => item.level = parse_number(field, value)?,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Achievements => {
                let item = item_at(&mut self.achievements, index)?;
                match field {
                    "title" => item.title = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Languages => {
                let item = item_at(&mut self.languages, index)?;
                match field {
                    "name" => item.name = value.to_string(),
                    "label" => item.label = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
            SectionKind::DayLife => {
                let item = item_at(&mut self.day_life, index)?;
                match field {
                    "activity" => item.activity = value.to_string(),
                    "percentage" => item.percentage = parse_number(field, value)?,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Links => {
                let item = item_at(&mut self.personal_info.links, index)?;
                match field {
                    "url" => item.url = value.to_string(),
                    "type" => {
                        item.kind = serde_json::from_value(serde_json::Value::String(
                            value.to_string(),
                        ))
                        .map_err(|_| unknown())?
                    }
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Custom => {
                let item = item_at(&mut self.custom_sections, index)?;
                match field {
                    "title" => item.title = value.to_string(),
                    "content" => item.content = value.to_string(),
                    _ => return Err(unknown()),
                }
            }
        }
        Ok(())
    }

    /// Renames a section's display label.
    pub fn set_section_title(&mut self, section_id: &str, title: &str) {
        self.section_titles
            .insert(section_id.to_string(), title.to_string());
    }

    /// Swaps adjacent entries in the section order. Moves past either
    /// boundary are no-ops.
    pub fn move_section(&mut self, index: usize, direction: i32) -> Result<(), PortalError> {
        let len = self.section_order.len();
        if index >= len {
            return Err(PortalError::IndexOutOfRange { index, len });
        }
        let Some(target) = index.checked_add_signed(direction as isize) else {
            return Ok(());
        };
        if target >= len {
            return Ok(());
        }
        self.section_order.swap(index, target);
        Ok(())
    }

    /// Merges a partial document: present fields replace wholesale,
    /// absent fields stay untouched.
    pub fn apply_patch(&mut self, patch: ResumePatch) {
        if let Some(personal) = patch.personal_info {
            let target = &mut self.personal_info;
            merge_field(&mut target.full_name, personal.full_name);
            merge_field(&mut target.role, personal.role);
            merge_field(&mut target.email, personal.email);
            merge_field(&mut target.phone, personal.phone);
            merge_field(&mut target.location, personal.location);
            merge_field(&mut target.summary, personal.summary);
            merge_field(&mut target.philosophy, personal.philosophy);
            merge_field(&mut target.links, personal.links);
        }
        merge_field(&mut self.experience, patch.experience);
        merge_field(&mut self.projects, patch.projects);
        merge_field(&mut self.education, patch.education);
        merge_field(&mut self.skills, patch.skills);
        merge_field(&mut self.achievements, patch.achievements);
        merge_field(&mut self.languages, patch.languages);
        merge_field(&mut self.day_life, patch.day_life);
        merge_field(&mut self.custom_sections, patch.custom_sections);
        merge_field(&mut self.section_order, patch.section_order);
        merge_field(&mut self.section_titles, patch.section_titles);
        merge_field(&mut self.template, patch.template);
    }

    /// Full snapshot for backup/download. Pure serialization.
    pub fn export_json(&self) -> Result<String, PortalError> {
        serde_json::to_string_pretty(self)
            .context("failed to serialize resume document")
            .map_err(PortalError::from)
    }

    /// Merges a backup file over this document. Malformed input fails
    /// with `ImportFormat` and leaves the document unchanged.
    pub fn import_json(&mut self, text: &str) -> Result<(), PortalError> {
        let patch: ResumePatch = serde_json::from_str(text)
            .map_err(|e| PortalError::ImportFormat(format!("invalid backup file: {e}")))?;
        self.apply_patch(patch);
        Ok(())
    }

    /// Delegates extraction of free-form resume text to the AI
    /// collaborator and merges the validated result like a JSON import.
    pub async fn import_from_text(
        &mut self,
        raw_text: &str,
        generator: &dyn ContentGenerator,
    ) -> Result<(), PortalError> {
        let patch = generator.parse_resume(raw_text).await?;
        self.apply_patch(patch);
        Ok(())
    }
}

fn merge_field<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn item_at<T>(items: &mut [T], index: usize) -> Result<&mut T, PortalError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(PortalError::IndexOutOfRange { index, len })
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, PortalError> {
    if index >= items.len() {
        return Err(PortalError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

fn parse_number(field: &str, value: &str) -> Result<u8, PortalError> {
    value
        .trim()
        .parse()
        .map_err(|_| PortalError::ImportFormat(format!("field '{field}' expects a number 0-255")))
}

/// Per-user resume persistence over the key-value store. One document
/// per user, created lazily with defaults on first access, overwritten
/// wholesale on save.
#[derive(Clone)]
pub struct ResumeStore {
    store: SharedStore,
}

impl ResumeStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn save(&self, user_email: &str, document: &ResumeDocument) -> Result<(), PortalError> {
        let json =
            serde_json::to_string(document).context("failed to serialize resume document")?;
        debug!("Saving resume for {user_email}");
        self.store.set(&keys::resume(user_email), &json);
        Ok(())
    }

    /// The persisted document merged over the default skeleton. Corrupt
    /// or absent state yields the skeleton, never an error.
    pub fn load(&self, user_email: &str) -> ResumeDocument {
        let mut document = ResumeDocument::default();
        if let Some(json) = self.store.get(&keys::resume(user_email)) {
            match serde_json::from_str::<ResumePatch>(&json) {
                Ok(patch) => document.apply_patch(patch),
                Err(e) => warn!("Stored resume for {user_email} is corrupt ({e}); using defaults"),
            }
        }
        document
    }
}
