// src/templates/ats.rs
//! ATS-friendly template: flat structure, no decorative elements, standard
//! section order, so applicant-tracking parsers can read the output.

use super::{rule, text};
use crate::format::{format_date_range, format_phone};
use crate::layout_engine::LayoutElement;
use itertools::Itertools;
use vitae_types::Resume;

const CURRENT_LABEL: &str = "Actual";
const DATE_DASH: &str = "-";

pub fn build(resume: &Resume) -> Vec<LayoutElement> {
    let mut elements = Vec::new();
    let info = &resume.personal_info;

    // Header: name plus a single contact line under a separator rule.
    elements.push(text(&info.full_name, "name"));
    let contact = [
        Some(info.email.clone()),
        Some(format_phone(&info.phone)),
        Some(info.location.clone()),
        info.linkedin.as_ref().map(|_| "LinkedIn".to_string()),
        info.website.as_ref().map(|_| "Web".to_string()),
    ]
    .into_iter()
    .flatten()
    .join(" · ");
    elements.push(text(contact, "contact"));
    elements.push(rule("header-rule"));

    if let Some(summary) = &info.summary {
        elements.push(text("Resumen Profesional", "section-title"));
        elements.push(text(summary, "text"));
    }

    if !resume.experience.is_empty() {
        elements.push(text("Experiencia Laboral", "section-title"));
        for job in &resume.experience {
            elements.push(text(&job.position, "item-title"));
            let range = format_date_range(
                &job.start_date,
                job.end_date.as_deref(),
                job.current,
                CURRENT_LABEL,
                DATE_DASH,
            );
            elements.push(text(format!("{} · {}", job.company, range), "item-meta"));
            elements.push(text(&job.description, "text"));
            if let Some(achievements) = &job.achievements {
                for achievement in achievements {
                    elements.push(text(format!("• {}", achievement), "list-item"));
                }
            }
        }
    }

    if !resume.education.is_empty() {
        elements.push(text("Educación", "section-title"));
        for edu in &resume.education {
            elements.push(text(&edu.degree, "item-title"));
            let range = format_date_range(
                &edu.start_date,
                edu.end_date.as_deref(),
                edu.current,
                CURRENT_LABEL,
                DATE_DASH,
            );
            let meta = match &edu.field {
                Some(field) => format!("{} · {} · {}", edu.institution, field, range),
                None => format!("{} · {}", edu.institution, range),
            };
            elements.push(text(meta, "item-meta"));
            if let Some(gpa) = &edu.gpa {
                elements.push(text(format!("GPA: {}", gpa), "text"));
            }
        }
    }

    if !resume.skills.is_empty() {
        elements.push(text("Habilidades", "section-title"));
        let skills = resume
            .skills
            .iter()
            .map(|s| format!("{} ({})", s.name, s.level))
            .join(", ");
        elements.push(text(skills, "text"));
    }

    if !resume.languages.is_empty() {
        elements.push(text("Idiomas", "section-title"));
        let languages = resume
            .languages
            .iter()
            .map(|l| format!("{}: {}", l.name, l.level))
            .join(", ");
        elements.push(text(languages, "text"));
    }

    if !resume.links.is_empty() {
        elements.push(text("Enlaces", "section-title"));
        let links = resume.links.iter().map(|l| l.title.as_str()).join(", ");
        elements.push(text(links, "text"));
    }

    for section in &resume.custom_sections {
        elements.push(text(&section.title, "section-title"));
        elements.push(text(&section.content, "text"));
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::LayoutElement;

    fn rendered_text(elements: &[LayoutElement]) -> String {
        elements
            .iter()
            .filter_map(|e| match e {
                LayoutElement::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_all_populated_sections() {
        let content = rendered_text(&build(&Resume::sample()));
        assert!(content.contains("María González López"));
        assert!(content.contains("Resumen Profesional"));
        assert!(content.contains("Experiencia Laboral"));
        assert!(content.contains("Educación"));
        assert!(content.contains("Habilidades"));
        assert!(content.contains("Idiomas"));
        assert!(content.contains("Enlaces"));
    }

    #[test]
    fn current_position_uses_the_actual_label() {
        let content = rendered_text(&build(&Resume::sample()));
        assert!(content.contains("Enero 2022 - Actual"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut resume = Resume::sample();
        resume.skills.clear();
        resume.links.clear();
        let content = rendered_text(&build(&resume));
        assert!(!content.contains("Habilidades"));
        assert!(!content.contains("Enlaces"));
    }
}
