// src/templates/harvard.rs
//! Harvard-style template: serif typography, burgundy rules under each
//! section title, achievement-oriented experience entries.

use super::{rule, text};
use crate::format::{format_date_range, format_phone};
use crate::layout_engine::LayoutElement;
use itertools::Itertools;
use vitae_types::Resume;

const CURRENT_LABEL: &str = "Presente";
const DATE_DASH: &str = "–";

fn section_title(elements: &mut Vec<LayoutElement>, title: &str) {
    elements.push(text(title, "section-title"));
    elements.push(rule("section-line"));
}

pub fn build(resume: &Resume) -> Vec<LayoutElement> {
    let mut elements = Vec::new();
    let info = &resume.personal_info;

    elements.push(text(&info.full_name, "name"));
    let contact = [
        Some(info.email.clone()),
        Some(format_phone(&info.phone)),
        Some(info.location.clone()),
        info.linkedin.as_ref().map(|_| "LinkedIn".to_string()),
        info.website.as_ref().map(|_| "Portfolio".to_string()),
    ]
    .into_iter()
    .flatten()
    .join("  ·  ");
    elements.push(text(contact, "contact"));

    if let Some(summary) = &info.summary {
        section_title(&mut elements, "Resumen Profesional");
        elements.push(text(summary, "summary"));
    }

    if !resume.experience.is_empty() {
        section_title(&mut elements, "Experiencia Profesional");
        for job in &resume.experience {
            elements.push(text(&job.company, "item-title"));
            elements.push(text(&job.position, "item-subtitle"));
            elements.push(text(
                format_date_range(
                    &job.start_date,
                    job.end_date.as_deref(),
                    job.current,
                    CURRENT_LABEL,
                    DATE_DASH,
                ),
                "item-date",
            ));
            elements.push(text(&job.description, "text"));
            if let Some(achievements) = &job.achievements {
                for achievement in achievements {
                    elements.push(text(format!("• {}", achievement), "list-item"));
                }
            }
        }
    }

    if !resume.education.is_empty() {
        section_title(&mut elements, "Educación");
        for edu in &resume.education {
            elements.push(text(&edu.institution, "item-title"));
            let subtitle = match &edu.field {
                Some(field) => format!("{}, {}", edu.degree, field),
                None => edu.degree.clone(),
            };
            elements.push(text(subtitle, "item-subtitle"));
            elements.push(text(
                format_date_range(
                    &edu.start_date,
                    edu.end_date.as_deref(),
                    edu.current,
                    CURRENT_LABEL,
                    DATE_DASH,
                ),
                "item-date",
            ));
            if let Some(gpa) = &edu.gpa {
                elements.push(text(format!("GPA: {}", gpa), "text"));
            }
        }
    }

    if !resume.skills.is_empty() {
        section_title(&mut elements, "Habilidades");
        let skills = resume
            .skills
            .iter()
            .map(|s| format!("{} ({})", s.name, s.level))
            .join("  ·  ");
        elements.push(text(skills, "text"));
    }

    if !resume.languages.is_empty() {
        section_title(&mut elements, "Idiomas");
        let languages = resume
            .languages
            .iter()
            .map(|l| format!("{}: {}", l.name, l.level))
            .join("  ·  ");
        elements.push(text(languages, "text"));
    }

    if !resume.links.is_empty() {
        section_title(&mut elements, "Enlaces");
        let links = resume.links.iter().map(|l| l.title.as_str()).join("  ·  ");
        elements.push(text(links, "text"));
    }

    for section in &resume.custom_sections {
        section_title(&mut elements, &section.title);
        elements.push(text(&section.content, "text"));
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::LayoutElement;

    #[test]
    fn every_section_title_carries_a_rule() {
        let elements = build(&Resume::sample());
        for (i, element) in elements.iter().enumerate() {
            if let LayoutElement::Text(t) = element
                && t.style_name.as_deref() == Some("section-title")
            {
                assert!(
                    matches!(elements.get(i + 1), Some(LayoutElement::Rectangle(_))),
                    "section title '{}' is missing its rule",
                    t.content
                );
            }
        }
    }

    #[test]
    fn current_position_uses_the_presente_label() {
        let elements = build(&Resume::sample());
        let dates: Vec<&str> = elements
            .iter()
            .filter_map(|e| match e {
                LayoutElement::Text(t) if t.style_name.as_deref() == Some("item-date") => {
                    Some(t.content.as_str())
                }
                _ => None,
            })
            .collect();
        assert!(dates.iter().any(|d| d.contains("Presente")));
        assert!(dates.iter().all(|d| !d.contains("Actual")));
    }
}
