//! The résumé document model.
//!
//! This is the data boundary of the whole system: the exporters treat a
//! [`Resume`] as an opaque serializable value and never mutate it. Field
//! names follow the JSON wire shape (camelCase) so that a document exported
//! to JSON and re-imported is field-for-field identical.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    #[serde(rename = "principiante")]
    Principiante,
    #[serde(rename = "intermedio")]
    Intermedio,
    #[serde(rename = "avanzado")]
    Avanzado,
    #[serde(rename = "experto")]
    Experto,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkillLevel::Principiante => "principiante",
            SkillLevel::Intermedio => "intermedio",
            SkillLevel::Avanzado => "avanzado",
            SkillLevel::Experto => "experto",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    pub level: LanguageLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageLevel {
    #[serde(rename = "básico")]
    Basico,
    #[serde(rename = "intermedio")]
    Intermedio,
    #[serde(rename = "avanzado")]
    Avanzado,
    #[serde(rename = "nativo")]
    Nativo,
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LanguageLevel::Basico => "básico",
            LanguageLevel::Intermedio => "intermedio",
            LanguageLevel::Avanzado => "avanzado",
            LanguageLevel::Nativo => "nativo",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Resume {
    /// The demo document used as default content and in tests.
    pub fn sample() -> Self {
        Resume {
            personal_info: PersonalInfo {
                full_name: "María González López".to_string(),
                email: "maria.gonzalez@email.com".to_string(),
                phone: "+34 612 345 678".to_string(),
                location: "Madrid, España".to_string(),
                linkedin: Some("https://linkedin.com/in/mariagonzalez".to_string()),
                website: Some("https://mariagonzalez.dev".to_string()),
                summary: Some(
                    "Desarrolladora Full Stack con más de 5 años de experiencia en desarrollo \
                     web. Especializada en React, TypeScript y Node.js. Apasionada por crear \
                     experiencias de usuario excepcionales y código limpio. Líder técnica con \
                     experiencia en gestión de equipos ágiles."
                        .to_string(),
                ),
            },
            experience: vec![
                Experience {
                    id: "1".to_string(),
                    company: "Tech Solutions Madrid".to_string(),
                    position: "Senior Frontend Developer".to_string(),
                    start_date: "2022-01".to_string(),
                    end_date: None,
                    current: true,
                    description: "Lidero un equipo de 5 desarrolladores frontend en proyectos \
                                  de e-commerce. Implemento arquitecturas escalables con React \
                                  y TypeScript. Reduje el tiempo de carga de la aplicación en \
                                  un 40% mediante optimizaciones de rendimiento."
                        .to_string(),
                    achievements: Some(vec![
                        "Migración exitosa de aplicación legacy a React 18".to_string(),
                        "Implementación de CI/CD que redujo deployment time en 60%".to_string(),
                        "Mentoring de 3 desarrolladores junior".to_string(),
                    ]),
                },
                Experience {
                    id: "2".to_string(),
                    company: "Startup Innovadora".to_string(),
                    position: "Full Stack Developer".to_string(),
                    start_date: "2020-03".to_string(),
                    end_date: Some("2021-12".to_string()),
                    current: false,
                    description: "Desarrollé aplicaciones web desde cero usando React, Node.js \
                                  y PostgreSQL. Colaboré estrechamente con diseñadores UX para \
                                  implementar interfaces intuitivas. Participé en todas las \
                                  fases del desarrollo ágil."
                        .to_string(),
                    achievements: Some(vec![
                        "Desarrollo de MVP que consiguió 100K usuarios en 6 meses".to_string(),
                        "Integración de pasarela de pagos con Stripe".to_string(),
                    ]),
                },
                Experience {
                    id: "3".to_string(),
                    company: "Agencia Digital Creativa".to_string(),
                    position: "Junior Web Developer".to_string(),
                    start_date: "2019-06".to_string(),
                    end_date: Some("2020-02".to_string()),
                    current: false,
                    description: "Desarrollo de sitios web responsivos para clientes diversos. \
                                  Maquetación HTML/CSS semántica y accesible. Optimización SEO \
                                  y performance."
                        .to_string(),
                    achievements: None,
                },
            ],
            education: vec![
                Education {
                    id: "1".to_string(),
                    institution: "Universidad Complutense de Madrid".to_string(),
                    degree: "Grado en Ingeniería Informática".to_string(),
                    field: Some("Computación".to_string()),
                    start_date: "2015-09".to_string(),
                    end_date: Some("2019-06".to_string()),
                    current: false,
                    graduation_date: Some("Junio 2019".to_string()),
                    gpa: Some("8.5/10".to_string()),
                },
                Education {
                    id: "2".to_string(),
                    institution: "Ironhack Madrid".to_string(),
                    degree: "Bootcamp Web Development".to_string(),
                    field: Some("Desarrollo Web Full Stack".to_string()),
                    start_date: "2019-01".to_string(),
                    end_date: Some("2019-04".to_string()),
                    current: false,
                    graduation_date: Some("Abril 2019".to_string()),
                    gpa: None,
                },
            ],
            skills: vec![
                Skill {
                    id: "1".to_string(),
                    name: "React".to_string(),
                    level: SkillLevel::Experto,
                    category: Some("Frontend".to_string()),
                },
                Skill {
                    id: "2".to_string(),
                    name: "TypeScript".to_string(),
                    level: SkillLevel::Experto,
                    category: Some("Lenguajes".to_string()),
                },
                Skill {
                    id: "3".to_string(),
                    name: "Node.js".to_string(),
                    level: SkillLevel::Avanzado,
                    category: Some("Backend".to_string()),
                },
                Skill {
                    id: "4".to_string(),
                    name: "PostgreSQL".to_string(),
                    level: SkillLevel::Avanzado,
                    category: Some("Bases de Datos".to_string()),
                },
                Skill {
                    id: "5".to_string(),
                    name: "AWS".to_string(),
                    level: SkillLevel::Intermedio,
                    category: Some("Cloud".to_string()),
                },
                Skill {
                    id: "6".to_string(),
                    name: "Docker".to_string(),
                    level: SkillLevel::Intermedio,
                    category: Some("DevOps".to_string()),
                },
            ],
            languages: vec![
                Language {
                    id: "1".to_string(),
                    name: "Español".to_string(),
                    level: LanguageLevel::Nativo,
                },
                Language {
                    id: "2".to_string(),
                    name: "Inglés".to_string(),
                    level: LanguageLevel::Avanzado,
                },
                Language {
                    id: "3".to_string(),
                    name: "Francés".to_string(),
                    level: LanguageLevel::Intermedio,
                },
            ],
            links: vec![Link {
                id: "1".to_string(),
                title: "GitHub".to_string(),
                url: "https://github.com/mariagonzalez".to_string(),
            }],
            custom_sections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_is_identical() {
        let resume = Resume::sample();
        let json = serde_json::to_string(&resume).unwrap();
        let back: Resume = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resume);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let json = serde_json::to_string(&Resume::sample()).unwrap();
        assert!(json.contains("\"personalInfo\""));
        assert!(json.contains("\"fullName\""));
        assert!(json.contains("\"startDate\""));
        assert!(json.contains("\"customSections\""));
    }

    #[test]
    fn optional_collections_default_to_empty() {
        let json = r#"{
            "personalInfo": {
                "fullName": "Test",
                "email": "t@example.com",
                "phone": "600000000",
                "location": "Madrid"
            },
            "experience": [],
            "education": []
        }"#;
        let resume: Resume = serde_json::from_str(json).unwrap();
        assert!(resume.skills.is_empty());
        assert!(resume.languages.is_empty());
        assert!(resume.links.is_empty());
        assert!(resume.custom_sections.is_empty());
    }

    #[test]
    fn levels_deserialize_from_spanish_labels() {
        let skill: Skill =
            serde_json::from_str(r#"{"id":"1","name":"React","level":"experto"}"#).unwrap();
        assert_eq!(skill.level, SkillLevel::Experto);

        let lang: Language =
            serde_json::from_str(r#"{"id":"1","name":"Español","level":"nativo"}"#).unwrap();
        assert_eq!(lang.level, LanguageLevel::Nativo);
    }
}
