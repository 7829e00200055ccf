pub mod color;
pub mod geometry;
pub mod resume;

pub use color::Color;
pub use geometry::{Margins, Orientation, PageFormat};
pub use resume::{
    CustomSection, Education, Experience, Language, LanguageLevel, Link, PersonalInfo, Resume,
    Skill, SkillLevel,
};
