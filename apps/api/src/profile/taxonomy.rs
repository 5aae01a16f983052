//! Competency Taxonomy: static reference definitions.

use crate::models::competency::{Competency, CompetencyCategory};

use CompetencyCategory::*;

pub const TAXONOMY: &[Competency] = &[
    Competency { id: "mathematical_reasoning", name: "Mathematical Reasoning", category: Academic },
    Competency { id: "scientific_inquiry", name: "Scientific Inquiry", category: Academic },
    Competency { id: "critical_thinking", name: "Critical Thinking", category: Academic },
    Competency { id: "historical_analysis", name: "Historical Analysis", category: Academic },
    Competency { id: "self_awareness", name: "Self-Awareness", category: SocialEmotional },
    Competency { id: "self_management", name: "Self-Management", category: SocialEmotional },
    Competency { id: "empathy", name: "Empathy", category: SocialEmotional },
    Competency { id: "teamwork", name: "Teamwork", category: SocialEmotional },
    Competency { id: "decision_making", name: "Responsible Decision-Making", category: SocialEmotional },
    Competency { id: "programming", name: "Programming", category: Technical },
    Competency { id: "data_analysis", name: "Data Analysis", category: Technical },
    Competency { id: "digital_literacy", name: "Digital Literacy", category: Technical },
    Competency { id: "artistic_expression", name: "Artistic Expression", category: Creative },
    Competency { id: "musical_ability", name: "Musical Ability", category: Creative },
    Competency { id: "design_thinking", name: "Design Thinking", category: Creative },
    Competency { id: "physical_fitness", name: "Physical Fitness", category: Physical },
    Competency { id: "manual_dexterity", name: "Manual Dexterity", category: Physical },
    Competency { id: "leadership", name: "Leadership", category: Leadership },
    Competency { id: "project_management", name: "Project Management", category: Leadership },
    Competency { id: "written_communication", name: "Written Communication", category: Communication },
    Competency { id: "public_speaking", name: "Public Speaking", category: Communication },
    Competency { id: "foreign_language", name: "Foreign Language", category: Communication },
];

pub fn find(id: &str) -> Option<&'static Competency> {
    TAXONOMY.iter().find(|c| c.id == id)
}

/// Display name for a competency id; unknown ids are humanised
/// (`"quantum_cooking"` → `"Quantum Cooking"`).
pub fn display_name(id: &str) -> String {
    match find(id) {
        Some(c) => c.name.to_string(),
        None => id
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut c = w.chars();
                match c.next() {
                    None => String::new(),
                    Some(f) => f.to_uppercase().to_string() + c.as_str(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

pub fn by_category(category: CompetencyCategory) -> impl Iterator<Item = &'static Competency> {
    TAXONOMY.iter().filter(move |c| c.category == category)
}
