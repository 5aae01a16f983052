//! Competency Extractor: maps raw profile records into competency entries.
//!
//! Extraction is a flat registry of tagged rules. Each rule names its target
//! competency, the raw domain and field it reads, and how a level is derived:
//! - normalized from a graded score (`SubjectScore`)
//! - copied from an existing 1–10 rating (`DimensionRating`)
//! - a fixed heuristic constant when only a tag or keyword is present (`Tag`, `Activity`)
//!
//! Rules never fail. A missing domain yields no entries. Duplicates across rules
//! are expected here and collapsed by `dedupe_latest`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::{CompetencyEntry, CompetencyLevel, Provenance, SourceDomain};
use crate::models::raw::RawDomainRecords;
use crate::store::ProfileStore;

/// Fixed level for a competency evidenced by a declared talent.
pub const TALENT_LEVEL: u8 = 7;
/// Fixed level for a competency evidenced only by an interest.
pub const INTEREST_LEVEL: u8 = 5;
/// Fixed level for a leadership-type activity role.
pub const ACTIVITY_ROLE_LEVEL: u8 = 7;
/// Fixed level for participation in a matching activity.
pub const ACTIVITY_LEVEL: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Talents,
    Interests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Name,
    Role,
}

#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    SubjectScore { keywords: &'static [&'static str] },
    DimensionRating { dimensions: &'static [&'static str] },
    Tag { field: TagField, keywords: &'static [&'static str], level: u8 },
    Activity { field: ActivityField, keywords: &'static [&'static str], level: u8 },
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub competency_id: &'static str,
    pub kind: RuleKind,
}

impl ExtractionRule {
    pub fn domain(&self) -> SourceDomain {
        match self.kind {
            RuleKind::SubjectScore { .. } => SourceDomain::Academic,
            RuleKind::DimensionRating { .. } => SourceDomain::SocialEmotional,
            RuleKind::Tag { .. } => SourceDomain::Interests,
            RuleKind::Activity { .. } => SourceDomain::Activities,
        }
    }

    pub fn source_field(&self) -> &'static str {
        match self.kind {
            RuleKind::SubjectScore { .. } => "academic.score",
            RuleKind::DimensionRating { .. } => "social_emotional.rating",
            RuleKind::Tag { field: TagField::Talents, .. } => "interests.talents",
            RuleKind::Tag { field: TagField::Interests, .. } => "interests.interests",
            RuleKind::Activity { field: ActivityField::Name, .. } => "activities.name",
            RuleKind::Activity { field: ActivityField::Role, .. } => "activities.role",
        }
    }

    /// Evaluates this rule alone against a person's raw records.
    pub fn apply(
        &self,
        records: &RawDomainRecords,
        assessed_at: DateTime<Utc>,
    ) -> Vec<CompetencyEntry> {
        let signals: Vec<(CompetencyLevel, DateTime<Utc>)> = match self.kind {
            RuleKind::SubjectScore { keywords } => records
                .academic
                .iter()
                .filter(|r| matches_any(&r.subject, keywords))
                .filter_map(|r| {
                    CompetencyLevel::normalize(r.score, r.scale_max).map(|l| (l, r.recorded_at))
                })
                .collect(),
            RuleKind::DimensionRating { dimensions } => records
                .social_emotional
                .iter()
                .filter(|r| {
                    let dim = normalize_dimension(&r.dimension);
                    dimensions.iter().any(|d| *d == dim)
                })
                .map(|r| (CompetencyLevel::clamped(r.rating as i64), r.recorded_at))
                .collect(),
            RuleKind::Tag { field, keywords, level } => match &records.interests {
                Some(profile) => {
                    let tags = match field {
                        TagField::Talents => &profile.talents,
                        TagField::Interests => &profile.interests,
                    };
                    if tags.iter().any(|t| matches_any(t, keywords)) {
                        vec![(CompetencyLevel::clamped(level as i64), profile.recorded_at)]
                    } else {
                        vec![]
                    }
                }
                None => vec![],
            },
            RuleKind::Activity { field, keywords, level } => records
                .activities
                .iter()
                .filter(|a| match field {
                    ActivityField::Name => matches_any(&a.name, keywords),
                    ActivityField::Role => a.role.as_deref().is_some_and(|r| matches_any(r, keywords)),
                })
                .map(|a| (CompetencyLevel::clamped(level as i64), a.recorded_at))
                .collect(),
        };

        signals
            .into_iter()
            .map(|(level, recorded_at)| CompetencyEntry {
                person_id: records.person_id,
                competency_id: self.competency_id.to_string(),
                current_level: level,
                assessed_at,
                provenance: Provenance {
                    domain: self.domain(),
                    source_field: self.source_field().to_string(),
                    recorded_at,
                },
            })
            .collect()
    }
}

const MATH: &[&str] = &["math", "algebra", "geometry", "calculus"];
const SCIENCE: &[&str] = &["science", "physics", "chemistry", "biology"];
const REASONING: &[&str] = &["philosophy", "logic", "economics"];
const HISTORY: &[&str] = &["history", "social studies", "civics", "geography"];
const WRITING: &[&str] = &["english", "literature", "writing", "composition", "language arts"];
const LANGUAGES: &[&str] = &["spanish", "french", "german", "chinese", "japanese", "latin", "foreign language"];
const COMPUTING: &[&str] = &["computer", "programming", "informatics", "coding"];
const STATISTICS: &[&str] = &["statistics", "data"];
const VISUAL_ART: &[&str] = &["art", "visual art", "drawing", "painting", "ceramics"];
const MUSIC: &[&str] = &["music", "band", "choir", "orchestra"];
const PHYSICAL_ED: &[&str] = &["physical education", "pe", "athletics", "sport"];
const CRAFT: &[&str] = &["woodwork", "metalwork", "crafts", "shop"];
const ICT: &[&str] = &["ict", "information technology", "digital"];
const DESIGN: &[&str] = &["design"];

const LEADING_TAGS: &[&str] = &["leadership", "leading", "organizing"];
const SPEAKING_TAGS: &[&str] = &["public speaking", "debate", "presenting", "speech"];
const ART_TAGS: &[&str] = &["art", "drawing", "painting", "sketching"];
const MUSIC_TAGS: &[&str] = &["music", "singing", "piano", "guitar", "violin", "drums"];
const SPORT_TAGS: &[&str] = &["sport", "athletic", "running", "swimming", "football", "basketball", "soccer", "dance"];
const CODING_TAGS: &[&str] = &["coding", "programming", "computers", "robotics"];
const WRITING_TAGS: &[&str] = &["writing", "poetry", "storytelling", "reading"];
const DESIGN_TAGS: &[&str] = &["design", "inventing", "building things"];
const CARING_TAGS: &[&str] = &["caring", "helping others", "listening", "volunteering"];
const SCIENCE_TAGS: &[&str] = &["science", "experiments", "nature", "astronomy"];
const PUZZLE_TAGS: &[&str] = &["puzzles", "chess", "data", "statistics"];
const LANGUAGE_TAGS: &[&str] = &["languages", "translation"];

const LEADER_ROLES: &[&str] = &["captain", "president", "leader", "head", "chair", "founder"];
const ORGANIZER_ROLES: &[&str] = &["organizer", "organiser", "coordinator", "treasurer", "manager", "secretary"];
const SPEAKING_ACTIVITIES: &[&str] = &["debate", "model un", "drama", "theatre", "theater", "toastmasters"];
const TEAM_ACTIVITIES: &[&str] = &["team", "club", "squad", "ensemble"];
const CODING_ACTIVITIES: &[&str] = &["robotics", "coding", "hackathon", "computer"];
const SPORT_ACTIVITIES: &[&str] = &["football", "basketball", "soccer", "swimming", "athletics", "track", "sport", "rugby", "volleyball"];
const MUSIC_ACTIVITIES: &[&str] = &["band", "orchestra", "choir", "music"];
const SERVICE_ACTIVITIES: &[&str] = &["volunteer", "community service", "tutoring", "mentoring"];

macro_rules! subject {
    ($id:literal, $kw:expr) => {
        ExtractionRule { competency_id: $id, kind: RuleKind::SubjectScore { keywords: $kw } }
    };
}

macro_rules! dimension {
    ($id:literal, $dims:expr) => {
        ExtractionRule { competency_id: $id, kind: RuleKind::DimensionRating { dimensions: $dims } }
    };
}

macro_rules! tag {
    ($id:literal, $field:expr, $kw:expr, $level:expr) => {
        ExtractionRule {
            competency_id: $id,
            kind: RuleKind::Tag { field: $field, keywords: $kw, level: $level },
        }
    };
}

macro_rules! activity {
    ($id:literal, $field:expr, $kw:expr, $level:expr) => {
        ExtractionRule {
            competency_id: $id,
            kind: RuleKind::Activity { field: $field, keywords: $kw, level: $level },
        }
    };
}

/// Registry order matters only for exact recency ties: later rules win.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    // Academic signals
    subject!("mathematical_reasoning", MATH),
    subject!("scientific_inquiry", SCIENCE),
    subject!("critical_thinking", REASONING),
    subject!("historical_analysis", HISTORY),
    subject!("written_communication", WRITING),
    subject!("foreign_language", LANGUAGES),
    subject!("programming", COMPUTING),
    subject!("data_analysis", STATISTICS),
    subject!("artistic_expression", VISUAL_ART),
    subject!("musical_ability", MUSIC),
    subject!("physical_fitness", PHYSICAL_ED),
    subject!("manual_dexterity", CRAFT),
    subject!("digital_literacy", ICT),
    subject!("design_thinking", DESIGN),
    // Social-emotional ratings
    dimension!("self_awareness", &["self_awareness"]),
    dimension!("self_management", &["self_management", "self_regulation"]),
    dimension!("empathy", &["social_awareness", "empathy"]),
    dimension!("teamwork", &["relationship_skills", "collaboration", "teamwork"]),
    dimension!("decision_making", &["responsible_decision_making", "decision_making"]),
    dimension!("leadership", &["leadership"]),
    // Interest and talent tags
    tag!("scientific_inquiry", TagField::Interests, SCIENCE_TAGS, INTEREST_LEVEL),
    tag!("data_analysis", TagField::Interests, PUZZLE_TAGS, INTEREST_LEVEL),
    tag!("foreign_language", TagField::Interests, LANGUAGE_TAGS, INTEREST_LEVEL),
    tag!("programming", TagField::Interests, CODING_TAGS, INTEREST_LEVEL),
    tag!("artistic_expression", TagField::Interests, ART_TAGS, INTEREST_LEVEL),
    tag!("musical_ability", TagField::Interests, MUSIC_TAGS, INTEREST_LEVEL),
    tag!("physical_fitness", TagField::Interests, SPORT_TAGS, INTEREST_LEVEL),
    tag!("written_communication", TagField::Interests, WRITING_TAGS, INTEREST_LEVEL),
    tag!("leadership", TagField::Talents, LEADING_TAGS, TALENT_LEVEL),
    tag!("public_speaking", TagField::Talents, SPEAKING_TAGS, TALENT_LEVEL),
    tag!("artistic_expression", TagField::Talents, ART_TAGS, TALENT_LEVEL),
    tag!("musical_ability", TagField::Talents, MUSIC_TAGS, TALENT_LEVEL),
    tag!("physical_fitness", TagField::Talents, SPORT_TAGS, TALENT_LEVEL),
    tag!("programming", TagField::Talents, CODING_TAGS, TALENT_LEVEL),
    tag!("written_communication", TagField::Talents, WRITING_TAGS, TALENT_LEVEL),
    tag!("design_thinking", TagField::Talents, DESIGN_TAGS, TALENT_LEVEL),
    tag!("empathy", TagField::Talents, CARING_TAGS, TALENT_LEVEL),
    // Extracurricular activities
    activity!("public_speaking", ActivityField::Name, SPEAKING_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("teamwork", ActivityField::Name, TEAM_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("programming", ActivityField::Name, CODING_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("physical_fitness", ActivityField::Name, SPORT_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("musical_ability", ActivityField::Name, MUSIC_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("empathy", ActivityField::Name, SERVICE_ACTIVITIES, ACTIVITY_LEVEL),
    activity!("project_management", ActivityField::Role, ORGANIZER_ROLES, ACTIVITY_LEVEL),
    activity!("leadership", ActivityField::Role, LEADER_ROLES, ACTIVITY_ROLE_LEVEL),
];

/// Reads a person's raw records and runs every rule over them.
/// Unknown person → `NotFound`. The result may contain duplicate competency ids.
pub async fn extract(
    store: &dyn ProfileStore,
    person_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<CompetencyEntry>, AppError> {
    let records = store
        .get_raw_records(person_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Person {person_id} not found")))?;
    Ok(extract_from_records(&records, now))
}

/// Pure extraction over already-loaded records.
pub fn extract_from_records(records: &RawDomainRecords, now: DateTime<Utc>) -> Vec<CompetencyEntry> {
    let entries: Vec<CompetencyEntry> = EXTRACTION_RULES
        .iter()
        .flat_map(|rule| rule.apply(records, now))
        .collect();
    debug!(
        "Extracted {} raw competency signals for person {}",
        entries.len(),
        records.person_id
    );
    entries
}

/// Keeps one entry per competency id: the one whose source record is most recent.
/// On equal recency the entry appearing later wins. Output is ordered by competency id.
pub fn dedupe_latest(entries: Vec<CompetencyEntry>) -> Vec<CompetencyEntry> {
    let mut latest: BTreeMap<String, CompetencyEntry> = BTreeMap::new();
    for entry in entries {
        match latest.get(&entry.competency_id) {
            Some(existing) if existing.provenance.recorded_at > entry.provenance.recorded_at => {}
            _ => {
                latest.insert(entry.competency_id.clone(), entry);
            }
        }
    }
    latest.into_values().collect()
}

/// Case-insensitive keyword test. Phrases match as substrings; single words
/// match whole tokens, or token prefixes for keywords of four letters or more
/// (so "math" covers "mathematics" but "art" does not cover "arts").
fn matches_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    keywords.iter().any(|kw| {
        if kw.contains(' ') {
            lower.contains(kw)
        } else {
            tokens
                .iter()
                .any(|t| *t == *kw || (kw.len() >= 4 && t.starts_with(kw)))
        }
    })
}

fn normalize_dimension(dimension: &str) -> String {
    dimension
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::{AcademicRecord, ActivityRecord, InterestProfile, SocialEmotionalRating};
    use crate::profile::taxonomy;
    use chrono::{Duration, TimeZone};

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn records() -> RawDomainRecords {
        RawDomainRecords {
            person_id: Uuid::new_v4(),
            display_name: Some("Ada".to_string()),
            ..Default::default()
        }
    }

    fn rule_for(id: &str, pred: impl Fn(&RuleKind) -> bool) -> &'static ExtractionRule {
        EXTRACTION_RULES
            .iter()
            .find(|r| r.competency_id == id && pred(&r.kind))
            .unwrap()
    }

    #[test]
    fn test_every_rule_targets_a_taxonomy_competency() {
        for rule in EXTRACTION_RULES {
            assert!(
                taxonomy::find(rule.competency_id).is_some(),
                "rule targets unknown competency {}",
                rule.competency_id
            );
        }
    }

    #[test]
    fn test_subject_rule_normalizes_score() {
        let mut r = records();
        r.academic.push(AcademicRecord {
            subject: "Mathematics II".to_string(),
            score: 72.0,
            scale_max: 100.0,
            recorded_at: t(1),
        });
        let rule = rule_for("mathematical_reasoning", |k| matches!(k, RuleKind::SubjectScore { .. }));
        let out = rule.apply(&r, t(10));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].current_level.value(), 7);
        assert_eq!(out[0].provenance.domain, SourceDomain::Academic);
        assert_eq!(out[0].provenance.recorded_at, t(1));
        assert_eq!(out[0].assessed_at, t(10));
    }

    #[test]
    fn test_subject_rule_skips_invalid_scale() {
        let mut r = records();
        r.academic.push(AcademicRecord {
            subject: "Physics".to_string(),
            score: 3.0,
            scale_max: 0.0,
            recorded_at: t(1),
        });
        let rule = rule_for("scientific_inquiry", |k| matches!(k, RuleKind::SubjectScore { .. }));
        assert!(rule.apply(&r, t(2)).is_empty());
    }

    #[test]
    fn test_short_keyword_requires_whole_token() {
        assert!(matches_any("Art & Design", &["art"]));
        assert!(!matches_any("Language Arts", &["art"]));
        assert!(matches_any("Advanced Mathematics", &["math"]));
        assert!(matches_any("Model UN Society", &["model un"]));
    }

    #[test]
    fn test_dimension_rule_copies_and_clamps_rating() {
        let mut r = records();
        r.social_emotional.push(SocialEmotionalRating {
            dimension: "Relationship Skills".to_string(),
            rating: 14,
            recorded_at: t(3),
        });
        let rule = rule_for("teamwork", |k| matches!(k, RuleKind::DimensionRating { .. }));
        let out = rule.apply(&r, t(4));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].current_level.value(), 10);
    }

    #[test]
    fn test_talent_tag_uses_fixed_level() {
        let mut r = records();
        r.interests = Some(InterestProfile {
            interests: vec![],
            talents: vec!["Public Speaking".to_string()],
            recorded_at: t(5),
        });
        let rule = rule_for("public_speaking", |k| matches!(k, RuleKind::Tag { .. }));
        let out = rule.apply(&r, t(6));
        assert_eq!(out[0].current_level.value(), TALENT_LEVEL);
        assert_eq!(out[0].provenance.source_field, "interests.talents");
    }

    #[test]
    fn test_activity_role_rule() {
        let mut r = records();
        r.activities.push(ActivityRecord {
            name: "Chess Club".to_string(),
            role: Some("Club President".to_string()),
            recorded_at: t(7),
        });
        let rule = rule_for("leadership", |k| matches!(k, RuleKind::Activity { .. }));
        let out = rule.apply(&r, t(8));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].current_level.value(), ACTIVITY_ROLE_LEVEL);
    }

    #[test]
    fn test_missing_domains_yield_no_entries() {
        assert!(extract_from_records(&records(), t(1)).is_empty());
    }

    #[test]
    fn test_dedupe_keeps_most_recent_source() {
        let mut r = records();
        r.academic.push(AcademicRecord {
            subject: "Computer Science".to_string(),
            score: 9.0,
            scale_max: 10.0,
            recorded_at: t(1),
        });
        r.interests = Some(InterestProfile {
            interests: vec!["robotics".to_string()],
            talents: vec![],
            recorded_at: t(9),
        });
        let raw = extract_from_records(&r, t(10));
        assert!(raw.iter().filter(|e| e.competency_id == "programming").count() >= 2);

        let deduped = dedupe_latest(raw);
        let programming: Vec<_> = deduped
            .iter()
            .filter(|e| e.competency_id == "programming")
            .collect();
        assert_eq!(programming.len(), 1);
        assert_eq!(programming[0].current_level.value(), INTEREST_LEVEL);
        assert_eq!(programming[0].provenance.recorded_at, t(9));
    }

    #[test]
    fn test_dedupe_tie_goes_to_later_entry() {
        let person_id = Uuid::new_v4();
        let mk = |level: i64| CompetencyEntry {
            person_id,
            competency_id: "teamwork".to_string(),
            current_level: CompetencyLevel::clamped(level),
            assessed_at: t(2),
            provenance: Provenance {
                domain: SourceDomain::Activities,
                source_field: "activities.name".to_string(),
                recorded_at: t(1),
            },
        };
        let out = dedupe_latest(vec![mk(3), mk(6)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].current_level.value(), 6);
    }

    #[test]
    fn test_dedupe_output_sorted_by_id() {
        let mut r = records();
        let base = t(1);
        r.social_emotional = vec![
            SocialEmotionalRating { dimension: "teamwork".into(), rating: 5, recorded_at: base },
            SocialEmotionalRating {
                dimension: "empathy".into(),
                rating: 6,
                recorded_at: base + Duration::hours(1),
            },
        ];
        let ids: Vec<_> = dedupe_latest(extract_from_records(&r, t(2)))
            .into_iter()
            .map(|e| e.competency_id)
            .collect();
        assert_eq!(ids, vec!["empathy", "teamwork"]);
    }
}
