//! Match Scorer: weighted compatibility between a job posting and a parsed résumé.
//!
//! Default: `WeightedSkillScorer` (critical-weighted skill coverage plus fixed
//! experience/education/formatting slots). Callers hold it as `Arc<dyn JobScorer>`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::models::{JobPosting, MatchResult, ScoredJob};
use crate::skills::parser::ParsedDocument;
use crate::skills::vocabulary::CriticalSkills;

const CRITICAL_WEIGHT: u32 = 3;
const STANDARD_WEIGHT: u32 = 1;
const SCORE_CAP: u32 = 98;
const MAX_MISSING_SKILLS: usize = 6;
const SENIOR_MIN_YEARS: u32 = 3;
const SENIOR_PENALTY_SCORE: f64 = 40.0;
const FULL_SCORE: f64 = 100.0;
/// Title words this short are too generic to stand in for skills.
const MIN_TITLE_WORD_CHARS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("Weight '{0}' must be non-negative")]
    Negative(&'static str),

    #[error("Weights must sum to 1.0, got {0}")]
    Sum(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub keywords: f64,
    pub experience: f64,
    pub education: f64,
    pub formatting: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.50,
            keywords: 0.15,
            experience: 0.20,
            education: 0.10,
            formatting: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        let named = [
            ("skills", self.skills),
            ("keywords", self.keywords),
            ("experience", self.experience),
            ("education", self.education),
            ("formatting", self.formatting),
        ];
        if let Some((name, _)) = named.iter().find(|(_, w)| *w < 0.0) {
            return Err(WeightsError::Negative(*name));
        }
        let sum: f64 = named.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(WeightsError::Sum(sum));
        }
        Ok(())
    }
}

/// Per-dimension scores (0 – 100) and their weighted, uncapped combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub keywords: f64,
    pub experience: f64,
    /// Fixed at 100 until an education signal exists.
    pub education: f64,
    /// Fixed at 100 until a formatting signal exists.
    pub formatting: f64,
    pub raw: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one posting against one résumé. Implementations must be pure.
pub trait JobScorer: Send + Sync {
    /// A missing or unparsed résumé scores `(0, [])`.
    fn score(&self, job: &JobPosting, resume: Option<&ParsedDocument>) -> MatchResult;

    fn backend(&self) -> &'static str;

    /// Per-dimension diagnostics, for scorers that have them.
    fn explain(&self, _job: &JobPosting, _resume: &ParsedDocument) -> Option<ScoreBreakdown> {
        None
    }
}

/// Scores every posting against the same résumé, preserving input order.
pub fn score_jobs(
    scorer: &dyn JobScorer,
    jobs: Vec<JobPosting>,
    resume: Option<&ParsedDocument>,
) -> Vec<ScoredJob> {
    jobs.into_iter()
        .map(|job| {
            let result = scorer.score(&job, resume);
            ScoredJob::new(job, result)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedSkillScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WeightedSkillScorer {
    critical: CriticalSkills,
    weights: ScoringWeights,
}

impl JobScorer for WeightedSkillScorer {
    fn score(&self, job: &JobPosting, resume: Option<&ParsedDocument>) -> MatchResult {
        let resume = match resume {
            Some(r) if r.parsed => r,
            _ => return MatchResult::default(),
        };

        let user_skills = lowercase_set(&resume.skills);
        let job_skills = job_skill_set(job);
        let breakdown = self.compute_breakdown(job, resume, &user_skills, &job_skills);

        let score = (breakdown.raw.max(0.0) as u32).min(SCORE_CAP);

        // BTreeSet difference is alphabetical, so the truncated list is reproducible.
        let missing_skills = job_skills
            .difference(&user_skills)
            .filter(|skill| self.critical.contains(skill))
            .take(MAX_MISSING_SKILLS)
            .map(|skill| title_case(skill))
            .collect();

        MatchResult {
            score,
            missing_skills,
        }
    }

    fn backend(&self) -> &'static str {
        "weighted_skills"
    }

    fn explain(&self, job: &JobPosting, resume: &ParsedDocument) -> Option<ScoreBreakdown> {
        Some(self.breakdown(job, resume))
    }
}

impl WeightedSkillScorer {
    pub fn new(critical: CriticalSkills, weights: ScoringWeights) -> Self {
        Self { critical, weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn breakdown(&self, job: &JobPosting, resume: &ParsedDocument) -> ScoreBreakdown {
        let user_skills = lowercase_set(&resume.skills);
        let job_skills = job_skill_set(job);
        self.compute_breakdown(job, resume, &user_skills, &job_skills)
    }

    fn compute_breakdown(
        &self,
        job: &JobPosting,
        resume: &ParsedDocument,
        user_skills: &BTreeSet<String>,
        job_skills: &BTreeSet<String>,
    ) -> ScoreBreakdown {
        let skills = self.skill_coverage(user_skills, job_skills);
        // No independent keyword signal yet.
        let keywords = skills;
        let experience = experience_score(&job.title, resume.experience_years);
        let education = FULL_SCORE;
        let formatting = FULL_SCORE;

        let w = &self.weights;
        let raw = skills * w.skills
            + keywords * w.keywords
            + experience * w.experience
            + education * w.education
            + formatting * w.formatting;

        ScoreBreakdown {
            skills,
            keywords,
            experience,
            education,
            formatting,
            raw,
        }
    }

    /// Weighted share (0 – 100) of the job's skills present in the résumé.
    fn skill_coverage(&self, user_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> f64 {
        if job_skills.is_empty() {
            return 0.0;
        }

        let mut matched = 0u32;
        let mut total = 0u32;
        for skill in job_skills {
            let weight = if self.critical.contains(skill) {
                CRITICAL_WEIGHT
            } else {
                STANDARD_WEIGHT
            };
            total += weight;
            if user_skills.contains(skill) {
                matched += weight;
            }
        }

        (matched as f64 / total as f64) * 100.0
    }
}

fn lowercase_set(skills: &[String]) -> BTreeSet<String> {
    skills.iter().map(|s| s.to_lowercase()).collect()
}

/// The posting's own skills, or long title words when it has none.
fn job_skill_set(job: &JobPosting) -> BTreeSet<String> {
    let tagged = lowercase_set(&job.skills_extracted);
    if !tagged.is_empty() {
        return tagged;
    }
    job.title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TITLE_WORD_CHARS)
        .map(String::from)
        .collect()
}

fn experience_score(title: &str, experience_years: u32) -> f64 {
    if title.to_lowercase().contains("senior") && experience_years < SENIOR_MIN_YEARS {
        SENIOR_PENALTY_SCORE
    } else {
        FULL_SCORE
    }
}

/// Upper-cases every letter that follows a non-letter: `ci/cd` → `Ci/Cd`, `node.js` → `Node.Js`.
fn title_case(skill: &str) -> String {
    let mut out = String::with_capacity(skill.len());
    let mut prev_is_letter = false;
    for c in skill.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> WeightedSkillScorer {
        WeightedSkillScorer::new(CriticalSkills::built_in(), ScoringWeights::default())
    }

    fn resume(skills: &[&str], experience_years: u32) -> ParsedDocument {
        ParsedDocument {
            raw_text: "resume".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years,
            parsed: true,
            ..ParsedDocument::default()
        }
    }

    #[test]
    fn test_unparsed_resume_short_circuits() {
        let job = JobPosting::new("Senior Python Engineer", ["python", "docker", "aws"]);
        assert_eq!(
            scorer().score(&job, Some(&ParsedDocument::unparsed())),
            MatchResult::default()
        );
        assert_eq!(scorer().score(&job, None), MatchResult::default());
    }

    #[test]
    fn test_full_overlap_is_capped_at_98() {
        let job = JobPosting::new("Backend Engineer", ["python", "docker"]);
        let result = scorer().score(&job, Some(&resume(&["Python", "Docker"], 5)));
        assert_eq!(result.score, 98);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_no_job_skills_scores_fixed_dimensions_only() {
        // Title words are all three characters or fewer, so J is empty.
        let job = JobPosting::new("Dev Ops", Vec::<String>::new());
        let result = scorer().score(&job, Some(&resume(&["Python"], 5)));
        // 0*0.5 + 0*0.15 + 100*0.2 + 100*0.1 + 100*0.05
        assert_eq!(result.score, 35);
    }

    #[test]
    fn test_senior_penalty_crosses_three_year_threshold() {
        let job = JobPosting::new("Senior Backend Engineer", Vec::<String>::new());
        let junior = scorer().breakdown(&job, &resume(&[], 2));
        let senior = scorer().breakdown(&job, &resume(&[], 4));
        assert_eq!(junior.experience, 40.0);
        assert_eq!(senior.experience, 100.0);
        assert_eq!(junior.skills, 0.0);

        let junior_score = scorer().score(&job, Some(&resume(&[], 2))).score;
        let senior_score = scorer().score(&job, Some(&resume(&[], 4))).score;
        assert_eq!(junior_score, 23);
        assert_eq!(senior_score, 35);
    }

    #[test]
    fn test_senior_penalty_needs_senior_title() {
        let job = JobPosting::new("Backend Engineer", ["python"]);
        let b = scorer().breakdown(&job, &resume(&["Python"], 0));
        assert_eq!(b.experience, 100.0);
    }

    #[test]
    fn test_critical_skill_gap_costs_more() {
        let candidate = resume(&["Git"], 5);
        let critical_gap = JobPosting::new("Engineer", ["git", "docker"]);
        let standard_gap = JobPosting::new("Engineer", ["git", "tableau"]);

        let critical_score = scorer().score(&critical_gap, Some(&candidate)).score;
        let standard_score = scorer().score(&standard_gap, Some(&candidate)).score;
        assert!(critical_score < standard_score);
        assert_eq!(critical_score, 67);
        assert_eq!(standard_score, 83);
    }

    #[test]
    fn test_missing_skills_capped_at_six_and_sorted() {
        let job = JobPosting::new(
            "Platform Engineer",
            [
                "python",
                "javascript",
                "react",
                "docker",
                "kubernetes",
                "aws",
                "sql",
                "git",
                "linux",
                "terraform",
            ],
        );
        let result = scorer().score(&job, Some(&resume(&["Excel"], 5)));
        assert_eq!(result.missing_skills.len(), 6);
        assert_eq!(
            result.missing_skills,
            vec!["Aws", "Docker", "Git", "Javascript", "Kubernetes", "Linux"]
        );
    }

    #[test]
    fn test_missing_skills_only_surface_critical_gaps() {
        let job = JobPosting::new("Analyst", ["excel", "tableau", "sql", "ci/cd"]);
        let result = scorer().score(&job, Some(&resume(&["Excel"], 5)));
        assert_eq!(result.missing_skills, vec!["Ci/Cd", "Sql"]);
    }

    #[test]
    fn test_title_words_stand_in_for_missing_skills() {
        let job = JobPosting::new("Python Developer for Data", Vec::<String>::new());
        let b = scorer().breakdown(&job, &resume(&["Python"], 5));
        // J = {python(3), developer(1), data(1)} → 3/5
        assert!((b.skills - 60.0).abs() < 1e-9, "Skills was {}", b.skills);
        assert_eq!(b.keywords, b.skills);
    }

    #[test]
    fn test_job_skills_are_case_insensitive() {
        let job = JobPosting::new("Engineer", ["Python", "DOCKER"]);
        let b = scorer().breakdown(&job, &resume(&["python", "Docker"], 5));
        assert_eq!(b.skills, 100.0);
    }

    #[test]
    fn test_score_bounds_hold() {
        let jobs = [
            JobPosting::new("Senior Engineer", Vec::<String>::new()),
            JobPosting::new("Senior ML Engineer", ["machine learning", "pytorch", "nlp"]),
            JobPosting::new("x", ["excel"]),
        ];
        for job in &jobs {
            for years in [0, 10] {
                for skills in [&[][..], &["Excel", "PyTorch", "NLP"][..]] {
                    let result = scorer().score(job, Some(&resume(skills, years)));
                    assert!(result.score <= 98, "Score was {}", result.score);
                }
            }
        }
    }

    #[test]
    fn test_score_jobs_preserves_order() {
        let jobs = vec![
            JobPosting::new("Engineer", ["python"]),
            JobPosting::new("Engineer", ["docker"]),
        ];
        let results = score_jobs(&scorer(), jobs, Some(&resume(&["Python"], 5)));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].match_score, 98);
        assert_eq!(results[1].missing_skills, vec!["Docker"]);
        assert!(results[0].match_score > results[1].match_score);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoringWeights::default().validate().is_ok());
        let skewed = ScoringWeights {
            skills: 0.9,
            ..ScoringWeights::default()
        };
        assert!(matches!(skewed.validate(), Err(WeightsError::Sum(_))));
        let negative = ScoringWeights {
            skills: 0.7,
            formatting: -0.15,
            ..ScoringWeights::default()
        };
        assert_eq!(negative.validate(), Err(WeightsError::Negative("formatting")));
    }

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("ci/cd"), "Ci/Cd");
        assert_eq!(title_case("python3x"), "Python3X");
    }

    #[test]
    fn test_backend_label() {
        assert_eq!(scorer().backend(), "weighted_skills");
    }

    #[test]
    fn test_explain_exposes_breakdown_through_trait() {
        let scorer: &dyn JobScorer = &scorer();
        let job = JobPosting::new("Senior Engineer", ["python"]);
        let b = scorer.explain(&job, &resume(&["Python"], 1)).unwrap();
        assert_eq!(b.skills, 100.0);
        assert_eq!(b.experience, 40.0);
        assert_eq!(b.education, 100.0);
        assert_eq!(b.formatting, 100.0);
        // 50 + 15 + 8 + 10 + 5
        assert!((b.raw - 88.0).abs() < 1e-9, "Raw was {}", b.raw);
    }
}
