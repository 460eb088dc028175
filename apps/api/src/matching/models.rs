use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scraped job posting. Only `title` and `skills_extracted` drive scoring;
/// every other field the job source produced is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub skills_extracted: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl JobPosting {
    pub fn new<I, S>(title: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            skills_extracted: skills.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0 – 98
    pub score: u32,
    /// Title-cased critical skills the résumé lacks, at most six.
    pub missing_skills: Vec<String>,
}

/// A posting annotated with its match against one résumé.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobPosting,
    pub match_score: u32,
    pub missing_skills: Vec<String>,
}

impl ScoredJob {
    /// Annotation keys already carried in `job.extra` (a previously scored posting fed
    /// back in) are dropped so the flattened output has one of each.
    pub fn new(mut job: JobPosting, result: MatchResult) -> Self {
        job.extra.remove("match_score");
        job.extra.remove("missing_skills");
        Self {
            job,
            match_score: result.score,
            missing_skills: result.missing_skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_posting_keeps_unknown_fields() {
        let job: JobPosting = serde_json::from_value(json!({
            "title": "Data Analyst",
            "company": "Globex",
            "url": "https://jobs.example.com/42",
            "skills_extracted": ["sql", "tableau"]
        }))
        .unwrap();
        assert_eq!(job.skills_extracted, vec!["sql", "tableau"]);
        assert_eq!(job.extra["company"], "Globex");

        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["url"], "https://jobs.example.com/42");
    }

    #[test]
    fn test_job_posting_skills_default_to_empty() {
        let job: JobPosting = serde_json::from_str(r#"{"title": "Engineer"}"#).unwrap();
        assert!(job.skills_extracted.is_empty());
    }

    #[test]
    fn test_scored_job_flattens_posting() {
        let scored = ScoredJob::new(
            JobPosting::new("Engineer", ["python"]),
            MatchResult {
                score: 80,
                missing_skills: vec!["Docker".to_string()],
            },
        );
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["title"], "Engineer");
        assert_eq!(value["match_score"], 80);
        assert_eq!(value["missing_skills"][0], "Docker");
    }

    #[test]
    fn test_rescoring_replaces_previous_annotation() {
        let job: JobPosting = serde_json::from_value(json!({
            "title": "Engineer",
            "company": "Acme",
            "match_score": 12,
            "missing_skills": ["Aws"]
        }))
        .unwrap();
        let scored = ScoredJob::new(
            job,
            MatchResult {
                score: 67,
                missing_skills: vec!["Docker".to_string()],
            },
        );
        assert!(!scored.job.extra.contains_key("match_score"));
        assert!(!scored.job.extra.contains_key("missing_skills"));

        let raw = serde_json::to_string(&scored).unwrap();
        assert_eq!(raw.matches("\"match_score\"").count(), 1);
        assert_eq!(raw.matches("\"missing_skills\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["match_score"], 67);
        assert_eq!(value["missing_skills"], json!(["Docker"]));
        assert_eq!(value["company"], "Acme");
    }
}
