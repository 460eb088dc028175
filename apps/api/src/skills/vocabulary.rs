//! Skill Vocabulary: the fixed table of canonical skills and their surface-form variants.
//!
//! Built once at start-up and shared read-only by the extractor. Every variant maps to
//! exactly one canonical skill; a variant registered under two canonical names is rejected
//! at build time rather than silently resolved by registration order.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use regex::RegexSet;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Variant '{variant}' is registered under both '{first}' and '{second}'")]
    DuplicateVariant {
        variant: String,
        first: String,
        second: String,
    },

    #[error("Skill '{0}' is registered more than once")]
    DuplicateSkill(String),

    #[error("Canonical skill name cannot be empty")]
    EmptySkill,

    #[error("Skill '{0}' has an empty variant")]
    EmptyVariant(String),

    #[error("Failed to compile variant matcher: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in tables
// ────────────────────────────────────────────────────────────────────────────

/// Shared variants are listed only under the skill that owns them:
/// `node.js`/`nodejs` → Node.js, `pandas` → Pandas, `numpy` → NumPy, `eks` → Kubernetes.
const BUILT_IN_SKILLS: &[(&str, &[&str])] = &[
    ("Python", &["python", "py", "python3", "python 3"]),
    ("JavaScript", &["javascript", "js", "ecmascript"]),
    ("React", &["react", "react.js", "reactjs", "react native", "redux"]),
    ("Node.js", &["node.js", "nodejs", "node"]),
    ("Django", &["django", "django-rest", "drf"]),
    ("Flask", &["flask"]),
    ("FastAPI", &["fastapi", "fast api"]),
    ("TypeScript", &["typescript", "ts", "type script"]),
    ("Vue.js", &["vue", "vue.js", "vuejs", "vuetify"]),
    ("Angular", &["angular", "angularjs"]),
    (
        "AWS",
        &[
            "aws",
            "amazon web services",
            "ec2",
            "s3",
            "lambda",
            "cloudformation",
            "ecs",
        ],
    ),
    ("Docker", &["docker", "containers", "docker-compose"]),
    ("Kubernetes", &["kubernetes", "k8s", "k8", "gke", "eks", "helm"]),
    ("Terraform", &["terraform", "iac"]),
    (
        "CI/CD",
        &[
            "ci/cd",
            "ci cd",
            "jenkins",
            "gitlab ci",
            "github actions",
            "circleci",
        ],
    ),
    (
        "Machine Learning",
        &["machine learning", "ml", "ai", "artificial intelligence"],
    ),
    (
        "Deep Learning",
        &["deep learning", "neural networks", "cnn", "rnn"],
    ),
    (
        "NLP",
        &[
            "nlp",
            "natural language processing",
            "text mining",
            "bert",
            "gpt",
            "llm",
            "transformers",
            "hugging face",
        ],
    ),
    (
        "Computer Vision",
        &["computer vision", "opencv", "yolo", "image processing"],
    ),
    ("TensorFlow", &["tensorflow", "tf", "keras"]),
    ("PyTorch", &["pytorch", "torch"]),
    ("Pandas", &["pandas", "pd"]),
    ("NumPy", &["numpy", "np"]),
    (
        "SQL",
        &[
            "sql",
            "mysql",
            "postgresql",
            "postgres",
            "sqlite",
            "oracle",
            "mssql",
            "redshift",
        ],
    ),
    ("Git", &["git", "github", "gitlab", "bitbucket"]),
    ("Linux", &["linux", "ubuntu", "bash", "shell scripting"]),
    ("Figma", &["figma", "ui/ux", "adobe xd"]),
    ("Power BI", &["power bi", "powerbi"]),
    ("Tableau", &["tableau"]),
    ("Excel", &["excel", "vba", "pivot tables"]),
    ("Agile", &["agile", "scrum", "kanban", "jira", "trello"]),
];

const BUILT_IN_CRITICAL_SKILLS: &[&str] = &[
    "python",
    "javascript",
    "react",
    "node.js",
    "django",
    "flask",
    "fastapi",
    "aws",
    "docker",
    "kubernetes",
    "sql",
    "postgresql",
    "mongodb",
    "machine learning",
    "deep learning",
    "nlp",
    "tensorflow",
    "pytorch",
    "pandas",
    "git",
    "linux",
    "ci/cd",
    "terraform",
    "typescript",
];

// ────────────────────────────────────────────────────────────────────────────
// SkillVocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Immutable variant → canonical mapping with a precompiled whole-word matcher.
#[derive(Debug)]
pub struct SkillVocabulary {
    skills: Vec<String>,
    /// (lower-cased variant, index into `skills`), in matcher pattern order.
    variants: Vec<(String, usize)>,
    matcher: RegexSet,
}

impl SkillVocabulary {
    pub fn builder() -> VocabularyBuilder {
        VocabularyBuilder::default()
    }

    /// The vocabulary shipped with the service.
    pub fn built_in() -> Result<Self, VocabularyError> {
        BUILT_IN_SKILLS
            .iter()
            .fold(Self::builder(), |builder, (skill, variants)| {
                builder.skill(*skill, variants.iter().copied())
            })
            .build()
    }

    /// Canonical skill names in registration order.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    /// Canonical skills with at least one variant occurring as a whole word in `lowered`.
    /// The caller lower-cases the text; the same skill may be yielded more than once.
    pub fn whole_word_hits<'a>(&'a self, lowered: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.matcher
            .matches(lowered)
            .into_iter()
            .map(move |pattern| self.skills[self.variants[pattern].1].as_str())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

/// Collects `(canonical, variants)` entries and validates them into a `SkillVocabulary`.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    entries: Vec<(String, Vec<String>)>,
}

impl VocabularyBuilder {
    pub fn skill<I, S>(mut self, canonical: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push((
            canonical.into(),
            variants.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<SkillVocabulary, VocabularyError> {
        let mut skills: Vec<String> = Vec::with_capacity(self.entries.len());
        let mut variants: Vec<(String, usize)> = Vec::new();
        let mut owner: HashMap<String, usize> = HashMap::new();

        for (canonical, raw_variants) in self.entries {
            let canonical = canonical.trim().to_string();
            if canonical.is_empty() {
                return Err(VocabularyError::EmptySkill);
            }
            if skills.iter().any(|s| s.eq_ignore_ascii_case(&canonical)) {
                return Err(VocabularyError::DuplicateSkill(canonical));
            }
            let idx = skills.len();

            for raw in raw_variants {
                let variant = raw.trim().to_lowercase();
                if variant.is_empty() {
                    return Err(VocabularyError::EmptyVariant(canonical));
                }
                match owner.get(&variant) {
                    Some(&existing) if existing == idx => continue,
                    Some(&existing) => {
                        return Err(VocabularyError::DuplicateVariant {
                            variant,
                            first: skills[existing].clone(),
                            second: canonical,
                        });
                    }
                    None => {
                        owner.insert(variant.clone(), idx);
                        variants.push((variant, idx));
                    }
                }
            }
            skills.push(canonical);
        }

        let matcher = RegexSet::new(
            variants
                .iter()
                .map(|(variant, _)| format!(r"\b{}\b", regex::escape(variant))),
        )?;

        debug!(
            skills = skills.len(),
            variants = variants.len(),
            "Skill vocabulary built"
        );

        Ok(SkillVocabulary {
            skills,
            variants,
            matcher,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CriticalSkills
// ────────────────────────────────────────────────────────────────────────────

/// High-value skills, lower-cased. Weighted 3× in coverage and the only gaps surfaced.
#[derive(Debug, Clone)]
pub struct CriticalSkills(HashSet<String>);

impl CriticalSkills {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            skills
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn built_in() -> Self {
        Self::new(BUILT_IN_CRITICAL_SKILLS)
    }

    /// `skill` must already be lower-cased.
    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File override
// ────────────────────────────────────────────────────────────────────────────

/// On-disk replacement for the built-in tables.
#[derive(Debug, Deserialize)]
pub struct VocabularyFile {
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub critical_skills: Option<Vec<String>>,
}

impl VocabularyFile {
    /// Falls back to the built-in critical set when the file does not name one.
    pub fn into_tables(self) -> Result<(SkillVocabulary, CriticalSkills), VocabularyError> {
        let vocabulary = self
            .skills
            .into_iter()
            .fold(SkillVocabulary::builder(), |builder, (skill, variants)| {
                builder.skill(skill, variants)
            })
            .build()?;
        let critical = self
            .critical_skills
            .map(CriticalSkills::new)
            .unwrap_or_else(CriticalSkills::built_in);
        Ok((vocabulary, critical))
    }
}

pub fn load_tables(path: &Path) -> Result<(SkillVocabulary, CriticalSkills), VocabularyError> {
    let raw = std::fs::read_to_string(path)?;
    let file: VocabularyFile = serde_json::from_str(&raw)?;
    file.into_tables()
}
