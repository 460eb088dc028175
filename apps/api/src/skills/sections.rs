use serde::{Deserialize, Serialize};

/// Header lines are short; anything this long or longer is body text.
const MAX_HEADER_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionKind {
    /// Header detection order: the first kind whose keyword matches wins.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
    ];

    pub fn header_keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &[
                "experience",
                "work history",
                "employment",
                "career history",
            ],
            SectionKind::Education => &["education", "academic", "qualifications", "degrees"],
            SectionKind::Skills => &[
                "skills",
                "technologies",
                "technical skills",
                "competencies",
                "expertise",
            ],
            SectionKind::Projects => &["projects", "portfolio"],
        }
    }
}

/// Accumulated text per résumé section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub projects: String,
}

impl Sections {
    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Experience => &self.experience,
            SectionKind::Education => &self.education,
            SectionKind::Skills => &self.skills,
            SectionKind::Projects => &self.projects,
        }
    }

    fn get_mut(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::Experience => &mut self.experience,
            SectionKind::Education => &mut self.education,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Projects => &mut self.projects,
        }
    }
}

/// Classifies a line as a section header: short, and containing a header keyword.
pub fn detect_header(line: &str) -> Option<SectionKind> {
    let clean = line.trim().to_lowercase();
    if clean.chars().count() >= MAX_HEADER_CHARS {
        return None;
    }
    SectionKind::ALL.into_iter().find(|kind| {
        kind.header_keywords()
            .iter()
            .any(|keyword| clean.contains(keyword))
    })
}

/// Single pass over the lines. Body lines go verbatim into the active section;
/// lines before the first header are dropped.
pub fn segment_sections(text: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<SectionKind> = None;

    for line in text.split('\n') {
        if let Some(kind) = detect_header(line) {
            current = Some(kind);
            continue;
        }
        if let Some(kind) = current {
            let bucket = sections.get_mut(kind);
            bucket.push_str(line);
            bucket.push('\n');
        }
    }

    sections
}
