//! Document Parser: assembles the `ParsedDocument` record from already-extracted text.

use serde::{Deserialize, Serialize};

use crate::skills::extractor::SkillExtractor;
use crate::skills::sections::{segment_sections, SectionKind, Sections};

/// Parsed résumé. `parsed = false` means no text was available; every other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub sections: Sections,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub parsed: bool,
}

impl ParsedDocument {
    pub fn unparsed() -> Self {
        Self::default()
    }
}

pub fn parse_document(text: &str, extractor: &SkillExtractor) -> ParsedDocument {
    if text.trim().is_empty() {
        return ParsedDocument::unparsed();
    }

    let sections = segment_sections(text);
    let skills = extractor.extract_skills(text);
    let experience_source = match sections.get(SectionKind::Experience) {
        "" => text,
        section => section,
    };
    let experience_years = extractor.extract_experience_years(experience_source);

    ParsedDocument {
        raw_text: text.to_string(),
        sections,
        skills,
        experience_years,
        parsed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::extractor::ExtractorSettings;
    use crate::skills::vocabulary::SkillVocabulary;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(
            SkillVocabulary::built_in().unwrap(),
            ExtractorSettings::default(),
        )
    }

    #[test]
    fn test_empty_document_is_unparsed() {
        let doc = parse_document("", &extractor());
        assert!(!doc.parsed);
        assert!(doc.skills.is_empty());
        assert_eq!(doc.experience_years, 0);
        assert_eq!(doc, parse_document(" \n\n ", &extractor()));
    }

    #[test]
    fn test_experience_years_prefer_experience_section() {
        let text = "Summary\nEXPERIENCE\nAcme 2019 - present\nEDUCATION\nUniversity 2015 - 2019\nSKILLS\nPython, SQL, Docker";
        let doc = parse_document(text, &extractor());
        assert!(doc.parsed);
        assert_eq!(doc.raw_text, text);
        // Only the range inside the experience section counts.
        assert_eq!(doc.experience_years, 2);
        assert_eq!(doc.skills, vec!["Docker", "Python", "SQL"]);
        assert_eq!(doc.sections.skills, "Python, SQL, Docker\n");
    }

    #[test]
    fn test_experience_years_fall_back_to_whole_text() {
        let text = "Acme 2019 - present\nGlobex 2016-2019\nPython";
        let doc = parse_document(text, &extractor());
        assert!(doc.sections.experience.is_empty());
        assert_eq!(doc.experience_years, 4);
    }

    #[test]
    fn test_unparsed_document_deserializes_from_flag_only() {
        let doc: ParsedDocument = serde_json::from_str(r#"{"parsed": false}"#).unwrap();
        assert_eq!(doc, ParsedDocument::unparsed());
    }
}
