// Skill extraction: vocabulary, section segmentation and document parsing.
// Pure functions over text; the HTTP handlers are the only async code here.

pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod sections;
pub mod vocabulary;
