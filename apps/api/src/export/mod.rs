// Export: downloadable snapshots of a resume.
// JSON round-trips exactly; LaTeX is a one-way typeset source.

pub mod handlers;
pub mod latex;

use crate::models::resume::{PartialResume, ResumeDocument};

pub use latex::to_latex;

/// Pretty-printed JSON snapshot.
pub fn to_json(doc: &ResumeDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Reads an exported (or hand-written, possibly partial) JSON file for import.
pub fn from_json(json: &str) -> Result<PartialResume, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::examples::ExampleKey;

    #[test]
    fn test_json_round_trip() {
        let doc = ExampleKey::Backend.document();
        let json = to_json(&doc).unwrap();
        let parsed: ResumeDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_import_of_export_reproduces_document() {
        let doc = ExampleKey::Frontend.document();
        let partial = from_json(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(partial.merge_into(&ResumeDocument::default()), doc);
    }

    #[test]
    fn test_from_json_accepts_partial_files() {
        let partial = from_json(r#"{"basics": {"name": "Lin"}}"#).unwrap();
        assert!(partial.work.is_none());
        assert_eq!(
            partial.basics.and_then(|b| b.name).as_deref(),
            Some("Lin")
        );
    }
}
