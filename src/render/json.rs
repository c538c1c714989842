//! JSON rendering of exam papers and command streams.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::layout::PageCommand;
use crate::model::ExamPaper;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a paper to JSON.
pub fn to_json(paper: &ExamPaper, format: JsonFormat) -> Result<String> {
    serialize(paper, format)
}

/// Convert a page command stream to JSON.
pub fn commands_to_json(commands: &[PageCommand], format: JsonFormat) -> Result<String> {
    serialize(commands, format)
}

/// Read a paper back from JSON.
pub fn from_json(json: &str) -> Result<ExamPaper> {
    Ok(serde_json::from_str(json)?)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentMetadata, LineFormat};

    fn paper() -> ExamPaper {
        let mut metadata = DocumentMetadata::default();
        metadata.subject = "Science".to_string();
        ExamPaper::from_raw_texts(metadata, &["Define force."], &LineFormat::default())
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&paper(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"subject\""));
        assert!(json.contains("Science"));
        assert!(json.contains("\"alignment\": \"left\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&paper(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert_eq!(from_json(&json).unwrap(), paper());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_commands_to_json() {
        let commands = vec![PageCommand::NewPage, PageCommand::DrawFooter { page_number: 2 }];
        let json = commands_to_json(&commands, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"[{"op":"new_page"},{"op":"draw_footer","page_number":2}]"#);
    }
}
