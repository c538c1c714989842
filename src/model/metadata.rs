//! Exam paper metadata (school, class, subject, ...).

use serde::{Deserialize, Serialize};

use crate::locale::{labels_for, Locale};

/// Metadata printed in the paper header.
///
/// Filled in by the wizard's form steps and read, never modified, by
/// pagination and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// School name (large, centred at the top of page 1)
    pub school_name: String,

    /// Class, e.g. "Class 10"
    pub class_name: String,

    /// Subject, e.g. "Mathematics"
    pub subject: String,

    /// Exam duration as typed by the user, e.g. "3 hours"
    pub exam_time: String,

    /// Total marks as typed by the user
    pub total_marks: String,

    /// Exam term, e.g. "Annual"
    pub exam_term: Option<String>,

    /// Print student name / roll number fields under the header
    pub student_fields: bool,

    /// Language of labels and OCR prompt
    pub locale: Locale,
}

impl DocumentMetadata {
    /// Create metadata with the locale's default school name.
    pub fn new(locale: Locale) -> Self {
        Self {
            school_name: labels_for(locale).default_school_name.to_string(),
            class_name: String::new(),
            subject: String::new(),
            exam_time: String::new(),
            total_marks: String::new(),
            exam_term: None,
            student_fields: false,
            locale,
        }
    }

    /// Exam term if one was entered.
    pub fn term(&self) -> Option<&str> {
        self.exam_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Header line with class, subject and optional term,
    /// e.g. `"Class 10 - Science | Exam Term: Annual"`.
    pub fn class_line(&self) -> String {
        let labels = labels_for(self.locale);
        let mut line = format!("{} - {}", self.class_name, self.subject);
        if let Some(term) = self.term() {
            line.push_str(&format!(" | {}: {}", labels.exam_term, term));
        }
        line
    }

    /// Header line with duration and marks,
    /// e.g. `"Duration: 3 hours | Total Marks: 80"`.
    pub fn marks_line(&self) -> String {
        let labels = labels_for(self.locale);
        format!(
            "{}: {} | {}: {}",
            labels.exam_time, self.exam_time, labels.total_marks, self.total_marks
        )
    }

    /// Attribution printed in every page footer.
    pub fn attribution(&self) -> String {
        format!("\u{00A9} All Rights Reserved. {}", self.school_name.trim())
    }

    /// File name stem for exports: `{school}_{class}_{subject}_ExamPaper`.
    ///
    /// Whitespace runs become `_`; characters that are not allowed in file
    /// names on common platforms are removed.
    pub fn export_file_stem(&self) -> String {
        let stem = format!(
            "{}_{}_{}_ExamPaper",
            self.school_name.trim(),
            self.class_name.trim(),
            self.subject.trim()
        );
        sanitize_file_stem(&stem)
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

fn sanitize_file_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut in_space = false;
    for c in stem.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control() {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentMetadata {
        DocumentMetadata {
            school_name: "Shashwat Public School".to_string(),
            class_name: "Class 10".to_string(),
            subject: "Social Science".to_string(),
            exam_time: "3 hours".to_string(),
            total_marks: "80".to_string(),
            exam_term: Some("Annual".to_string()),
            student_fields: true,
            locale: Locale::English,
        }
    }

    #[test]
    fn test_export_file_stem() {
        assert_eq!(
            sample().export_file_stem(),
            "Shashwat_Public_School_Class_10_Social_Science_ExamPaper"
        );
    }

    #[test]
    fn test_export_file_stem_strips_path_characters() {
        let mut meta = sample();
        meta.class_name = "Class 10/A".to_string();
        meta.subject = "Math:  Algebra".to_string();
        assert_eq!(
            meta.export_file_stem(),
            "Shashwat_Public_School_Class_10A_Math_Algebra_ExamPaper"
        );
    }

    #[test]
    fn test_header_lines() {
        let meta = sample();
        assert_eq!(meta.class_line(), "Class 10 - Social Science | Exam Term: Annual");
        assert_eq!(meta.marks_line(), "Duration: 3 hours | Total Marks: 80");
    }

    #[test]
    fn test_blank_term_is_omitted() {
        let mut meta = sample();
        meta.exam_term = Some("  ".to_string());
        assert_eq!(meta.class_line(), "Class 10 - Social Science");
    }

    #[test]
    fn test_default_school_name() {
        let meta = DocumentMetadata::new(Locale::Hindi);
        assert_eq!(meta.school_name, "SHASHWAT PUBLIC SCHOOL");
        assert_eq!(meta.locale, Locale::Hindi);
    }
}
