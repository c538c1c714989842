//! The two supported interface languages and their label tables.

use serde::{Deserialize, Serialize};

/// Interface and OCR language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Hindi labels, Hindi OCR prompt
    Hindi,
    /// English labels, English OCR prompt (default)
    #[default]
    English,
}

impl Locale {
    /// All locales, in selector order.
    pub const ALL: [Locale; 2] = [Locale::Hindi, Locale::English];

    /// Language hint passed to the OCR collaborator.
    pub fn language_hint(&self) -> &'static str {
        match self {
            Locale::Hindi => "hindi",
            Locale::English => "english",
        }
    }

    /// Labels for this locale.
    pub fn labels(&self) -> &'static LabelSet {
        labels_for(*self)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.language_hint())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hindi" | "hi" => Ok(Locale::Hindi),
            "english" | "en" => Ok(Locale::English),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Static text for one locale.
#[derive(Debug)]
pub struct LabelSet {
    /// Preview page title
    pub preview_title: &'static str,
    /// Wizard step names, in order
    pub steps: [&'static str; 4],
    /// "Duration"
    pub exam_time: &'static str,
    /// "Total Marks"
    pub total_marks: &'static str,
    /// "Exam Term"
    pub exam_term: &'static str,
    /// "Student Name"
    pub student_name: &'static str,
    /// "Roll No."
    pub student_roll: &'static str,
    /// Optional instruction line under the header (empty = none)
    pub instructions: &'static str,
    /// Footer page label, followed by the page number
    pub page: &'static str,
    /// "Question", used for block captions in the editor
    pub question: &'static str,
    /// Shown when export fails
    pub export_error: &'static str,
    /// Shown when text extraction fails
    pub extraction_error: &'static str,
    /// Shown when no image was supplied
    pub image_required: &'static str,
    /// Default school name in the details form
    pub default_school_name: &'static str,
    /// Class options in the details form
    pub classes: [&'static str; 12],
    /// Subject options in the details form
    pub subjects: [&'static str; 12],
    /// Prompt sent with every image to the vision model
    pub ocr_prompt: &'static str,
}

/// Look up the labels for a locale.
pub fn labels_for(locale: Locale) -> &'static LabelSet {
    match locale {
        Locale::Hindi => &HINDI,
        Locale::English => &ENGLISH,
    }
}

static ENGLISH: LabelSet = LabelSet {
    preview_title: "Exam Paper Preview",
    steps: ["Fill Details", "Upload Images", "Edit Questions", "Preview"],
    exam_time: "Duration",
    total_marks: "Total Marks",
    exam_term: "Exam Term",
    student_name: "Student Name",
    student_roll: "Roll No.",
    instructions: "",
    page: "Page",
    question: "Question",
    export_error: "Error generating file. Please try again.",
    extraction_error: "Error extracting text from images. Please try again.",
    image_required: "Image upload is required",
    default_school_name: "SHASHWAT PUBLIC SCHOOL",
    classes: [
        "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6", "Class 7", "Class 8",
        "Class 9", "Class 10", "Class 11", "Class 12",
    ],
    subjects: [
        "Hindi",
        "English",
        "Mathematics",
        "Science",
        "Social Science",
        "Sanskrit",
        "Computer",
        "General Knowledge",
        "Environmental Studies",
        "Physics",
        "Chemistry",
        "Biology",
    ],
    ocr_prompt: "Extract the text of exam paper / questions from this image.

Follow these instructions:
1. Maintain question numbers, marks, and all formatting
2. Preserve blank lines between questions
3. Keep sub-sections (like a, b, c or i, ii, iii) and their structure
4. Provide text only, no additional comments or explanations
5. If exam time, total marks, or department is visible, include that too

Provide the exact text present in the image without any interpretation or editing of your own.",
};

static HINDI: LabelSet = LabelSet {
    preview_title: "परीक्षा पेपर प्रीव्यू",
    steps: [
        "विवरण भरें",
        "तस्वीरें अपलोड करें",
        "प्रश्न संपादित करें",
        "पूर्वावलोकन",
    ],
    exam_time: "समय",
    total_marks: "पूर्णांक",
    exam_term: "परीक्षा अवधि",
    student_name: "छात्र का नाम",
    student_roll: "अनुक्रमांक",
    instructions: "",
    page: "पृष्ठ",
    question: "प्रश्न",
    export_error: "PDF बनाने में समस्या आई है। कृपया पुनः प्रयास करें।",
    extraction_error: "तस्वीरों से टेक्स्ट निकालने में समस्या आई है। कृपया पुनः प्रयास करें।",
    image_required: "तस्वीर अपलोड करना आवश्यक है",
    default_school_name: "SHASHWAT PUBLIC SCHOOL",
    classes: [
        "कक्षा 1", "कक्षा 2", "कक्षा 3", "कक्षा 4", "कक्षा 5", "कक्षा 6", "कक्षा 7", "कक्षा 8",
        "कक्षा 9", "कक्षा 10", "कक्षा 11", "कक्षा 12",
    ],
    subjects: [
        "हिंदी",
        "अंग्रेजी",
        "गणित",
        "विज्ञान",
        "सामाजिक विज्ञान",
        "संस्कृत",
        "कंप्यूटर",
        "सामान्य ज्ञान",
        "पर्यावरण अध्ययन",
        "भौतिक विज्ञान",
        "रसायन विज्ञान",
        "जीव विज्ञान",
    ],
    ocr_prompt: "इस छवि से परीक्षा पेपर / प्रश्नों का टेक्स्ट निकालें।

निम्नलिखित निर्देशों का पालन करें:
1. प्रश्न संख्या, अंक और सभी फ़ॉर्मेटिंग बनाए रखें
2. प्रश्नों के बीच खाली रेखाएं बनाए रखें
3. सब-सेक्शन (जैसे a, b, c या i, ii, iii) और उनका स्वरूप बनाए रखें
4. केवल टेक्स्ट देना है, कोई अतिरिक्त टिप्पणी या व्याख्या नहीं
5. यदि परीक्षा का समय, पूर्णांक या विभाग दिखाई देता है, तो उसे भी शामिल करें

छवि में मौजूद सटीक टेक्स्ट दें, किसी भी प्रकार की अपनी व्याख्या या संपादन न करें।",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!("Hindi".parse::<Locale>().unwrap(), Locale::Hindi);
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::English);
        assert!("french".parse::<Locale>().is_err());
    }

    #[test]
    fn test_language_hint_roundtrips_display() {
        for locale in Locale::ALL {
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn test_labels_differ_per_locale() {
        assert_eq!(labels_for(Locale::English).page, "Page");
        assert_eq!(labels_for(Locale::Hindi).page, "पृष्ठ");
        assert_eq!(labels_for(Locale::Hindi).classes[9], "कक्षा 10");
        assert!(labels_for(Locale::English).ocr_prompt.starts_with("Extract the text"));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Hindi).unwrap(), "\"hindi\"");
        let parsed: Locale = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(parsed, Locale::English);
    }
}
