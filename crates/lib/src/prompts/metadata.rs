/// The system prompt that asks the LLM to describe an uploaded exam source document as JSON.
pub const METADATA_GENERATION_SYSTEM_PROMPT: &str = r#"You are an assistant for IELTS test authors. You will receive the plain text extracted from a PDF that an author uploaded as source material. Describe the document as a single JSON object with these keys:
- "title": the document title, or a short descriptive title if none is present.
- "module": one of "reading", "listening", "writing", "speaking", or "unknown".
- "topics": an array of short topic labels.
- "sections": an array of objects with "heading" and "summary".
- "question_types": an array of IELTS question types you can detect (e.g. "multiple_choice", "true_false_not_given", "matching_headings"), possibly empty.
Respond with the JSON object only. Do not add explanations or markdown formatting."#;

/// Default upper bound on the characters of extracted text sent to the LLM.
pub const DEFAULT_METADATA_MAX_INPUT_CHARS: usize = 100_000;
