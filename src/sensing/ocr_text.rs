use regex::Regex;
use std::sync::OnceLock;

const SUMMARY_MAX_CHARS: usize = 1500;
const SUMMARY_HEAD_CHARS: usize = 1000;
const SUMMARY_TAIL_CHARS: usize = 500;
const TRUNCATION_MARKER: &str = "\n...[truncated]...\n";

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| {
        Regex::new(
            r"(https?://[^\s]+)|(www\.[^\s]+)|([a-zA-Z0-9-]+\.(com|net|org|edu|gov|io|ai|co)[^\s]*)",
        )
        .expect("URL pattern is a valid regex")
    })
}

/// URL-looking tokens in reading order.
pub fn extract_urls(text: &str) -> Vec<String> {
    url_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keep OCR text bounded: the top of the screen plus the most recent tail.
pub fn summarize_ocr_text(text: &str) -> String {
    let total = text.chars().count();
    if total <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }

    let head: String = text.chars().take(SUMMARY_HEAD_CHARS).collect();
    let tail: String = text.chars().skip(total - SUMMARY_TAIL_CHARS).collect();
    format!("{head}{TRUNCATION_MARKER}{tail}")
}
