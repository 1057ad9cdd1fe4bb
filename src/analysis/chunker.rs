use crate::analysis::config::AnalysisConfig;
use crate::models::{TextExtraction, Unit, UnitKind};

const CONTEXT_SEPARATOR: &str = " | ";
const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

/// Break one extraction into at most `1 + max_content_units` non-empty units:
/// a context unit (app, window, URLs) followed by the content units.
pub fn chunk_extraction(extraction: &TextExtraction, config: &AnalysisConfig) -> Vec<Unit> {
    let mut units = Vec::with_capacity(1 + config.max_content_units);

    if let Some(context) = build_context_unit(extraction, config) {
        units.push(context);
    }

    units.extend(
        split_content(&extraction.text, config)
            .into_iter()
            .map(|content| Unit {
                kind: UnitKind::Content,
                content,
            }),
    );

    units
}

fn build_context_unit(extraction: &TextExtraction, config: &AnalysisConfig) -> Option<Unit> {
    let mut parts = Vec::new();

    let app = extraction.active_app.trim();
    if !app.is_empty() {
        parts.push(format!("App: {app}"));
    }

    let title = extraction.window_title.trim();
    if !title.is_empty() {
        parts.push(format!("Window: {title}"));
    }

    let urls: Vec<&str> = extraction
        .urls
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .take(config.max_context_urls)
        .collect();
    if !urls.is_empty() {
        parts.push(format!("URLs: {}", urls.join(", ")));
    }

    if parts.is_empty() {
        return None;
    }

    Some(Unit {
        kind: UnitKind::Context,
        content: parts.join(CONTEXT_SEPARATOR),
    })
}

/// Short text passes through untouched. Longer text is packed sentence by sentence
/// into units of at most `max_unit_chars`; anything past `max_content_units` is dropped.
pub fn split_content(text: &str, config: &AnalysisConfig) -> Vec<String> {
    let max = config.max_unit_chars;

    if text.trim().is_empty() || config.max_content_units == 0 {
        return Vec::new();
    }

    if text.chars().count() <= max {
        return vec![text.to_string()];
    }

    let mut units = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences(text) {
        let len = sentence.chars().count();

        if len > max {
            // No terminator inside the window: the only option is a hard cut.
            flush(&mut units, &mut current, &mut current_len);
            units.extend(hard_split(sentence, max));
        } else {
            let needed = if current_len == 0 {
                len
            } else {
                current_len + 1 + len
            };

            if needed > max {
                flush(&mut units, &mut current, &mut current_len);
                current.push_str(sentence);
                current_len = len;
            } else {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(sentence);
                current_len = needed;
            }
        }

        if units.len() >= config.max_content_units {
            break;
        }
    }

    flush(&mut units, &mut current, &mut current_len);
    units.truncate(config.max_content_units);
    units
}

fn flush(units: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        units.push(std::mem::take(current));
    }
    *current_len = 0;
}

/// Sentences with their terminator kept, trimmed, skipping blank fragments.
fn sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            let end = idx + ch.len_utf8();
            push_sentence(&mut result, &text[start..end]);
            start = end;
        }
    }
    push_sentence(&mut result, &text[start..]);

    result
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

fn hard_split(sentence: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = sentence.chars().collect();
    chars
        .chunks(max)
        .map(|piece| piece.iter().collect::<String>().trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}
