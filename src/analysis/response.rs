use thiserror::Error;

pub const REASONING_LABEL: &str = "REASONING";

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("model returned no text")]
    Empty,

    #[error("response has no {0} line")]
    MissingField(&'static str),

    #[error("unrecognised {field} value: {value:?}")]
    MalformedFlag { field: &'static str, value: String },
}

/// A yes/no answer plus its one-line explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedAnswer {
    pub flag: bool,
    pub rationale: String,
}

/// Parse a `<FLAG>: yes/no` + `REASONING: ...` answer.
///
/// Labels match case-insensitively and unrelated lines are skipped. The flag line is
/// required; a missing reasoning line leaves the rationale empty. When a label repeats,
/// the last occurrence wins.
pub fn parse_flagged_response(
    response: &str,
    flag_label: &'static str,
) -> Result<FlaggedAnswer, ResponseError> {
    let body = strip_think_blocks(response);
    if body.trim().is_empty() {
        return Err(ResponseError::Empty);
    }

    let mut flag: Option<Result<bool, ResponseError>> = None;
    let mut rationale: Option<String> = None;

    for raw in body.lines() {
        let line = clean_line(raw);

        if let Some(value) = labelled_value(&line, flag_label) {
            flag = Some(parse_flag(value).ok_or_else(|| ResponseError::MalformedFlag {
                field: flag_label,
                value: value.to_string(),
            }));
        } else if let Some(value) = labelled_value(&line, REASONING_LABEL) {
            rationale = Some(value.to_string());
        }
    }

    let flag = flag.ok_or(ResponseError::MissingField(flag_label))??;

    Ok(FlaggedAnswer {
        flag,
        rationale: rationale.unwrap_or_default(),
    })
}

/// Drop `<think>...</think>` sections that reasoning models prepend to their answer.
fn strip_think_blocks(response: &str) -> String {
    let mut out = String::with_capacity(response.len());
    let mut rest = response;

    while let Some(start) = rest.find(THINK_OPEN) {
        let Some(len) = rest[start..].find(THINK_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + len + THINK_CLOSE.len()..];
    }
    out.push_str(rest);

    out
}

/// Strip list bullets, headings and markdown bold around a line.
fn clean_line(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['*', '-', '#', '>'])
        .replace("**", "")
        .trim()
        .to_string()
}

fn labelled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    line[label.len()..].trim_start().strip_prefix(':').map(str::trim)
}

fn parse_flag(value: &str) -> Option<bool> {
    let word = value
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_ascii_lowercase();

    match word.as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}
