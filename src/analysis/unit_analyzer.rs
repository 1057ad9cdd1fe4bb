use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::fmt::Write as _;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::memory::VisualSnapshot;
use crate::analysis::response::{parse_flagged_response, ResponseError};
use crate::inference::InferenceBackend;
use crate::models::{Goal, Unit, UnitVerdict};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const RELEVANCE_LABEL: &str = "RELEVANT";

/// Rationale of a unit whose request failed or came back empty.
pub const NO_RESPONSE_RATIONALE: &str = "No response from model";
/// Rationale of a unit whose answer had no usable relevance line.
pub const UNPARSEABLE_RATIONALE: &str = "Model response could not be parsed";

const VISUAL_EXCERPT_CHARS: usize = 200;

/// Analyze every unit concurrently and return verdicts in the original unit order.
/// Nothing is returned until every request has finished.
pub async fn analyze_units(
    backend: &dyn InferenceBackend,
    units: Vec<Unit>,
    goal: &Goal,
    memory: Option<&VisualSnapshot>,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Vec<UnitVerdict> {
    let requests = units.into_iter().map(|unit| {
        let prompt = build_unit_prompt(&unit, goal, memory, config, now);
        analyze_unit(backend, unit, prompt)
    });

    join_all(requests).await
}

async fn analyze_unit(backend: &dyn InferenceBackend, unit: Unit, prompt: String) -> UnitVerdict {
    log_debug!("{} unit prompt:\n{}", unit.kind.as_str(), prompt);
    let response = backend.generate(&prompt, &[]).await;
    verdict_from_response(unit, &response)
}

/// Never fails: empty or unparseable answers become a negative verdict with a sentinel rationale.
pub fn verdict_from_response(unit: Unit, response: &str) -> UnitVerdict {
    match parse_flagged_response(response, RELEVANCE_LABEL) {
        Ok(answer) => UnitVerdict {
            unit,
            is_relevant: answer.flag,
            rationale: answer.rationale,
        },
        Err(ResponseError::Empty) => UnitVerdict {
            unit,
            is_relevant: false,
            rationale: NO_RESPONSE_RATIONALE.to_string(),
        },
        Err(err) => {
            log_warn!("{} unit answer unusable ({err}): {response:?}", unit.kind.as_str());
            UnitVerdict {
                unit,
                is_relevant: false,
                rationale: UNPARSEABLE_RATIONALE.to_string(),
            }
        }
    }
}

/// Deterministic in its inputs. The last visual context is quoted only while it is
/// younger than `prompt_window`.
pub fn build_unit_prompt(
    unit: &Unit,
    goal: &Goal,
    memory: Option<&VisualSnapshot>,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Focus goal: \"{}\"", goal.text());
    prompt.push('\n');
    let _ = writeln!(prompt, "Screen info ({}): {}", unit.kind.as_str(), unit.content);
    prompt.push('\n');

    if let Some(snapshot) = memory.filter(|s| s.is_fresh(now, config.prompt_window)) {
        let _ = writeln!(prompt, "Recent visual check: {}", excerpt(&snapshot.context));
        prompt.push('\n');
    }

    prompt.push_str(
        "Does this screen information show the user actively working on the focus goal?\n\n",
    );
    prompt.push_str("Rules:\n");
    prompt.push_str("- Be strict: the content must relate DIRECTLY to the goal\n");
    prompt.push_str("- Monitoring or developer tools are not the goal itself\n");
    prompt.push_str("- Code and terminals count only when the goal is programming\n\n");
    prompt.push_str("Answer in exactly two lines:\n");
    let _ = writeln!(prompt, "{RELEVANCE_LABEL}: yes/no");
    prompt.push_str("REASONING: one short sentence\n");

    prompt
}

fn excerpt(context: &str) -> String {
    let first_line = context.lines().next().unwrap_or("").trim();
    first_line.chars().take(VISUAL_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::mock::MockBackend;
    use crate::models::UnitKind;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn goal() -> Goal {
        Goal::new("write a report").unwrap()
    }

    fn unit(kind: UnitKind, content: &str) -> Unit {
        Unit {
            kind,
            content: content.into(),
        }
    }

    fn snapshot(age_secs: i64, now: DateTime<Utc>) -> VisualSnapshot {
        VisualSnapshot {
            context: "Distracted\nsecond line".into(),
            reasoning: "video player".into(),
            focused: false,
            timestamp: now - ChronoDuration::seconds(age_secs),
        }
    }

    #[test]
    fn prompt_states_goal_kind_and_content() {
        let prompt = build_unit_prompt(
            &unit(UnitKind::Context, "App: Pages"),
            &goal(),
            None,
            &AnalysisConfig::default(),
            Utc::now(),
        );
        assert!(prompt.contains("Focus goal: \"write a report\""));
        assert!(prompt.contains("Screen info (context): App: Pages"));
        assert!(prompt.contains("RELEVANT: yes/no"));
        assert!(!prompt.contains("Recent visual check"));
    }

    #[test]
    fn prompt_quotes_fresh_visual_context_only() {
        let now = Utc::now();
        let config = AnalysisConfig::default();
        let u = unit(UnitKind::Content, "text");

        let fresh = build_unit_prompt(&u, &goal(), Some(&snapshot(10, now)), &config, now);
        assert!(fresh.contains("Recent visual check: Distracted\n"));
        assert!(!fresh.contains("second line"));

        let stale = build_unit_prompt(&u, &goal(), Some(&snapshot(31, now)), &config, now);
        assert!(!stale.contains("Recent visual check"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let now = Utc::now();
        let g = goal();
        let u = unit(UnitKind::Content, "text");
        let s = snapshot(5, now);
        let config = AnalysisConfig::default();
        assert_eq!(
            build_unit_prompt(&u, &g, Some(&s), &config, now),
            build_unit_prompt(&u, &g, Some(&s), &config, now)
        );
    }

    #[test]
    fn empty_response_yields_sentinel() {
        let verdict = verdict_from_response(unit(UnitKind::Content, "x"), "");
        assert!(!verdict.is_relevant);
        assert_eq!(verdict.rationale, NO_RESPONSE_RATIONALE);
    }

    #[test]
    fn malformed_response_yields_negative_verdict() {
        let verdict = verdict_from_response(unit(UnitKind::Content, "x"), "I think so!");
        assert!(!verdict.is_relevant);
        assert_eq!(verdict.rationale, UNPARSEABLE_RATIONALE);
    }

    #[tokio::test]
    async fn one_request_per_unit_in_original_order() {
        let backend = MockBackend::with(|prompt| {
            if prompt.contains("report draft") {
                "RELEVANT: yes\nREASONING: draft open".to_string()
            } else {
                "RELEVANT: no\nREASONING: unrelated".to_string()
            }
        });
        let units = vec![
            unit(UnitKind::Context, "App: Safari"),
            unit(UnitKind::Content, "report draft"),
            unit(UnitKind::Content, "news"),
        ];

        let verdicts = analyze_units(
            &backend,
            units.clone(),
            &goal(),
            None,
            &AnalysisConfig::default(),
            Utc::now(),
        )
        .await;

        assert_eq!(backend.prompts().len(), 3);
        assert_eq!(backend.image_counts(), vec![0, 0, 0]);
        let got: Vec<&Unit> = verdicts.iter().map(|v| &v.unit).collect();
        assert_eq!(got, units.iter().collect::<Vec<_>>());
        let relevance: Vec<bool> = verdicts.iter().map(|v| v.is_relevant).collect();
        assert_eq!(relevance, vec![false, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn units_are_analyzed_concurrently() {
        let backend = MockBackend::replying("RELEVANT: yes\nREASONING: ok")
            .with_delay(Duration::from_secs(4));
        let units = vec![
            unit(UnitKind::Context, "a"),
            unit(UnitKind::Content, "b"),
            unit(UnitKind::Content, "c"),
        ];

        let started = tokio::time::Instant::now();
        let verdicts = analyze_units(
            &backend,
            units,
            &goal(),
            None,
            &AnalysisConfig::default(),
            Utc::now(),
        )
        .await;

        assert_eq!(verdicts.len(), 3);
        assert!(started.elapsed() < Duration::from_secs(8));
    }

    #[tokio::test]
    async fn failed_unit_does_not_sink_the_others() {
        let backend = MockBackend::with(|prompt| {
            if prompt.contains("broken") {
                String::new()
            } else {
                "RELEVANT: yes\nREASONING: fine".to_string()
            }
        });
        let units = vec![unit(UnitKind::Content, "broken"), unit(UnitKind::Content, "fine")];

        let verdicts = analyze_units(
            &backend,
            units,
            &goal(),
            None,
            &AnalysisConfig::default(),
            Utc::now(),
        )
        .await;

        assert_eq!(verdicts[0].rationale, NO_RESPONSE_RATIONALE);
        assert!(verdicts[1].is_relevant);
    }
}
