//! Integration tests for campaign loading, condition evaluation and survey runs
//!
//! These tests drive the public API end to end, using the sample campaign in
//! `demos/` where a full campaign is needed.

use campaign_rs::campaign::condition::{evaluate, parse, ConditionCache};
use campaign_rs::campaign::prompt::{
    NumberPrompt, Prompt, PromptKind, TimestampPrompt, JSON_KEY_PROMPT_ID, JSON_KEY_RESPONSE,
};
use campaign_rs::campaign::response::{NoResponse, ResponseValue};
use campaign_rs::campaign::survey::ResponseContext;
use campaign_rs::campaign::{Campaign, CampaignLoader, RunningState};
use campaign_rs::error::{CampaignError, DomainError};
use chrono::{DateTime, Offset};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Helpers
// ============================================================================

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/sleep-study.yaml")
}

fn load_demo() -> Campaign {
    CampaignLoader::new().load_campaign(demo_path()).unwrap()
}

fn number_prompt(id: &str) -> Arc<Prompt> {
    Arc::new(Prompt::new(
        id,
        "?",
        PromptKind::Number(NumberPrompt::default()),
    ))
}

// ============================================================================
// Condition Evaluation Tests
// ============================================================================

#[test]
fn test_condition_follows_context() {
    let p1 = number_prompt("P1");
    let expr = parse("P1==5").unwrap();
    let mut context = ResponseContext::new();

    context.insert(p1.create_response(None, 5.0).unwrap());
    assert!(evaluate(&expr, &context));

    context.insert(p1.create_response(None, 6.0).unwrap());
    assert!(!evaluate(&expr, &context));

    context.remove("P1");
    assert!(!evaluate(&expr, &context));
}

#[test]
fn test_precedence_and_grouping() {
    let a = number_prompt("a");
    let b = number_prompt("b");
    let c = number_prompt("c");
    let context: ResponseContext = vec![
        a.create_response(None, 1.0).unwrap(),
        b.create_response(None, 0.0).unwrap(),
        c.create_response(None, 0.0).unwrap(),
    ]
    .into_iter()
    .collect();

    // `and` binds tighter than `or`
    assert!(evaluate(&parse("a == 1 or b == 1 and c == 1").unwrap(), &context));
    assert!(!evaluate(&parse("(a == 1 or b == 1) and c == 1").unwrap(), &context));
}

#[test]
fn test_malformed_condition_reports_position() {
    let err = parse("mood >= 3 and").unwrap_err();
    assert_eq!(err.position, 13);
    assert_eq!(err.token, "<end>");

    assert!(parse("(mood >= 3").is_err());
    assert!(parse("mood >= 3)").is_err());
    assert!(parse("mood 3").is_err());
}

// ============================================================================
// Timestamp Prompt Tests
// ============================================================================

#[test]
fn test_timestamp_answer_keeps_offset() {
    let prompt = Arc::new(Prompt::new(
        "wake_time",
        "When did you wake up?",
        PromptKind::Timestamp(TimestampPrompt),
    ));
    let response = prompt
        .create_response(None, "2012-05-01T10:00:00-07:00")
        .unwrap();

    let timestamp = response.value().as_timestamp().unwrap();
    assert_eq!(timestamp.offset().fix().local_minus_utc(), -7 * 3600);
    assert_eq!(
        *timestamp,
        DateTime::parse_from_rfc3339("2012-05-01T17:00:00Z").unwrap()
    );

    let err = prompt.create_response(None, "not-a-date").unwrap_err();
    assert!(matches!(err, DomainError::InvalidValue { ref prompt_id, .. } if prompt_id == "wake_time"));
}

#[test]
fn test_timestamp_response_serializes_as_text() {
    let prompt = Arc::new(Prompt::new(
        "wake_time",
        "?",
        PromptKind::Timestamp(TimestampPrompt),
    ));
    let response = prompt
        .create_response(None, "2012-05-01T10:00:00-07:00")
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json[JSON_KEY_PROMPT_ID], "wake_time");
    let text = json[JSON_KEY_RESPONSE].as_str().unwrap();
    assert_eq!(
        DateTime::parse_from_rfc3339(text).unwrap(),
        *response.value().as_timestamp().unwrap()
    );
    assert!(json.get("repeatable_set_iteration").is_none());

    assert_eq!(
        serde_json::to_value(prompt.response_schema()).unwrap(),
        json!({
            "type": "object",
            "schema": [
                {"name": "prompt_id", "type": "string"},
                {"name": "value", "type": "string"}
            ]
        })
    );
}

// ============================================================================
// Campaign Loading Tests
// ============================================================================

#[test]
fn test_load_demo_campaign() {
    let campaign = load_demo();
    assert_eq!(campaign.id(), "sleep-study");
    assert_eq!(campaign.running_state(), RunningState::Running);

    let survey = campaign.survey("morning").unwrap();
    let ids: Vec<_> = survey.prompts().map(|p| p.id()).collect();
    assert_eq!(ids, vec!["wake_time", "hours", "rested", "drink", "cups", "notes"]);

    let hours = survey.prompt("hours").unwrap();
    assert_eq!(hours.unit(), Some("hours"));
    assert_eq!(hours.skip_label(), Some("I don't remember"));
    assert_eq!(survey.prompt("cups").unwrap().repeatable_set(), Some("drinks"));
}

#[test]
fn test_load_rejects_timestamp_condition() {
    let yaml = r#"
id: bad
name: Bad
surveys:
  - id: morning
    title: Morning
    items:
      - prompt: { id: wake_time, type: timestamp, text: When? }
      - prompt: { id: late, type: text, text: Why?, condition: "wake_time == SKIPPED" }
"#;
    let def = CampaignLoader::parse_yaml(yaml).unwrap();
    let err = CampaignLoader::new().compile(&def).unwrap_err();
    assert!(matches!(
        err,
        CampaignError::Domain(DomainError::IllegalCondition { .. })
    ));
}

#[test]
fn test_concurrent_loads_share_cache() {
    let cache = ConditionCache::new();
    let path = demo_path();

    let campaigns: Vec<Campaign> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = CampaignLoader::with_cache(cache.clone());
                let path = path.clone();
                scope.spawn(move || loader.load_campaign(path).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(campaigns.windows(2).all(|pair| pair[0] == pair[1]));
    // Two distinct conditions in the demo campaign
    assert_eq!(cache.len(), 2);
}

// ============================================================================
// Survey Run Tests
// ============================================================================

#[test]
fn test_run_demo_survey() {
    let campaign = load_demo();
    let mut run = campaign.start("morning").unwrap();

    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "wake_time");
    run.answer("2012-05-01T06:30:00-07:00").unwrap();

    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "hours");
    run.answer(8.0).unwrap();

    // Slept enough, so `rested` is skipped over
    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "drink");
    run.answer("coffee").unwrap();
    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "cups");
    run.answer(2.0).unwrap();

    run.repeat().unwrap();
    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "drink");
    run.answer("water").unwrap();

    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "notes");
    run.answer(NoResponse::Skipped).unwrap();

    let submission = run.finish().unwrap();
    let recorded: Vec<_> = submission
        .responses
        .iter()
        .map(|r| (r.prompt_id(), r.repeatable_set_iteration()))
        .collect();
    assert_eq!(
        recorded,
        vec![
            ("wake_time", None),
            ("hours", None),
            ("rested", None),
            ("drink", Some(0)),
            ("cups", Some(0)),
            ("drink", Some(1)),
            ("cups", Some(1)),
            ("notes", None),
        ]
    );
    assert_eq!(
        submission.responses[2].value(),
        &ResponseValue::NoResponse(NoResponse::NotDisplayed)
    );

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["responses"][4]["repeatable_set_iteration"], 0);
    assert_eq!(json["responses"][7]["value"], "SKIPPED");
}

#[test]
fn test_skipped_answer_shows_follow_up() {
    let campaign = load_demo();
    let mut run = campaign.start("morning").unwrap();

    run.next_prompt().unwrap();
    run.answer("2012-05-01 06:30:00").unwrap();
    run.next_prompt().unwrap();
    run.answer("SKIPPED").unwrap();

    assert_eq!(run.next_prompt().unwrap().unwrap().id(), "rested");
}

#[test]
fn test_stopped_campaign_refuses_runs() {
    let yaml = "id: done\nname: Done\nrunning_state: stopped\nsurveys:\n  - { id: s, title: S }\n";
    let def = CampaignLoader::parse_yaml(yaml).unwrap();
    let campaign = CampaignLoader::new().compile(&def).unwrap();

    assert!(matches!(
        campaign.start("s"),
        Err(CampaignError::CampaignStopped(_))
    ));
}
