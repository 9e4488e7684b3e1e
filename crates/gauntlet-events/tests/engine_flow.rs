//! Integration of the condition gate, argument resolution, and the recorder:
//! a minimal launcher loop wired the way a host engine would drive the core.

use anyhow::Result;

use gauntlet_conditions::{
    evaluate_conditions, ConditionDecl, ConditionSet, FakeEnvironment, PatternCondition,
};
use gauntlet_core::{ExtensionContext, ParamType, ParameterDeclarations, TestElement};
use gauntlet_events::{
    EventKind, EventMatcher, ExecutionListener, ExecutionOutcome, ExecutionRecorder, Subject,
};
use gauntlet_params::{resolve, ArgumentSourceDecl, CsvSourceDecl};

/// Run one parameterized element through the gate and the invocation loop,
/// reporting everything to `listener`.
fn drive_element(
    element: &TestElement,
    conditions: &ConditionSet,
    source: &ArgumentSourceDecl,
    params: &ParameterDeclarations,
    env: &FakeEnvironment,
    listener: &dyn ExecutionListener,
) -> Result<()> {
    let ctx = ExtensionContext::new(element.clone());
    let subject = Subject::of(element);

    let verdict = evaluate_conditions(conditions, &ctx, env)?;
    if verdict.is_disabled() {
        listener.skipped(subject, verdict.reason());
        return Ok(());
    }

    listener.started(subject.clone());
    let mut failed = false;
    for (index, tuple) in resolve(source, params, &ctx)?.enumerate() {
        match tuple {
            Ok(tuple) => {
                let invocation = TestElement::test(
                    element.id.child(&format!("[invocation:{}]", index + 1)).as_str(),
                    tuple.display_name(index + 1),
                );
                let invocation_subject = Subject::of(&invocation);
                listener.dynamic_registered(invocation_subject.clone());
                listener.started(invocation_subject.clone());
                listener.finished(invocation_subject, ExecutionOutcome::successful());
            }
            Err(error) => {
                failed = true;
                listener.finished(subject.clone(), ExecutionOutcome::failed(error.to_string()));
                break;
            }
        }
    }
    if !failed {
        listener.finished(subject, ExecutionOutcome::successful());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn two_string_params() -> ParameterDeclarations {
    ParameterDeclarations::new("case fruits(str, str)")
        .with(ParamType::Str)
        .with(ParamType::Str)
}

#[test]
fn enabled_element_runs_one_invocation_per_tuple() -> Result<()> {
    init_tracing();
    let recorder = ExecutionRecorder::new();
    let element = TestElement::test("e/fruits", "fruits");
    let env = FakeEnvironment::new();
    let source = ArgumentSourceDecl::Csv(CsvSourceDecl::rows(&["apple, 1", "banana, 2"]));

    drive_element(
        &element,
        &ConditionSet::new(),
        &source,
        &two_string_params(),
        &env,
        &recorder,
    )?;

    let log = recorder.snapshot();
    log.assert_sequence(&[
        EventMatcher::started().subject("fruits"),
        EventMatcher::dynamic_registered(),
        EventMatcher::started().subject("[1] apple, 1"),
        EventMatcher::finished().subject("[1] apple, 1").successful(),
        EventMatcher::dynamic_registered(),
        EventMatcher::started().subject("[2] banana, 2"),
        EventMatcher::finished().subject("[2] banana, 2").successful(),
        EventMatcher::finished().subject("fruits").successful(),
    ])
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let stats = log.stats();
    assert_eq!(stats.started, 3);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.dynamically_registered, 2);
    assert_eq!(stats.skipped, 0);
    Ok(())
}

#[test]
fn disabled_element_records_one_skip_with_the_verdict_reason() -> Result<()> {
    let recorder = ExecutionRecorder::new();
    let element = TestElement::test("e/gated", "gated");
    let env = FakeEnvironment::new().with_env_var("K", "enigma");
    let conditions = ConditionSet::new().with(ConditionDecl::DisabledIfEnvironmentVariable(
        PatternCondition::new("K", "enigma"),
    ));
    let source = ArgumentSourceDecl::Csv(CsvSourceDecl::rows(&["never, parsed"]));

    drive_element(
        &element,
        &conditions,
        &source,
        &two_string_params(),
        &env,
        &recorder,
    )?;

    let log = recorder.snapshot();
    log.assert_sequence(&[EventMatcher::skipped()
        .subject("gated")
        .reason_containing("matches regular expression")])
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(log.count(EventKind::Started), 0);
    Ok(())
}

#[test]
fn malformed_row_fails_the_element_mid_stream() -> Result<()> {
    let recorder = ExecutionRecorder::new();
    let element = TestElement::test("e/broken", "broken");
    let env = FakeEnvironment::new();
    let source = ArgumentSourceDecl::Csv(CsvSourceDecl::rows(&["fine, row", "'unterminated"]));

    drive_element(
        &element,
        &ConditionSet::new(),
        &source,
        &two_string_params(),
        &env,
        &recorder,
    )?;

    let log = recorder.snapshot();
    // One good invocation, then the element fails on the malformed row.
    assert_eq!(log.stats().succeeded, 1);
    assert_eq!(log.stats().failed, 1);
    let failure = log
        .by_kind(EventKind::Finished)
        .for_subject_name("broken")
        .events()
        .first()
        .cloned()
        .expect("element finish event");
    let outcome = failure.outcome().expect("outcome").clone();
    assert!(outcome.error.unwrap().contains("unterminated quoted field"));
    Ok(())
}

#[test]
fn configuration_error_propagates_instead_of_recording_events() {
    let recorder = ExecutionRecorder::new();
    let element = TestElement::test("e/misconfigured", "misconfigured");
    let env = FakeEnvironment::new();
    // Blank 'named' attribute: a configuration error, not a verdict.
    let conditions = ConditionSet::new().with(ConditionDecl::DisabledIfEnvironmentVariable(
        PatternCondition::new("  ", "x"),
    ));
    let source = ArgumentSourceDecl::Csv(CsvSourceDecl::rows(&["a, b"]));

    let result = drive_element(
        &element,
        &conditions,
        &source,
        &two_string_params(),
        &env,
        &recorder,
    );
    assert!(result.is_err());
    assert!(recorder.is_empty());
}
