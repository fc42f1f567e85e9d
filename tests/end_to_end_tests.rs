use std::time::Duration;

use futures::StreamExt;

use mailflow::services::{SampleEmail, TestStep};
use mailflow::{
    ActionBlock, ActionMode, AgentKind, ConditionBlock, ConsoleSubmitter, EditorConfig,
    EmailSearch, EmailSelection, ExtractionField, FlowAdvisor, FlowBuilder, FlowEditor,
    MockEmailSearch, Predicate, PredicateField, SimulatedTestHarness, StandardAction,
    StepStatus, SubmissionError, TestHarness, Trigger,
};

fn invoice_flow() -> mailflow::Flow {
    let mut builder = FlowBuilder::new("Invoice triage");
    builder
        .trigger(Trigger::NewConversation)
        .add_condition(ConditionBlock::standard([Predicate::new(
            PredicateField::SubjectContains,
            "invoice",
        )]))
        .add_action(ActionBlock::standard(StandardAction::AddLabel));
    builder.build()
}

#[tokio::test(start_paused = true)]
async fn test_run_reports_three_successful_steps() {
    let editor = FlowEditor::from_flow(invoice_flow()).unwrap();
    let harness = SimulatedTestHarness::with_config(&EditorConfig::default());
    let started = tokio::time::Instant::now();

    let run = harness.run_test(editor.flow(), "1").await.unwrap();

    assert_eq!(run.flow_name, "Invoice triage");
    assert_eq!(run.email.subject, "Security alert");
    assert_eq!(run.steps.len(), 3);
    assert!(run.steps.iter().all(|step| step.status == StepStatus::Success));
    assert!(started.elapsed() >= Duration::from_millis(3 * 1500));
}

#[tokio::test(start_paused = true)]
async fn progress_stream_observes_each_step() {
    let harness = SimulatedTestHarness::new(Duration::from_millis(1500));
    let collector = tokio::spawn(harness.progress_stream().collect::<Vec<Vec<TestStep>>>());

    let run = harness.run_test(&invoice_flow(), "4").await.unwrap();
    drop(harness);
    let snapshots = collector.await.unwrap();

    assert!(run.passed());
    let first = snapshots.first().unwrap();
    assert!(first.iter().all(|step| step.status == StepStatus::Pending));
    let successes: Vec<usize> = snapshots
        .iter()
        .map(|steps| {
            steps
                .iter()
                .filter(|step| step.status == StepStatus::Success)
                .count()
        })
        .collect();
    assert_eq!(successes, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn custom_inbox_replaces_samples() {
    let email = SampleEmail {
        id: "x".into(),
        subject: "Refund request".into(),
        from: "customer@example.com".into(),
        time: "1h ago".into(),
        tag: "Billing".into(),
    };
    let harness = SimulatedTestHarness::new(Duration::ZERO).with_inbox(vec![email.clone()]);
    let run = harness.run_test(&invoice_flow(), "x").await.unwrap();
    assert_eq!(run.email, email);
    assert!(harness.run_test(&invoice_flow(), "1").await.is_err());
}

#[tokio::test]
async fn training_emails_flow_from_search_into_extraction() {
    let mut editor = FlowEditor::new();
    editor.set_name("Order extraction");
    let action = editor.blocks()[1].id.clone();
    editor.edit_action(&action, |block| {
        block.set_mode(ActionMode::Ai);
        block.select_agent(AgentKind::Extraction);
        block.agent.extraction.fields = vec![ExtractionField::named("OrderNumber")
            .with_description("Order reference")
            .with_examples("#12345, #54321")];
    });

    let search = MockEmailSearch::new(Duration::ZERO);
    let results = search.search("order").await.unwrap();
    let current = editor
        .block(&action)
        .and_then(|block| block.as_action())
        .map(|block| block.agent.extraction.training_emails.clone())
        .unwrap();
    let mut selection = EmailSelection::from_results(results, &current);
    selection.toggle_all();
    editor.edit_action(&action, |block| selection.apply_to(&mut block.agent.extraction));

    let extraction = &editor
        .block(&action)
        .and_then(|block| block.as_action())
        .unwrap()
        .agent
        .extraction;
    assert_eq!(extraction.training_emails.len(), 4);
    assert!(!extraction.has_enough_training_emails());
    assert!(editor
        .field_options()
        .contains(&PredicateField::Extracted("OrderNumber".into())));
    assert!(!FlowAdvisor::review(editor.flow()).is_empty());
}

#[tokio::test]
async fn save_and_enable_submits_the_current_flow() {
    let mut editor = FlowEditor::new();
    let submitter = ConsoleSubmitter::new();

    let err = editor.save_and_enable(&submitter).await.unwrap_err();
    assert!(matches!(err, SubmissionError::BlankName));
    assert!(submitter.submissions().is_empty());

    editor.load(invoice_flow()).unwrap();
    let id = editor.save_and_enable(&submitter).await.unwrap();
    let submissions = submitter.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, id);

    let saved: serde_json::Value = serde_json::from_str(&submissions[0].1).unwrap();
    assert_eq!(saved["name"], "Invoice triage");
    assert_eq!(saved["trigger"], "new-conversation");
    assert_eq!(saved["blocks"][0]["kind"], "condition");
    assert_eq!(saved["blocks"][1]["kind"], "action");
}
