use std::path::PathBuf;

use clap::{Parser, Subcommand};
use futures::StreamExt;
use mailflow::logging::LoggingConfig;
use mailflow::services::{StepStatus, TestStep};
use mailflow::{
    sample_inbox, ActionBlock, ConditionBlock, ConsoleSubmitter, EditorConfig, Flow,
    FlowAdvisor, FlowBuilder, FlowEditor, Predicate, PredicateField, SimulatedTestHarness,
    StandardAction, TestHarness, Trigger,
};

#[derive(Parser)]
#[command(name = "mailflow", version, about = "Email automation flow builder", author)]
struct Cli {
    /// JSON config file; MAILFLOW_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter directives, e.g. `mailflow=debug`; overrides RUST_LOG and the config file
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the demo flow as JSON
    Demo {
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// List the predicate field options of the demo flow
    Options,
    /// List the sample inbox used by test runs
    Inbox,
    /// Run the simulated test against a sample email
    Test {
        #[arg(long, default_value = "1")]
        email: String,
    },
    /// Save and enable the demo flow
    Save,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    let mut logging = LoggingConfig::from_config(&config);
    if let Some(filter) = cli.log {
        logging = logging.with_filter(filter);
    }
    logging.init();

    match cli.command {
        Command::Demo { compact } => handle_demo(!compact)?,
        Command::Options => handle_options()?,
        Command::Inbox => handle_inbox(),
        Command::Test { email } => handle_test(&config, &email).await?,
        Command::Save => handle_save(&config).await?,
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::from_path(&path)?,
        None => EditorConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn demo_flow() -> Flow {
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

fn handle_demo(pretty: bool) -> anyhow::Result<()> {
    let flow = demo_flow();
    let content = if pretty {
        serde_json::to_string_pretty(&flow)?
    } else {
        serde_json::to_string(&flow)?
    };
    println!("{content}");
    for hint in FlowAdvisor::review(&flow) {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn handle_options() -> anyhow::Result<()> {
    let editor = FlowEditor::from_flow(demo_flow())?;
    println!("{:<32} {}", "Field", "Label");
    for field in editor.field_options() {
        println!("{:<32} {}", field.to_string(), field.label());
    }
    Ok(())
}

fn handle_inbox() {
    println!("{:<4} {:<48} {:<24} {}", "Id", "Subject", "From", "Time");
    for email in sample_inbox() {
        println!(
            "{:<4} {:<48} {:<24} {}",
            email.id, email.subject, email.from, email.time
        );
    }
}

fn render_steps(steps: &[TestStep]) {
    for step in steps {
        let mark = match step.status {
            StepStatus::Pending => "…",
            StepStatus::Success => "✓",
            StepStatus::Failed => "✗",
        };
        println!("  {mark} {}", step.step);
    }
    println!();
}

async fn handle_test(config: &EditorConfig, email: &str) -> anyhow::Result<()> {
    let flow = demo_flow();
    let harness = SimulatedTestHarness::with_config(config);
    let mut progress = Box::pin(harness.progress_stream());
    let printer = tokio::spawn(async move {
        while let Some(snapshot) = progress.next().await {
            render_steps(&snapshot);
        }
    });

    let run = harness.run_test(&flow, email).await?;
    drop(harness);
    printer.await?;

    println!(
        "Test of `{}` against \"{}\": {}",
        run.flow_name,
        run.email.subject,
        if run.passed() { "passed" } else { "failed" }
    );
    Ok(())
}

async fn handle_save(config: &EditorConfig) -> anyhow::Result<()> {
    let mut editor = FlowEditor::with_config(config);
    editor.load(demo_flow())?;
    let submitter = ConsoleSubmitter::new();
    let id = editor.save_and_enable(&submitter).await?;
    println!("Automation saved as `{id}`");
    Ok(())
}
