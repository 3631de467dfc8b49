use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dispo_agent::{
    DEFAULT_CLIENT_TIMEOUT, DispositionForm, EndpointEnv, HttpRelayClient, Notice, Notifier,
    PanelRegistry, TaskContext, register_disposition_panel, resolve_endpoint,
};
use dispo_core::Disposition;
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(
    name = "dispo-agent",
    version,
    about = "Record call dispositions from the terminal through the disposition relay"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the dispositions an agent can record
    Dispositions,
    /// Print the relay address submissions would be sent to
    Endpoint {
        /// Relay address; overrides DISPOSITION_HANDLER_URL.
        #[arg(long, value_name = "URL")]
        relay_url: Option<String>,
    },
    /// Show the panels this plugin registers with the host desktop
    Panels,
    /// Submit a disposition for a call
    Submit(SubmitArgs),
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    /// One of the labels printed by `dispositions`.
    #[arg(long)]
    disposition: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Task document (JSON with sid, workerName, age, attributes).
    #[arg(long, value_name = "PATH")]
    task: Option<PathBuf>,
    #[arg(long)]
    task_sid: Option<String>,
    #[arg(long)]
    call_sid: Option<String>,
    #[arg(long)]
    customer_phone: Option<String>,
    #[arg(long)]
    customer_name: Option<String>,
    #[arg(long)]
    agent_name: Option<String>,
    /// Call duration in seconds.
    #[arg(long)]
    duration: Option<u64>,
    /// Relay address; overrides DISPOSITION_HANDLER_URL.
    #[arg(long, value_name = "URL")]
    relay_url: Option<String>,
    /// Seconds to wait for the relay before giving up.
    #[arg(long, default_value_t = DEFAULT_CLIENT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(msg) => println!("{msg}"),
            Notice::Prompt(msg) | Notice::Error(msg) => eprintln!("{msg}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    dispo_telemetry::install("dispo-agent")?;

    match Cli::parse().command {
        Command::Dispositions => {
            for d in Disposition::ALL {
                println!("{d}");
            }
            Ok(())
        }
        Command::Endpoint { relay_url } => {
            println!("{}", endpoint(relay_url));
            Ok(())
        }
        Command::Panels => {
            let mut registry = PanelRegistry::default();
            register_disposition_panel(&mut registry)?;
            for (slot, spec) in registry.panels() {
                println!(
                    "{slot}\t{}\tsort={}\tlabel={}",
                    spec.key,
                    spec.sort_order,
                    spec.tab_label.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Command::Submit(args) => submit(args).await,
    }
}

fn endpoint(relay_url: Option<String>) -> String {
    let mut env = EndpointEnv::from_env();
    if relay_url.is_some() {
        env.configured_url = relay_url;
    }
    resolve_endpoint(&env)
}

async fn submit(args: SubmitArgs) -> Result<()> {
    let mut form = DispositionForm::new();
    form.select_disposition(&args.disposition)?;
    form.set_notes(args.notes.clone());

    let task = task_context(&args)?;
    let summary = task.summary();
    if summary.test_mode {
        eprintln!("TEST MODE: no active task; submitting with placeholder task data");
    }

    let url = endpoint(args.relay_url.clone());
    let client = HttpRelayClient::new(Duration::from_secs(args.timeout_secs))?;
    if form
        .submit(&task, &url, &client, &ConsoleNotifier)
        .await
        .is_err()
    {
        bail!("disposition was not saved");
    }
    Ok(())
}

fn task_context(args: &SubmitArgs) -> Result<TaskContext> {
    let mut task = match &args.task {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<TaskContext>(&raw)
                .with_context(|| format!("invalid task document {}", path.display()))?
        }
        None => TaskContext::default(),
    };

    if args.task_sid.is_some() {
        task.sid = args.task_sid.clone();
    }
    if args.agent_name.is_some() {
        task.worker_name = args.agent_name.clone();
    }
    if args.duration.is_some() {
        task.age = args.duration;
    }

    let mut attributes = match std::mem::take(&mut task.attributes) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in [
        ("call_sid", &args.call_sid),
        ("from", &args.customer_phone),
        ("name", &args.customer_name),
    ] {
        if let Some(value) = value {
            attributes.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    task.attributes = Value::Object(attributes);
    Ok(task)
}
