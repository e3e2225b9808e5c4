use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use errand::config::Settings;
use errand::orchestrator::aap::AapJobApi;
use errand::orchestrator::{Orchestrator, OrchestratorConfig};
use errand::todo::TaskEngine;
use errand::todo::rest::RestTodoApi;
use errand::tools::acl::AclAuditTool;
use errand::tools::todo::{
    CompleteTaskTool, CompletedTasksTool, CreateTaskTool, DeleteTaskTool, ProjectsTool, TasksTool,
    UpdateTaskTool,
};
use errand::tools::{Outcome, ToolArgs, ToolRegistry};

#[derive(Parser)]
#[command(name = "errand", version, about = "Runs errands: to-dos and network audits.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every available tool and its argument schema
    Tools,
    /// Invoke one tool by name
    Run {
        /// Tool name, as shown by `errand tools`
        tool: String,

        /// Tool argument as key=value; repeat for multiple args
        #[arg(short, long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Fail on missing credentials before anything touches the network.
    let settings = Settings::from_env()?;
    let registry = build_registry(&settings)?;

    match cli.command {
        Command::Tools => {
            for (name, description) in registry.descriptions() {
                println!("{name}");
                println!("  {description}\n");
            }
        }
        Command::Run { tool, args } => {
            let args = parse_args(&args)?;
            let result = registry.execute(&tool, &args).await;
            match result.outcome {
                Outcome::Success(output) => println!("{output}"),
                Outcome::Error(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn build_registry(settings: &Settings) -> anyhow::Result<ToolRegistry> {
    let engine = Arc::new(TaskEngine::new(RestTodoApi::new(&settings.todo)?));
    let orchestrator = Orchestrator::new(
        AapJobApi::new(&settings.jobs)?,
        OrchestratorConfig::default(),
    );

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AclAuditTool::new(
        orchestrator,
        settings.jobs.acl_template_id,
    )));
    registry.register(Arc::new(ProjectsTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(TasksTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(CreateTaskTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(UpdateTaskTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(DeleteTaskTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(CompleteTaskTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(CompletedTasksTool::new(engine)));

    Ok(registry)
}

fn parse_args(raw: &[String]) -> anyhow::Result<ToolArgs> {
    let mut args = ToolArgs::new();
    for pair in raw {
        match pair.split_once('=') {
            Some((key, value)) => {
                args.insert(key.trim().to_string(), value.to_string());
            }
            None => anyhow::bail!("arguments must be key=value, got '{pair}'"),
        }
    }
    Ok(args)
}
