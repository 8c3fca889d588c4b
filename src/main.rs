use clap::{Parser, Subcommand};
use colored::*;
use anyhow::Result;

mod agent;
mod app;
mod catalog;
mod config;
mod handler;
mod tui;
mod ui;

use agent::AgentClient;
use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "sqlagent")]
#[command(about = "Chat with a natural-language SQL agent from the terminal")]
struct Cli {
    /// Base URL of the agent backend API
    #[arg(long, env = "SQLAGENT_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat session (default)
    Chat,
    /// Ask a single question and print the agent's answer
    Ask {
        /// Your question, in plain English
        question: String,
    },
    /// List the built-in example questions
    Examples,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::config_path()?;
    let config = Config::load().unwrap_or_default();
    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    let agent = AgentClient::new(&api_url);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(agent, config, config_path).await,
        Commands::Ask { question } => {
            env_logger::init();
            ask_once(&agent, &question).await
        }
        Commands::Examples => {
            list_examples();
            Ok(())
        }
    }
}

async fn run_chat(agent: AgentClient, config: Config, config_path: std::path::PathBuf) -> Result<()> {
    // The alternate screen owns the terminal; diagnostics go to a file.
    init_file_logger();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(agent, config, config_path);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event);
        }

        // Collect a finished exchange. Quitting mid-request just drops the
        // handle and the result with it.
        if app.pending_reply.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = app.pending_reply.take() {
                match task.await {
                    Ok(result) => app.finish_submit(result),
                    Err(err) => app.finish_submit(Err(err.into())),
                }
            }
        }
    }

    tui::restore()?;
    Ok(())
}

async fn ask_once(agent: &AgentClient, question: &str) -> Result<()> {
    println!("{} {}", "You:".cyan().bold(), question);
    println!("{}", format!("Asking the agent at {}...", agent.base_url()).dimmed());

    match agent.ask(question).await {
        Ok(answer) => {
            println!("{} {}", "Agent:".yellow().bold(), answer);
        }
        Err(err) => {
            log::error!("agent request failed: {:#}", err);
            println!("{} {}", "Agent:".yellow().bold(), agent::FALLBACK_REPLY.red());
        }
    }

    Ok(())
}

fn list_examples() {
    println!("\n{}", "Example questions".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for section in catalog::sections() {
        println!("\n{}", section.title.bold().green());
        for example in section.examples {
            println!("  • {}", example);
        }
    }
}

fn init_file_logger() {
    let Ok(path) = Config::log_path() else { return };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .target(env_logger::fmt::Target::Pipe(Box::new(file)))
        .try_init();
    }
}
