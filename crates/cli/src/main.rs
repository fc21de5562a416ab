mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtime::model::ToolCall;
use runtime::tools::invoker;
use runtime::{GroqBackend, Session, ToolRegistry, TurnRole};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::{Error, Result};

const FAILURE_MESSAGE: &str = "Failed to generate a reply. Check the logs for details.";

#[derive(Parser)]
#[command(name = "toolchat")]
#[command(about = "Terminal chat with a tool-calling LLM", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file (default: ./toolchat.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to use, overriding config and GROQ_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature, overriding config and GROQ_TEMPERATURE
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// System prompt for new conversations
    #[arg(long, global = true)]
    system_prompt: Option<String>,

    /// Log tool calls and loop iterations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// List the registered tools
    Tools,
    /// Invoke a single tool directly
    Call {
        /// Tool name
        name: String,
        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::discover(cli.config.as_deref())?;
    config.apply_env();
    config.apply_overrides(cli.model, cli.temperature, cli.system_prompt);

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat(&config).await,
        Some(Commands::Tools) => cmd_tools(),
        Some(Commands::Call { name, args }) => cmd_call(&name, &args),
    }
}

fn build_backend(config: &Config) -> Result<GroqBackend> {
    let api_key = config.api_key().ok_or(Error::MissingEnv("GROQ_API_KEY"))?;

    let mut builder = GroqBackend::builder(api_key, &config.backend.model)
        .base_url(&config.backend.base_url)
        .temperature(config.backend.temperature);
    if let Some(max_tokens) = config.backend.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

async fn cmd_chat(config: &Config) -> Result<()> {
    println!("toolchat v{}", env!("CARGO_PKG_VERSION"));

    let backend = build_backend(config)?;
    let registry = toolbox::default_registry()?;
    let model = registry.bind(backend, config.bind_options())?;
    info!(model = %model.backend(), "Chat session starting");

    let mut session = Session::new(model, &config.chat.system_prompt)
        .with_max_iterations(config.chat.max_iterations)
        .with_tools_enabled(config.chat.use_tools);

    println!("Model: {}", config.backend.model);
    if config.chat.use_tools {
        println!("Tools: {}", session.model().tools().list_names().join(", "));
    } else {
        println!("Tools: disabled");
    }
    println!("Commands: /tools, /history, /reset. Type 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        match Input::parse(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Reset => {
                session.reset();
                println!("Conversation reset.\n");
            }
            Input::Tools => {
                print_tools(session.model().tools());
                println!();
            }
            Input::History => {
                print_history(&session);
                println!();
            }
            Input::Message(text) => match session.chat(text).await {
                Ok(reply) => println!("\n{reply}\n"),
                Err(_) => eprintln!("{FAILURE_MESSAGE}\n"),
            },
        }
    }

    println!("\nGoodbye.");
    Ok(())
}

fn cmd_tools() -> Result<()> {
    let registry = toolbox::default_registry()?;
    println!("Total tools registered: {}\n", registry.len());
    print_tools(&registry);
    Ok(())
}

fn cmd_call(name: &str, args: &str) -> Result<()> {
    let arguments = match serde_json::from_str(args) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(Error::InvalidArgs(format!("expected an object, got {other}"))),
        Err(e) => return Err(Error::InvalidArgs(e.to_string())),
    };

    let registry = toolbox::default_registry()?;
    let call = ToolCall::new("call_0", name, arguments);

    let result = invoker::execute(&registry, &call);
    if result.is_error {
        return Err(Error::ToolFailed(result.content));
    }
    println!("{}", result.content);
    Ok(())
}

fn print_tools(registry: &ToolRegistry) {
    for (index, tool) in registry.iter().enumerate() {
        println!("{:>2}. {:<18} {}", index + 1, tool.name(), tool.description());
    }
}

fn print_history<B: runtime::Backend>(session: &Session<B>) {
    let turns = session.history().turns();
    if turns.iter().all(|turn| turn.role == TurnRole::System) {
        println!("No messages yet.");
        return;
    }

    for turn in turns.iter().filter(|turn| turn.role != TurnRole::System) {
        println!("{}: {}", turn.role, turn.content);
    }
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Reset,
    Tools,
    History,
    Message(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "quit" | "exit" => Self::Quit,
            "/reset" => Self::Reset,
            "/tools" => Self::Tools,
            "/history" => Self::History,
            text => Self::Message(text),
        }
    }
}
