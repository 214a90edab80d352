use std::fmt;
use std::sync::Arc;

use mindful_core::availability::SessionState;
use mindful_core::model::ProgramId;
use services::{ApiConfig, Clock, HttpProgramApi, ProgramService};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::vm::{
    ProgramCardVm, ProgramDetailVm, load_assigned_programs, load_completed_programs,
    load_program_detail,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidProgramId { raw: String },
    MissingProgramId,
    MissingApiUrl,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidProgramId { raw } => write!(f, "invalid --program-id value: {raw}"),
            ArgsError::MissingProgramId => write!(f, "show requires --program-id"),
            ArgsError::MissingApiUrl => write!(f, "no API URL (use --api or MINDFUL_API_URL)"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list      [--api <url>] [--log-level <level>]");
    eprintln!("  cargo run -p app -- completed [--api <url>] [--log-level <level>]");
    eprintln!("  cargo run -p app -- show --program-id <id> [--api <url>] [--log-level <level>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MINDFUL_API_URL, MINDFUL_API_TOKEN, MINDFUL_FETCH_CONCURRENCY,");
    eprintln!("  MINDFUL_PROGRAM_ID, MINDFUL_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Completed,
    Show,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "completed" => Some(Self::Completed),
            "show" => Some(Self::Show),
            _ => None,
        }
    }
}

struct Args {
    api_url: Option<String>,
    program_id: Option<ProgramId>,
    log_level: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_url = None;
        let mut program_id = std::env::var("MINDFUL_PROGRAM_ID")
            .ok()
            .and_then(|value| value.parse::<ProgramId>().ok());
        let mut log_level = std::env::var("MINDFUL_LOG").unwrap_or_else(|_| "info".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::MissingApiUrl);
                    }
                    api_url = Some(value);
                }
                "--program-id" => {
                    let value = require_value(args, "--program-id")?;
                    let parsed = value
                        .parse::<ProgramId>()
                        .map_err(|_| ArgsError::InvalidProgramId { raw: value.clone() })?;
                    program_id = Some(parsed);
                }
                "--log-level" => log_level = require_value(args, "--log-level")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_url,
            program_id,
            log_level,
        })
    }

    fn api_config(&self) -> Result<ApiConfig, ArgsError> {
        let from_env = ApiConfig::from_env();
        match (&self.api_url, from_env) {
            (Some(url), Some(env)) => Ok(ApiConfig {
                base_url: url.clone(),
                ..env
            }),
            (Some(url), None) => Ok(ApiConfig::new(url.clone())),
            (None, Some(env)) => Ok(env),
            (None, None) => Err(ArgsError::MissingApiUrl),
        }
    }
}

fn setup_logging(level: &str) {
    // Log to stderr so stdout stays clean for the printed program data.
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level '{level}', defaulting to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn print_cards(title: &str, cards: &[ProgramCardVm]) {
    println!("{title}");
    if cards.is_empty() {
        println!("  (none)");
        return;
    }
    for card in cards {
        println!(
            "  [{}] {} | {} | {} | {}",
            card.id, card.name, card.status_label, card.sessions_label, card.window_label
        );
        if let Some(summary) = &card.summary {
            println!("      {summary}");
        }
    }
}

fn print_detail(detail: &ProgramDetailVm) {
    println!("{} ({})", detail.name, detail.window_label);
    println!(
        "Progress: {} | {} | {} | {}",
        detail.progress.percent_label,
        detail.progress.steps_label,
        detail.progress.sessions_label,
        detail.progress.minutes_label
    );
    if detail.replay_mode {
        println!("Program finished: every session can be repeated.");
    } else if !detail.enrollment_open {
        println!("Enrollment window is not open today.");
    }
    if let Some(prompt) = &detail.questionnaire_prompt {
        println!("Next: {}", prompt.label);
    }
    for session in &detail.sessions {
        let state = match session.state {
            SessionState::Locked(_) => "locked",
            SessionState::Available => "available",
            SessionState::Completed => "completed",
        };
        let hint = session
            .action_label
            .or(session.lock_hint)
            .unwrap_or_default();
        println!(
            "  {:<8} {:<28} {:>10}  {:<10} {}",
            session.week_label, session.practice_label, session.duration_label, state, hint
        );
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: list assigned programs when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::List,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::List,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    setup_logging(&parsed.log_level);

    let config = parsed.api_config()?;
    info!(api = %config.base_url, concurrency = config.fetch_concurrency, "using backend");
    let fetch_concurrency = config.fetch_concurrency;
    let api = Arc::new(HttpProgramApi::new(config));
    let service = ProgramService::new(Clock::default_clock(), api)
        .with_fetch_concurrency(fetch_concurrency);

    debug!(command = ?cmd, "dispatching command");
    match cmd {
        Command::List => {
            let cards = load_assigned_programs(&service)
                .await
                .map_err(|e| e.message())?;
            print_cards("Assigned programs", &cards);
        }
        Command::Completed => {
            let cards = load_completed_programs(&service)
                .await
                .map_err(|e| e.message())?;
            print_cards("Completed programs", &cards);
        }
        Command::Show => {
            let id = parsed.program_id.ok_or(ArgsError::MissingProgramId)?;
            let detail = load_program_detail(&service, id)
                .await
                .map_err(|e| e.message())?;
            print_detail(&detail);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
