use std::fmt;
use std::sync::Arc;

use aim_core::model::UserId;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppConfig, AppServices, Clock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingUser,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingUser => write!(f, "progress requires --user <id>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw:?}"),
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
    eprintln!("  aim [ui] [--db <sqlite_url>]");
    eprintln!("  aim progress --user <id> [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  AIM_SUPABASE_URL, AIM_SUPABASE_ANON_KEY   hosted identity and progress");
    eprintln!("  AIM_GEMINI_API_KEY, AIM_GEMINI_MODEL      AI tutor");
    eprintln!("  AIM_DB_URL                                local store (default sqlite://aim.sqlite3)");
    eprintln!("  RUST_LOG, AIM_LOG                         log filter (default info)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ui,
    Progress { user: UserId },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    command: Command,
    db_url: Option<String>,
}

impl Args {
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let progress = match args.peek().map(String::as_str) {
            None => false,
            Some("ui") => {
                args.next();
                false
            }
            Some("progress") => {
                args.next();
                true
            }
            Some(first) if first.starts_with('-') => false,
            Some(first) => return Err(ArgsError::UnknownCommand(first.to_owned())),
        };

        let mut db_url = None;
        let mut user = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--user" if progress => {
                    let value = require_value(&mut args, "--user")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user = Some(parsed);
                }
                "--help" | "-h" => {
                    return Ok(Self {
                        command: Command::Help,
                        db_url,
                    });
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = if progress {
            Command::Progress {
                user: user.ok_or(ArgsError::MissingUser)?,
            }
        } else {
            Command::Ui
        };
        Ok(Self { command, db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite://") || trimmed.starts_with("sqlite::memory:") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the parent directory of a file-backed SQLite URL.
fn prepare_sqlite_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    log_fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn print_progress(services: &AppServices, user: &UserId) {
    let progress = services.progress().user_progress(user).await;
    for course in services.catalog().courses() {
        println!(
            "{:>3}%  {}",
            progress.percentage(course.id()),
            course.title()
        );
    }
}

fn launch_desktop(services: AppServices) {
    let auth = services.auth();
    auth.start();
    tokio::spawn(async move { auth.bootstrap().await });

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Aim AI")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let mut config = AppConfig::from_env();
    if let Some(db_url) = args.db_url {
        config.database_url = db_url;
    }
    init_logging(&config.log_level);
    config.report();
    info!(mode = ?config.backend_mode(), tutor = config.tutor_enabled(), "starting");

    prepare_sqlite_dir(&config.database_url)?;
    let services = AppServices::from_config(&config, Clock::default()).await?;

    match args.command {
        Command::Ui => launch_desktop(services),
        Command::Progress { user } => print_progress(&services, &user).await,
        Command::Help => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "aim exited with an error");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn no_arguments_launch_the_ui() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Ui);
        assert_eq!(args.db_url, None);
    }

    #[test]
    fn ui_accepts_db_override() {
        let args = parse(&["ui", "--db", "sqlite:///tmp/aim.sqlite3"]).unwrap();
        assert_eq!(args.command, Command::Ui);
        assert_eq!(args.db_url.as_deref(), Some("sqlite:///tmp/aim.sqlite3"));
    }

    #[test]
    fn progress_requires_a_user() {
        let args = parse(&["progress", "--user", "u-1"]).unwrap();
        assert_eq!(
            args.command,
            Command::Progress {
                user: UserId::new("u-1")
            }
        );

        assert!(matches!(parse(&["progress"]), Err(ArgsError::MissingUser)));
        assert!(matches!(
            parse(&["progress", "--user", "  "]),
            Err(ArgsError::InvalidUserId { .. })
        ));
    }

    #[test]
    fn unknown_input_is_rejected() {
        assert!(matches!(
            parse(&["seed"]),
            Err(ArgsError::UnknownCommand(cmd)) if cmd == "seed"
        ));
        assert!(matches!(
            parse(&["ui", "--user", "u-1"]),
            Err(ArgsError::UnknownArg(arg)) if arg == "--user"
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[test]
    fn help_wins_over_other_flags() {
        assert_eq!(parse(&["--help"]).unwrap().command, Command::Help);
        assert_eq!(parse(&["progress", "-h"]).unwrap().command, Command::Help);
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/aim.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/aim.sqlite3"), "{url}");
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }
}
