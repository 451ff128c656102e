//! treemux - Roots and children on top of tmux sessions
//!
//! Run with `treemux` to pick a session, or `treemux --help` for usage.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use treemux::{
    config::Config,
    session::{
        pick, ActiveSessions, AttachChildRequest, AttachRootRequest, SessionManager,
        ShowChildrenRequest, ShowRootsRequest,
    },
    tmux::TmuxExecutor,
    tui::Picker,
    APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "A two-level tree of tmux sessions: roots and their children")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a root session if needed and attach to it
    AttachRoot {
        /// Root name (default: derived from the directory)
        #[arg(short, long)]
        name: Option<String>,

        /// Root directory (default: current directory)
        #[arg(short = 'd', long)]
        dir: Option<String>,

        /// Use the worktree of this git branch as the root directory
        #[arg(short, long)]
        worktree: Option<String>,
    },

    /// Create a child of a root if needed and attach to it
    AttachChild {
        /// Root name (default: root of the current session)
        #[arg(short, long)]
        root: Option<String>,

        /// Child name
        #[arg(short, long)]
        name: String,

        /// Command to run in a new child
        #[arg(long)]
        command: Option<String>,
    },

    /// List roots
    ShowRoots {
        /// alphabetic or most-recently-used
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Leave out the current root
        #[arg(long)]
        hide_current: bool,
    },

    /// List the children of a root
    ShowChildren {
        /// Root name (default: root of the current session)
        #[arg(short, long)]
        root: Option<String>,

        /// alphabetic or most-recently-used
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Leave out the current session
        #[arg(long)]
        hide_current: bool,
    },

    /// Pick a session interactively (default)
    Pick,

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use warn by default so listings stay clean on stderr
        EnvFilter::new("warn")
            .add_directive("gix=warn".parse()?)
            .add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        // The picker owns the terminal, so logs go to a file
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });
    let debug = cli.debug || config.debug;

    let command = cli.command.unwrap_or(Commands::Pick);
    let log_file = matches!(command, Commands::Pick).then(|| config.log_file());
    setup_logging(debug, log_file)?;

    if let Commands::Config { init } = command {
        if init {
            let path = config.save()?;
            println!("Configuration initialized at {:?}", path);
        } else {
            println!("Configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
            println!("\nConfig file: {:?}", Config::config_file_path()?);
            println!("Log file: {:?}", config.log_file());
        }
        return Ok(());
    }

    let tmux = TmuxExecutor::new();
    tmux.check_installed().await?;
    let manager = SessionManager::new(tmux, config);

    match command {
        Commands::AttachRoot {
            name,
            dir,
            worktree,
        } => {
            manager
                .attach_root(&AttachRootRequest {
                    name,
                    dir,
                    worktree,
                })
                .await?;
        }

        Commands::AttachChild {
            root,
            name,
            command,
        } => {
            manager
                .attach_child(&AttachChildRequest {
                    root,
                    name,
                    command,
                })
                .await?;
        }

        Commands::ShowRoots {
            sort_by,
            hide_current,
        } => {
            let lines = manager
                .show_roots(&ShowRootsRequest {
                    sort_by,
                    hide_current,
                })
                .await?;
            print_lines(&lines);
        }

        Commands::ShowChildren {
            root,
            sort_by,
            hide_current,
        } => {
            let lines = manager
                .show_children(&ShowChildrenRequest {
                    root,
                    sort_by,
                    hide_current,
                })
                .await?;
            print_lines(&lines);
        }

        Commands::Pick => {
            info!("Starting {} picker v{}", APP_NAME, VERSION);

            let source = ActiveSessions::new(&manager);
            let picker = Picker::new(manager.config().fullscreen);
            match pick(&source, &picker).await? {
                Some(entry) => info!("Activated {}", entry.session),
                None => info!("Nothing picked"),
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}
