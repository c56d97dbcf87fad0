use clap::Parser;
use color_eyre::Result;
use payscope::cache::LOG_FILE;
use payscope::error_display::user_message;
use payscope::investigate::run_session;
use payscope::logging::{self, LogTarget};
use payscope::{
    present, present_error, App, AppConfig, AppEvent, Args, CacheManager, Command,
    ConfigManager, ConsolePresenter, DataPaths, Operation, Workspace, APP_NAME,
};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    workspace: Workspace,
    config: &AppConfig,
    debug: bool,
) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new(tx.clone())
        .with_workspace(workspace)
        .with_config(config);
    if debug {
        app.enable_debug();
    }
    render(&mut terminal, &mut app)?;

    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME).and_then(|m| m.write_default_config(args.force)) {
            Ok(path) => {
                println!("Configuration written to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error generating config: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

/// Configured locations, overridden by any path given on the command line.
fn data_paths(args: &Args, config: &AppConfig) -> DataPaths {
    let mut paths = config.files.resolve();
    let overrides = [
        (&args.data, &mut paths.data),
        (&args.cleaned, &mut paths.cleaned),
        (&args.lookup, &mut paths.lookup),
        (&args.merged, &mut paths.merged),
        (&args.search_output, &mut paths.search_output),
    ];
    for (flag, path) in overrides {
        if let Some(value) = flag {
            *path = value.clone();
        }
    }
    paths
}

fn operation_for(command: &Command) -> Option<Operation> {
    let op = match command {
        Command::Preview { rows } => Operation::Preview { rows: rows.clone() },
        Command::Search { keyword } => Operation::SearchTitles {
            keyword: keyword.clone(),
        },
        Command::Columns => Operation::TwoColumns,
        Command::Clean => Operation::Clean,
        Command::HighEarners => Operation::HighEarners,
        Command::FlagManagers => Operation::FlagManagers,
        Command::Stats { json: false } => Operation::Statistics,
        Command::ByYear => Operation::YearlyAverages,
        Command::Year { year } => Operation::FilterYear { year: year.clone() },
        Command::Join => Operation::Join,
        Command::Stats { json: true } | Command::Investigate | Command::InitLookup { .. } => {
            return None
        }
    };
    Some(op)
}

/// Run one command and report through stdout/stderr. Returns false when the
/// operation failed.
fn run_command(command: &Command, workspace: &Workspace) -> Result<bool> {
    if let Command::Investigate = command {
        let mut input = std::io::stdin().lock();
        let mut out = std::io::stdout().lock();
        return match run_session(workspace, &mut input, &mut out) {
            Ok(_) => Ok(true),
            Err(e) => {
                eprintln!("error: {}", user_message(&e));
                Ok(false)
            }
        };
    }

    let mut console = ConsolePresenter::new(std::io::stdout().lock(), std::io::stderr().lock());
    let result = match command {
        Command::Stats { json: true } => match workspace.summary() {
            Ok(summary) => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::InitLookup { force } => workspace.init_lookup(*force).map(|path| {
            println!("Lookup table written to {}", path.display());
        }),
        other => match operation_for(other) {
            Some(op) => workspace
                .run(&op)
                .and_then(|outcome| present(&outcome, &mut console)),
            None => Ok(()),
        },
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            present_error(&e, &mut console)?;
            Ok(false)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let config = AppConfig::load(APP_NAME)?;
    let debug = args.debug || config.debug.enabled;
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        config.logging.level_filter()?
    };

    let workspace =
        Workspace::new(data_paths(&args, &config)).with_top_n(config.display.summary_top_n);

    if let Some(command) = &args.command {
        logging::init(level, &LogTarget::Stderr)?;
        if !run_command(command, &workspace)? {
            std::process::exit(1);
        }
        return Ok(());
    }

    let target = if config.logging.file {
        let cache = CacheManager::new(APP_NAME)?;
        LogTarget::File(cache.cache_file(LOG_FILE))
    } else {
        LogTarget::Off
    };
    logging::init(level, &target)?;

    let terminal = ratatui::init();
    let result = run(terminal, workspace, &config, debug);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
