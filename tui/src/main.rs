use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use trackdash_core::{config::Settings, dataset::DatasetCache, get_data_dir, logger::init_logger};
use trackdash_tui::{
    state::Dispatcher,
    termination::{Interrupted, create_termination},
    ui::{UiManager, init_panic_hook},
};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "trackdash", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// The CSV file of tracks to visualize, overrides `dashboard.data_path`
    #[clap(
        long,
        short,
        value_hint = clap::ValueHint::FilePath
    )]
    data: Option<PathBuf>,
    /// Path to the config file, defaults to `Trackdash.toml` in the config directory
    #[clap(
        long,
        value_hint = clap::ValueHint::FilePath
    )]
    config: Option<PathBuf>,
    /// Set the log level, overrides `dashboard.log_level`
    #[clap(long, value_hint = clap::ValueHint::Other)]
    log_level: Option<log::LevelFilter>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();
    init_panic_hook();

    let flags = Flags::parse();

    let config_file = match flags.config {
        Some(config) => config,
        None => Settings::get_config_path()?,
    };
    let settings = Settings::init(config_file, flags.data, flags.log_level)?;

    // the dashboard owns the terminal, so logs go to a file
    let log_file = settings
        .dashboard
        .log_file
        .clone()
        .or_else(|| get_data_dir().ok().map(|dir| dir.join("trackdash.log")));
    init_logger(settings.dashboard.log_level, log_file.as_deref())?;
    log::info!("visualizing {}", settings.dashboard.data_path.display());

    // initialize the signal handlers
    let (terminator, mut interrupt_rx) = create_termination();
    let (dispatcher, state_receivers) = Dispatcher::new();
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let cache = Arc::new(DatasetCache::new());

    if let Err(e) = tokio::try_join!(
        dispatcher.main_loop(
            cache,
            settings.dashboard.data_path.clone(),
            terminator,
            action_rx,
            interrupt_rx.resubscribe()
        ),
        UiManager::new(action_tx).main_loop(settings, state_receivers, interrupt_rx.resubscribe()),
    ) {
        eprintln!("unexpected error: {e:?}");
    } else if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => println!("exited per user request"),
            Interrupted::OsSigInt => println!("exited because of an os sig int"),
            Interrupted::OsSigTerm => println!("exited because of an os sig term"),
            Interrupted::OsSigQuit => println!("exited because of an os sig quit"),
        }
    } else {
        eprintln!("exited because of an unexpected error");
    }

    Ok(())
}
