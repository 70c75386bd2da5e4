use std::{
    cell::RefCell,
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    rc::Rc,
    sync::Mutex,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use pdfdrop_tui::{AcceptPolicy, FileRejection, RunOptions, SelectedFile, describe_rejection, resolve_theme_id};
use pdfdrop_types::DEFAULT_MAX_SIZE;
use pdfdrop_util::preferences::{UserPreferences, config_root};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "pdfdrop.log";

/// Pick a PDF by dropping it onto the terminal or browsing for it.
///
/// The selection is printed as JSON on exit (`null` when nothing was picked).
#[derive(Debug, Parser)]
#[command(name = "pdfdrop", version, about)]
struct Cli {
    /// Largest accepted file, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,

    /// Directory the file dialog opens in (defaults to the last one used)
    #[arg(long, value_name = "DIR")]
    start_dir: Option<PathBuf>,

    /// Theme id or alias, remembered for later runs
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Where to write logs; the terminal itself is owned by the picker
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_tracing(&log_path)?;

    let preferences = Rc::new(open_preferences());
    let preferred_theme = match cli.theme.as_deref() {
        Some(name) => {
            let Some(theme_id) = resolve_theme_id(name) else {
                bail!("unknown theme '{name}'");
            };
            if let Err(error) = preferences.set_preferred_theme(Some(theme_id.to_string())) {
                warn!(%error, "failed to save the preferred theme");
            }
            Some(theme_id.to_string())
        }
        None => preferences.preferred_theme(),
    };

    let rejections = Rc::new(RefCell::new(Vec::new()));
    let options = RunOptions {
        policy: AcceptPolicy::pdf().with_max_size(cli.max_size),
        preferred_theme,
        start_dir: cli.start_dir.or_else(|| preferences.last_directory()),
        on_file_select: Some(Box::new({
            let preferences = Rc::clone(&preferences);
            move |selection: Option<&SelectedFile>| remember_directory(&preferences, selection)
        })),
        on_reject: Some(Box::new({
            let rejections = Rc::clone(&rejections);
            move |rejection: &FileRejection| rejections.borrow_mut().push(describe_rejection(rejection))
        })),
    };
    info!(max_size = cli.max_size, "starting picker");

    let selection = pdfdrop_tui::run(options).await?;

    for message in rejections.borrow().iter() {
        eprintln!("rejected {message}");
    }
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}

fn default_log_path() -> PathBuf {
    config_root().join(LOG_FILE_NAME)
}

fn init_tracing(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
    {
        debug!(%error, "tracing subscriber already installed; keeping it");
    }
    Ok(())
}

fn open_preferences() -> UserPreferences {
    UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; nothing will be remembered");
        UserPreferences::ephemeral()
    })
}

fn remember_directory(preferences: &UserPreferences, selection: Option<&SelectedFile>) {
    let Some(directory) = selection.and_then(|file| file.path.as_deref()).and_then(Path::parent) else {
        return;
    };
    if let Err(error) = preferences.set_last_directory(Some(directory.to_path_buf())) {
        warn!(%error, "failed to save the last directory");
    }
}
