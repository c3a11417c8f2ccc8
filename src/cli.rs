//! Command-line interface

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::{self, AuthFlow};
use crate::client::ProductionGmailClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::CollectionMode;
use crate::pipeline::{self, ExportOptions, ExportProgress, ExportReport, ProgressCallback};

#[derive(Parser, Debug)]
#[command(name = "gmail-pipe")]
#[command(version)]
#[command(about = "Export messages from one sender as a JSON array", long_about = None)]
pub struct Cli {
    /// Mailbox to read (an address, or `me` for the authorized account)
    pub user: String,

    /// Sender address or fragment; messages are selected with `from:<SENDER>`
    pub sender: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "gmail-pipe.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 credentials file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Path to token cache file
    #[arg(long)]
    pub token_cache: Option<PathBuf>,

    /// How to receive the authorization code on first login
    #[arg(long, value_enum)]
    pub auth_flow: Option<AuthFlow>,

    /// Path of the JSON output file (overwritten on every run)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of messages to export
    #[arg(short = 'n', long)]
    pub max_results: Option<u32>,

    /// Skip messages that fail instead of aborting the whole run
    #[arg(long)]
    pub best_effort: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Auth and export settings after merging the config file with CLI flags
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub credentials: PathBuf,
    pub token_cache: PathBuf,
    pub auth_flow: AuthFlow,
    pub export: ExportOptions,
}

impl Cli {
    /// Apply CLI overrides on top of `config` and validate the result
    pub fn resolve(&self, mut config: Config) -> Result<ResolvedSettings> {
        if let Some(credentials) = &self.credentials {
            config.auth.credentials = credentials.clone();
        }
        if let Some(token_cache) = &self.token_cache {
            config.auth.token_cache = token_cache.clone();
        }
        if let Some(flow) = self.auth_flow {
            config.auth.flow = flow;
        }
        if let Some(output) = &self.output {
            config.export.output = output.clone();
        }
        if let Some(max_results) = self.max_results {
            config.export.max_results = max_results;
        }
        if self.best_effort {
            config.export.mode = CollectionMode::BestEffort;
        }

        config.validate()?;

        Ok(ResolvedSettings {
            credentials: config.auth.credentials,
            token_cache: config.auth.token_cache,
            auth_flow: config.auth.flow,
            export: ExportOptions {
                user: self.user.clone(),
                sender: self.sender.clone(),
                max_results: config.export.max_results,
                output: config.export.output,
                mode: config.export.mode,
            },
        })
    }
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    /// Share an existing MultiProgress (the one log output is routed through)
    pub fn with_multi_progress(multi: MultiProgress) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        Self {
            multi,
            spinner_style,
            bar_style,
        }
    }

    pub fn multi_progress(&self) -> &MultiProgress {
        &self.multi
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn add_progress_bar(&self, len: u64, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(self.bar_style.clone());
        pb.set_message(msg.to_string());
        pb
    }

    /// Finish a spinner and clear it from the multi-progress display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        let _ = self.multi.println(format!("  ✓ {}", msg));
    }
}

/// Turn export progress events into spinner and bar updates
///
/// The listing spinner is replaced by a bar sized to the number of IDs once
/// the list call returns.
fn progress_callback(
    reporter: Arc<ProgressReporter>,
    spinner: ProgressBar,
) -> (ProgressCallback, Arc<Mutex<Option<ProgressBar>>>) {
    let bar_slot: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&bar_slot);

    let callback: ProgressCallback = Arc::new(move |event| {
        let Ok(mut bar) = slot.lock() else {
            return;
        };
        match event {
            ExportProgress::Listed(count) => {
                reporter.finish_spinner(&spinner, &format!("Found {} message(s)", count));
                *bar = Some(reporter.add_progress_bar(count as u64, "Fetching messages..."));
            }
            ExportProgress::Exported(_) | ExportProgress::Skipped(_) => {
                if let Some(pb) = bar.as_ref() {
                    pb.inc(1);
                }
            }
        }
    });

    (callback, bar_slot)
}

/// Authenticate, export, and return the run summary
pub async fn run_export_command(cli: &Cli, multi: MultiProgress) -> Result<ExportReport> {
    let reporter = Arc::new(ProgressReporter::with_multi_progress(multi));

    let config = Config::load(&cli.config).await?;
    let settings = cli.resolve(config)?;

    // Truncate before touching credentials so a failed login cannot leave
    // records from an earlier run behind.
    pipeline::init_output(&settings.export.output).await?;

    // The authorization flow may print a URL or read from the console, so no
    // spinner runs while it is in progress.
    tracing::info!("Authenticating with Gmail API...");
    let hub = auth::initialize_gmail_hub(
        &settings.credentials,
        &settings.token_cache,
        settings.auth_flow,
    )
    .await?;
    let _ = reporter.multi_progress().println("  ✓ Gmail API authenticated");

    let client = ProductionGmailClient::new(hub);

    let spinner = reporter.add_spinner(&format!(
        "Listing messages from {}...",
        settings.export.sender
    ));
    let (callback, bar_slot) = progress_callback(Arc::clone(&reporter), spinner.clone());

    let result = pipeline::export_records(&client, &settings.export, Some(callback)).await;

    spinner.finish_and_clear();
    if let Ok(mut bar) = bar_slot.lock() {
        if let Some(pb) = bar.take() {
            match &result {
                Ok(report) => pb.finish_with_message(format!(
                    "Exported {} message(s)",
                    report.exported
                )),
                Err(_) => pb.abandon_with_message("Export aborted"),
            }
        }
    }

    result
}
