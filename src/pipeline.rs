//! End-to-end export: list, fetch, project, write

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::client::MailClient;
use crate::error::Result;
use crate::models::{CollectionMode, MessageRecord, MessageSummary};
use crate::projector::project_message;

/// Progress events emitted while an export runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportProgress {
    /// The list call returned this many IDs
    Listed(usize),
    /// A message was fetched and projected
    Exported(String),
    /// A message failed and was left out (best-effort mode only)
    Skipped(String),
}

/// Progress callback type for export runs
pub type ProgressCallback = Arc<dyn Fn(ExportProgress) + Send + Sync>;

/// Everything a single export run needs
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Mailbox to read, e.g. an address or `me`
    pub user: String,
    /// Sender address or fragment; becomes `from:<sender>`
    pub sender: String,
    pub max_results: u32,
    pub output: PathBuf,
    pub mode: CollectionMode,
}

impl ExportOptions {
    pub fn query(&self) -> String {
        build_query(&self.sender)
    }
}

/// Gmail search query selecting messages from `sender`
pub fn build_query(sender: &str) -> String {
    format!("from:{}", sender)
}

/// A message left out of a best-effort export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMessage {
    pub id: String,
    pub reason: String,
}

/// Summary of a finished export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub query: String,
    pub listed: usize,
    pub exported: usize,
    pub skipped: Vec<SkippedMessage>,
    pub output: PathBuf,
    pub duration_ms: u128,
}

/// Create or truncate the output file and leave an empty array in it
///
/// Called before anything is fetched, so a failed run never leaves records
/// from an earlier run behind.
pub async fn init_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, b"[]").await?;
    debug!("Initialized output file {:?}", path);
    Ok(())
}

/// Serialize records as a JSON array and overwrite `path` with it
pub async fn write_records(path: &Path, records: &[MessageRecord]) -> Result<()> {
    let json = serde_json::to_vec(records)?;
    tokio::fs::write(path, json).await?;
    debug!("Wrote {} record(s) to {:?}", records.len(), path);
    Ok(())
}

/// Fetch one message and flatten it into a record
pub async fn fetch_record<C>(client: &C, user: &str, id: &str) -> Result<MessageRecord>
where
    C: MailClient + ?Sized,
{
    let message = client.get_message(user, id).await?;
    project_message(&message)
}

/// Fetch and project every listed message, in listing order
///
/// In fail-fast mode the first error is returned and later IDs are not
/// fetched. In best-effort mode failures are collected instead.
pub async fn collect_records<C>(
    client: &C,
    user: &str,
    summaries: &[MessageSummary],
    mode: CollectionMode,
    on_progress: Option<&ProgressCallback>,
) -> Result<(Vec<MessageRecord>, Vec<SkippedMessage>)>
where
    C: MailClient + ?Sized,
{
    let mut records = Vec::with_capacity(summaries.len());
    let mut skipped = Vec::new();

    for summary in summaries {
        match fetch_record(client, user, &summary.id).await {
            Ok(record) => {
                debug!("Exported message {}", summary.id);
                records.push(record);
                if let Some(cb) = on_progress {
                    cb(ExportProgress::Exported(summary.id.clone()));
                }
            }
            Err(e) if mode == CollectionMode::BestEffort => {
                warn!("Skipping message {}: {}", summary.id, e);
                skipped.push(SkippedMessage {
                    id: summary.id.clone(),
                    reason: e.to_string(),
                });
                if let Some(cb) = on_progress {
                    cb(ExportProgress::Skipped(summary.id.clone()));
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok((records, skipped))
}

/// Run a complete export against `client`
pub async fn run_export<C>(
    client: &C,
    options: &ExportOptions,
    on_progress: Option<ProgressCallback>,
) -> Result<ExportReport>
where
    C: MailClient + ?Sized,
{
    init_output(&options.output).await?;
    export_records(client, options, on_progress).await
}

/// List, fetch and write, assuming `init_output` already ran for the output path
pub async fn export_records<C>(
    client: &C,
    options: &ExportOptions,
    on_progress: Option<ProgressCallback>,
) -> Result<ExportReport>
where
    C: MailClient + ?Sized,
{
    let started = Instant::now();
    let query = options.query();
    info!(
        "Listing up to {} message(s) for {} matching {:?}",
        options.max_results, options.user, query
    );
    let summaries = client
        .list_message_ids(&options.user, &query, options.max_results)
        .await?;
    if let Some(cb) = on_progress.as_ref() {
        cb(ExportProgress::Listed(summaries.len()));
    }

    let (records, skipped) = collect_records(
        client,
        &options.user,
        &summaries,
        options.mode,
        on_progress.as_ref(),
    )
    .await?;

    write_records(&options.output, &records).await?;
    info!(
        "Exported {} of {} message(s) to {:?}",
        records.len(),
        summaries.len(),
        options.output
    );

    Ok(ExportReport {
        query,
        listed: summaries.len(),
        exported: records.len(),
        skipped,
        output: options.output.clone(),
        duration_ms: started.elapsed().as_millis(),
    })
}
