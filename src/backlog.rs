//! One-shot import of an exported chat history.
//!
//! Messages are replayed strictly in file order and tokens left to right, so
//! the first occurrence of a link decides where it lands. Tracks already in a
//! playlist before the replay are never touched. No chat replies are sent.

use std::{path::Path, sync::Arc};

use serde_json::Value;

use crate::{
    config::PlaylistIds,
    debug,
    error::{Result, SyncError},
    link::{self, Link},
    spotify::MusicService,
    sync::{AppendOutcome, SyncEngine},
    types::{HistoryExport, ReplayTableRow},
    utils, warning,
};

/// Counters reported at the end of a replay, or with an aborted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub messages: usize,
    pub skipped: usize,
    pub links: usize,
    pub added_tracks: usize,
    pub duplicate_tracks: usize,
    pub added_albums: usize,
    pub duplicate_albums: usize,
    pub appended: usize,
}

impl ReplaySummary {
    fn count(&mut self, outcome: AppendOutcome) {
        match outcome {
            AppendOutcome::AddedTrack => self.added_tracks += 1,
            AppendOutcome::DuplicateTrack => self.duplicate_tracks += 1,
            AppendOutcome::AddedAlbum => self.added_albums += 1,
            AppendOutcome::DuplicateAlbum => self.duplicate_albums += 1,
            AppendOutcome::NotALink => return,
        }
        self.links += 1;
    }

    pub fn table_rows(&self) -> Vec<ReplayTableRow> {
        [
            ("messages", self.messages),
            ("skipped records", self.skipped),
            ("links", self.links),
            ("tracks added", self.added_tracks),
            ("duplicate tracks", self.duplicate_tracks),
            ("albums added", self.added_albums),
            ("duplicate albums", self.duplicate_albums),
            ("tracks appended", self.appended),
        ]
        .into_iter()
        .map(|(metric, count)| ReplayTableRow {
            metric: metric.to_string(),
            count,
        })
        .collect()
    }
}

/// Reads a chat export file and returns its messages in order.
pub async fn read_history(path: &Path) -> Result<Vec<Value>> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|e| SyncError::History(format!("{}: {}", path.display(), e)))?;
    parse_history(&content)
}

/// Parses the `{"messages": [...]}` export format.
pub fn parse_history(content: &str) -> Result<Vec<Value>> {
    let export: HistoryExport =
        serde_json::from_str(content).map_err(|e| SyncError::History(e.to_string()))?;
    Ok(export.messages)
}

/// Normalizes a message's rich text into its plain text segments.
///
/// `text` is either a string or an array of strings and `{"text": ...}`
/// entities. Anything else makes the record malformed.
pub fn record_text(index: usize, message: &Value) -> Result<Vec<String>> {
    let malformed = |reason: &str| SyncError::MalformedHistoryRecord {
        index,
        reason: reason.to_string(),
    };

    match message.get("text") {
        Some(Value::String(text)) => Ok(vec![text.clone()]),
        Some(Value::Array(segments)) => segments
            .iter()
            .map(|segment| match segment {
                Value::String(text) => Ok(text.clone()),
                Value::Object(entity) => match entity.get("text") {
                    Some(Value::String(text)) => Ok(text.clone()),
                    _ => Err(malformed("text entity without a text field")),
                },
                _ => Err(malformed("unexpected text segment")),
            })
            .collect(),
        Some(_) => Err(malformed("text is neither a string nor an array")),
        None => Err(malformed("missing text field")),
    }
}

/// Loads both snapshots, then replays `messages` through a fresh engine.
///
/// The engine is returned so the caller can keep serving with the same
/// snapshots. A failed snapshot load aborts before any message is touched.
pub async fn run<S>(
    remote: Arc<S>,
    playlists: &PlaylistIds,
    messages: &[Value],
) -> Result<(SyncEngine<S>, ReplaySummary)>
where
    S: MusicService + ?Sized,
{
    let engine = SyncEngine::bootstrap(remote, playlists).await?;
    let summary = replay(&engine, messages).await?;
    Ok((engine, summary))
}

/// Replays messages through an already seeded engine.
///
/// Malformed records are logged and skipped. The first remote failure,
/// including a single failed album track, aborts the run with the progress
/// made so far.
pub async fn replay<S>(engine: &SyncEngine<S>, messages: &[Value]) -> Result<ReplaySummary>
where
    S: MusicService + ?Sized,
{
    let mut summary = ReplaySummary::default();
    let pb = utils::progress_bar(messages.len() as u64, "Replaying history");

    for (index, message) in messages.iter().enumerate() {
        pb.inc(1);
        let segments = match record_text(index, message) {
            Ok(segments) => segments,
            Err(e) => {
                pb.suspend(|| warning!("Skipping record: {}", e));
                summary.skipped += 1;
                continue;
            }
        };

        for segment in &segments {
            for token in utils::tokenize(segment) {
                let link = link::classify(token);
                if link == Link::None {
                    continue;
                }

                let admission = match engine.admit(&link).await {
                    Ok(admission) => admission,
                    Err(e) => {
                        pb.finish_and_clear();
                        return Err(SyncError::ReplayAborted {
                            summary,
                            source: Box::new(e),
                        });
                    }
                };
                debug!("{} -> {:?}", token, admission.outcome);
                summary.count(admission.outcome);
                summary.appended += admission.appended.len();

                if !admission.failures.is_empty() {
                    pb.finish_and_clear();
                    return Err(SyncError::ReplayAborted {
                        summary,
                        source: Box::new(SyncError::AlbumAppend {
                            album_id: link.id().unwrap_or_default().to_string(),
                            failures: admission.failures,
                        }),
                    });
                }
            }
        }
        summary.messages += 1;
    }
    pb.finish_and_clear();

    Ok(summary)
}
