use std::{path::PathBuf, sync::Arc};

use tabled::Table;

use crate::{
    backlog::{self, ReplaySummary},
    error,
    error::SyncError,
    info, success,
};

pub async fn backlog(path: PathBuf, listen_after: bool) {
    let playlists = super::load_playlists();
    let remote = super::connect_spotify().await;

    let messages = match backlog::read_history(&path).await {
        Ok(messages) => messages,
        Err(e) => error!("{}", e),
    };

    info!(
        "Replaying {} messages from {}",
        messages.len(),
        path.display()
    );

    match backlog::run(remote, &playlists, &messages).await {
        Ok((engine, summary)) => {
            print_summary(&summary);
            success!("Backlog replay finished");

            if listen_after {
                super::listen::serve(Arc::new(engine), playlists).await;
            }
        }
        Err(SyncError::ReplayAborted { summary, source }) => {
            print_summary(&summary);
            error!("Backlog replay aborted: {}", source);
        }
        Err(e) => error!("Cannot start backlog replay: {}", e),
    }
}

fn print_summary(summary: &ReplaySummary) {
    let table = Table::new(summary.table_rows());
    println!("{}", table);
}
