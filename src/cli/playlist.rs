use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    session::Session,
    success,
    types::{AddOutcome, MutationOutcome, RemoveOutcome},
    utils, warning,
    youtube::{AuthProvider, PlaylistApi},
};

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
}

pub fn add<P: AuthProvider, A: PlaylistApi>(
    session: &mut Session<P, A>,
    videos: &[String],
    playlist: Option<&str>,
) {
    mutate(session, videos, playlist, Operation::Add);
}

pub fn remove<P: AuthProvider, A: PlaylistApi>(
    session: &mut Session<P, A>,
    videos: &[String],
    playlist: Option<&str>,
) {
    mutate(session, videos, playlist, Operation::Remove);
}

fn mutate<P: AuthProvider, A: PlaylistApi>(
    session: &mut Session<P, A>,
    videos: &[String],
    playlist: Option<&str>,
    op: Operation,
) {
    let ids: Vec<String> = videos
        .iter()
        .map(|v| match utils::parse_video_id(v) {
            Ok(id) => id,
            Err(e) => error!("{}", e),
        })
        .collect();

    let Some((first, rest)) = ids.split_first() else {
        warning!("No video given.");
        return;
    };

    let mut chain = match op {
        Operation::Add => session.add_video(first, playlist),
        Operation::Remove => session.remove_video(first, playlist),
    }
    .unwrap_or_else(|e| error!("Cannot update playlist with {}: {}", first, e));
    report(first, chain.outcome());

    for id in rest {
        chain = match op {
            Operation::Add => chain.add_video(id, playlist),
            Operation::Remove => chain.remove_video(id, playlist),
        }
        .unwrap_or_else(|e| error!("Cannot update playlist with {}: {}", id, e));
        report(id, chain.outcome());
    }
}

fn report(video_id: &str, outcome: MutationOutcome) {
    match outcome {
        MutationOutcome::Added(AddOutcome::Inserted) => {
            success!("Added {} to the playlist.", video_id)
        }
        MutationOutcome::Added(AddOutcome::AlreadyPresent) => {
            info!("{} is already in the playlist.", video_id)
        }
        MutationOutcome::Removed(RemoveOutcome::Removed) => {
            success!("Removed {} from the playlist.", video_id)
        }
        MutationOutcome::Removed(RemoveOutcome::NotPresent) => {
            info!("{} is not in the playlist.", video_id)
        }
    }
}

pub fn items<P: AuthProvider, A: PlaylistApi>(session: &mut Session<P, A>, playlist: Option<&str>) {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlist items...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = session.list_items(playlist);
    pb.finish_and_clear();

    let items = match result {
        Ok(items) => items,
        Err(e) => error!("Cannot list playlist: {}", e),
    };

    if items.is_empty() {
        info!("Playlist is empty.");
        return;
    }

    let table = Table::new(utils::playlist_table_rows(&items));
    println!("{}", table);
    info!("{} items", items.len());
}
