use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Splits a chat message into tokens, preserving their order.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Offsets of every page needed to read `total` items, `page_size` at a time.
///
/// Produces exactly `ceil(total / page_size)` offsets starting at 0.
pub fn page_offsets(total: u64, page_size: u64) -> Vec<u64> {
    if page_size == 0 {
        return Vec::new();
    }
    (0..total.div_ceil(page_size))
        .map(|page| page * page_size)
        .collect()
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://open.spotify.com/playlist/{}", playlist_id)
}

// characters MarkdownV2 reserves anywhere in a message
const MARKDOWN_RESERVED: &str = "_*[]()~`>#+-=|{}.!\\";

/// Escapes text for Telegram's MarkdownV2, inside or outside of entities.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_RESERVED.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes the target of an inline link, where only `)` and `\` are special.
pub fn escape_link_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_message(message.to_string());
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
