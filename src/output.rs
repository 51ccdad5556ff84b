use crate::error::FeedError;
use crate::types::LogLine;
use clap::ValueEnum;
use crossterm::style::{Color, Stylize};
use std::hash::{Hash, Hasher};
use std::io::Write;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Pick a stable label color for a pod name.
pub fn get_color(s: &str) -> Color {
    let colors = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::AnsiValue(91),
        Color::AnsiValue(92),
        Color::AnsiValue(94),
        Color::AnsiValue(93),
        Color::AnsiValue(95),
        Color::AnsiValue(96),
    ];
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish() as u32;
    colors[(hash % colors.len() as u32) as usize]
}

/// Render one labeled output line, without the trailing newline.
pub fn format_line(line: &LogLine, color: bool) -> String {
    let label = format!("{} |", line.source);
    if color {
        format!("{} {}", label.with(get_color(&line.source)), line.text)
    } else {
        format!("{} {}", label, line.text)
    }
}

/// Single writer for the merged feed.
///
/// Every streamer hands lines to this sink over a channel, so each labeled
/// line reaches the writer in one piece regardless of how many pods are live.
pub struct OutputSink<W> {
    writer: W,
    color: bool,
}

impl<W: Write> OutputSink<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    pub fn write_line(&mut self, line: &LogLine) -> Result<(), FeedError> {
        let mut rendered = format_line(line, self.color);
        rendered.push('\n');
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write lines until every sender is gone.
    pub async fn drain(mut self, mut rx: mpsc::Receiver<LogLine>) -> Result<(), FeedError> {
        while let Some(line) = rx.recv().await {
            self.write_line(&line)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
