pub mod config;
pub mod pipeline;
pub mod summarize;
pub mod youtube;

/// A single captioned fragment
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Captions for one video, in playback order
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Flatten segment texts into one string, single-space separated.
    /// Timing metadata is dropped.
    pub fn joined_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Extract the 11-character video ID from a YouTube URL.
///
/// Matches the ID immediately after a `v=` parameter or a path
/// separator, taking the leftmost match in the input. No trimming or
/// normalization; callers get `None` when no ID-shaped token exists.
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap();
    re.captures(url).map(|caps| caps[1].to_string())
}
