use eyre::Report;
use log::debug;

use crate::summarize::Summarizer;
use crate::{Transcript, extract_video_id, youtube};

/// Why a run stopped before reaching display
#[derive(Debug)]
pub enum PipelineError {
    EmptyInput,
    InvalidUrl(String),
    Fetch(Report),
    Summarize(Report),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::EmptyInput => write!(f, "no URL provided"),
            PipelineError::InvalidUrl(input) => {
                write!(f, "could not extract a video ID from: {input}")
            }
            PipelineError::Fetch(e) => write!(f, "error fetching transcript: {e}"),
            PipelineError::Summarize(e) => write!(f, "error generating summary: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Everything one successful action displays
#[derive(Debug)]
pub struct Outcome {
    pub transcript: Transcript,
    pub summary: Option<String>,
}

/// Run the parse → fetch → summarize pipeline for one input.
///
/// Stages short-circuit: an empty input stops before parsing, a parse
/// miss stops before any network call, a fetch failure stops before
/// summarization. No retries; nothing persists between runs. With no
/// summarizer the third stage is skipped.
pub async fn run(
    client: &reqwest::Client,
    summarizer: Option<&Summarizer>,
    input: &str,
    lang: &str,
) -> Result<Outcome, PipelineError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let video_id = extract_video_id(input).ok_or_else(|| PipelineError::InvalidUrl(input.to_string()))?;
    debug!("Extracted video ID: {video_id}");

    let transcript = youtube::fetch_transcript(client, &video_id, lang)
        .await
        .map_err(PipelineError::Fetch)?;

    let summary = match summarizer {
        Some(s) => Some(
            s.summarize(&transcript.joined_text())
                .await
                .map_err(PipelineError::Summarize)?,
        ),
        None => None,
    };

    Ok(Outcome { transcript, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let client = reqwest::Client::new();
        let err = run(&client, None, "   ", "en").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[tokio::test]
    async fn test_invalid_url_stops_before_any_network_call() {
        let client = reqwest::Client::new();
        let err = run(&client, None, "not a url", "en").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));
    }

    #[test]
    fn test_fetch_error_embeds_failure_description() {
        let err = PipelineError::Fetch(eyre::eyre!("no captions available for video abc45678901"));
        let msg = err.to_string();
        assert!(msg.starts_with("error fetching transcript:"));
        assert!(msg.contains("no captions available"));
    }

    #[test]
    fn test_summarize_error_embeds_failure_description() {
        let err = PipelineError::Summarize(eyre::eyre!("completion API returned 429"));
        let msg = err.to_string();
        assert!(msg.starts_with("error generating summary:"));
        assert!(msg.contains("429"));
    }

    #[test]
    fn test_invalid_url_names_the_input() {
        let err = PipelineError::InvalidUrl("gibberish".to_string());
        assert!(err.to_string().contains("gibberish"));
    }
}
