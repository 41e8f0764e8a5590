use eyre::{Result, bail};
use futures_util::StreamExt;
use log::debug;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

// Sampling parameters are pinned; the request shape is fixed
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;
const TOP_P: f64 = 1.0;

/// Connection settings for the chat-completion endpoint
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Client for streamed chat-completion summaries
pub struct Summarizer {
    client: reqwest::Client,
    config: SummarizeConfig,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// One meaningful server-sent event from the completion stream
#[derive(Debug, PartialEq)]
enum SseEvent {
    Delta(String),
    Done,
}

impl Summarizer {
    pub fn new(client: reqwest::Client, config: SummarizeConfig) -> Self {
        Self { client, config }
    }

    /// Summarize transcript text via a streamed chat completion,
    /// concatenating text deltas in arrival order. A failure anywhere
    /// in the call or the stream returns `Err`; no partial summary
    /// escapes.
    pub async fn summarize(&self, transcript_text: &str) -> Result<String> {
        let prompt = build_prompt(transcript_text);
        debug!(
            "Requesting summary: model={} prompt_chars={}",
            self.config.model,
            prompt.len()
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "top_p": TOP_P,
            "stream": true,
            "stop": serde_json::Value::Null,
        });

        let url = format!("{}/chat/completions", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("completion API returned {status}: {body}");
        }

        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        let mut summary = String::new();

        // SSE framing: one event per line, terminated by "data: [DONE]"
        'stream: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| eyre::eyre!("completion stream error: {e}"))?;
            buf.extend_from_slice(&chunk);

            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                match parse_sse_line(line.trim())? {
                    Some(SseEvent::Delta(text)) => summary.push_str(&text),
                    Some(SseEvent::Done) => break 'stream,
                    None => {}
                }
            }
        }

        debug!("Summary complete: {} chars", summary.len());
        Ok(summary)
    }
}

// TODO: the whole transcript goes into a single prompt; hour-long
// videos can overflow the model context window and would need chunking.
fn build_prompt(transcript_text: &str) -> String {
    format!(
        "Summarize the following YouTube video transcript:\n\n{transcript_text}\n\n\
         Provide a concise summary that captures the main points and key ideas discussed in the video."
    )
}

/// Classify one SSE line. Lines without a `data:` field (comments,
/// keep-alive blanks) yield `None`, as do chunks carrying no text
/// delta. A `data:` payload that fails to parse is an error.
fn parse_sse_line(line: &str) -> Result<Option<SseEvent>> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();

    if data == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }

    let chunk: StreamChunk =
        serde_json::from_str(data).map_err(|e| eyre::eyre!("malformed completion stream payload: {e}"))?;

    let delta = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default();

    if delta.is_empty() {
        Ok(None)
    } else {
        Ok(Some(SseEvent::Delta(delta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_line(content: &str) -> String {
        format!(r#"data: {{"choices":[{{"delta":{{"content":"{content}"}}}}]}}"#)
    }

    #[test]
    fn test_parse_delta_line() {
        let event = parse_sse_line(&data_line("Sum")).unwrap();
        assert_eq!(event, Some(SseEvent::Delta("Sum".to_string())));
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), Some(SseEvent::Done));
    }

    #[test]
    fn test_non_data_lines_are_skipped() {
        assert_eq!(parse_sse_line("").unwrap(), None);
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), None);
        assert_eq!(parse_sse_line("event: message").unwrap(), None);
    }

    #[test]
    fn test_role_only_chunk_yields_nothing() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), None);
    }

    #[test]
    fn test_chunk_without_choices_yields_nothing() {
        let line = r#"data: {"x_groq":{"usage":{"total_tokens":12}}}"#;
        assert_eq!(parse_sse_line(line).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(parse_sse_line("data: {not json}").is_err());
    }

    #[test]
    fn test_deltas_concatenate_in_order_without_delimiter() {
        let lines = [data_line("Sum"), data_line("mary"), data_line(".")];
        let mut summary = String::new();
        for line in &lines {
            if let Some(SseEvent::Delta(text)) = parse_sse_line(line).unwrap() {
                summary.push_str(&text);
            }
        }
        assert_eq!(summary, "Summary.");
    }

    #[test]
    fn test_prompt_embeds_transcript_verbatim() {
        let prompt = build_prompt("hello world");
        assert!(prompt.contains("\n\nhello world\n\n"));
        assert!(prompt.starts_with("Summarize the following YouTube video transcript:"));
    }
}
