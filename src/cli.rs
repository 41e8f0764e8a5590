use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "YouTube transcript summarizer",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (reads URLs line by line from stdin if omitted)
    pub url: Option<String>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Chat-completion model for summarization
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print the transcript without calling the summarization API
    #[arg(long)]
    pub transcript_only: bool,

    /// Show resolved settings and progress on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
