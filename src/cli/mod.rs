//! CLI module
//!
//! - `serve`: HTTP API over an in-memory store filled through `/v1/documents`
//! - `ask`: one-shot question over documents loaded from paths or URLs

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Corrective RAG - graded retrieval with web search fallback
#[derive(Parser)]
#[command(name = "corrective-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer a single question over the given documents
    Ask(ask::AskArgs),
}

/// Read `.env` and the layered config, then install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "corrective-rag",
            "ask",
            "--doc",
            "paper.md",
            "--doc",
            "https://example.com/crag",
            "--replace",
            "What are the ablation studies?",
        ])
        .unwrap();

        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.docs, vec!["paper.md", "https://example.com/crag"]);
                assert!(args.replace);
                assert!(!args.json);
                assert_eq!(args.question, "What are the ablation studies?");
            }
            Command::Serve => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["corrective-rag", "ask", "--doc", "a.md"]).is_err());
    }
}
