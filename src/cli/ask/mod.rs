//! Ask command - ingest documents into a fresh store and answer one question

use clap::Args;
use tracing::info;

use crate::domain::{CragOutcome, CragStep};
use crate::infrastructure::ingestion::DocumentLoader;
use crate::infrastructure::llm::HttpClient;

#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Document path (.txt, .md, .html) or http(s) URL; repeatable
    #[arg(long = "doc", value_name = "PATH|URL")]
    pub docs: Vec<String>,

    /// Clear the store before adding the documents
    #[arg(long)]
    pub replace: bool,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Question to answer
    pub question: String,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let components = crate::build_components(&config)?;

    if !args.docs.is_empty() {
        let loader = DocumentLoader::new(HttpClient::with_timeout(config.crag.step_timeout())?);
        let mut documents = Vec::with_capacity(args.docs.len());
        for source in &args.docs {
            documents.push(loader.load(source).await?);
        }

        let report = components.store.ingest(documents, args.replace).await?;
        info!(
            chunks_added = report.chunks_added,
            total_chunks = report.total_chunks,
            "Documents ready"
        );
    }

    let outcome = components.pipeline.run(&args.question).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }

    Ok(())
}

/// Human-readable step log followed by the answer
fn render_outcome(outcome: &CragOutcome) -> String {
    let mut out = String::new();

    for step in &outcome.trace {
        let line = match step {
            CragStep::Grade => format!("---{}--- verdict: {}\n", step, outcome.verdict),
            CragStep::Rewrite => format!(
                "---{}--- {}\n",
                step,
                outcome.rewritten_query.as_deref().unwrap_or(&outcome.question)
            ),
            _ => format!("---{}---\n", step),
        };
        out.push_str(&line);
    }

    out.push_str(&format!("\nQuestion: {}\n", outcome.question));
    out.push_str(&format!("Answer: {}\n", outcome.answer));

    if !outcome.context.is_empty() {
        out.push_str("\nSources:\n");
        for passage in &outcome.context {
            let label = passage.source.url.as_deref().unwrap_or(&passage.source.origin);
            out.push_str(&format!("  - {}\n", label));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Passage, RelevanceVerdict, SourceMetadata};

    #[test]
    fn test_render_escalated_outcome() {
        let outcome = CragOutcome {
            question: "What are the ablation studies?".to_string(),
            answer: "They remove the evaluator.".to_string(),
            verdict: RelevanceVerdict::NotRelevant,
            rewritten_query: Some("Which ablation experiments does CRAG report?".to_string()),
            context: vec![Passage::new(
                "web-0",
                "Title: CRAG\nContent: ...",
                SourceMetadata::new("web_search").with_url("https://example.com/crag"),
            )],
            trace: vec![
                CragStep::Retrieve,
                CragStep::Grade,
                CragStep::Rewrite,
                CragStep::WebSearch,
                CragStep::Generate,
                CragStep::Done,
            ],
        };

        let rendered = render_outcome(&outcome);

        assert!(rendered.starts_with("---retrieve---\n---grade--- verdict: not_relevant\n"));
        assert!(rendered.contains("---rewrite--- Which ablation experiments does CRAG report?"));
        assert!(rendered.contains("---web_search---"));
        assert!(rendered.contains("Answer: They remove the evaluator."));
        assert!(rendered.contains("  - https://example.com/crag"));
    }
}
