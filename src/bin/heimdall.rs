//! heimdall - AI gateway CLI
//!
//! Runs gateway operations against the configured providers and cache.

use std::future::Future;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use heimdall::{CompletionRequest, Config, EmbeddingRequest, Gateway, Message, Secrets};

/// Heimdall AI gateway
#[derive(Parser)]
#[command(name = "heimdall")]
#[command(version = heimdall::version::PKG_VERSION)]
#[command(about = "AI provider gateway with fallback and response caching")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "HEIMDALL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List providers and whether they initialized
    Providers,

    /// Generate a completion
    Complete {
        /// Prompt (or omit to read from stdin)
        prompt: Option<String>,
        /// System message
        #[arg(short, long)]
        system: Option<String>,
        /// Preferred provider
        #[arg(short, long)]
        provider: Option<String>,
        /// Maximum tokens to generate
        #[arg(long, default_value_t = heimdall::types::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Sampling temperature
        #[arg(long, default_value_t = heimdall::types::DEFAULT_TEMPERATURE)]
        temperature: f32,
    },

    /// Generate an embedding for text
    Embed {
        /// Text to embed (or omit to read from stdin)
        text: Option<String>,
        /// Embedding model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Rank candidate embeddings against a query
    Search {
        /// Query text
        query: String,
        /// JSON file holding an array of embedding vectors
        #[arg(long)]
        candidates: PathBuf,
        /// Number of results
        #[arg(short = 'k', long, default_value_t = 10)]
        top_k: usize,
    },

    /// Delete cached responses
    ClearCache {
        /// Only entries under this tag (e.g. "completion", "embedding")
        #[arg(long)]
        tag: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let deadline = config.request_timeout();

    let gateway = heimdall::HeimdallBuilder::from_config(&config, &secrets)
        .await
        .build()?;

    let outcome = run(&gateway, args.command, deadline).await;
    gateway.shutdown().await;
    outcome
}

async fn run(
    gateway: &Gateway,
    command: Command,
    deadline: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Providers => {
            for status in gateway.list_providers() {
                let state = if status.initialized {
                    "initialized"
                } else {
                    "no credentials"
                };
                println!("{:<10} {state}", status.name);
            }
            println!("cache: {}", connected(gateway.cache().is_connected()));
        }

        Command::Complete {
            prompt,
            system,
            provider,
            max_tokens,
            temperature,
        } => {
            let prompt = resolve_text(prompt, "complete")?;
            let mut messages = Vec::new();
            if let Some(system) = system {
                messages.push(Message::system(system));
            }
            messages.push(Message::user(prompt));
            let request = CompletionRequest::new(messages)
                .max_tokens(max_tokens)
                .temperature(temperature);

            let response =
                with_deadline(deadline, gateway.complete(&request, provider.as_deref())).await?;
            println!("{}", response.content);
            eprintln!(
                "-- {} / {} ({} tokens{})",
                response.provider,
                response.model,
                response.usage.total_tokens,
                if response.cached { ", cached" } else { "" }
            );
        }

        Command::Embed { text, model } => {
            let text = resolve_text(text, "embed")?;
            let mut request = EmbeddingRequest::new(text);
            if let Some(model) = model {
                request = request.model(model);
            }

            let embedding = with_deadline(deadline, gateway.embed(&request)).await?;
            println!("model: {}", embedding.model);
            println!("dimensions: {}", embedding.dimensions);
            println!(
                "values: [{:.4}, {:.4}, ... ({} total)]",
                embedding.embedding.first().unwrap_or(&0.0),
                embedding.embedding.get(1).unwrap_or(&0.0),
                embedding.embedding.len()
            );
            println!("cached: {}", embedding.cached);
        }

        Command::Search {
            query,
            candidates,
            top_k,
        } => {
            let raw = std::fs::read_to_string(&candidates)?;
            let vectors: Vec<Vec<f32>> = serde_json::from_str(&raw)?;

            let found =
                with_deadline(deadline, gateway.semantic_search(&query, &vectors, top_k)).await?;
            for scored in found.results {
                println!("{:>5}  {:.4}", scored.index, scored.score);
            }
        }

        Command::ClearCache { tag } => {
            let deleted = gateway.clear_cache(tag.as_deref()).await;
            println!("deleted {deleted} entries");
        }
    }

    Ok(())
}

/// Run a gateway operation under the configured request timeout.
async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, Box<dyn std::error::Error>>
where
    F: Future<Output = heimdall::Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(format!("request timed out after {}s", deadline.as_secs()).into()),
    }
}

fn connected(yes: bool) -> &'static str {
    if yes { "connected" } else { "disabled" }
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}
