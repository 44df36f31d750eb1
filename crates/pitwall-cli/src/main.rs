mod display;

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pitwall_agents::{AgentSettings, Assistant};
use pitwall_core::config::{
    ENV_API_KEY, ENV_ENDPOINT, ENV_MODEL, ENV_PASSAGES, ENV_TELEMETRY, ENV_TIMEOUT_SECS,
};
use pitwall_core::{
    DataPaths, GenerationSettings, Query, RetrievalSettings, SummaryLength, detect_language,
};
use pitwall_llm::{GenerationClient, Generator, OfflineGenerator};
use pitwall_store::KnowledgeBase;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pitwall", version, about = "Formula 1 race engineer assistant")]
struct Cli {
    #[command(flatten)]
    generation: GenerationArgs,

    #[command(flatten)]
    data: DataArgs,

    /// Never call the generation service; answer from the offline fallbacks.
    #[arg(long, global = true)]
    offline: bool,

    /// Print the result as JSON instead of a card.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GenerationArgs {
    #[arg(long, env = ENV_API_KEY, hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, env = ENV_MODEL, global = true)]
    model: Option<String>,

    /// Chat-completions endpoint.
    #[arg(long, env = ENV_ENDPOINT, global = true)]
    endpoint: Option<String>,

    #[arg(long, env = ENV_TIMEOUT_SECS, global = true)]
    timeout_secs: Option<String>,
}

impl GenerationArgs {
    fn settings(&self) -> anyhow::Result<GenerationSettings> {
        let settings = GenerationSettings::from_lookup(|key| match key {
            ENV_API_KEY => self.api_key.clone(),
            ENV_MODEL => self.model.clone(),
            ENV_ENDPOINT => self.endpoint.clone(),
            ENV_TIMEOUT_SECS => self.timeout_secs.clone(),
            _ => None,
        })?;
        Ok(settings)
    }
}

#[derive(Debug, Args)]
struct DataArgs {
    /// Passage corpus (JSON list of {text, source}) [default: data/passages.json]
    #[arg(long, env = ENV_PASSAGES, global = true)]
    passages: Option<String>,

    /// Telemetry index (JSON map of driver to lap records)
    /// [default: data/telemetry_embeddings.json]
    #[arg(long, env = ENV_TELEMETRY, global = true)]
    telemetry: Option<String>,
}

impl DataArgs {
    fn paths(&self) -> DataPaths {
        DataPaths::from_lookup(|key| match key {
            ENV_PASSAGES => self.passages.clone(),
            ENV_TELEMETRY => self.telemetry.clone(),
            _ => None,
        })
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a race question, optionally about one driver and lap.
    Ask {
        question: String,
        /// Driver number, e.g. 44.
        #[arg(long)]
        driver: Option<String>,
        #[arg(long)]
        lap: Option<i64>,
    },
    /// Ask a general Formula 1 question without retrieval.
    General { question: String },
    /// Classify the sentiment of a comment or radio message.
    Sentiment {
        text: String,
        #[arg(long)]
        language: Option<String>,
    },
    /// Summarize a race report or article.
    Summarize {
        text: String,
        #[arg(long, value_enum, default_value_t = Length::Medium)]
        length: Length,
        /// Overrides --length.
        #[arg(long)]
        max_words: Option<usize>,
    },
    /// Answer a question about a given context in another language.
    Translate {
        question: String,
        #[arg(long)]
        context: String,
        /// Target language code.
        #[arg(long, default_value = "en")]
        to: String,
    },
    /// Show the evidence retrieved for a question.
    Retrieve {
        question: String,
        #[arg(long)]
        driver: Option<String>,
        #[arg(long)]
        lap: Option<i64>,
        /// Also summarize the evidence, in the question's language.
        #[arg(long)]
        summarize: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Length {
    Short,
    Medium,
    Long,
}

impl From<Length> for SummaryLength {
    fn from(length: Length) -> Self {
        match length {
            Length::Short => SummaryLength::Short,
            Length::Medium => SummaryLength::Medium,
            Length::Long => SummaryLength::Long,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_generator(settings: &GenerationSettings, offline: bool) -> Arc<dyn Generator> {
    if offline {
        info!("offline mode requested");
        return Arc::new(OfflineGenerator);
    }
    if !settings.has_credential() {
        warn!("no API key configured, answers will come from offline fallbacks");
    }
    match GenerationClient::new(settings.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "could not build generation client, running offline");
            Arc::new(OfflineGenerator)
        }
    }
}

/// Sentiment query; without `--language` the text's own language is used.
fn sentiment_query(text: String, language: Option<String>) -> Query {
    let language = language.or_else(|| Some(detect_language(&text).to_string()));
    Query::Sentiment { text, language }
}

fn emit<T: serde::Serialize>(json: bool, value: &T, card: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        card(value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    info!("pitwall v{}", env!("CARGO_PKG_VERSION"));

    let generation = cli
        .generation
        .settings()
        .context("reading generation settings")?;
    let retrieval = RetrievalSettings::default();
    let paths = cli.data.paths();

    let knowledge = Arc::new(KnowledgeBase::load(&paths, &retrieval));
    info!(
        passages = knowledge.text().len(),
        drivers = knowledge.telemetry().entity_count(),
        "knowledge loaded"
    );
    let assistant = Assistant::new(
        knowledge,
        build_generator(&generation, cli.offline),
        AgentSettings::from_generation(&generation, retrieval),
    );

    let query = match cli.command {
        Command::Ask {
            question,
            driver,
            lap,
        } => Query::Qa {
            question,
            entity: driver,
            subkey: lap,
        },
        Command::General { question } => Query::General { question },
        Command::Sentiment { text, language } => sentiment_query(text, language),
        Command::Summarize {
            text,
            length,
            max_words,
        } => Query::Summary {
            text,
            max_words: max_words.unwrap_or_else(|| SummaryLength::from(length).max_words()),
        },
        Command::Translate {
            question,
            context,
            to,
        } => Query::MultilingualQa {
            context,
            question,
            target_lang: to,
        },
        Command::Retrieve {
            question,
            driver,
            lap,
            summarize,
        } => {
            let bundle = assistant
                .gather_evidence(&question, driver.as_deref(), lap)
                .await;
            if summarize {
                let summary = assistant
                    .summarize_evidence(bundle.items(), detect_language(&question))
                    .await;
                emit(cli.json, &summary, display::print_answer_card)?;
            }
            return emit(cli.json, &bundle, display::print_evidence_card);
        }
    };

    let result = assistant.handle(query).await;
    emit(cli.json, &result, display::print_answer_card)
}
