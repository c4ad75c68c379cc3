//! Shared context for running CLI commands.

use std::process::ExitCode;

use corpusq_config::PipelineConfig;
use corpusq_types::EmbeddingCache;

use corpusq::demo_store::{DemoEmbedder, DemoStore};

use super::args::BackendArgs;

/// Command execution context built once per CLI invocation: the loaded
/// corpus, configuration, and a fresh embedding cache.
pub struct CommandContext {
    /// The demo corpus backing this invocation's vector store.
    pub store: DemoStore,
    /// The demo embedder used for tie-break steps.
    pub embedder: DemoEmbedder,
    /// Loaded, validated pipeline configuration.
    pub config: PipelineConfig,
    /// Fresh embedding cache for this invocation.
    pub cache: EmbeddingCache,
}

impl CommandContext {
    /// Loads the corpus and configuration named by `args`.
    pub fn load(args: &BackendArgs) -> Result<Self, ExitCode> {
        let store = DemoStore::load(&args.corpus).map_err(|err| {
            eprintln!("error: failed to load corpus: {err}");
            ExitCode::FAILURE
        })?;

        let config = match &args.config {
            Some(path) => {
                let toml = std::fs::read_to_string(path).map_err(|err| {
                    eprintln!("error: failed to read config {}: {err}", path.display());
                    ExitCode::FAILURE
                })?;
                PipelineConfig::from_toml_str(&toml).map_err(|err| {
                    eprintln!("error: invalid configuration: {err}");
                    ExitCode::FAILURE
                })?
            }
            None => PipelineConfig::from_toml_str("").expect("empty config is always valid"),
        };

        Ok(Self {
            store,
            embedder: DemoEmbedder,
            config,
            cache: EmbeddingCache::new(),
        })
    }
}
