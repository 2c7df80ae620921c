use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `.txt` corpus
    pub data_dir: PathBuf,
    /// Where the embedded vector store is persisted
    pub vector_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Chunk length in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
    /// Retrieval tuning
    pub retrieval: RetrievalConfig,
    /// Hosted model API configuration
    pub llm: LlmConfig,
}

/// Maximal-marginal-relevance retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the model.
    pub k: usize,
    /// Number of nearest neighbours considered before MMR re-selection.
    pub fetch_k: usize,
    /// 1.0 = pure relevance, 0.0 = pure diversity.
    pub lambda_mult: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: 3,
            fetch_k: 10,
            lambda_mult: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the OpenAI-compatible API
    pub base_url: String,
    /// Model name for answer generation
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Upper bound on generated answer tokens
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            api_key: String::new(),
            max_tokens: 350,
            temperature: 0.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            vector_dir: PathBuf::from("./vector_db"),
            bind_addr: "0.0.0.0:8000".to_string(),
            chunk_size: 600,
            chunk_overlap: 175,
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first; variables that
    /// are already set take precedence over it.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Unprefixed names are accepted for existing .env files
        if let Some(dir) = lookup("DOCS_QA_DATA_DIR").or_else(|| lookup("DATA_DIR")) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("DOCS_QA_VECTOR_DIR").or_else(|| lookup("CHROMA_DIR")) {
            config.vector_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("DOCS_QA_BIND_ADDR") {
            config.bind_addr = addr;
        }
        parse_into(&lookup, "CHUNK_SIZE", &mut config.chunk_size);
        parse_into(&lookup, "CHUNK_OVERLAP", &mut config.chunk_overlap);

        parse_into(&lookup, "RETRIEVAL_K", &mut config.retrieval.k);
        parse_into(&lookup, "FETCH_K", &mut config.retrieval.fetch_k);
        parse_into(&lookup, "LAMBDA_MULT", &mut config.retrieval.lambda_mult);

        if let Some(url) = lookup("OPENAI_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("MODEL_NAME") {
            config.llm.chat_model = model;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        parse_into(&lookup, "MAX_TOKENS", &mut config.llm.max_tokens);

        config.llm.api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set"))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the splitter or retriever cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("CHUNK_SIZE must be greater than zero");
        }
        if self.chunk_overlap >= self.chunk_size {
            anyhow::bail!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.retrieval.k == 0 {
            anyhow::bail!("RETRIEVAL_K must be at least 1");
        }
        if self.retrieval.fetch_k < self.retrieval.k {
            anyhow::bail!(
                "FETCH_K ({}) must not be smaller than RETRIEVAL_K ({})",
                self.retrieval.fetch_k,
                self.retrieval.k
            );
        }
        if !(0.0..=1.0).contains(&self.retrieval.lambda_mult) {
            anyhow::bail!("LAMBDA_MULT must be within [0, 1]");
        }
        Ok(())
    }

    pub fn vector_path(&self) -> PathBuf {
        self.vector_dir.join("vectors.json")
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(v) => *slot = v,
            Err(_) => tracing::warn!("Ignoring unparseable {key}={raw:?}"),
        }
    }
}
