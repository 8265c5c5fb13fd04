use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "plotpop")]
#[command(about = "Caching gateway for AI movie storyline generation")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the OpenAI-compatible API
    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub api_url: String,

    // Model used for storyline generation
    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    // API credential; startup fails if neither the flag nor the env var is set
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 3600)]
    pub cache_ttl: u64,

    // Number of concurrent generation workers, at least one
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: u64,

    // How many generation requests may queue beyond the worker bound;
    // the channel needs a capacity of at least one
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub queue_capacity: u64,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub request_timeout: u64,
}
