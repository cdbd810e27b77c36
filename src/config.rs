use crate::position::DEFAULT_BASE_BITS;
use clap::Clap;
use serde::Deserialize;
use std::fs::read_to_string;
use toml::from_str;

/// Document-wide tunables. `base_bits` must match across every replica of
/// one document; `boundary` and `sentinel_site` are local engineering
/// knobs and never need to agree between replicas.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tree fan-out exponent at depth 1.
    pub base_bits: u32,

    /// Maximum allocation step (the "boundary" heuristic).
    pub boundary: u32,

    /// Local replica's site id for this run of the CLI demo.
    pub site: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_bits: DEFAULT_BASE_BITS,
            boundary: crate::allocator::BOUNDARY,
            site: 0,
        }
    }
}

impl Config {
    fn parse_args(opts: Opts) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = Config::default();
        if let Some(base_bits) = opts.base_bits {
            config.base_bits = base_bits;
        }
        if let Some(site) = opts.site {
            config.site = site;
        }
        Ok(config)
    }

    fn parse_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = read_to_string(path)?;
        Ok(from_str::<Config>(&contents)?)
    }

    /// Parses CLI flags, falling back to a TOML config file when `--config`
    /// is given.
    pub fn parse() -> Result<Self, Box<dyn std::error::Error>> {
        let opts: Opts = Opts::parse();
        match &opts.config {
            Some(path) => Self::parse_file(path),
            None => Self::parse_args(opts),
        }
    }
}

#[derive(Clap)]
#[clap(version = "1.0", author = "Mark P. <markrepedersen@gmail.com>")]
struct Opts {
    /// Specifies the config file to use (TOML). Any other flag is ignored
    /// when this is given.
    #[clap(short, long)]
    config: Option<String>,

    /// Tree fan-out exponent at depth 1. Defaults to 5.
    #[clap(long)]
    base_bits: Option<u32>,

    /// This replica's site id.
    #[clap(short, long)]
    site: Option<i64>,
}
