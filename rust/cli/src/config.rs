//! Layered CLI configuration.
//!
//! Values resolve from defaults, then the TOML file named by `BESIGUE_CONFIG`,
//! then `BESIGUE_*` environment variables. Command-line flags override the
//! result at the call site. Each value remembers where it came from so `cfg`
//! can show it.
//!
//! ```toml
//! seed = 42
//! players = 3
//! ai = "baseline"
//!
//! [rules]
//! winning_score = 1500
//! dealer_method = "random"
//! ```

use besigue_engine::rules::{DealerMethod, RulesConfig};
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_CONFIG: &str = "BESIGUE_CONFIG";
pub const ENV_SEED: &str = "BESIGUE_SEED";
pub const ENV_PLAYERS: &str = "BESIGUE_PLAYERS";
pub const ENV_WINNING_SCORE: &str = "BESIGUE_WINNING_SCORE";
pub const ENV_DEALER: &str = "BESIGUE_DEALER";
pub const ENV_AI: &str = "BESIGUE_AI";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub players: usize,
    pub ai: String,
    pub rules: RulesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            players: 2,
            ai: "baseline".into(),
            rules: RulesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub players: ValueSource,
    pub ai: ValueSource,
    /// Any key of the `[rules]` table other than the two tracked below.
    pub rules: ValueSource,
    pub winning_score: ValueSource,
    pub dealer_method: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            players: ValueSource::Default,
            ai: ValueSource::Default,
            rules: ValueSource::Default,
            winning_score: ValueSource::Default,
            dealer_method: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(ENV_CONFIG)
        && !path.is_empty()
    {
        let s = fs::read_to_string(&path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
        if let Some(table) = f.rules {
            if table.contains_key("winning_score") {
                sources.winning_score = ValueSource::File;
            }
            if table.contains_key("dealer_method") {
                sources.dealer_method = ValueSource::File;
            }
            if table
                .keys()
                .any(|k| k != "winning_score" && k != "dealer_method")
            {
                sources.rules = ValueSource::File;
            }
            cfg.rules = toml::Value::Table(table).try_into()?;
        }
        tracing::debug!(path = %path, "loaded config file");
    }

    if let Ok(seed) = std::env::var(ENV_SEED)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(players) = std::env::var(ENV_PLAYERS)
        && !players.is_empty()
    {
        cfg.players = players
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid players: {}", players)))?;
        sources.players = ValueSource::Env;
    }
    if let Ok(score) = std::env::var(ENV_WINNING_SCORE)
        && !score.is_empty()
    {
        cfg.rules.winning_score = score
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid winning score: {}", score)))?;
        sources.winning_score = ValueSource::Env;
    }
    if let Ok(dealer) = std::env::var(ENV_DEALER)
        && !dealer.is_empty()
    {
        cfg.rules.dealer_method = parse_dealer(&dealer)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid dealer method: {}", dealer)))?;
        sources.dealer_method = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var(ENV_AI)
        && !ai.is_empty()
    {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    ai: Option<String>,
    #[serde(default)]
    rules: Option<toml::Table>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    RulesConfig::check_player_count(cfg.players)
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    cfg.rules
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    if !besigue_ai::PROVIDERS.contains(&cfg.ai.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown ai '{}' (expected one of {:?})",
            cfg.ai,
            besigue_ai::PROVIDERS
        )));
    }
    Ok(())
}

pub fn parse_dealer(s: &str) -> Option<DealerMethod> {
    match s.to_ascii_lowercase().replace('-', "_").as_str() {
        "random" => Some(DealerMethod::Random),
        "draw_jacks" | "jacks" => Some(DealerMethod::DrawJacks),
        _ => None,
    }
}
