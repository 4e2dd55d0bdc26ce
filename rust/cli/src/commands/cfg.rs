//! `cfg`: prints the resolved configuration as pretty JSON.
//!
//! ```json
//! {
//!   "seed": { "value": null, "source": "default" },
//!   "players": { "value": 3, "source": "env" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "players": {
            "value": config.players,
            "source": sources.players,
        },
        "ai": {
            "value": config.ai,
            "source": sources.ai,
        },
        "winning_score": {
            "value": config.rules.winning_score,
            "source": sources.winning_score,
        },
        "dealer_method": {
            "value": config.rules.dealer_method,
            "source": sources.dealer_method,
        },
        "rules": {
            "value": config.rules,
            "source": sources.rules,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
