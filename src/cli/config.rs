use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::fill::executor::FillConfig;
use crate::screen::field_model::FormKey;
use crate::screen::scorer::ScoringConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "Detect government application forms and fill them from a saved profile"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every form on a page and show which one would be filled
    Detect {
        #[command(flatten)]
        source: PageSource,

        /// Minimum confidence score for a form to be accepted
        #[arg(long)]
        threshold: Option<u32>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Fill the best form on a page from a profile
    Fill {
        #[command(flatten)]
        source: PageSource,

        /// Flat profile file (YAML or JSON map of profile keys)
        #[arg(long)]
        profile: Option<String>,

        /// Saved application store to take the profile from
        #[arg(long, requires = "application")]
        store: Option<String>,

        /// Id of the saved application to use with --store
        #[arg(long, requires = "store")]
        application: Option<String>,

        /// Fill this form instead of the best one: a form index or "loose"
        #[arg(long, value_parser = parse_form_key)]
        form: Option<FormKey>,

        /// Pause between fields in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        #[arg(long)]
        threshold: Option<u32>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Speak the detectForms / fillForm / stopFilling protocol as NDJSON on stdin/stdout
    Serve {
        #[command(flatten)]
        source: PageSource,

        #[arg(long)]
        delay_ms: Option<u64>,

        #[arg(long)]
        threshold: Option<u32>,
    },

    /// List saved applications and whether they can be used to fill
    Profiles {
        /// Saved application store (YAML or JSON)
        #[arg(long)]
        store: String,
    },
}

/// Where the page comes from.
#[derive(Args, Debug, Clone)]
pub struct PageSource {
    /// Local HTML file
    #[arg(long, conflicts_with = "url")]
    pub html: Option<String>,

    /// Fetch the page over HTTP
    #[arg(long)]
    pub url: Option<String>,

    /// URL to score the page against (defaults to --url, or file://<path>)
    #[arg(long)]
    pub page_url: Option<String>,
}

/// Accepts a form index (`0`, `1`, ...) or `loose`.
pub fn parse_form_key(s: &str) -> Result<FormKey, String> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("loose") {
        return Ok(FormKey::Loose);
    }
    trimmed
        .parse::<usize>()
        .map(FormKey::Form)
        .map_err(|_| format!("expected a form index or \"loose\", got '{}'", s))
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autofill.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub fill: FillConfig,
}

impl AppConfig {
    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, threshold: Option<u32>, delay_ms: Option<u64>) -> Self {
        if let Some(threshold) = threshold {
            self.scoring.threshold = threshold;
        }
        if let Some(delay_ms) = delay_ms {
            self.fill.delay_ms = delay_ms;
        }
        self
    }
}

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "form-autofill.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
