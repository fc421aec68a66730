//! CLI command implementations.

pub mod config;
pub mod search;
pub mod session;
pub mod url;

use clap::{Args, Subcommand};
use lecture_search::Field;

/// Filter flags shared by `search` and `url encode`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Free-text keyword.
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Faculty code.
    #[arg(short, long)]
    pub faculty: Option<String>,

    /// Sort order (newest, rating, reviews).
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Academic year (four digits).
    #[arg(long)]
    pub year: Option<String>,

    /// Term (spring, fall, intensive, full_year).
    #[arg(long)]
    pub term: Option<String>,

    /// Textbook (required, recommended, none).
    #[arg(long)]
    pub textbook: Option<String>,

    /// Attendance (every_class, sometimes, none).
    #[arg(long)]
    pub attendance: Option<String>,

    /// Grading (exam, report, attendance, mixed).
    #[arg(long)]
    pub grading: Option<String>,

    /// Content difficulty (1-5).
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Content quality (1-5).
    #[arg(long)]
    pub quality: Option<String>,
}

impl FilterArgs {
    /// The given flags as field edits, in canonical field order.
    pub fn edits(&self) -> Vec<(Field, String)> {
        [
            (Field::Keyword, &self.keyword),
            (Field::Faculty, &self.faculty),
            (Field::Sort, &self.sort),
            (Field::PeriodYear, &self.year),
            (Field::PeriodTerm, &self.term),
            (Field::Textbook, &self.textbook),
            (Field::Attendance, &self.attendance),
            (Field::GradingType, &self.grading),
            (Field::ContentDifficulty, &self.difficulty),
            (Field::ContentQuality, &self.quality),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Starting URL query, as found in the address bar.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Page to show.
    #[arg(short, long)]
    pub page: Option<u32>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for the url command.
#[derive(Args)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

#[derive(Subcommand)]
pub enum UrlCommand {
    /// Build the canonical query for a set of filters.
    Encode {
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the criteria a query decodes to.
    Decode {
        /// Query string, with or without the leading `?`.
        query: String,
    },
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Store a value for the next search to pick up.
    Set {
        /// Session key (searchWord or selectedFaculty).
        key: String,
        /// Value to store.
        value: String,
    },
    /// Show stored session values.
    Show,
    /// Remove all session values.
    Clear,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
