//! Admin Console - operator view over the feedback admin API.
//!
//! Commands:
//! - analytics - headline metrics and rating distribution
//! - feed - filtered, most-recent-first feedback stream
//! - dashboard - both (default)

mod render;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use shared::{
    build_feed, ApiClient, Config, DashboardMetrics, FilterCriteria, Sentiment, SessionState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "admin-console", author, version, about = "Operator console for the feedback admin API")]
struct Cli {
    /// Access key checked against API_KEY. When omitted it is prompted for
    /// on stdin, and the prompt echoes what you type
    #[arg(long, env = "CONSOLE_ACCESS_KEY", hide_env_values = true, global = true)]
    access_key: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show analytics metrics only
    Analytics,
    /// Show the feedback stream only
    Feed(FeedArgs),
    /// Show analytics and the feedback stream
    Dashboard(FeedArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct FeedArgs {
    /// Star rating to include (repeatable); all ratings when omitted
    #[arg(long = "rating", value_parser = clap::value_parser!(i64).range(1..=5))]
    ratings: Vec<i64>,

    /// Sentiment to include (repeatable); all sentiments when omitted
    #[arg(long = "sentiment", value_enum)]
    sentiments: Vec<SentimentArg>,

    /// Case-insensitive text matched against review and AI summary
    #[arg(long, default_value = "")]
    search: String,

    /// Records to request from the API (defaults to FEEDBACK_LIMIT)
    #[arg(long)]
    limit: Option<u32>,

    /// Records to display (defaults to PAGE_SIZE)
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SentimentArg {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl From<SentimentArg> for Sentiment {
    fn from(arg: SentimentArg) -> Self {
        match arg {
            SentimentArg::Positive => Sentiment::Positive,
            SentimentArg::Neutral => Sentiment::Neutral,
            SentimentArg::Negative => Sentiment::Negative,
            SentimentArg::Unknown => Sentiment::Unknown,
        }
    }
}

impl FeedArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria {
            query: self.search.clone(),
            ..FilterCriteria::default()
        };
        if !self.ratings.is_empty() {
            criteria.ratings = self.ratings.iter().copied().collect();
        }
        if !self.sentiments.is_empty() {
            criteria.sentiments = self.sentiments.iter().map(|&s| s.into()).collect();
        }
        criteria
    }
}

/// Outcome of one render cycle.
#[derive(Default)]
struct Report {
    text: String,
    json: serde_json::Map<String, serde_json::Value>,
    failed: bool,
}

fn prompt_access_key() -> Result<String> {
    eprint!("ENTER ACCESS KEY (input is visible): ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read access key")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn render_analytics(client: &ApiClient, report: &mut Report) {
    match client.fetch_analytics().await {
        Ok(summary) => {
            let metrics = DashboardMetrics::from_summary(&summary, Utc::now());
            report.text.push_str(&render::metrics(&metrics));
            report.json.insert("analytics".into(), json!(metrics));
        }
        Err(e) => {
            report.failed = true;
            report.text.push_str(&render::failure("DATA SOURCE", &e));
            report.json.insert("analytics".into(), render::failure_json(&e));
        }
    }
}

async fn render_feed(client: &ApiClient, config: &Config, args: &FeedArgs, report: &mut Report) {
    let limit = args.limit.unwrap_or(config.feedback_limit);
    let page_size = args.page_size.unwrap_or(config.page_size);

    match client.fetch_feedbacks(limit).await {
        Ok(records) if records.is_empty() => {
            report.text.push_str(&render::empty_feed());
            report.json.insert(
                "feed".into(),
                json!({"items": [], "filtered_total": 0, "fetched_total": 0}),
            );
        }
        Ok(records) => {
            let page = build_feed(records, &args.criteria(), page_size);
            info!(
                fetched = page.fetched_total,
                filtered = page.filtered_total,
                "Rendering feedback stream"
            );
            report.text.push_str(&render::feed(&page));
            report.json.insert("feed".into(), json!(page));
        }
        Err(e) => {
            report.failed = true;
            report.text.push_str(&render::failure("FEEDBACK STREAM", &e));
            report.json.insert("feed".into(), render::failure_json(&e));
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::from_env()?;

    let access_key = match cli.access_key {
        Some(key) => key,
        None => prompt_access_key()?,
    };
    let mut session = SessionState::new();
    if session.login(&access_key, &config.api_key).is_err() {
        bail!("ACCESS DENIED - INVALID CREDENTIALS");
    }

    let client = ApiClient::new(&config)?;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Dashboard(FeedArgs::default()));

    let now = Utc::now();
    let mut report = Report::default();
    report.text.push_str(&render::header(now));

    match &command {
        Command::Analytics => render_analytics(&client, &mut report).await,
        Command::Feed(args) => render_feed(&client, &config, args, &mut report).await,
        Command::Dashboard(args) => {
            render_analytics(&client, &mut report).await;
            report.text.push('\n');
            report.text.push_str("FEEDBACK STREAM\n");
            render_feed(&client, &config, args, &mut report).await;
        }
    }

    if cli.json {
        report
            .json
            .insert("generated_at".into(), json!(now.to_rfc3339()));
        println!("{}", serde_json::to_string_pretty(&report.json)?);
    } else {
        print!("{}", report.text);
    }

    session.logout();
    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    run(cli).await.inspect_err(|e| error!("Console run failed: {:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_omitted_filters_select_everything() {
        let cli = Cli::parse_from(["admin-console", "feed"]);
        let Some(Command::Feed(args)) = cli.command else {
            panic!("expected feed command");
        };
        assert_eq!(args.criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_filter_flags() {
        let cli = Cli::parse_from([
            "admin-console",
            "dashboard",
            "--rating",
            "1",
            "--rating",
            "2",
            "--sentiment",
            "negative",
            "--search",
            "Crash",
            "--json",
        ]);
        assert!(cli.json);
        let Some(Command::Dashboard(args)) = cli.command else {
            panic!("expected dashboard command");
        };
        let criteria = args.criteria();
        assert_eq!(criteria.ratings.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            criteria.sentiments.into_iter().collect::<Vec<_>>(),
            vec![Sentiment::Negative]
        );
        assert_eq!(criteria.query, "Crash");
    }

    #[test]
    fn test_access_key_help_warns_about_echo() {
        use clap::CommandFactory;
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "access_key")
            .and_then(|arg| arg.get_long_help().or(arg.get_help()))
            .map(|help| help.to_string())
            .unwrap_or_default();
        assert!(help.contains("echoes"), "help was {:?}", help);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["admin-console", "feed", "--rating", "6"]).is_err());
    }
}
