//! `jokester-e2e joke`: run the jokester lookup locally.

use anyhow::{Context, Result};
use clap::Args;

use crate::application::services::joke_lookup::lookup_joke;
use crate::domain::joke::{JokeEvent, TABLE_SUFFIX_ENV};
use crate::infra::joke_store::AwsCliJokeStore;

/// Arguments for the joke command.
#[derive(Args, Debug)]
pub struct JokeArgs {
    /// Joke ID
    #[arg(long, conflicts_with = "event")]
    pub id: Option<String>,

    /// Raw invocation event, e.g. '{"jokeID":"1"}'
    #[arg(long)]
    pub event: Option<String>,

    /// Suffix appended to the `jokes` table name
    #[arg(long, env = TABLE_SUFFIX_ENV, default_value = "", hide_default_value = true)]
    pub table_suffix: String,
}

/// Run the joke command. The function response is always printed as JSON.
///
/// # Errors
///
/// Returns an error if `--event` is not valid JSON or the lookup fails.
pub async fn run(args: &JokeArgs) -> Result<()> {
    let event = match (&args.id, &args.event) {
        (Some(id), _) => JokeEvent::new(id),
        (None, Some(raw)) => serde_json::from_str(raw).context("--event is not a valid event")?,
        (None, None) => JokeEvent::default(),
    };
    let store = AwsCliJokeStore::default_runner();
    let response = lookup_joke(&store, &args.table_suffix, &event).await?;
    crate::output::json::print(&response)
}
