//! Application service: jokester handler logic.
//!
//! Given an invocation event and the table suffix, look the joke up in the
//! jokes table. An event without a usable ID is answered without touching
//! storage.

use anyhow::{Context, Result};

use crate::application::ports::JokeStore;
use crate::domain::joke::{JokeEvent, JokeResponse, item_key, table_name};

/// Handle one invocation event.
///
/// # Errors
///
/// Returns an error if the store lookup fails.
pub async fn lookup_joke(
    store: &impl JokeStore,
    table_suffix: &str,
    event: &JokeEvent,
) -> Result<JokeResponse> {
    let Some(id) = event.id() else {
        return Ok(JokeResponse::missing_id());
    };
    let table = table_name(table_suffix);
    tracing::debug!(%table, %id, "looking up joke");
    let item = store
        .get_item(&table, &item_key(&id))
        .await
        .with_context(|| format!("get joke {id} from {table}"))?;
    Ok(JokeResponse::Item(item))
}
