//! Encode and decode listing URL queries.

use anyhow::{bail, Result};
use lecture_search::{Field, FilterCriteria, PersistedQuery};

use super::{FilterArgs, UrlArgs, UrlCommand};
use crate::context::Context;

/// Run the url command.
pub async fn run(args: UrlArgs, ctx: &Context) -> Result<()> {
    match args.command {
        UrlCommand::Encode { page, filters } => encode(page, &filters, ctx),
        UrlCommand::Decode { query } => decode(&query, ctx),
    }
}

fn encode(page: u32, filters: &FilterArgs, ctx: &Context) -> Result<()> {
    let criteria = criteria_from(page, filters)?;
    let query = PersistedQuery::encode(&criteria);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "query": query.to_string() }));
    } else {
        println!("?{}", query);
    }
    Ok(())
}

fn decode(raw: &str, ctx: &Context) -> Result<()> {
    let parsed = PersistedQuery::parse(raw);
    let criteria = parsed.decode();
    let canonical = PersistedQuery::encode(&criteria);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "criteria": criteria,
            "canonical": canonical.to_string(),
        }));
        return Ok(());
    }

    ctx.output.header("Criteria");
    for field in Field::ALL {
        let value = criteria.value(field);
        if criteria.is_active(field) {
            ctx.output.kv(field.query_key(), value);
        }
    }
    ctx.output.kv("page", &criteria.page.to_string());
    ctx.output.kv("canonical", &format!("?{}", canonical));

    if parsed != canonical {
        ctx.output
            .warn("Query is not canonical; unknown, invalid or default values were dropped");
    }
    Ok(())
}

/// Criteria built from filter flags, rejecting invalid option values.
pub fn criteria_from(page: u32, filters: &FilterArgs) -> Result<FilterCriteria> {
    if page == 0 {
        bail!("Page numbers start at 1");
    }

    let mut criteria = FilterCriteria::new();
    for (field, value) in filters.edits() {
        criteria.set(field, value)?;
    }
    criteria.page = page;
    Ok(criteria)
}
