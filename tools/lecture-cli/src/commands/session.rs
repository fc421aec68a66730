//! Manage the session fallback file read by the next search.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use lecture_search::storage::{SEARCH_WORD_KEY, SELECTED_FACULTY_KEY};
use lecture_search::{FileSessionStorage, SessionStorage};

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let path = ctx.session_path();
    let mut storage = FileSessionStorage::open(&path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;

    match args.command {
        SessionCommand::Set { key, value } => {
            if key != SEARCH_WORD_KEY && key != SELECTED_FACULTY_KEY {
                ctx.output.warn(&format!(
                    "'{}' is not read by search (expected {} or {})",
                    key, SEARCH_WORD_KEY, SELECTED_FACULTY_KEY
                ));
            }
            storage.set_item(&key, &value)?;
            ctx.output.success(&format!("Set {} = {}", key, value));
        }
        SessionCommand::Show => {
            let items = snapshot(&storage)?;
            if ctx.output.is_json() {
                ctx.output.json(&items);
            } else if items.is_empty() {
                ctx.output.info("Session is empty");
            } else {
                ctx.output.header(&format!("Session ({})", path.display()));
                for (key, value) in &items {
                    ctx.output.kv(key, value);
                }
            }
        }
        SessionCommand::Clear => {
            storage.clear()?;
            ctx.output.success("Session cleared");
        }
    }

    Ok(())
}

fn snapshot(storage: &dyn SessionStorage) -> Result<BTreeMap<String, String>> {
    let mut items = BTreeMap::new();
    for key in storage.keys()? {
        if let Some(value) = storage.get_item(&key)? {
            items.insert(key, value);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use lecture_search::MemorySessionStorage;

    use super::*;

    #[test]
    fn test_snapshot() {
        let storage = MemorySessionStorage::with_items([(SEARCH_WORD_KEY, "bio"), ("other", "x")]);
        let items = snapshot(&storage).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[SEARCH_WORD_KEY], "bio");
    }
}
