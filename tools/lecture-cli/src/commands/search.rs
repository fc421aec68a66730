//! Run a listing search against the configured API.

use anyhow::{anyhow, bail, Context as _, Result};
use lecture_data::{LectureListing, ListingDataSource, LoadStatus};
use lecture_search::{
    Field, FileSessionStorage, MemoryHistory, PersistedQuery, SearchStateController,
};

use super::SearchArgs;
use crate::context::Context;
use crate::output::rating_badge;

const COLUMNS: [usize; 4] = [6, 40, 20, 12];

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let url = PersistedQuery::parse(args.url.as_deref().unwrap_or(""));
    let mut storage = FileSessionStorage::open_or_empty(ctx.session_path());

    let source: ListingDataSource = ListingDataSource::from_config(&ctx.config.api)
        .context("Failed to create listing client")?;
    let controller =
        SearchStateController::initialize(&url, &mut storage, MemoryHistory::new(url.clone()));
    if controller.history().replacements() > 0 {
        ctx.output.debug("Restored keyword/faculty from the session fallback");
    }

    let mut listing = LectureListing::new(controller, source);
    let edits = args.filters.edits();
    let mut fetched = false;

    for (field, value) in edits.iter() {
        listing
            .edit(*field, value.as_str())
            .with_context(|| format!("Invalid --{} value", flag_name(*field)))?;
    }

    let spinner = ctx.output.spinner("Fetching lectures...");

    if !edits.is_empty() {
        listing.search().await;
        fetched = true;
    }

    if let Some(page) = args.page {
        if !listing.goto_page(page).await {
            spinner.finish_and_clear();
            let last = listing.controller().pagination().map_or(1, |p| p.last_page());
            bail!("Page {} is out of range (1-{})", page, last);
        }
        fetched = true;
    }

    if !fetched {
        listing.refresh().await;
    }

    spinner.finish_and_clear();
    render(&listing, ctx)
}

fn render(listing: &LectureListing<MemoryHistory>, ctx: &Context) -> Result<()> {
    let view = listing.view();
    let query = listing.controller().persisted_query();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "query": query.to_string(),
            "lectures": view.items(),
            "pagination": view.pagination(),
            "error": view.error().map(|e| e.to_string()),
        }));
    } else {
        ctx.output.header("Lectures");
        if view.items().is_empty() {
            ctx.output.info("No lectures match these filters.");
        } else {
            ctx.output
                .table_row(&["ID", "Title", "Lecturer", "Rating", "Reviews"], &COLUMNS);
            for lecture in view.items() {
                let id = lecture.id.to_string();
                let rating = rating_badge(lecture.avg_rating);
                let reviews = lecture.review_count.to_string();
                ctx.output.table_row(
                    &[
                        id.as_str(),
                        lecture.title.as_str(),
                        lecture.lecturer.as_str(),
                        rating.as_str(),
                        reviews.as_str(),
                    ],
                    &COLUMNS,
                );
            }
        }

        if let Some(pagination) = view.pagination() {
            println!();
            ctx.output.kv(
                "page",
                &format!("{} of {}", pagination.current_page, pagination.last_page()),
            );
            ctx.output.kv(
                "showing",
                &format!(
                    "{}-{} of {}",
                    pagination.start_item(),
                    pagination.end_item(),
                    pagination.total_count
                ),
            );
        }
        ctx.output.kv("url", &format!("?{}", query));
        ctx.output.debug(&format!(
            "{} request(s) sent",
            listing.source().generation()
        ));
    }

    match view.status() {
        LoadStatus::Error(message) => Err(anyhow!("{}", message)),
        _ => Ok(()),
    }
}

fn flag_name(field: Field) -> &'static str {
    match field {
        Field::Keyword => "keyword",
        Field::Faculty => "faculty",
        Field::Sort => "sort",
        Field::PeriodYear => "year",
        Field::PeriodTerm => "term",
        Field::Textbook => "textbook",
        Field::Attendance => "attendance",
        Field::GradingType => "grading",
        Field::ContentDifficulty => "difficulty",
        Field::ContentQuality => "quality",
    }
}
