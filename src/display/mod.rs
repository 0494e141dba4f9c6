//! Terminal rendering of list snapshots.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::entity::Record;
use crate::list::{ListSnapshot, LoadStatus};

/// Rounded table with the record type's columns.
pub fn render_table<R: Record>(items: &[R]) -> String {
    let mut builder = Builder::default();
    builder.push_record(R::columns().iter().copied());
    for item in items {
        builder.push_record(item.cells());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// `Page 2 of 3 · 30 records`, or the match count while searching.
pub fn footer_text<R>(snapshot: &ListSnapshot<R>) -> String {
    let page = &snapshot.page;
    let noun = if page.total_count == 1 { "record" } else { "records" };

    let mut footer = if snapshot.query.is_search() {
        format!(
            "{} {} matching \"{}\"",
            page.total_count, noun, snapshot.query.search
        )
    } else {
        format!(
            "Page {} of {} · {} {}",
            snapshot.query.page, page.total_pages, page.total_count, noun
        )
    };

    if page.is_degraded() && !snapshot.query.is_search() {
        footer.push_str(" (approximate)");
    }
    footer
}

/// Full listing: table (or empty notice), footer, and any error banner.
pub fn render_list<R: Record>(snapshot: &ListSnapshot<R>) -> String {
    let mut out = String::new();

    if let LoadStatus::Failed(message) = &snapshot.status {
        out.push_str(&format!("{} {}\n", "error:".red().bold(), message));
    }

    if snapshot.page.items.is_empty() {
        out.push_str(&format!("No {} found.\n", R::KIND));
    } else {
        out.push_str(&render_table(&snapshot.page.items));
        out.push('\n');
    }

    out.push_str(&footer_text(snapshot).dimmed().to_string());
    out
}
