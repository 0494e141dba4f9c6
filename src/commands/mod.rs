mod auth;
mod config;
mod ls;
mod records;

pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use config::{cmd_config_set, cmd_config_show};
pub use ls::{LsOptions, cmd_ls};
pub use records::{cmd_create, cmd_delete, cmd_update};

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::display::render_list;
use crate::entity::Record;
use crate::error::{Result, StewardError};
use crate::list::{
    ControllerOptions, ListSnapshot, ListSyncController, LoadStatus, NavigationState, SavedView,
};
use crate::remote::HttpCollectionClient;

type HttpController<R> = ListSyncController<HttpCollectionClient<R>>;

/// Controller for `R` against the configured service, synced to the saved view.
fn open_controller<R: Record>(
    config: &Config,
    navigation: Arc<dyn NavigationState>,
) -> Result<HttpController<R>> {
    let client = HttpCollectionClient::<R>::from_config(config)?;
    let options = ControllerOptions::from_config(config, R::KIND);
    Ok(ListSyncController::builder(client, options)
        .navigation(navigation)
        .build())
}

fn saved_view<R: Record>() -> Arc<SavedView> {
    Arc::new(SavedView::open(R::KIND))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `{ kind, page, pageSize, totalPages, totalCount, search, items }`
fn list_json<R: Record>(snapshot: &ListSnapshot<R>) -> Value {
    json!({
        "kind": R::KIND.as_str(),
        "page": snapshot.query.page,
        "pageSize": snapshot.query.page_size,
        "totalPages": snapshot.page.total_pages,
        "totalCount": snapshot.page.total_count,
        "search": snapshot.query.search,
        "items": snapshot.page.items,
    })
}

/// Turn a failed settle into a command error.
fn ensure_loaded<R>(snapshot: &ListSnapshot<R>) -> Result<()> {
    match &snapshot.status {
        LoadStatus::Failed(message) => Err(StewardError::ListFailed(message.clone())),
        _ => Ok(()),
    }
}

/// Print the settled list in the requested format.
fn print_list<R: Record>(snapshot: &ListSnapshot<R>, output_json: bool) -> Result<()> {
    ensure_loaded(snapshot)?;
    if output_json {
        print_json(&list_json(snapshot))
    } else {
        println!("{}", render_list(snapshot));
        Ok(())
    }
}
