//! Mutations. Each runs through a list controller so the printed list is
//! the server's state after the change.

use owo_colors::OwoColorize;
use serde_json::json;

use crate::auth::AuthSession;
use crate::config::Config;
use crate::entity::{EntityKind, Record, RecordId};
use crate::error::{Result, StewardError};

use super::{list_json, open_controller, print_json, print_list, saved_view};

/// Create a record from a JSON draft
pub async fn cmd_create(kind: EntityKind, data: &str, output_json: bool) -> Result<()> {
    AuthSession::default().require()?;
    let config = Config::load()?;
    crate::with_record_type!(kind, R => create_kind::<R>(&config, data, output_json).await)
}

/// Replace a record's fields from a JSON draft
pub async fn cmd_update(
    kind: EntityKind,
    id: &RecordId,
    data: &str,
    output_json: bool,
) -> Result<()> {
    AuthSession::default().require()?;
    let config = Config::load()?;
    crate::with_record_type!(kind, R => update_kind::<R>(&config, id, data, output_json).await)
}

/// Delete a record
pub async fn cmd_delete(kind: EntityKind, id: &RecordId, output_json: bool) -> Result<()> {
    AuthSession::default().require()?;
    let config = Config::load()?;
    crate::with_record_type!(kind, R => delete_kind::<R>(&config, id, output_json).await)
}

fn parse_draft<R: Record>(data: &str) -> Result<R::Draft> {
    serde_json::from_str(data).map_err(|e| {
        StewardError::InvalidInput(format!("--data is not a valid {} record: {e}", R::KIND))
    })
}

async fn create_kind<R: Record>(config: &Config, data: &str, output_json: bool) -> Result<()> {
    let draft = parse_draft::<R>(data)?;
    let controller = open_controller::<R>(config, saved_view::<R>())?;
    let created = controller.create(draft).await?;
    let snapshot = controller.snapshot();

    if output_json {
        super::ensure_loaded(&snapshot)?;
        return print_json(&json!({
            "created": created,
            "list": list_json(&snapshot),
        }));
    }

    println!("Created {} {}", R::KIND, created.id().to_string().cyan());
    print_list(&snapshot, false)
}

async fn update_kind<R: Record>(
    config: &Config,
    id: &RecordId,
    data: &str,
    output_json: bool,
) -> Result<()> {
    let draft = parse_draft::<R>(data)?;
    let controller = open_controller::<R>(config, saved_view::<R>())?;
    controller.update(id, draft).await?;
    let snapshot = controller.snapshot();

    if output_json {
        super::ensure_loaded(&snapshot)?;
        return print_json(&json!({
            "updated": id,
            "list": list_json(&snapshot),
        }));
    }

    println!("Updated {} {}", R::KIND, id.to_string().cyan());
    print_list(&snapshot, false)
}

async fn delete_kind<R: Record>(config: &Config, id: &RecordId, output_json: bool) -> Result<()> {
    let controller = open_controller::<R>(config, saved_view::<R>())?;
    controller.remove(id).await?;
    let snapshot = controller.snapshot();

    if output_json {
        super::ensure_loaded(&snapshot)?;
        return print_json(&json!({
            "deleted": id,
            "list": list_json(&snapshot),
        }));
    }

    println!("Deleted {} {}", R::KIND, id.to_string().cyan());
    print_list(&snapshot, false)
}
