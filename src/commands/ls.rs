use crate::auth::AuthSession;
use crate::config::Config;
use crate::entity::{EntityKind, Record};
use crate::error::Result;
use crate::list::{NavigationSnapshot, NavigationState};

use super::{open_controller, print_list, saved_view};

pub struct LsOptions {
    pub kind: EntityKind,
    pub page: Option<u32>,
    pub search: Option<String>,
    pub fresh: bool,
    pub json: bool,
}

impl LsOptions {
    /// The view requested on the command line, if any overrides the saved one.
    fn requested_view(&self) -> Option<NavigationSnapshot> {
        if !self.fresh && self.page.is_none() && self.search.is_none() {
            return None;
        }
        Some(NavigationSnapshot {
            page: self.page.unwrap_or(1),
            search: self.search.clone().unwrap_or_default(),
        })
    }
}

/// List records, resuming the saved view unless flags say otherwise
pub async fn cmd_ls(options: LsOptions) -> Result<()> {
    AuthSession::default().require()?;
    let config = Config::load()?;
    crate::with_record_type!(options.kind, R => list_kind::<R>(&config, &options).await)
}

async fn list_kind<R: Record>(config: &Config, options: &LsOptions) -> Result<()> {
    let view = saved_view::<R>();
    if let Some(requested) = options.requested_view() {
        view.replace(&requested.to_query_string());
    }

    let controller = open_controller::<R>(config, view)?;
    controller.mount().await;
    print_list(&controller.snapshot(), options.json)
}
