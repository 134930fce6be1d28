//! Follow the inventory feed until Ctrl-C.

use tracing::{info, warn};
use vetrina_admin::LiveDashboard;
use vetrina_client::{FeedEvent, InventoryFeed};
use vetrina_core::ProductQuery;

use super::Context;
use crate::output;

/// Print every feed event as it arrives.
pub async fn feed(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.browse_as_guest();
    let mut feed = InventoryFeed::connect(ctx.api())?;
    info!("Listening for inventory changes");

    loop {
        tokio::select! {
            event = feed.next() => match event {
                Some(FeedEvent::Connected(_)) => output::emit("connected"),
                Some(FeedEvent::InventoryChanged(change)) => output::emit(&format!(
                    "inventory-changed  type={} reason={} at={}",
                    change.kind.as_deref().unwrap_or("-"),
                    change.reason.as_deref().unwrap_or("-"),
                    change.at.as_deref().unwrap_or("-"),
                )),
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// Reload and print the admin products dashboard after every burst of
/// changes.
pub async fn dashboard(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    if !ctx.api().session().snapshot().is_admin() {
        return Err("This account is not an ADMIN.".into());
    }

    let feed = InventoryFeed::connect(ctx.api())?;
    let mut live = LiveDashboard::new(ctx.admin().clone(), feed, ProductQuery::default());
    let first = live
        .load()
        .await
        .map_err(|e| e.user_message("Failed to load products"))?;
    output::emit(&output::dashboard(&first));

    loop {
        tokio::select! {
            next = live.next() => match next {
                Some(Ok(dashboard)) => {
                    output::emit(&format!("\n-- {} change(s) --", dashboard.changes));
                    output::emit(&output::dashboard(&dashboard));
                }
                Some(Err(e)) => warn!(error = %e, "Dashboard reload failed"),
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}
