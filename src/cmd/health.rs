//! Service health check — `revq health`.

use anyhow::{Result, bail};

use revq::ui::render;

use super::Ctx;

pub async fn cmd_health(ctx: &Ctx) -> Result<()> {
    let health = ctx.client.health().await?;
    render::print_health(&health);
    if !health.is_healthy() {
        bail!("Service reported status '{}'", health.status);
    }
    Ok(())
}
