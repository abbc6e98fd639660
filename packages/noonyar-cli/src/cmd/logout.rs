//! Logout command

use anyhow::{Context, Result};

use crate::context::CliContext;

/// Delete the token file written by `login`
pub fn run(ctx: &CliContext) -> Result<()> {
    let store = ctx.token_store();
    store
        .clear()
        .with_context(|| format!("Failed to remove {}", store.path().display()))?;
    ctx.print_success("Signed out.");
    Ok(())
}
