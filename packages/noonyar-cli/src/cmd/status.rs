//! Ticket status command

use anyhow::{Context, Result};
use console::style;
use otp_login::store::ACCESS_TOKEN;
use otp_login::{QueueClient, QueueStatus, QueueStatusResponse, TokenStore};
use tracing::warn;

use crate::context::CliContext;

pub async fn run(ctx: &CliContext, bakery: u64, ticket: u64) -> Result<()> {
    let mut client = QueueClient::from_config(&ctx.config)?;

    match ctx.token_store().get(ACCESS_TOKEN) {
        Ok(Some(token)) => client = client.with_access_token(token),
        Ok(None) => {}
        Err(e) => warn!("Could not read stored access token: {}", e),
    }

    let response = client
        .ticket_status(bakery, ticket)
        .await
        .with_context(|| format!("Failed to fetch ticket {} at bakery {}", ticket, bakery))?;

    ctx.print_header(&format!("Bakery {} / ticket {}", bakery, ticket));

    match response {
        QueueStatusResponse::Message { msg } => ctx.print_warning(&msg),
        QueueStatusResponse::Status(status) => print_status(ctx, ticket, &status),
    }

    Ok(())
}

fn print_status(ctx: &CliContext, ticket: u64, status: &QueueStatus) {
    if !status.is_user_exists {
        ctx.print_warning(&format!(
            "Ticket {} is not in the queue; showing the end of the queue.",
            ticket
        ));
    }

    if status.ready {
        ctx.print_success("Your bread is ready.");
    } else {
        let estimate = if status.accurate_time {
            "estimated"
        } else {
            "roughly"
        };
        println!(
            "  Ready in: {} ({})",
            style(format_duration(status.wait_until)).cyan(),
            estimate
        );
    }

    println!("  People ahead: {}", style(status.people_in_queue).bold());

    if let Some(breads) = &status.user_breads {
        let mut breads: Vec<_> = breads.iter().collect();
        breads.sort();
        println!("  Order:");
        for (name, count) in breads {
            println!("    {} x {}", count, name);
        }
    }
}

fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
