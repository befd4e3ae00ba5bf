//! Subscriber allow-list management.

use clap::Subcommand;

/// Sub-commands available under `subscribers`.
#[derive(Debug, Subcommand)]
pub enum SubscriberCommands {
    /// Grant access to an email
    Add {
        #[arg(long)]
        email: String,
        /// Recorded as the subscriber's last event
        #[arg(long, default_value = "MANUAL_GRANT")]
        event: String,
    },
    /// Show the most recently updated subscribers
    List {
        #[arg(long, default_value = "50")]
        limit: i64,
    },
    /// Revoke access for an email
    Remove {
        #[arg(long)]
        email: String,
    },
}

/// Dispatches a `subscribers` sub-command.
///
/// # Errors
///
/// Returns an error if the email is malformed, the row is missing on remove,
/// or the database query fails.
pub(crate) async fn run(pool: &sqlx::PgPool, command: SubscriberCommands) -> anyhow::Result<()> {
    match command {
        SubscriberCommands::Add { email, event } => {
            let row = vreverse_db::upsert_subscriber(pool, &email, &event).await?;
            println!("granted {} ({})", row.email, row.last_event);
        }
        SubscriberCommands::List { limit } => {
            let rows = vreverse_db::list_subscribers(pool, limit).await?;
            if rows.is_empty() {
                println!("no subscribers yet");
                return Ok(());
            }
            println!("{:<40}{:<26}UPDATED", "EMAIL", "LAST EVENT");
            for row in &rows {
                println!(
                    "{:<40}{:<26}{}",
                    row.email,
                    row.last_event,
                    row.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        SubscriberCommands::Remove { email } => {
            match vreverse_db::delete_subscriber(pool, &email).await {
                Ok(()) => println!("revoked {}", email.trim().to_lowercase()),
                Err(vreverse_db::DbError::NotFound) => {
                    anyhow::bail!("no subscriber with email '{email}'")
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
