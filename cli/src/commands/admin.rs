use std::fmt::Write as _;

use anyhow::Result;
use modconsole_shared::models::{BlockedUser, DashboardStats};

use super::{print_json, App};

pub async fn ping(app: &App) -> Result<()> {
    let value = app.api.test_connection().await.map_err(|err| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })?;
    print_json(&value)
}

pub async fn blocked(app: &App) -> Result<()> {
    app.require_session().await?;
    let users = app.api.blocked_users().await?;
    if app.config.json {
        return print_json(&users);
    }
    print!("{}", render_blocked(&users));
    Ok(())
}

pub async fn unblock(app: &App, block_id: i64) -> Result<()> {
    app.require_session().await?;
    app.api.unblock_user(block_id).await?;
    println!("Block {block_id} lifted.");
    Ok(())
}

pub async fn stats(app: &App) -> Result<()> {
    app.require_session().await?;
    let stats = app.api.dashboard_stats().await?;
    if app.config.json {
        return print_json(&stats);
    }
    print!("{}", render_stats(&stats));
    Ok(())
}

pub fn render_stats(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pending reports: {}", stats.pending_reports);
    let _ = writeln!(out, "Total reports:   {}", stats.total_reports);
    let _ = writeln!(out, "Blocked users:   {}", stats.blocked_users);
    let _ = writeln!(
        out,
        "Total messages:  {} ({} public, {} direct)",
        stats.total_messages(),
        stats.public_messages,
        stats.direct_messages
    );
    out
}

pub fn render_blocked(users: &[BlockedUser]) -> String {
    if users.is_empty() {
        return "No blocked users.\n".to_string();
    }
    let mut out = String::new();
    for user in users {
        let label = user
            .blocked
            .as_ref()
            .map(|user| user.label().to_string())
            .or_else(|| user.blocked_id.map(|id| format!("user {id}")))
            .unwrap_or_else(|| "Unknown".to_string());
        let blocker = user
            .blocker_id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        let _ = writeln!(
            out,
            "#{:<5} {:<20} by {:<6} {}",
            user.id,
            label,
            blocker,
            user.created_at.as_deref().unwrap_or("")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use modconsole_shared::models::UserRef;

    use super::*;

    #[test]
    fn stats_show_message_total() {
        let stats = DashboardStats {
            pending_reports: 3,
            total_reports: 8,
            blocked_users: 1,
            public_messages: 40,
            direct_messages: 2,
        };
        let text = render_stats(&stats);
        assert!(text.contains("Pending reports: 3"));
        assert!(text.contains("Total messages:  42 (40 public, 2 direct)"));
    }

    #[test]
    fn blocked_list_prefers_username() {
        let users = vec![BlockedUser {
            id: 5,
            blocker_id: Some(1),
            blocked_id: Some(4),
            blocked: Some(UserRef {
                id: Some(4),
                username: Some("mallory".to_string()),
                display_name: None,
            }),
            created_at: None,
        }];
        let text = render_blocked(&users);
        assert!(text.starts_with("#5"));
        assert!(text.contains("mallory"));
        assert_eq!(render_blocked(&[]), "No blocked users.\n");
    }
}
