//! ThriveUp social CLI
//!
//! Runs friend-graph operations against a local SQLite store (or a remote
//! document gateway) and logs the results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use thriveup_social_core::social::friend::FriendListener;
use thriveup_social_core::{ClientConfig, StoreConfig, ThriveClient, User};
use tracing::{info, warn};

/// ThriveUp social CLI
#[derive(Parser, Debug)]
#[command(name = "thriveup-cli")]
#[command(about = "ThriveUp friend graph CLI", long_about = None)]
struct Args {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://thriveup.db?mode=rwc")]
    db: String,

    /// Remote document gateway; overrides --db when set
    #[arg(long)]
    api_base_url: Option<String>,

    /// Token sent to the remote gateway
    #[arg(long, default_value = "")]
    token: String,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info,thriveup_social_core=debug")]
    log_level: String,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or update a user profile
    AddUser {
        uid: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all users
    Users,
    /// Send a friend request
    Send { from: String, to: String },
    /// Accept a friend request by id
    Accept { request_id: String },
    /// Reject (delete) a friend request by id
    Reject { request_id: String },
    /// Withdraw a pending request
    Unsend { from: String, to: String },
    /// Remove a friendship in both directions
    Remove { user: String, friend: String },
    /// List a user's friend edges
    Friends { user: String },
    /// List requests addressed to a user
    Requests { user: String },
    /// List requests sent by a user
    Sent { user: String },
    /// List users a user could befriend
    Discover { user: String },
    /// Show how two users are related
    Status { user: String, other: String },
}

/// Install the tracing subscriber (stdout, plus an optional file).
fn init_logger(log_level: &str, log_file: Option<&str>) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file = std::sync::Mutex::new(file);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();
    Ok(())
}

struct CliFriendListener;

#[async_trait::async_trait]
impl FriendListener for CliFriendListener {
    async fn on_friend_added(&self, friends_json: String) {
        info!("[CLI/Friend] 👥 friends added: {}", friends_json);
    }

    async fn on_friend_deleted(&self, friends_json: String) {
        info!("[CLI/Friend] 🚫 friends deleted: {}", friends_json);
    }

    async fn on_friend_request_added(&self, request_json: String) {
        info!("[CLI/Friend] 📝 request added: {}", request_json);
    }

    async fn on_friend_request_deleted(&self, request_json: String) {
        info!("[CLI/Friend] 🗑️ request deleted: {}", request_json);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level, args.log_file.as_deref())?;

    let store = match &args.api_base_url {
        Some(url) => StoreConfig::Http {
            api_base_url: url.clone(),
            token: args.token.clone(),
        },
        None => StoreConfig::Sqlite {
            db_url: args.db.clone(),
        },
    };
    let mut client = ThriveClient::new(ClientConfig::new("").with_store(store)).await?;
    client.set_friend_listener(Arc::new(CliFriendListener));
    let friends = client.friends();

    match args.command {
        Command::AddUser {
            uid,
            name,
            description,
        } => {
            let mut user = User::new(uid, name);
            user.description = description;
            client.users().upsert_user(&user).await?;
            info!("[CLI] ✅ saved user {}", user.uid);
        }
        Command::Users => {
            let users = client.users().get_all_users().await?;
            info!("[CLI] 📋 {} users", users.len());
            for u in users {
                info!("[CLI]   - {} | {}", u.uid, u.name);
            }
        }
        Command::Send { from, to } => {
            let request = friends.send_friend_request(&from, &to).await?;
            info!("[CLI] 📝 request id: {}", request.id);
        }
        Command::Accept { request_id } => {
            if friends.accept_friend_request(&request_id).await? {
                info!("[CLI] ✅ request {} accepted", request_id);
            } else {
                warn!("[CLI] ⚠️ request {} not found", request_id);
            }
        }
        Command::Reject { request_id } => {
            if friends.remove_friend_request(&request_id).await? {
                info!("[CLI] 🗑️ request {} rejected", request_id);
            } else {
                warn!("[CLI] ⚠️ request {} not found", request_id);
            }
        }
        Command::Unsend { from, to } => {
            if friends.unsend_friend_request(&from, &to).await? {
                info!("[CLI] 🗑️ request {} -> {} withdrawn", from, to);
            } else {
                warn!("[CLI] ⚠️ no pending request {} -> {}", from, to);
            }
        }
        Command::Remove { user, friend } => {
            if friends.remove_friend(&user, &friend).await? {
                info!("[CLI] 🗑️ {} and {} are no longer friends", user, friend);
            } else {
                warn!("[CLI] ⚠️ {} and {} were not friends", user, friend);
            }
        }
        Command::Friends { user } => {
            let list = friends.fetch_friends(&user).await?;
            info!("[CLI] 👥 {} has {} friends", user, list.len());
            for f in list {
                info!("[CLI]   - {} (edge {})", f.friend_id, f.id);
            }
        }
        Command::Requests { user } => {
            let list = friends.fetch_friend_requests(&user).await?;
            info!("[CLI] 📬 {} incoming requests for {}", list.len(), user);
            for r in list {
                info!("[CLI]   - {} from {}", r.id, r.from_user_id);
            }
        }
        Command::Sent { user } => {
            let list = friends.fetch_sent_friend_requests(&user).await?;
            info!("[CLI] 📤 {} requests sent by {}", list.len(), user);
            for r in list {
                info!("[CLI]   - {} to {}", r.id, r.to_user_id);
            }
        }
        Command::Discover { user } => {
            let list = friends
                .fetch_users_excluding_friends_and_requests(&user)
                .await?;
            info!("[CLI] 🔍 {} candidates for {}", list.len(), user);
            for u in list {
                info!("[CLI]   - {} | {}", u.uid, u.name);
            }
        }
        Command::Status { user, other } => {
            let status = friends.relationship_status(&user, &other).await?;
            info!("[CLI] 🔗 {} -> {}: {:?}", user, other, status);
        }
    }

    Ok(())
}
