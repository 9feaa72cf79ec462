use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use ridelink_client::config::ClientConfig;
use ridelink_client::store::{is_liked_by, unread_count_for};
use ridelink_client::utils::resolve_avatar_url;
use ridelink_client::{format_relative, telemetry, SyncSession};

#[derive(Parser)]
#[command(author, version, about = "Inspect ridelink conversations, feed and bookings")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List conversations, most recent first
    Conversations {
        /// Only show conversations whose other participant matches
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the social feed
    Feed {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Show upcoming bookings
    Bookings,
    /// Discover users
    Users {
        #[arg(long)]
        search: Option<String>,
    },
}

fn main() -> Result<()> {
    telemetry::init_logging();
    let args = Args::parse();
    let config = ClientConfig::load()?;
    let mut session = SyncSession::from_config(&config)?;
    let wait = config.http_timeout() + Duration::from_secs(1);
    let now = Utc::now();

    match args.command {
        Command::Conversations { search } => {
            session.spawn_load_conversations();
            wait_idle(&mut session, wait)?;
            if let Some(err) = &session.status().conversations_error {
                return Err(anyhow!("could not load conversations: {err}"));
            }
            let matches = session.search_conversations(search.as_deref().unwrap_or(""))?;
            for conversation in matches {
                let other = session.other_participant(conversation)?;
                let when = conversation
                    .last_message_time
                    .map(|t| format_relative(t, now))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:<24} {:>8}  [{} unread]  {}",
                    other.name,
                    when,
                    unread_count_for(conversation, session.self_user_id()),
                    conversation.last_message.as_deref().unwrap_or("")
                );
            }
            println!("total unread: {}", session.unread_total());
        }
        Command::Feed { pages } => {
            session.spawn_refresh_feed();
            wait_idle(&mut session, wait)?;
            for _ in 1..pages {
                session.spawn_load_next_feed_page();
                wait_idle(&mut session, wait)?;
            }
            if let Some(err) = &session.status().feed_error {
                return Err(anyhow!("could not load feed: {err}"));
            }
            for post in session.feed().posts() {
                let liked = if is_liked_by(post, session.self_user_id()) { "♥" } else { " " };
                println!(
                    "{} {} ({}) · {} likes · {} comments · {} shares",
                    liked,
                    post.author.name,
                    format_relative(post.created_at, now),
                    post.like_count,
                    post.comment_count,
                    post.shares
                );
                println!("    {}", post.content);
                if let Some(shared) = &post.shared_post {
                    println!("    ↪ {}: {}", shared.author.name, shared.content);
                }
            }
        }
        Command::Bookings => {
            session.spawn_load_bookings();
            wait_idle(&mut session, wait)?;
            if let Some(err) = &session.status().bookings_error {
                return Err(anyhow!("could not load bookings: {err}"));
            }
            for booking in session.bookings().upcoming(now) {
                let driver = booking
                    .driver
                    .as_ref()
                    .map(|d| d.name.as_str())
                    .unwrap_or("unassigned");
                println!(
                    "{}  {} → {}  {} seat(s)  driver: {}",
                    booking.departure_time.format("%Y-%m-%d %H:%M"),
                    booking.pickup,
                    booking.dropoff,
                    booking.seats,
                    driver
                );
            }
        }
        Command::Users { search } => {
            session.spawn_load_users(search.as_deref());
            wait_idle(&mut session, wait)?;
            if let Some(err) = &session.status().users_error {
                return Err(anyhow!("could not load users: {err}"));
            }
            for user in session.discovery().users() {
                println!(
                    "{:<24} {:>6} followers {}  {}",
                    user.user.name,
                    user.follower_count,
                    if user.is_following { "(following)" } else { "" },
                    resolve_avatar_url(
                        session.api().base_url(),
                        &config.avatar_placeholder_url,
                        &user.user
                    )
                );
            }
        }
    }

    session.dispose();
    Ok(())
}

fn wait_idle(session: &mut SyncSession, wait: Duration) -> Result<()> {
    if session.wait_for_idle(wait) {
        Ok(())
    } else {
        Err(anyhow!("timed out waiting for {}", session.api().base_url()))
    }
}
