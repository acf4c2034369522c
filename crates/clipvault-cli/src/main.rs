//! Clipvault CLI - Command-line interface for the clip catalog

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clipvault_client::ClipvaultClient;
use clipvault_core::{
    Angle, Apparatus, Clip, ClipFilters, ClipId, ClipMetaUpdate, OwnerId, PageRequest, SessionId,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:9877";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("clipvault=info".parse()?))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    let command = &args[1];
    let rest = &args[2..];

    match command.as_str() {
        "help" | "--help" | "-h" => print_help(),
        "server" => run_server().await?,
        "list" => list(rest).await?,
        "search" => {
            if rest.is_empty() {
                eprintln!("Usage: clipvault search <query> [--limit N] [--cursor C]");
                return Ok(());
            }
            search(rest).await?;
        }
        "get" => {
            let [id] = rest else {
                eprintln!("Usage: clipvault get <clip-id>");
                return Ok(());
            };
            get(id).await?;
        }
        "tag" => {
            if rest.is_empty() {
                eprintln!("Usage: clipvault tag <clip-id> [tag...]");
                return Ok(());
            }
            tag(&rest[0], &rest[1..]).await?;
        }
        "favorite" => {
            let (id, on) = match rest {
                [id] => (id, true),
                [id, flag] => (id, parse_switch(flag)?),
                _ => {
                    eprintln!("Usage: clipvault favorite <clip-id> [on|off]");
                    return Ok(());
                }
            };
            favorite(id, on).await?;
        }
        "delete" => {
            let [id] = rest else {
                eprintln!("Usage: clipvault delete <clip-id>");
                return Ok(());
            };
            delete(id).await?;
        }
        "sessions" => sessions().await?,
        "create-session" => {
            if rest.is_empty() {
                eprintln!("Usage: clipvault create-session <name>");
                return Ok(());
            }
            create_session(&rest.join(" ")).await?;
        }
        "rename-session" => {
            if rest.len() < 2 {
                eprintln!("Usage: clipvault rename-session <session-id> <name>");
                return Ok(());
            }
            rename_session(&rest[0], &rest[1..].join(" ")).await?;
        }
        "delete-session" => {
            let [id] = rest else {
                eprintln!("Usage: clipvault delete-session <session-id>");
                return Ok(());
            };
            delete_session(id).await?;
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"Clipvault CLI - Training clip catalog

USAGE:
    clipvault <COMMAND> [OPTIONS]

COMMANDS:
    help              Show this help message
    server            Start the Clipvault server
    list              List clips, newest first
    search            Search clips by free text
    get               Show one clip
    tag               Replace a clip's tags
    favorite          Mark or unmark a clip as favorite
    delete            Delete a clip
    sessions          List sessions
    create-session    Create a session
    rename-session    Rename a session
    delete-session    Delete a session (its clips are kept)

LIST OPTIONS:
    --tag <TAG>             Match clips carrying TAG (repeatable, any of)
    --angle <ANGLE>         front, side or 45
    --apparatus <NAME>      floor, rings, bar or parallettes
    --favorite <on|off>     Only favorites, or only non-favorites
    --session <ID>          Only clips in a session
    --from <TIME>           Created at or after TIME (RFC 3339)
    --to <TIME>             Created at or before TIME (RFC 3339)
    --limit <N>             Page size (default 20)
    --cursor <C>            Continue from a previous page

ENVIRONMENT:
    CLIPVAULT_SERVER        Server URL (default {DEFAULT_SERVER_URL})
    CLIPVAULT_CALLER        Owner asserted on every request

EXAMPLES:
    clipvault server
    clipvault list --tag handstand --angle front
    clipvault list --favorite off --from 2024-05-01T00:00:00Z
    clipvault search "press to handstand"
    clipvault favorite 6f1c0b8e-5a0e-4e43-9f0a-1a2b3c4d5e6f off
"#
    );
}

async fn run_server() -> Result<()> {
    use clipvault_server::{run_server, ServerConfig};

    let config = ServerConfig::from_env()?;
    info!("Starting Clipvault server on {}", config.addr);
    run_server(config).await?;
    Ok(())
}

async fn list(args: &[String]) -> Result<()> {
    let (filters, pagination) = parse_list_args(args)?;

    let client = connect().await?;
    let page = client.list_clips(filters, pagination).await?;

    if page.page.is_empty() {
        println!("No clips");
    }
    for clip in &page.page {
        print_clip_line(clip);
    }
    if let Some(next) = page.continue_cursor.filter(|_| !page.is_done) {
        println!("More: --cursor {}", next);
    }
    Ok(())
}

async fn search(args: &[String]) -> Result<()> {
    let mut words = Vec::new();
    let mut limit = None;
    let mut cursor = None;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--limit" => limit = Some(value(arg, args.next())?.parse::<usize>()?),
            "--cursor" => cursor = Some(value(arg, args.next())?.to_string()),
            _ => words.push(arg.as_str()),
        }
    }

    let client = connect().await?;
    let response = client.search_clips(words.join(" "), limit, cursor).await?;

    if response.results.is_empty() {
        println!("No matches");
    }
    for clip in &response.results {
        print_clip_line(clip);
    }
    if let Some(next) = response.cursor.filter(|_| !response.is_done) {
        println!("More: --cursor {}", next);
    }
    Ok(())
}

async fn get(id: &str) -> Result<()> {
    let client = connect().await?;
    let clip = client.get_clip(parse_clip_id(id)?).await?;
    println!("{}", serde_json::to_string_pretty(&clip)?);
    Ok(())
}

async fn tag(id: &str, tags: &[String]) -> Result<()> {
    let update = ClipMetaUpdate {
        tags: Some(tags.to_vec()),
        ..Default::default()
    };
    let client = connect().await?;
    let clip = client.update_clip_meta(parse_clip_id(id)?, update).await?;
    println!("Tags: {}", clip.tags.join(", "));
    Ok(())
}

async fn favorite(id: &str, on: bool) -> Result<()> {
    let update = ClipMetaUpdate {
        favorite: Some(on),
        ..Default::default()
    };
    let client = connect().await?;
    let clip = client.update_clip_meta(parse_clip_id(id)?, update).await?;
    println!("Favorite: {}", clip.favorite);
    Ok(())
}

async fn delete(id: &str) -> Result<()> {
    let client = connect().await?;
    client.delete_clip(parse_clip_id(id)?).await?;
    println!("Deleted clip {}", id);
    Ok(())
}

async fn sessions() -> Result<()> {
    let client = connect().await?;
    let sessions = client.list_sessions().await?;

    if sessions.is_empty() {
        println!("No sessions");
    } else {
        println!("Sessions:");
        for session in sessions {
            println!(
                "  {} - {} ({})",
                session.id,
                session.name,
                session.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

async fn create_session(name: &str) -> Result<()> {
    let client = connect().await?;
    let session = client.create_session(name).await?;
    println!("Created session: {}", session.id);
    Ok(())
}

async fn rename_session(id: &str, name: &str) -> Result<()> {
    let client = connect().await?;
    let session = client.rename_session(parse_session_id(id)?, name).await?;
    println!("Renamed session {} to '{}'", session.id, session.name);
    Ok(())
}

async fn delete_session(id: &str) -> Result<()> {
    let client = connect().await?;
    client.delete_session(parse_session_id(id)?).await?;
    println!("Deleted session {}", id);
    Ok(())
}

async fn connect() -> Result<ClipvaultClient> {
    let url = std::env::var("CLIPVAULT_SERVER").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let mut client = ClipvaultClient::connect(&url).await?;

    if let Ok(caller) = std::env::var("CLIPVAULT_CALLER") {
        if !caller.trim().is_empty() {
            client = client.with_caller(OwnerId::new(caller.trim())?);
        }
    }
    Ok(client)
}

fn print_clip_line(clip: &Clip) {
    let angle = clip.angle.map(|a| a.to_string()).unwrap_or_else(|| "-".into());
    let apparatus = clip.apparatus.map(|a| a.to_string()).unwrap_or_else(|| "-".into());
    println!(
        "  {} {} {:>6} {:<11} {}{}",
        clip.id,
        clip.created_at.format("%Y-%m-%d %H:%M"),
        angle,
        apparatus,
        clip.tags.join(","),
        if clip.favorite { " *" } else { "" }
    );
}

/// Turn `list` options into filters and a page request
fn parse_list_args(args: &[String]) -> Result<(ClipFilters, PageRequest)> {
    let mut filters = ClipFilters::new();
    let mut tags = Vec::new();
    let mut from = None;
    let mut to = None;
    let mut limit = None;
    let mut cursor = None;

    let mut args = args.iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--favorite" => {
                filters = filters.with_favorite(parse_switch(value(flag, args.next())?)?)
            }
            "--tag" => tags.push(value(flag, args.next())?.to_string()),
            "--angle" => filters = filters.with_angle(value(flag, args.next())?.parse::<Angle>()?),
            "--apparatus" => {
                filters = filters.with_apparatus(value(flag, args.next())?.parse::<Apparatus>()?)
            }
            "--session" => {
                filters = filters.with_session(parse_session_id(value(flag, args.next())?)?)
            }
            "--from" => from = Some(parse_time(value(flag, args.next())?)?),
            "--to" => to = Some(parse_time(value(flag, args.next())?)?),
            "--limit" => limit = Some(value(flag, args.next())?.parse::<usize>()?),
            "--cursor" => cursor = Some(value(flag, args.next())?.to_string()),
            other => bail!("Unknown option: {}", other),
        }
    }
    if !tags.is_empty() {
        filters = filters.with_tags(tags);
    }
    if from.is_some() || to.is_some() {
        // An open end is bounded by the earliest or latest RFC 3339 instant
        let start = from.unwrap_or_else(|| far_time(EARLIEST_SECS));
        let end = to.unwrap_or_else(|| far_time(LATEST_SECS));
        filters = filters.with_date_range(start, end);
    }

    let pagination = PageRequest {
        num_items: limit.unwrap_or_default(),
        cursor,
    };
    Ok((filters, pagination))
}

/// 0001-01-01T00:00:00Z
const EARLIEST_SECS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const LATEST_SECS: i64 = 253_402_300_799;

fn far_time(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    let at = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("Invalid time '{}' (expected RFC 3339)", text))?;
    Ok(at.with_timezone(&Utc))
}

fn value<'a>(flag: &str, next: Option<&'a String>) -> Result<&'a str> {
    next.map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn parse_switch(flag: &str) -> Result<bool> {
    match flag {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("Expected on or off, got '{}'", other),
    }
}

fn parse_clip_id(id: &str) -> Result<ClipId> {
    ClipId::parse(id).with_context(|| format!("Invalid clip id '{}'", id))
}

fn parse_session_id(id: &str) -> Result<SessionId> {
    SessionId::parse(id).with_context(|| format!("Invalid session id '{}'", id))
}
