//! Terminal front end for the storefront chat
//!
//! Type a question, or one of the slash commands listed by `/help`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harvest_chat_agent::{ChatSession, PendingReply, SessionError};
use harvest_chat_config::{catalog, quick_action, ChatConfig};
use harvest_chat_core::{
    ActionSink, Message, MessagePayload, ProductId, QuickActionId, Rating, UiAction,
};
use harvest_chat_tools::AppointmentBooker;

#[derive(Parser)]
#[command(name = "harvest-chat")]
#[command(about = "Chat with the storefront assistant from a terminal")]
struct Args {
    /// Settings file (YAML or TOML); HARVEST_CHAT__* variables still apply
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

const HELP: &str = "\
Commands:
  /clear              start over
  /rate <n> up|down   rate assistant message #n
  /copy <n>           print message #n for copying
  /export             print the whole conversation
  /product <slug>     show a product card (e.g. olive-oil)
  /action <id>        open a quick action (browse-catalog, request-quote, schedule-call, contact-us)
  /pick <k>           send suggestion k from the last assistant message
  /slots              list bookable consultation slots
  /quit               exit";

/// Stands in for the storefront surfaces the chat can open
struct PrintSink;

impl ActionSink for PrintSink {
    fn open(&self, action: UiAction) {
        let surface = match action {
            UiAction::OpenQuoteForm => "quote request form",
            UiAction::OpenContactForm => "contact form",
            UiAction::OpenAppointmentScheduler => "appointment scheduler",
            UiAction::OpenProductCatalog => "product catalog",
        };
        println!("  >> opening the {}", surface);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = ChatConfig::load(args.config.as_deref()).context("loading chat settings")?;
    let session = ChatSession::from_config(
        format!("cli-{}", std::process::id()),
        &config,
        Arc::new(PrintSink),
    )
    .context("building response engine")?;
    tracing::info!(
        session_id = %session.session_id(),
        config = ?args.config,
        "Chat session ready"
    );
    let booker = AppointmentBooker::new(config.appointments);

    for (n, message) in session.messages().iter().enumerate() {
        print_message(n + 1, message);
    }
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let result = match parts.next() {
            Some("/quit") | Some("/exit") => break,
            Some("/help") => {
                println!("{}", HELP);
                Ok(())
            }
            Some("/clear") => session.clear().map(|_| {
                for (n, message) in session.messages().iter().enumerate() {
                    print_message(n + 1, message);
                }
            }),
            Some("/export") => {
                println!("{}", session.export_transcript());
                Ok(())
            }
            Some("/rate") => rate(&session, parts.next(), parts.next()),
            Some("/copy") => copy(&session, parts.next()),
            Some("/product") => show_product(&session, parts.next()),
            Some("/action") => trigger(&session, parts.next()),
            Some("/pick") => match pick(&session, parts.next()) {
                Some(Ok(pending)) => reply(&session, pending).await,
                Some(Err(e)) => Err(e),
                None => Ok(()),
            },
            Some("/slots") => {
                print_slots(&booker);
                Ok(())
            }
            Some(cmd) if cmd.starts_with('/') => {
                println!("unknown command {}; try /help", cmd);
                Ok(())
            }
            _ => match session.submit(line) {
                Ok(pending) => reply(&session, pending).await,
                Err(e) => Err(e),
            },
        };

        if let Err(e) = result {
            println!("  !! {}", e);
        }
    }

    session.close();
    tracing::info!(
        session_id = %session.session_id(),
        messages = session.messages().len(),
        "Chat session closed"
    );
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn reply(session: &ChatSession, pending: PendingReply) -> Result<(), SessionError> {
    println!("  ... assistant is typing");
    if pending.wait().await.is_some() {
        let messages = session.messages();
        if let Some(last) = messages.last() {
            print_message(messages.len(), last);
        }
    }
    Ok(())
}

fn print_message(n: usize, message: &Message) {
    println!(
        "#{} [{}] {}: {}",
        n,
        message.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
        message.sender.label(),
        message.text
    );
    match &message.payload {
        Some(MessagePayload::Suggestions(suggestions)) => {
            for (k, suggestion) in suggestions.iter().enumerate() {
                println!("    [{}] {}", k + 1, suggestion);
            }
        }
        Some(MessagePayload::Actions(actions)) => {
            for id in actions {
                let action = quick_action(*id);
                println!("    /action {:<16} {}", id.as_str(), action.label);
            }
        }
        Some(MessagePayload::Product(_)) | None => {}
    }
}

/// Look up message #n (1-based) as printed
fn nth_message(session: &ChatSession, n: Option<&str>) -> Option<Message> {
    let n: usize = n?.parse().ok()?;
    session.messages().into_iter().nth(n.checked_sub(1)?)
}

fn rate(session: &ChatSession, n: Option<&str>, value: Option<&str>) -> Result<(), SessionError> {
    let rating = match value {
        Some("up") | Some("+") => Rating::Up,
        Some("down") | Some("-") => Rating::Down,
        _ => {
            println!("usage: /rate <n> up|down");
            return Ok(());
        }
    };
    match nth_message(session, n) {
        Some(message) => {
            session.rate(message.id, rating)?;
            println!("  thanks for the feedback");
            Ok(())
        }
        None => {
            println!("usage: /rate <n> up|down");
            Ok(())
        }
    }
}

fn copy(session: &ChatSession, n: Option<&str>) -> Result<(), SessionError> {
    match nth_message(session, n) {
        Some(message) => {
            println!("{}", session.copy_message(message.id)?);
            Ok(())
        }
        None => {
            println!("usage: /copy <n>");
            Ok(())
        }
    }
}

fn show_product(session: &ChatSession, slug: Option<&str>) -> Result<(), SessionError> {
    match slug.map(str::parse::<ProductId>) {
        Some(Ok(id)) => {
            let card = session.show_product(id)?;
            print_message(session.messages().len(), &card);
        }
        Some(Err(e)) => println!("  !! {}", e),
        None => {
            let slugs: Vec<&str> = catalog().iter().map(|r| r.id.slug()).collect();
            println!("usage: /product <{}>", slugs.join("|"));
        }
    }
    Ok(())
}

fn trigger(session: &ChatSession, id: Option<&str>) -> Result<(), SessionError> {
    match id.and_then(QuickActionId::parse) {
        Some(id) => session.trigger_quick_action(id).map(|_| ()),
        None => {
            println!("usage: /action <browse-catalog|request-quote|schedule-call|contact-us>");
            Ok(())
        }
    }
}

/// Pick suggestion k from the most recent message that offers suggestions
fn pick(session: &ChatSession, k: Option<&str>) -> Option<Result<PendingReply, SessionError>> {
    let k: usize = match k.and_then(|k| k.parse().ok()) {
        Some(k) if k > 0 => k,
        _ => {
            println!("usage: /pick <k>");
            return None;
        }
    };
    let source = session
        .messages()
        .into_iter()
        .rev()
        .find(|m| matches!(m.payload, Some(MessagePayload::Suggestions(_))));
    match source {
        Some(message) => Some(session.choose_suggestion(message.id, k - 1).map(|pending| {
            if let Ok(text) = session.copy_message(pending.user_message) {
                println!("You: {}", text);
            }
            pending
        })),
        None => {
            println!("  no suggestions to pick from");
            None
        }
    }
}

fn print_slots(booker: &AppointmentBooker) {
    let today = chrono::Local::now().date_naive();
    let slots: Vec<String> = booker
        .time_slots()
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    println!("Bookable days:");
    for date in booker.available_dates(today) {
        println!("  {}", date.format("%a %d %b %Y"));
    }
    println!("Times: {}", slots.join(", "));
}
