//! Integration tests for the chat session (submit -> engine -> typing -> reply)
//!
//! Timing runs on a paused tokio clock so delays are exact.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use harvest_chat_agent::{
    ChatSession, Entry, Intent, ResponseEngine, SessionError, SessionEvent,
};
use harvest_chat_config::{ChatConfig, ResponseTemplates};
use harvest_chat_core::{ActionSink, NoopSink, ProductId, ResponseKind, Topic, UiAction};
use harvest_chat_text_processing::EntityExtractor;

#[derive(Default)]
struct RecordingSink {
    opened: Mutex<Vec<UiAction>>,
}

impl ActionSink for RecordingSink {
    fn open(&self, action: UiAction) {
        self.opened.lock().push(action);
    }
}

fn new_session() -> (ChatSession, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let session = ChatSession::new(
        "integration",
        Arc::new(ResponseEngine::default()),
        &ChatConfig::default(),
        sink.clone(),
    );
    (session, sink)
}

#[test]
fn test_extractor_finds_every_product_name() {
    let extractor = EntityExtractor::new();
    for product in ProductId::ALL {
        let text = format!("Do you have any {} in stock?", product.match_key().to_uppercase());
        let entities = extractor.extract(&text);
        assert!(
            entities.contains_product(product),
            "{} not found in {:?}",
            product,
            text
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_matching_rule_wins() {
    let (session, sink) = new_session();
    let pending = session.submit("What's the price of olive oil?").unwrap();
    assert_eq!(pending.intent, Intent::Pricing);

    let reply = pending.wait().await.unwrap();
    assert_eq!(reply.text, ResponseTemplates::default().pricing_redirect);
    assert!(!reply.text.contains("Tunisia - Sfax Region"));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(*sink.opened.lock(), vec![UiAction::OpenQuoteForm]);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_product_mentions_do_not_duplicate() {
    let (session, _) = new_session();
    for _ in 0..3 {
        session
            .submit("Tell me about your olive oil")
            .unwrap()
            .wait()
            .await;
    }

    let context = session.context();
    assert_eq!(context.products(), &[ProductId::OliveOil]);
    assert_eq!(context.query_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_olive_oil_detail_has_origin_and_no_action() {
    let (session, sink) = new_session();
    let pending = session.submit("Tell me about your olive oil").unwrap();
    assert!(pending.actions.is_empty());

    let reply = pending.wait().await.unwrap();
    assert_eq!(reply.kind, ResponseKind::Text);
    assert!(reply.text.contains("Tunisia - Sfax Region"));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(sink.opened.lock().is_empty());
    assert!(session.pending_actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pricing_opens_quote_form_once_after_delay() {
    let (session, sink) = new_session();
    let pending = session.submit("What's your price for apples?").unwrap();
    assert_eq!(pending.actions.len(), 1);
    assert_eq!(pending.actions[0].action(), UiAction::OpenQuoteForm);

    // The open is timed from composition, independently of the typing delay
    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert!(sink.opened.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(*sink.opened.lock(), vec![UiAction::OpenQuoteForm]);

    let reply = pending.wait().await.unwrap();
    assert_eq!(reply.text, ResponseTemplates::default().pricing_redirect);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sink.opened.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shipping_reply_only_adds_topic() {
    let (session, _) = new_session();
    let reply = session
        .submit("How long does shipping take?")
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(reply.text, ResponseTemplates::default().shipping);
    let context = session.context();
    assert!(context.products().is_empty());
    assert_eq!(context.topics(), &[Topic::Shipping]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_resets_context_and_transcript() {
    let (session, _) = new_session();
    let welcome = session.messages()[0].text.clone();

    session.submit("Any apples or pears?").unwrap().wait().await;
    session.submit("What about shipping costs?").unwrap().wait().await;
    assert!(!session.context().is_empty());

    session.clear().unwrap();

    let context = session.context();
    assert!(context.products().is_empty());
    assert!(context.topics().is_empty());
    assert_eq!(context.query_count(), 0);

    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, welcome);
}

#[tokio::test(start_paused = true)]
async fn test_clear_aborts_pending_reply() {
    let (session, _) = new_session();
    let pending = session.submit("Who are you?").unwrap();
    session.clear().unwrap();

    assert!(!session.is_composing());
    assert!(pending.wait().await.is_none());
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_typing_placeholder_window() {
    let (session, _) = new_session();
    assert!(!session.is_composing());

    let pending = session.submit("Tell me about your olive oil").unwrap();
    let expected = ChatConfig::default().typing.delay_for(
        &ResponseEngine::default()
            .respond("Tell me about your olive oil")
            .text,
    );
    assert_eq!(pending.delay, expected);
    assert!(expected <= Duration::from_millis(2500));

    assert!(session.is_composing());
    assert_eq!(session.entries().last(), Some(&Entry::Typing));

    tokio::time::sleep(expected - Duration::from_millis(1)).await;
    assert!(session.is_composing());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!session.is_composing());
    assert!(!session.entries().contains(&Entry::Typing));
    let last = session.messages().pop().unwrap();
    assert!(last.text.contains("Tunisia - Sfax Region"));
}

#[tokio::test(start_paused = true)]
async fn test_short_reply_typing_delay() {
    let mut templates = ResponseTemplates::default();
    templates.shipping = "Yes.".to_string();
    let engine = Arc::new(ResponseEngine::new("Test Co", templates));
    let session = ChatSession::new(
        "short",
        engine,
        &ChatConfig::default(),
        Arc::new(RecordingSink::default()),
    );

    let pending = session.submit("shipping?").unwrap();
    assert_eq!(pending.delay, Duration::from_millis(800 + 8 * 4));
}

#[tokio::test(start_paused = true)]
async fn test_session_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let templates_path = dir.path().join("templates.yaml");
    std::fs::write(&templates_path, "shipping: \"We ship by reefer container.\"\n").unwrap();

    let mut settings = tempfile::Builder::new().suffix(".yaml").tempfile_in(dir.path()).unwrap();
    writeln!(
        settings,
        "company_name: \"Kairouan Growers\"\ntemplates_path: \"{}\"",
        templates_path.display()
    )
    .unwrap();

    let config = ChatConfig::load(Some(settings.path())).unwrap();
    let session = ChatSession::from_config("from-file", &config, Arc::new(NoopSink)).unwrap();
    assert!(session.messages()[0].text.contains("Kairouan Growers"));

    let reply = session.submit("How does shipping to Lyon work?").unwrap().wait().await.unwrap();
    assert_eq!(reply.text, "We ship by reefer container.");
    // Templates left out of the file keep their defaults
    let reply = session.submit("hello").unwrap().wait().await.unwrap();
    assert_eq!(reply.text, ResponseTemplates::default().fallback);
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejected_while_composing() {
    let (session, _) = new_session();
    let pending = session.submit("hello").unwrap();

    assert_eq!(
        session.submit("anyone there?").unwrap_err(),
        SessionError::ReplyPending
    );
    // The rejected text never reaches the transcript or context
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.context().query_count(), 1);

    pending.wait().await.unwrap();
    assert!(session.submit("anyone there?").is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_produce_overview_and_specific_fruit() {
    let (session, _) = new_session();

    let overview = session.submit("What fruit do you export?").unwrap().wait().await.unwrap();
    assert_eq!(overview.kind, ResponseKind::Suggestions);

    let apples = session
        .submit("Tell me about apples and peaches")
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert!(apples.text.contains("Tunisia - Kasserine and Sbiba"));
}

#[tokio::test(start_paused = true)]
async fn test_session_events_in_order() {
    let (session, _) = new_session();
    let mut events = session.subscribe();

    session.submit("Who are you?").unwrap().wait().await.unwrap();
    session.clear().unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }

    assert_eq!(seen.len(), 5);
    assert!(matches!(seen[0], SessionEvent::MessageAppended { ref message } if !message.is_bot()));
    assert!(matches!(seen[1], SessionEvent::TypingStarted { .. }));
    assert_eq!(seen[2], SessionEvent::TypingStopped);
    assert!(matches!(seen[3], SessionEvent::MessageAppended { ref message } if message.is_bot()));
    assert_eq!(seen[4], SessionEvent::Cleared);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_opens() {
    let (session, sink) = new_session();
    session.submit("I'd like to book an appointment").unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(sink.opened.lock().is_empty());
}
