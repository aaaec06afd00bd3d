//! Turn-level behavior against scripted transports.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use super::*;
use crate::test_support::{Script, ScriptedTransport};
use crate::{ChatError, Message, Role};

const TICK: Duration = Duration::from_millis(10);

fn session() -> ChatSession {
    ChatSession::new().with_typing_interval(Duration::from_millis(1))
}

#[tokio::test(start_paused = true)]
async fn hello_round_trip_adopts_conversation_id() {
    let transport = ScriptedTransport::new(vec![
        Script::Body(vec![
            "data: {\"conversationId\":\"conv-1\"}\n",
            "data: {\"content\":\"Hi \"}\n",
            "data: {\"content\":\"there!\"}\n",
            "data: [DONE]\n",
        ]),
        Script::Body(vec!["data: {\"content\":\"Sure.\"}\n"]),
    ]);
    let mut session = session();

    let reply = session.submit(&transport, "hello").await.unwrap();
    assert_eq!(reply, Message::assistant("Hi there!"));
    assert_eq!(
        session.transcript(),
        &[Message::user("hello"), Message::assistant("Hi there!")]
    );
    assert_eq!(session.conversation_id().map(|id| id.as_str()), Some("conv-1"));
    assert_eq!(session.state(), TurnState::Idle);

    session.submit(&transport, "and then?").await.unwrap();
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].message, "hello");
    assert!(requests[0].conversation_id.is_none());
    assert_eq!(
        requests[1].conversation_id.as_ref().map(|id| id.as_str()),
        Some("conv-1")
    );
    assert_eq!(session.message_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn records_split_across_chunks() {
    let transport = ScriptedTransport::new(vec![Script::Body(vec![
        "data: {\"conte",
        "nt\":\"caf\u{e9}\"}\r\n: ping\r\n\r\nda",
        "ta: {\"content\":\" ok\"}",
    ])]);
    let mut session = session();

    let reply = session.submit(&transport, "hi").await.unwrap();
    assert_eq!(reply.content, "caf\u{e9} ok");
}

#[tokio::test(start_paused = true)]
async fn malformed_record_is_skipped() {
    let transport = ScriptedTransport::new(vec![Script::Body(vec![
        "data: {\"content\":\"a\"}\n",
        "data: {not json\n",
        "data: {\"content\":\"b\"}\n",
    ])]);
    let mut session = session();

    let reply = session.submit(&transport, "hi").await.unwrap();
    assert_eq!(reply.content, "ab");
}

#[tokio::test(start_paused = true)]
async fn conversation_id_is_write_once() {
    let transport = ScriptedTransport::new(vec![
        Script::Body(vec![
            "data: {\"conversationId\":\"A\"}\n",
            "data: {\"content\":\"x\"}\n",
            "data: {\"conversationId\":\"B\"}\n",
        ]),
        Script::Body(vec![
            "data: {\"conversationId\":\"C\",\"content\":\"y\"}\n",
        ]),
        Script::Body(vec!["data: {\"content\":\"z\"}\n"]),
    ]);
    let mut session = session();

    session.submit(&transport, "one").await.unwrap();
    assert_eq!(session.conversation_id().map(|id| id.as_str()), Some("A"));
    session.submit(&transport, "two").await.unwrap();
    session.submit(&transport, "three").await.unwrap();

    let ids: Vec<_> = transport
        .requests()
        .into_iter()
        .map(|r| r.conversation_id.map(|id| id.as_str().to_string()))
        .collect();
    assert_eq!(ids, vec![None, Some("A".into()), Some("A".into())]);
}

#[tokio::test(start_paused = true)]
async fn rejected_request_leaves_only_user_message() {
    let transport = ScriptedTransport::new(vec![Script::Reject(500)]);
    let mut session = session();

    let err = session.submit(&transport, "hello").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(session.transcript(), &[Message::user("hello")]);
    assert_eq!(session.state(), TurnState::Idle);
    assert!(session.conversation_id().is_none());
}

#[tokio::test(start_paused = true)]
async fn mid_stream_failure_commits_nothing() {
    let transport = ScriptedTransport::new(vec![Script::FailAfter(vec![
        "data: {\"conversationId\":\"conv-9\"}\n",
        "data: {\"content\":\"partial ans",
    ])]);
    let mut session = session();
    let display = session.subscribe_display();

    let err = session.submit(&transport, "hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)));
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript()[0].role, Role::User);
    assert_eq!(session.state(), TurnState::Idle);
    assert_eq!(*display.borrow(), "");
    // The id arrived before the failure, so the session keeps it.
    assert_eq!(session.conversation_id().map(|id| id.as_str()), Some("conv-9"));
}

#[tokio::test(start_paused = true)]
async fn stream_without_content_is_rejected() {
    let transport = ScriptedTransport::new(vec![Script::Body(vec![
        ": keep-alive\n",
        "data: {\"conversationId\":\"c\"}\n",
        "data: [DONE]\n",
    ])]);
    let mut session = session();

    let err = session.submit(&transport, "hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Parse(_)));
    assert_eq!(session.transcript(), &[Message::user("hello")]);
}

#[tokio::test(start_paused = true)]
async fn commit_waits_for_reveal_to_finish() {
    let transport = ScriptedTransport::new(vec![Script::Body(vec![
        "data: {\"content\":\"hello\"}\n",
    ])]);
    let mut session = ChatSession::new().with_typing_interval(TICK);
    let start = Instant::now();

    session.submit(&transport, "hi").await.unwrap();
    // Five characters arrive at once; the last is revealed four ticks later.
    assert!(start.elapsed() >= TICK * 4);
    assert!(start.elapsed() < TICK * 5);
}

#[tokio::test(start_paused = true)]
async fn state_moves_from_waiting_to_streaming_to_idle() {
    let transport = ScriptedTransport::new(vec![Script::Timed(vec![
        (0, "data: {\"conversationId\":\"conv-1\"}\n"),
        (50, "data: {\"content\":\"Hi\"}\n"),
        (50, "data: [DONE]\n"),
    ])]);
    let mut session = session();
    let state = session.subscribe_state();
    let display = session.subscribe_display();

    let observer = async {
        sleep(Duration::from_millis(25)).await;
        let waiting = *state.borrow();
        sleep(Duration::from_millis(50)).await;
        let streaming = *state.borrow();
        let shown = display.borrow().clone();
        (waiting, streaming, shown)
    };

    let (reply, (waiting, streaming, shown)) =
        tokio::join!(session.submit(&transport, "hello"), observer);

    assert_eq!(waiting, TurnState::WaitingForFirstToken);
    assert_eq!(streaming, TurnState::Streaming);
    assert_eq!(shown, "Hi");
    assert_eq!(reply.unwrap().content, "Hi");
    assert_eq!(session.state(), TurnState::Idle);
    assert_eq!(*display.borrow(), "");
}

#[tokio::test(start_paused = true)]
async fn empty_content_keeps_waiting_for_first_token() {
    let transport = ScriptedTransport::new(vec![Script::Timed(vec![
        (0, "data: {\"content\":\"\"}\n"),
        (50, "data: {\"content\":\"Hi\"}\n"),
        (50, "data: [DONE]\n"),
    ])]);
    let mut session = session();
    let state = session.subscribe_state();

    let observer = async {
        sleep(Duration::from_millis(25)).await;
        let after_empty = *state.borrow();
        sleep(Duration::from_millis(50)).await;
        let after_text = *state.borrow();
        (after_empty, after_text)
    };

    let (reply, (after_empty, after_text)) =
        tokio::join!(session.submit(&transport, "hello"), observer);

    assert_eq!(after_empty, TurnState::WaitingForFirstToken);
    assert_eq!(after_text, TurnState::Streaming);
    assert_eq!(reply.unwrap().content, "Hi");
}

#[tokio::test(start_paused = true)]
async fn zero_typing_interval_still_commits_reply() {
    let transport = ScriptedTransport::new(vec![Script::Body(vec!["data: {\"content\":\"Hi\"}\n"])]);
    let mut session = ChatSession::new().with_typing_interval(Duration::ZERO);

    let reply = session.submit(&transport, "hello").await.unwrap();
    assert_eq!(reply.content, "Hi");
    assert_eq!(
        session.transcript(),
        &[Message::user("hello"), Message::assistant("Hi")]
    );
}

#[tokio::test(start_paused = true)]
async fn abandoned_turn_resets_before_next_turn() {
    let transport = ScriptedTransport::new(vec![
        Script::HangAfter(vec!["data: {\"content\":\"stale text\"}\n"]),
        Script::Body(vec!["data: {\"content\":\"fresh\"}\n"]),
    ]);
    let mut session = session();
    let display = session.subscribe_display();

    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), session.submit(&transport, "first")).await;
    assert!(abandoned.is_err());
    assert_eq!(session.state(), TurnState::Idle);
    assert_eq!(*display.borrow(), "");
    assert_eq!(session.transcript(), &[Message::user("first")]);

    let reply = session.submit(&transport, "second").await.unwrap();
    assert_eq!(reply.content, "fresh");
    assert_eq!(
        session.transcript(),
        &[
            Message::user("first"),
            Message::user("second"),
            Message::assistant("fresh"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn clear_starts_a_new_conversation() {
    let transport = ScriptedTransport::new(vec![
        Script::Body(vec!["data: {\"conversationId\":\"old\",\"content\":\"a\"}\n"]),
        Script::Body(vec!["data: {\"conversationId\":\"new\",\"content\":\"b\"}\n"]),
    ]);
    let mut session = session();

    session.submit(&transport, "one").await.unwrap();
    session.clear();
    assert_eq!(session.message_count(), 0);
    assert!(session.conversation_id().is_none());

    session.submit(&transport, "two").await.unwrap();
    assert_eq!(session.conversation_id().map(|id| id.as_str()), Some("new"));
    assert!(transport.requests()[1].conversation_id.is_none());
}

#[test]
fn only_idle_accepts_input() {
    assert!(TurnState::Idle.accepts_input());
    assert!(!TurnState::WaitingForFirstToken.accepts_input());
    assert!(!TurnState::Streaming.accepts_input());
    assert!(!TurnState::Committing.accepts_input());
}
