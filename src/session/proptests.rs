//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::protocol::{IncomingReply, OrderDetails, OutgoingRequest, Product};
use crate::render::RenderInstruction;
use crate::transport::TransportError;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Apply an event the way the runtime does, collecting renders and requests
fn apply(
    status: &mut SessionStatus,
    history: &mut History,
    event: Event,
    renders: &mut Vec<RenderInstruction>,
    requests: &mut Vec<OutgoingRequest>,
) -> Result<(), TransitionError> {
    let result = transition(status, history, event)?;
    *status = result.new_status;
    for effect in result.effects {
        match effect {
            Effect::AppendTurn(turn) => history.push(turn),
            Effect::Render(instruction) => renders.push(instruction),
            Effect::SendRequest(request) => requests.push(request),
        }
    }
    Ok(())
}

fn is_pending_marker(instruction: &RenderInstruction) -> bool {
    matches!(
        instruction,
        RenderInstruction::ShowPending | RenderInstruction::HidePending
    )
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_history() -> impl Strategy<Value = History> {
    proptest::collection::vec(
        (any::<bool>(), "[a-zA-Z0-9 ]{1,20}").prop_map(|(is_user, text)| {
            if is_user {
                Turn::user(text)
            } else {
                Turn::bot(text)
            }
        }),
        0..6,
    )
    .prop_map(|turns| {
        let mut history = History::new();
        for turn in turns {
            history.push(turn);
        }
        history
    })
}

/// Text with at least one visible character, possibly padded with whitespace
fn arb_valid_text() -> impl Strategy<Value = String> {
    ("[ \t\n]{0,3}", "[a-zA-Z0-9?!][a-zA-Z0-9 ?!]{0,30}", "[ \t\n]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_product() -> impl Strategy<Value = Product> {
    ("[a-zA-Z ]{1,20}", 0u32..100_000).prop_map(|(title, cents)| {
        Product::new(title, f64::from(cents) / 100.0)
    })
}

fn arb_reply() -> impl Strategy<Value = IncomingReply> {
    prop_oneof![
        "[a-zA-Z0-9 !]{0,40}".prop_map(|message| IncomingReply::Chat { message }),
        (
            "[a-zA-Z0-9 :]{0,40}",
            proptest::collection::vec(arb_product(), 0..5)
        )
            .prop_map(|(message, products)| IncomingReply::Product { message, products }),
        "[a-zA-Z0-9 ?]{0,40}".prop_map(|message| IncomingReply::OrderRequest { message }),
        ("[a-z]{1,12}", proptest::option::of("[A-Z0-9]{6,12}")).prop_map(
            |(status, tracking_number)| IncomingReply::Order {
                order_details: OrderDetails {
                    status,
                    tracking_number,
                },
            }
        ),
        "[a-zA-Z0-9 .]{0,40}".prop_map(|message| IncomingReply::Error { message }),
    ]
}

fn arb_transport_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(TransportError::Network),
        (400u16..600).prop_map(|status| TransportError::Protocol { status }),
        "[a-z ]{1,20}".prop_map(TransportError::Decode),
    ]
}

fn arb_completion() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_reply().prop_map(|reply| Event::ReplyReceived { reply }),
        arb_transport_error().prop_map(|error| Event::TransportFailed { error }),
    ]
}

fn arb_any_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_valid_text().prop_map(Event::submit),
        arb_blank_text().prop_map(Event::submit),
        arb_completion(),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Valid text while idle appends exactly one user turn and starts a request
    #[test]
    fn prop_valid_submit_appends_one_user_turn(history in arb_history(), text in arb_valid_text()) {
        let mut status = SessionStatus::Idle;
        let mut after = history.clone();
        let (mut renders, mut requests) = (vec![], vec![]);

        apply(&mut status, &mut after, Event::submit(text.clone()), &mut renders, &mut requests).unwrap();

        prop_assert_eq!(status, SessionStatus::AwaitingReply);
        prop_assert_eq!(after.turns().len(), history.turns().len() + 1);
        prop_assert_eq!(after.turns().last().unwrap(), &Turn::user(text.trim()));
        prop_assert_eq!(renders, vec![RenderInstruction::ShowPending]);

        // The request carries the prior history only
        prop_assert_eq!(requests.len(), 1);
        prop_assert_eq!(&requests[0].message, text.trim());
        prop_assert_eq!(&requests[0].history, &history.snapshot());
    }

    /// Blank text never changes anything
    #[test]
    fn prop_blank_submit_is_rejected(history in arb_history(), text in arb_blank_text()) {
        let result = transition(&SessionStatus::Idle, &history, Event::submit(text));
        prop_assert!(matches!(result, Err(TransitionError::Rejected(Rejected::EmptyMessage))));
    }

    /// Any submit while a reply is pending is rejected
    #[test]
    fn prop_submit_while_awaiting_is_rejected(
        history in arb_history(),
        text in prop_oneof![arb_valid_text(), arb_blank_text()],
    ) {
        let result = transition(&SessionStatus::AwaitingReply, &history, Event::submit(text));
        prop_assert!(matches!(result, Err(TransitionError::Rejected(Rejected::Busy))));
    }

    /// Completion always hides the indicator first and exactly once
    #[test]
    fn prop_completion_hides_pending_first(history in arb_history(), event in arb_completion()) {
        let result = transition(&SessionStatus::AwaitingReply, &history, event).unwrap();

        prop_assert_eq!(result.new_status, SessionStatus::Idle);
        prop_assert_eq!(result.effects.first(), Some(&Effect::hide_pending()));

        let markers: Vec<_> = result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Render(instruction) if is_pending_marker(instruction) => Some(instruction),
                _ => None,
            })
            .collect();
        prop_assert_eq!(markers, vec![&RenderInstruction::HidePending]);
        prop_assert!(!result.effects.iter().any(|e| matches!(e, Effect::SendRequest(_))));
    }

    /// Chat text is recorded exactly as received
    #[test]
    fn prop_chat_reply_round_trips_into_history(message in "[a-zA-Z0-9 !?.]{0,60}") {
        let result = transition(
            &SessionStatus::AwaitingReply,
            &History::new(),
            Event::ReplyReceived { reply: IncomingReply::chat(message.clone()) },
        )
        .unwrap();

        let appended: Vec<_> = result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::AppendTurn(turn) => Some(turn.clone()),
                _ => None,
            })
            .collect();
        prop_assert_eq!(appended, vec![Turn::bot(message)]);
    }

    /// Error replies and transport failures never enter the history
    #[test]
    fn prop_errors_never_recorded(
        history in arb_history(),
        event in prop_oneof![
            "[a-zA-Z ]{0,30}".prop_map(|message| Event::ReplyReceived { reply: IncomingReply::Error { message } }),
            arb_transport_error().prop_map(|error| Event::TransportFailed { error }),
        ],
    ) {
        let result = transition(&SessionStatus::AwaitingReply, &history, event).unwrap();
        prop_assert!(!result.effects.iter().any(|e| matches!(e, Effect::AppendTurn(_))));
    }

    /// Over any event sequence the indicator is visible exactly while busy,
    /// and the history only ever grows
    #[test]
    fn prop_pending_tracks_status(events in proptest::collection::vec(arb_any_event(), 0..40)) {
        let mut status = SessionStatus::Idle;
        let mut history = History::new();
        let (mut renders, mut requests) = (vec![], vec![]);
        let mut visible = false;

        for event in events {
            let before_status = status;
            let before_history = history.clone();
            let seen = renders.len();

            match apply(&mut status, &mut history, event, &mut renders, &mut requests) {
                Ok(()) => {
                    for instruction in &renders[seen..] {
                        match instruction {
                            RenderInstruction::ShowPending => {
                                prop_assert!(!visible);
                                visible = true;
                            }
                            RenderInstruction::HidePending => {
                                prop_assert!(visible);
                                visible = false;
                            }
                            // Nothing is drawn while the indicator is up
                            _ => {
                                prop_assert!(!visible);
                            }
                        }
                    }
                    prop_assert!(history.turns().starts_with(before_history.turns()));
                }
                Err(_) => {
                    prop_assert_eq!(status, before_status);
                    prop_assert_eq!(&history, &before_history);
                    prop_assert_eq!(renders.len(), seen);
                }
            }

            prop_assert_eq!(visible, status.is_busy());
        }

        let shows = renders.iter().filter(|r| **r == RenderInstruction::ShowPending).count();
        prop_assert_eq!(shows, requests.len());
    }
}
