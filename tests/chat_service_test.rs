mod common;

use buenavista_api::models::chat::{ChatTurn, Role};
use buenavista_api::services::chat_service::{
    build_prompt, merge_history, ChatError, ITINERARY_MARKER, MAX_HISTORY_TURNS,
};

use common::{catalog, test_orchestrator, FakeModel, FakeReference};

fn plan_reply() -> String {
    format!(
        "Day 1: Visit Example Cove at 9am. Day 2: Visit Example Falls in the afternoon. {}",
        ITINERARY_MARKER
    )
}

#[actix_rt::test]
async fn test_no_budget_means_no_add_button() {
    // Scenario 1: even a complete-looking plan is not offerable without a
    // known budget.
    let orchestrator = test_orchestrator(
        FakeModel::replying(&plan_reply()),
        FakeReference::with_spots(catalog()),
    );

    let response = orchestrator
        .respond("I want to visit the beach", &[])
        .await
        .unwrap();

    assert_eq!(response.detected_budget, None);
    assert!(!response.show_add_button);
    assert!(response.mentioned_spots.is_none());
}

#[actix_rt::test]
async fn test_finished_plan_with_budget_offers_add_button() {
    // Scenario 2.
    let orchestrator = test_orchestrator(
        FakeModel::replying(&plan_reply()),
        FakeReference::with_spots(catalog()),
    );

    let history = vec![
        ChatTurn::user("My budget is ₱10,000"),
        ChatTurn::assistant("Great! Where would you like to go?"),
    ];
    let response = orchestrator
        .respond("Please plan my two days", &history)
        .await
        .unwrap();

    assert_eq!(response.detected_budget, Some(10000.0));
    assert!(response.show_add_button);
    assert!(!response.message.contains(ITINERARY_MARKER));

    let spots = response.mentioned_spots.expect("day/spot map expected");
    assert_eq!(spots[&1].len(), 1);
    assert_eq!(spots[&1][0].title, "Example Cove");
    assert_eq!(spots[&1][0].time, "09:00");
    assert_eq!(spots[&2][0].title, "Example Falls");
    assert_eq!(spots[&2][0].time, "14:00");
}

#[actix_rt::test]
async fn test_spot_without_coordinates_is_silently_dropped() {
    // Scenario 3: Example Falls loses its coordinates.
    let mut spots = catalog();
    for spot in &mut spots {
        if spot.id == "falls-1" {
            spot.lat = None;
            spot.lng = None;
        }
    }

    let orchestrator = test_orchestrator(
        FakeModel::replying(&plan_reply()),
        FakeReference::with_spots(spots),
    );

    let history = vec![ChatTurn::user("My budget is ₱10,000")];
    let response = orchestrator.respond("Plan it!", &history).await.unwrap();

    assert!(response.show_add_button);
    let day_spots = response.mentioned_spots.unwrap();
    assert_eq!(day_spots[&1][0].title, "Example Cove");
    assert!(!day_spots.contains_key(&2));
}

#[actix_rt::test]
async fn test_marker_is_stripped_even_when_button_is_hidden() {
    // Scenario 4: budget unknown, marker present in the raw reply.
    let orchestrator = test_orchestrator(
        FakeModel::replying(&plan_reply()),
        FakeReference::with_spots(catalog()),
    );

    let response = orchestrator.respond("Plan it!", &[]).await.unwrap();

    assert!(!response.show_add_button);
    assert!(!response.message.contains(ITINERARY_MARKER));
    assert!(response.message.contains("Day 1"));
}

#[actix_rt::test]
async fn test_empty_reply_after_stripping_is_a_generation_failure() {
    // Scenario 5.
    let orchestrator = test_orchestrator(
        FakeModel::replying(&format!("  {}  ", ITINERARY_MARKER)),
        FakeReference::with_spots(catalog()),
    );

    let result = orchestrator.respond("Plan it!", &[]).await;
    assert!(matches!(result, Err(ChatError::EmptyReply)));
}

#[actix_rt::test]
async fn test_model_failure_is_a_generation_failure() {
    let orchestrator =
        test_orchestrator(FakeModel::failing(), FakeReference::with_spots(catalog()));

    let result = orchestrator.respond("Plan it!", &[]).await;
    assert!(matches!(result, Err(ChatError::Generation(_))));
}

#[actix_rt::test]
async fn test_marker_without_plan_shape_keeps_button_hidden() {
    // Model misfires and emits the marker on a reply that is not a plan.
    let orchestrator = test_orchestrator(
        FakeModel::replying(&format!("Sounds fun! {}", ITINERARY_MARKER)),
        FakeReference::with_spots(catalog()),
    );

    let history = vec![ChatTurn::user("budget 5000")];
    let response = orchestrator.respond("Let's go!", &history).await.unwrap();

    assert_eq!(response.detected_budget, Some(5000.0));
    assert!(!response.show_add_button);
    assert!(response.mentioned_spots.is_none());
}

#[actix_rt::test]
async fn test_zero_budget_does_not_unlock_the_button() {
    let orchestrator = test_orchestrator(
        FakeModel::replying(&plan_reply()),
        FakeReference::with_spots(catalog()),
    );

    let history = vec![ChatTurn::user("budget 0")];
    let response = orchestrator.respond("Plan it!", &history).await.unwrap();

    assert_eq!(response.detected_budget, Some(0.0));
    assert!(!response.show_add_button);
}

#[actix_rt::test]
async fn test_empty_catalog_degrades_gracefully() {
    let orchestrator =
        test_orchestrator(FakeModel::replying(&plan_reply()), FakeReference::default());

    let history = vec![ChatTurn::user("budget 5000")];
    let response = orchestrator.respond("Plan it!", &history).await.unwrap();

    // Plan shape and budget hold, there is just nothing to extract.
    assert!(response.show_add_button);
    assert!(response.mentioned_spots.unwrap().is_empty());
}

#[test]
fn test_merge_replaces_trailing_user_turn() {
    let history = vec![
        ChatTurn::assistant("Hello!"),
        ChatTurn::user("old draft of my message"),
    ];

    let window = merge_history(&history, "final message");

    assert_eq!(window.len(), 2);
    assert_eq!(window[1].role, Role::User);
    assert_eq!(window[1].content, "final message");
}

#[test]
fn test_merge_appends_after_assistant_turn() {
    let history = vec![ChatTurn::assistant("Hello!")];

    let window = merge_history(&history, "hi there");

    assert_eq!(window.len(), 2);
    assert_eq!(window[1].content, "hi there");
}

#[test]
fn test_window_keeps_only_most_recent_turns() {
    let mut history = Vec::new();
    for i in 0..20 {
        history.push(ChatTurn::user(format!("message {}", i)));
        history.push(ChatTurn::assistant(format!("reply {}", i)));
    }

    let window = merge_history(&history, "latest");

    assert_eq!(window.len(), MAX_HISTORY_TURNS);
    assert_eq!(window.last().unwrap().content, "latest");
    assert_eq!(window.first().unwrap().content, "reply 14");
}

#[test]
fn test_prompt_carries_context_and_rules() {
    let window = vec![ChatTurn::user("hello")];
    let prompt = build_prompt(&window, Some(5000.0), &catalog(), &[]);

    assert!(prompt.contains(ITINERARY_MARKER));
    assert!(prompt.contains("Example Cove"));
    assert!(prompt.contains("₱5000"));
    assert!(prompt.contains("User: hello"));
    assert!(prompt.ends_with("Assistant:"));

    let prompt = build_prompt(&window, None, &[], &[]);
    assert!(prompt.contains("has not shared a budget"));
    assert!(prompt.contains("(no spot data available)"));
}
