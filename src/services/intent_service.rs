use regex::Regex;

const ITINERARY_KEYWORDS: [&str; 4] = ["itinerary", "travel plan", "trip plan", "schedule"];
const TIME_KEYWORDS: [&str; 4] = ["morning", "afternoon", "evening", "night"];

/// Whether an assistant reply reads as a finished, presentable day-by-day
/// plan rather than conversation filler or a clarifying question.
pub fn is_itinerary_reply(text: &str) -> bool {
    // A reply that is still asking for the budget is never a plan, even if it
    // happens to mention days or schedules while explaining itself.
    if asks_for_budget(text) {
        return false;
    }

    let day_marker = Regex::new(r"(?i)\bday\s+\d+").unwrap();
    if day_marker.is_match(text) {
        return true;
    }

    let lower = text.to_lowercase();
    let mentions_itinerary = ITINERARY_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let mentions_time = TIME_KEYWORDS.iter().any(|kw| lower.contains(kw));

    mentions_itinerary && mentions_time
}

fn asks_for_budget(text: &str) -> bool {
    let budget_question = Regex::new(
        r"(?i)(?:what(?:'s|\s+is)?\s+your\s+budget|(?:share|provide|know|tell\s+me)\s+your\s+budget|your\s+budget\s*\?|how\s+much\s+(?:is\s+your\s+budget|are\s+you\s+(?:willing|planning)\s+to\s+spend))",
    )
    .unwrap();

    budget_question.is_match(text)
}
