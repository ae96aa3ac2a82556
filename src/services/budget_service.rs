use regex::Regex;

use crate::models::chat::{ChatTurn, Role};

/// Currency keyword followed by the amount: "budget is 5000", "₱5,000",
/// "php around 3k".
const KEYWORD_FIRST: &str =
    r"(?i)(?:budget|₱|php|pesos?)\s*(?:is|around|about|=|:)?\s*₱?\s*(\d[\d,]*(?:\.\d+)?)\s*(k|thousand)?\b";

/// Amount followed by the currency keyword: "5000 pesos", "5k budget".
const AMOUNT_FIRST: &str =
    r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k|thousand)?\b\s*(?:₱|php|pesos?|budget)";

/// Walks the conversation from the most recent user turn backward and returns
/// the first budget mention that parses. Assistant turns are never scanned, so
/// the bot quoting a price back at the user cannot set the budget.
pub fn detect_budget(history: &[ChatTurn]) -> Option<f64> {
    history
        .iter()
        .rev()
        .filter(|turn| turn.role == Role::User)
        .find_map(|turn| parse_budget_mention(&turn.content))
}

/// Budget amount mentioned in a single user message, if any. The keyword-first
/// pattern is tried before the amount-first pattern and short-circuits.
pub fn parse_budget_mention(text: &str) -> Option<f64> {
    let keyword_first = Regex::new(KEYWORD_FIRST).unwrap();
    let amount_first = Regex::new(AMOUNT_FIRST).unwrap();

    for pattern in [&keyword_first, &amount_first] {
        if let Some(caps) = pattern.captures(text) {
            let digits = caps.get(1)?.as_str().replace(',', "");
            if let Ok(mut amount) = digits.parse::<f64>() {
                if caps.get(2).is_some() {
                    amount *= 1000.0;
                }
                return Some(amount);
            }
        }
    }

    None
}
