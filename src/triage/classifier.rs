//! Rule-based ticket classification.
//!
//! Keyword heuristics over the lowercased query assign a topic, sentiment,
//! and priority. Rule order matters: the first topic rule that matches
//! wins, so "how do I use the API" is How-to, not API/SDK.

use crate::types::{Classification, Priority, Sentiment, Topic};

/// Classify a ticket query.
pub fn classify(query: &str) -> Classification {
    let query = query.to_lowercase();

    let topic = if contains_any(&query, &["how", "steps", "guide"]) {
        Topic::HowTo
    } else if contains_any(&query, &["product", "feature"]) {
        Topic::Product
    } else if query.contains("best practice") {
        Topic::BestPractices
    } else if contains_any(&query, &["api", "sdk"]) {
        Topic::ApiSdk
    } else if contains_any(&query, &["sso", "single sign on"]) {
        Topic::Sso
    } else if query.contains("connector") {
        Topic::Connector
    } else if contains_any(&query, &["billing", "invoice"]) {
        Topic::Billing
    } else if query.contains("security") {
        Topic::Security
    } else {
        Topic::Other
    };

    let sentiment = if contains_any(&query, &["error", "issue", "fail"]) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let priority = if query.contains("urgent") {
        Priority::High
    } else {
        Priority::Normal
    };

    Classification {
        topic,
        sentiment,
        priority,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
