//! Coarse sentiment tag for assistant replies.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in this order; the first list with a hit decides.
const LEXICON: &[(Sentiment, &[&str])] = &[
    (
        Sentiment::Positive,
        &["help", "great", "welcome", "good", "hi", "thanks", "happy", "assist", "cheer", "support"],
    ),
    (
        Sentiment::Negative,
        &["sad", "sorry", "unhappy", "depressed", "upset", "miserable", "gloomy"],
    ),
    (
        Sentiment::Neutral,
        &["okay", "fine", "alright", "maybe", "perhaps", "possibly"],
    ),
];

/// Tag a reply by substring lookup.
#[must_use]
pub fn classify_sentiment(reply: &str) -> Sentiment {
    let lowered = reply.to_lowercase();
    LEXICON
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map_or(Sentiment::Neutral, |(sentiment, _)| *sentiment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sentiment() {
        assert_eq!(classify_sentiment("Happy to help!"), Sentiment::Positive);
        assert_eq!(classify_sentiment("So SORRY about that."), Sentiment::Negative);
        assert_eq!(classify_sentiment("Perhaps."), Sentiment::Neutral);
        assert_eq!(classify_sentiment("42"), Sentiment::Neutral);
    }

    #[test]
    fn test_positive_wins_over_negative() {
        assert_eq!(
            classify_sentiment("I'm sorry you're sad, but I'm here to help."),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(Sentiment::Positive.to_string(), "positive");
        assert_eq!(Sentiment::Negative.to_string(), Sentiment::Negative.as_str());
        assert_eq!(format!("sentiment: {}", Sentiment::Neutral), "sentiment: neutral");
    }
}
