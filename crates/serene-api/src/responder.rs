//! Scripted replies for the wellness chat.
//!
//! The input is lowercased and checked against each rule's keywords in order;
//! the first rule with a substring hit wins.

use serene_types::models::Sentiment;

#[derive(Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: &'static str,
    pub sentiment: Sentiment,
    suggestions: &'static [&'static str],
}

impl Reply {
    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions.iter().map(|s| s.to_string()).collect()
    }
}

struct Rule {
    keywords: &'static [&'static str],
    reply: Reply,
}

static RULES: &[Rule] = &[
    Rule {
        keywords: &["stress", "anxious"],
        reply: Reply {
            text: "I'm sorry to hear you're feeling stressed. Would you like to try a quick \
                   breathing exercise to help you relax?",
            sentiment: Sentiment::Stress,
            suggestions: &["Try breathing exercise", "Show meditation"],
        },
    },
    Rule {
        keywords: &["sad", "down"],
        reply: Reply {
            text: "I understand feeling down can be difficult. Would you like to talk more about \
                   what's bothering you, or perhaps try a mood-lifting meditation?",
            sentiment: Sentiment::Sadness,
            suggestions: &["Talk more", "Mood-lifting meditation"],
        },
    },
    Rule {
        keywords: &["happy", "good"],
        reply: Reply {
            text: "I'm glad to hear you're feeling good! It's wonderful to experience positive \
                   emotions. Would you like to build on this feeling with a gratitude meditation?",
            sentiment: Sentiment::Happiness,
            suggestions: &["Gratitude meditation", "Journal this feeling"],
        },
    },
];

static FALLBACK: Reply = Reply {
    text: "Thank you for sharing. How else can I support you today?",
    sentiment: Sentiment::Neutral,
    suggestions: &["Explore meditations", "Track your mood"],
};

pub fn respond(message: &str) -> &'static Reply {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map(|rule| &rule.reply)
        .unwrap_or(&FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_keywords() {
        assert_eq!(respond("Work is so STRESSFUL").sentiment, Sentiment::Stress);
        assert_eq!(respond("I'm anxious about tomorrow").sentiment, Sentiment::Stress);
        assert_eq!(
            respond("stressed").suggestions(),
            ["Try breathing exercise", "Show meditation"]
        );
    }

    #[test]
    fn stress_outranks_everything_else() {
        assert_eq!(respond("I feel happy and stressed").sentiment, Sentiment::Stress);
        assert_eq!(respond("sad, down and anxious").sentiment, Sentiment::Stress);
        assert_eq!(respond("good but sad").sentiment, Sentiment::Sadness);
    }

    #[test]
    fn sadness_and_happiness() {
        let sad = respond("Feeling down today");
        assert_eq!(sad.sentiment, Sentiment::Sadness);
        assert_eq!(sad.suggestions(), ["Talk more", "Mood-lifting meditation"]);

        let happy = respond("I'm so Happy!");
        assert_eq!(happy.sentiment, Sentiment::Happiness);
        assert!(happy.text.starts_with("I'm glad to hear you're feeling good!"));
    }

    #[test]
    fn matches_are_substrings() {
        // "sadly" contains "sad", "goodbye" contains "good"
        assert_eq!(respond("sadly").sentiment, Sentiment::Sadness);
        assert_eq!(respond("goodbye").sentiment, Sentiment::Happiness);
    }

    #[test]
    fn everything_else_is_neutral() {
        let reply = respond("What's the weather like?");
        assert_eq!(reply.sentiment, Sentiment::Neutral);
        assert_eq!(reply.text, "Thank you for sharing. How else can I support you today?");
        assert_eq!(reply.suggestions(), ["Explore meditations", "Track your mood"]);
        assert_eq!(respond("").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn replies_are_deterministic() {
        assert_eq!(respond("stress"), respond("stress"));
        assert!(std::ptr::eq(respond("a"), respond("b")));
    }
}
