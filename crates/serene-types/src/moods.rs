use serde::Serialize;

/// An entry in the fixed mood catalog offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mood {
    pub id: &'static str,
    pub emoji: &'static str,
    pub label: &'static str,
}

pub const MOODS: &[Mood] = &[
    Mood { id: "great", emoji: "\u{1F604}", label: "Great" },
    Mood { id: "good", emoji: "\u{1F642}", label: "Good" },
    Mood { id: "okay", emoji: "\u{1F610}", label: "Okay" },
    Mood { id: "down", emoji: "\u{1F614}", label: "Down" },
    Mood { id: "stressed", emoji: "\u{1F630}", label: "Stressed" },
];

pub fn find(id: &str) -> Option<&'static Mood> {
    MOODS.iter().find(|m| m.id == id)
}
