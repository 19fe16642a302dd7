use serde::{Deserialize, Serialize};

use super::domain::DailyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaKind {
    ScreenOverloaded,
    BurntOut,
    SleepDeprived,
    Sedentary,
    Balanced,
}

impl PersonaKind {
    pub const fn key(self) -> &'static str {
        match self {
            PersonaKind::ScreenOverloaded => "screen-overloaded",
            PersonaKind::BurntOut => "burnt-out",
            PersonaKind::SleepDeprived => "sleep-deprived",
            PersonaKind::Sedentary => "sedentary",
            PersonaKind::Balanced => "balanced",
        }
    }

    const fn profile(self) -> &'static PersonaProfile {
        match self {
            PersonaKind::ScreenOverloaded => &SCREEN_OVERLOADED,
            PersonaKind::BurntOut => &BURNT_OUT,
            PersonaKind::SleepDeprived => &SLEEP_DEPRIVED,
            PersonaKind::Sedentary => &SEDENTARY,
            PersonaKind::Balanced => &BALANCED,
        }
    }
}

struct PersonaProfile {
    emoji: &'static str,
    title: &'static str,
    message: &'static str,
    color: &'static str,
    tips: [&'static str; 3],
}

const SCREEN_OVERLOADED: PersonaProfile = PersonaProfile {
    emoji: "📱",
    title: "Screen-Overloaded Student",
    message: "Your screen time is higher than recommended. Let's find a healthy balance!",
    color: "#f59e0b",
    tips: [
        "Try the 20-20-20 rule: every 20 minutes, look 20 feet away for 20 seconds",
        "Set screen-free hours before bed",
        "Use a digital wellbeing app to track usage",
    ],
};

const BURNT_OUT: PersonaProfile = PersonaProfile {
    emoji: "😰",
    title: "You Might Be Feeling Burnt Out",
    message: "High stress and too little sleep wear you down. Let's take care of you!",
    color: "#ef4444",
    tips: [
        "Practice deep breathing for 5 minutes daily",
        "Break study sessions into 25-minute blocks",
        "Talk to your counselor, they are here to help",
    ],
};

const SLEEP_DEPRIVED: PersonaProfile = PersonaProfile {
    emoji: "😴",
    title: "Sleep-Deprived Student",
    message: "Quality sleep is essential for learning and health. Let's improve your sleep routine!",
    color: "#8b5cf6",
    tips: [
        "Go to bed at the same time every night",
        "Avoid screens for an hour before sleep",
        "Build a relaxing bedtime routine",
    ],
};

const SEDENTARY: PersonaProfile = PersonaProfile {
    emoji: "🪑",
    title: "Time to Get Moving!",
    message: "Regular activity boosts mood, energy and focus. Let's get active!",
    color: "#10b981",
    tips: [
        "Start with a 15-minute walk every day",
        "Stretch at your desk once an hour",
        "Join a sport or dance class",
    ],
};

const BALANCED: PersonaProfile = PersonaProfile {
    emoji: "✨",
    title: "You're Doing Great!",
    message: "Your wellness habits are balanced. Keep up the excellent work!",
    color: "#06b6d4",
    tips: [
        "Keep your current healthy routine",
        "Help friends build healthy habits too",
        "Keep tracking to stay aware",
    ],
};

/// Classified archetype with its static display content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaResult {
    pub kind: PersonaKind,
    pub emoji: String,
    pub title: String,
    pub message: String,
    pub color: String,
    pub tips: Vec<String>,
}

impl From<PersonaKind> for PersonaResult {
    fn from(kind: PersonaKind) -> Self {
        let profile = kind.profile();
        Self {
            kind,
            emoji: profile.emoji.to_string(),
            title: profile.title.to_string(),
            message: profile.message.to_string(),
            color: profile.color.to_string(),
            tips: profile.tips.iter().map(|tip| tip.to_string()).collect(),
        }
    }
}

struct PersonaRule {
    kind: PersonaKind,
    matches: fn(&DailyRecord) -> bool,
}

fn screen_overloaded(record: &DailyRecord) -> bool {
    record.screen() > 6.0
}

fn burnt_out(record: &DailyRecord) -> bool {
    (record.stress() >= 4 || record.pressure() >= 4) && record.sleep() < 7.0
}

fn sleep_deprived(record: &DailyRecord) -> bool {
    record.sleep() < 6.5
}

fn sedentary(record: &DailyRecord) -> bool {
    record.activity_days() < 3
}

/// Priority order, not alphabetical: a student who is both screen-overloaded and burnt out is
/// reported as screen-overloaded. Anything unmatched falls through to `Balanced`.
const PERSONA_RULES: [PersonaRule; 4] = [
    PersonaRule {
        kind: PersonaKind::ScreenOverloaded,
        matches: screen_overloaded,
    },
    PersonaRule {
        kind: PersonaKind::BurntOut,
        matches: burnt_out,
    },
    PersonaRule {
        kind: PersonaKind::SleepDeprived,
        matches: sleep_deprived,
    },
    PersonaRule {
        kind: PersonaKind::Sedentary,
        matches: sedentary,
    },
];

pub fn classify(record: &DailyRecord) -> PersonaKind {
    PERSONA_RULES
        .iter()
        .find(|rule| (rule.matches)(record))
        .map(|rule| rule.kind)
        .unwrap_or(PersonaKind::Balanced)
}

pub fn detect_persona(record: &DailyRecord) -> PersonaResult {
    PersonaResult::from(classify(record))
}
