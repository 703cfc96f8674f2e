//! Captcha challenge kinds, payloads and answer predicates

use serde::Serialize;

use crate::random::RandomSource;

/// Closed set of challenge kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptchaKind {
    DistortedText,
    ReverseText,
    Math,
    Philosophy,
    EmotionGrid,
    /// Symbolic math; offered from difficulty 2
    ImpossibleMath,
    /// Colour-word Stroop test; offered from difficulty 3
    ColorBlind,
}

impl CaptchaKind {
    /// Kinds available at a difficulty
    pub fn available(difficulty: f32) -> Vec<CaptchaKind> {
        let mut kinds = vec![
            CaptchaKind::DistortedText,
            CaptchaKind::ReverseText,
            CaptchaKind::Math,
            CaptchaKind::Philosophy,
            CaptchaKind::EmotionGrid,
        ];
        if difficulty >= 2.0 {
            kinds.push(CaptchaKind::ImpossibleMath);
        }
        if difficulty >= 3.0 {
            kinds.push(CaptchaKind::ColorBlind);
        }
        kinds
    }

    /// Uniformly choose an available kind
    pub fn choose<R: RandomSource>(difficulty: f32, rng: &mut R) -> CaptchaKind {
        *rng.pick(&Self::available(difficulty))
    }
}

pub const DISTORTED_TEXTS: [&str; 6] = ["Wq7Kp2", "xL9mNz", "aB3cD4", "hJ5kL6", "mN7pQ8", "rS9tU0"];

pub const PHILOSOPHY_QUESTIONS: [(&str, &[&str]); 5] = [
    ("Is a hot dog a sandwich?", &["yes", "no"]),
    (
        "If you replace all parts of a ship, is it still the same ship?",
        &["yes", "no", "maybe"],
    ),
    (
        "Does the color blue look the same to everyone?",
        &["yes", "no", "unknowable"],
    ),
    ("Can you step in the same river twice?", &["yes", "no"]),
    (
        "If a tree falls and no one hears it, does it make a sound?",
        &["yes", "no"],
    ),
];

pub const EMOTIONS: [&str; 9] = [
    "existential dread",
    "mild anxiety",
    "suburban ennui",
    "cosmic horror",
    "Tuesday feeling",
    "void",
    "meh",
    "impending doom",
    "quiet desperation",
];

pub const SYMBOLIC_FORMULAS: [(&str, &str); 5] = [
    ("∫ e^x dx = ?", "e^x"),
    ("d/dx(sin x) = ?", "cos x"),
    ("lim(x→∞) 1/x = ?", "0"),
    ("√-1 = ?", "i"),
    ("0! = ?", "1"),
];

/// Stroop test colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        }
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Challenge {
    Text {
        text: &'static str,
    },
    Reversed {
        text: &'static str,
        reversed: String,
    },
    Math {
        question: String,
        answer: String,
    },
    Philosophy {
        question: &'static str,
        answers: &'static [&'static str],
    },
    EmotionGrid {
        emotions: Vec<&'static str>,
        correct_cells: [usize; 2],
    },
    /// The word `word_color` rendered in ink `text_color`; the ink is the answer
    ColorBlind {
        text_color: Color,
        word_color: Color,
    },
}

/// What the user submitted
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    /// Selected emotion-grid cells
    Cells(Vec<usize>),
}

impl Answer {
    pub fn text(s: impl Into<String>) -> Self {
        Answer::Text(s.into())
    }
}

/// Arithmetic by difficulty: addition, then multiplication, then symbolic
pub fn generate_math<R: RandomSource>(difficulty: f32, rng: &mut R) -> Challenge {
    if difficulty < 2.0 {
        let a = 1 + rng.index(20);
        let b = 1 + rng.index(20);
        Challenge::Math {
            question: format!("{} + {} = ?", a, b),
            answer: (a + b).to_string(),
        }
    } else if difficulty < 3.0 {
        let a = 1 + rng.index(12);
        let b = 1 + rng.index(12);
        Challenge::Math {
            question: format!("{} × {} = ?", a, b),
            answer: (a * b).to_string(),
        }
    } else {
        generate_symbolic(rng)
    }
}

pub fn generate_symbolic<R: RandomSource>(rng: &mut R) -> Challenge {
    let (question, answer) = *rng.pick(&SYMBOLIC_FORMULAS);
    Challenge::Math {
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

/// Build the payload for a kind
pub fn generate<R: RandomSource>(kind: CaptchaKind, difficulty: f32, rng: &mut R) -> Challenge {
    match kind {
        CaptchaKind::DistortedText => Challenge::Text {
            text: *rng.pick(&DISTORTED_TEXTS),
        },
        CaptchaKind::ReverseText => {
            let text = *rng.pick(&DISTORTED_TEXTS);
            Challenge::Reversed {
                text,
                reversed: text.chars().rev().collect(),
            }
        }
        CaptchaKind::Math => generate_math(difficulty, rng),
        CaptchaKind::ImpossibleMath => generate_symbolic(rng),
        CaptchaKind::Philosophy => {
            let (question, answers) = *rng.pick(&PHILOSOPHY_QUESTIONS);
            Challenge::Philosophy { question, answers }
        }
        CaptchaKind::EmotionGrid => {
            let correct_cells = [rng.index(EMOTIONS.len()), rng.index(EMOTIONS.len())];
            Challenge::EmotionGrid {
                emotions: shuffled(&EMOTIONS, rng),
                correct_cells,
            }
        }
        CaptchaKind::ColorBlind => Challenge::ColorBlind {
            text_color: *rng.pick(&Color::ALL),
            word_color: *rng.pick(&Color::ALL),
        },
    }
}

/// Fisher-Yates over the injected source
fn shuffled<T: Copy, R: RandomSource>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.index(i + 1);
        out.swap(i, j);
    }
    out
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

impl Challenge {
    /// Whether an answer satisfies this challenge
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (Challenge::Text { text }, Answer::Text(input)) => normalize(input) == text.to_lowercase(),
            (Challenge::Reversed { reversed, .. }, Answer::Text(input)) => {
                normalize(input) == reversed.to_lowercase()
            }
            (Challenge::Math { answer, .. }, Answer::Text(input)) => {
                strip_whitespace(input) == strip_whitespace(answer)
            }
            (Challenge::Philosophy { answers, .. }, Answer::Text(input)) => {
                let input = normalize(input);
                answers.iter().any(|a| *a == input)
            }
            // Nobody can find the dread; any honest attempt passes
            (Challenge::EmotionGrid { .. }, Answer::Cells(cells)) => !cells.is_empty(),
            (Challenge::ColorBlind { text_color, .. }, Answer::Text(input)) => {
                normalize(input) == text_color.as_str()
            }
            _ => false,
        }
    }

    /// An answer this challenge accepts (used by the headless demo bot)
    pub fn solution(&self) -> Answer {
        match self {
            Challenge::Text { text } => Answer::text(*text),
            Challenge::Reversed { reversed, .. } => Answer::text(reversed.clone()),
            Challenge::Math { answer, .. } => Answer::text(answer.clone()),
            Challenge::Philosophy { answers, .. } => {
                Answer::text(answers.first().copied().unwrap_or_default())
            }
            Challenge::EmotionGrid { correct_cells, .. } => Answer::Cells(vec![correct_cells[0]]),
            Challenge::ColorBlind { text_color, .. } => Answer::text(text_color.as_str()),
        }
    }
}
