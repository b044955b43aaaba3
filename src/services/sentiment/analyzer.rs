//! Rule-based polarity model (VADER-style)
//!
//! Each token's lexicon valence is adjusted by preceding boosters, negations
//! within a three-token window, ALL-CAPS emphasis and "but" contrast. The sum
//! is amplified by trailing punctuation and normalized into [-1, 1] with
//! `s / sqrt(s^2 + ALPHA)`. Deterministic for a fixed lexicon.

use crate::services::sentiment::lexicon::Lexicon;

/// Normalization constant approximating the max expected sum
const ALPHA: f64 = 15.0;

/// Emphasis added to an ALL-CAPS word in mixed-case text
const CAPS_INCR: f64 = 0.733;

/// Scalar applied to a valence negated within the window
const NEGATION_SCALAR: f64 = -0.74;

const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCR: f64 = 0.18;
const MAX_QUESTION_BOOST: f64 = 0.96;

/// Per-comment polarity result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity {
    /// Normalized compound score in [-1, 1]
    pub compound: f64,
    /// Tokens that carried lexicon valence
    pub matched: usize,
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_upper(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic)
            && self.raw.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
    }
}

/// Scores text against a lexicon
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound polarity of `text`
    pub fn polarity(&self, text: &str) -> Polarity {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return Polarity { compound: 0.0, matched: 0 };
        }

        let upper_count = tokens.iter().filter(|t| t.is_upper()).count();
        let caps_differential = upper_count > 0 && upper_count < tokens.len();

        let mut valences = Vec::with_capacity(tokens.len());
        let mut matched = 0;
        for i in 0..tokens.len() {
            let valence = self.token_valence(&tokens, i, caps_differential);
            if valence != 0.0 {
                matched += 1;
            }
            valences.push(valence);
        }

        apply_but_contrast(&tokens, &mut valences);

        let mut sum: f64 = valences.iter().sum();
        if sum != 0.0 {
            let emphasis = punctuation_emphasis(text);
            sum += emphasis.copysign(sum);
        }

        Polarity { compound: normalize(sum), matched }
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        text.split_whitespace()
            .filter_map(|word| {
                let lower_word = word.to_lowercase();
                if self.lexicon.contains(&lower_word)
                    && !lower_word.chars().all(char::is_alphanumeric)
                {
                    // emoticon
                    return Some(Token { raw: word, lower: lower_word });
                }
                let stripped = word
                    .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .trim_matches('\'');
                if stripped.chars().count() <= 1 {
                    return None;
                }
                Some(Token { raw: stripped, lower: stripped.to_lowercase() })
            })
            .collect()
    }

    fn token_valence(&self, tokens: &[Token<'_>], i: usize, caps_differential: bool) -> f64 {
        let token = &tokens[i];

        if self.lexicon.booster(&token.lower).is_some() {
            return 0.0;
        }
        if token.lower == "kind" && tokens.get(i + 1).is_some_and(|t| t.lower == "of") {
            return 0.0;
        }
        let Some(mut valence) = self.lexicon.valence(&token.lower) else {
            return 0.0;
        };

        if caps_differential && token.is_upper() {
            valence += CAPS_INCR.copysign(valence);
        }

        for distance in 1..=3 {
            if i < distance {
                break;
            }
            let prev = &tokens[i - distance];
            if !self.lexicon.contains(&prev.lower) {
                let mut scalar = self.booster_scalar(prev, valence, caps_differential);
                if distance == 2 {
                    scalar *= 0.95;
                } else if distance == 3 {
                    scalar *= 0.9;
                }
                valence += scalar;
            }
            if self.lexicon.is_negation(&prev.lower) {
                valence *= NEGATION_SCALAR;
            }
        }

        valence
    }

    fn booster_scalar(&self, word: &Token<'_>, valence: f64, caps_differential: bool) -> f64 {
        let Some(mut scalar) = self.lexicon.booster(&word.lower) else {
            return 0.0;
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if caps_differential && word.is_upper() {
            scalar += CAPS_INCR.copysign(valence);
        }
        scalar
    }
}

/// Halve valences before "but", boost those after by half
fn apply_but_contrast(tokens: &[Token<'_>], valences: &mut [f64]) {
    let Some(but_index) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, valence) in valences.iter_mut().enumerate() {
        if i < but_index {
            *valence *= 0.5;
        } else if i > but_index {
            *valence *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_boost = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => MAX_QUESTION_BOOST,
    };
    exclamations as f64 * EXCLAMATION_INCR + question_boost
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
