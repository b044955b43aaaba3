//! Polarity lexicon for the rule-based sentiment model
//!
//! Valences follow the VADER convention: roughly -4 (most negative) to +4
//! (most positive). The built-in table covers the vocabulary that dominates
//! trailer comments; a full VADER lexicon file can be merged on top.

use anyhow::Context;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Scalar added or removed by booster words
pub const BOOST_INCR: f64 = 0.293;
pub const BOOST_DECR: f64 = -0.293;

const BUILTIN_VALENCES: &[(&str, f64)] = &[
    // strong positive
    ("amazing", 2.8), ("awesome", 3.1), ("best", 3.2), ("brilliant", 2.8),
    ("excellent", 2.7), ("fantastic", 2.6), ("incredible", 2.2), ("masterpiece", 3.1),
    ("outstanding", 3.0), ("perfect", 2.7), ("phenomenal", 2.9), ("superb", 3.1),
    ("wonderful", 2.7), ("epic", 2.2), ("legendary", 2.4), ("stunning", 2.3),
    ("breathtaking", 2.6), ("spectacular", 2.8), ("magnificent", 3.0), ("flawless", 2.3),
    // positive
    ("love", 3.2), ("loved", 2.9), ("loves", 2.7), ("loving", 2.9), ("lovely", 2.8),
    ("like", 1.5), ("liked", 1.8), ("likes", 1.8), ("good", 1.9), ("great", 3.1),
    ("nice", 1.8), ("cool", 1.3), ("fun", 2.3), ("funny", 1.9), ("happy", 2.7),
    ("enjoy", 2.2), ("enjoyed", 2.3), ("beautiful", 2.9), ("excited", 1.4),
    ("exciting", 2.2), ("hype", 1.1), ("hyped", 1.2), ("favorite", 2.0), ("favourite", 2.0),
    ("win", 2.8), ("wins", 2.7), ("winner", 2.8), ("glad", 2.0), ("impressive", 2.3),
    ("interesting", 1.7), ("entertaining", 1.9), ("hilarious", 1.7), ("thrilled", 2.1),
    ("thrilling", 2.1), ("worth", 0.9), ("recommend", 1.5), ("classic", 1.2),
    ("respect", 2.1), ("proud", 2.1), ("yes", 1.7), ("wow", 2.8), ("yay", 2.4),
    ("chills", 1.0), ("goosebumps", 1.2), ("iconic", 1.6), ("solid", 1.1),
    ("better", 1.9), ("fine", 0.8), ("okay", 0.9), ("ok", 0.9), ("thanks", 1.9),
    ("thank", 1.5), ("hope", 1.9), ("hopefully", 1.7), ("lol", 1.8), ("haha", 2.0),
    ("cute", 2.0), ("sweet", 2.0), ("strong", 2.3), ("smart", 1.7), ("genius", 1.9),
    ("well", 1.1), ("free", 2.3), ("ready", 1.5),
    // mild negative
    ("meh", -0.3), ("boring", -1.3), ("bored", -1.1), ("dull", -1.7), ("weird", -0.7),
    ("confusing", -1.4), ("confused", -1.3), ("slow", -0.5), ("lame", -1.8),
    ("cringe", -1.6), ("cringy", -1.6), ("mediocre", -1.0), ("forgettable", -1.2),
    ("overrated", -1.4), ("predictable", -0.6), ("bland", -1.3), ("generic", -0.9),
    ("sad", -2.1), ("miss", -0.6), ("missed", -1.2), ("worried", -1.2), ("worry", -1.9),
    ("doubt", -1.5), ("problem", -1.7), ("problems", -1.7), ("mess", -1.5),
    ("cheap", -0.6), ("fake", -2.1), ("lazy", -1.5), ("tired", -1.9), ("unfortunately", -1.6),
    // strong negative
    ("bad", -2.5), ("worse", -2.1), ("worst", -3.1), ("terrible", -2.1), ("horrible", -2.5),
    ("awful", -2.0), ("hate", -2.7), ("hated", -3.2), ("hates", -1.9), ("trash", -1.5),
    ("garbage", -1.3), ("sucks", -1.5), ("suck", -1.9), ("stupid", -2.4), ("disappointing", -2.2),
    ("disappointed", -1.9), ("disappointment", -2.3), ("ruined", -2.2), ("ruin", -2.0),
    ("waste", -1.8), ("wasted", -2.2), ("pathetic", -2.6), ("disaster", -3.1),
    ("flop", -1.4), ("annoying", -1.7), ("angry", -2.3), ("ugly", -2.3), ("poor", -2.1),
    ("failed", -2.3), ("fail", -2.5), ("fails", -1.8), ("failure", -2.3), ("kill", -3.7),
    ("killed", -3.5), ("dead", -3.3), ("die", -2.9), ("died", -2.6), ("evil", -3.4),
    ("disgusting", -2.4), ("cancel", -1.0), ("cancelled", -1.0), ("woke", -0.6),
    ("no", -1.2), ("wtf", -2.8), ("ugh", -1.8),
    // emoticons
    (":)", 2.0), (":-)", 1.8), (":d", 2.3), ("<3", 1.9), (":(", -1.9), (":-(", -1.5),
    (":/", -1.4), ("xd", 1.5),
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCR), ("amazingly", BOOST_INCR), ("awfully", BOOST_INCR),
    ("completely", BOOST_INCR), ("considerably", BOOST_INCR), ("deeply", BOOST_INCR),
    ("enormously", BOOST_INCR), ("entirely", BOOST_INCR), ("especially", BOOST_INCR),
    ("exceptionally", BOOST_INCR), ("extremely", BOOST_INCR), ("fully", BOOST_INCR),
    ("greatly", BOOST_INCR), ("hella", BOOST_INCR), ("highly", BOOST_INCR),
    ("hugely", BOOST_INCR), ("incredibly", BOOST_INCR), ("insanely", BOOST_INCR),
    ("intensely", BOOST_INCR), ("literally", BOOST_INCR), ("majorly", BOOST_INCR),
    ("more", BOOST_INCR), ("most", BOOST_INCR), ("particularly", BOOST_INCR),
    ("purely", BOOST_INCR), ("quite", BOOST_INCR), ("really", BOOST_INCR),
    ("remarkably", BOOST_INCR), ("so", BOOST_INCR), ("super", BOOST_INCR),
    ("thoroughly", BOOST_INCR), ("totally", BOOST_INCR), ("tremendously", BOOST_INCR),
    ("unbelievably", BOOST_INCR), ("utterly", BOOST_INCR), ("very", BOOST_INCR),
    ("almost", BOOST_DECR), ("barely", BOOST_DECR), ("hardly", BOOST_DECR),
    ("kinda", BOOST_DECR), ("less", BOOST_DECR), ("little", BOOST_DECR),
    ("marginally", BOOST_DECR), ("occasionally", BOOST_DECR), ("partly", BOOST_DECR),
    ("scarcely", BOOST_DECR), ("slightly", BOOST_DECR), ("somewhat", BOOST_DECR),
    ("sorta", BOOST_DECR),
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont",
    "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never",
    "none", "nope", "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt",
    "wasnt", "werent", "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

/// Word valences plus the booster and negation vocabularies
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: FxHashMap<String, f64>,
    boosters: FxHashMap<&'static str, f64>,
}

impl Lexicon {
    /// The lexicon compiled into the crate
    pub fn builtin() -> Self {
        let valences =
            BUILTIN_VALENCES.iter().map(|&(word, valence)| (word.to_string(), valence)).collect();
        let boosters = BOOSTERS.iter().copied().collect();
        Self { valences, boosters }
    }

    /// Built-in lexicon with entries from a VADER-format file layered on top
    pub fn builtin_with_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut lexicon = Self::builtin();
        let merged = lexicon.merge_file(path)?;
        info!(entries = merged, total = lexicon.len(), "lexicon_file_merged");
        Ok(lexicon)
    }

    /// Merge `token<TAB>valence[<TAB>...]` lines; returns the number of entries taken
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        Ok(self.merge_str(&content))
    }

    /// Merge lexicon lines from a string; malformed lines are skipped
    pub fn merge_str(&mut self, content: &str) -> usize {
        let mut merged = 0;
        let mut skipped = 0;
        for line in content.lines() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split('\t');
            let token = parts.next().map(str::trim).filter(|t| !t.is_empty());
            let valence = parts.next().and_then(|v| v.trim().parse::<f64>().ok());
            match (token, valence) {
                (Some(token), Some(valence)) if valence.is_finite() => {
                    self.valences.insert(token.to_lowercase(), valence);
                    merged += 1;
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped = skipped, "lexicon_lines_skipped");
        }
        merged
    }

    #[inline]
    pub fn valence(&self, lower: &str) -> Option<f64> {
        self.valences.get(lower).copied()
    }

    #[inline]
    pub fn contains(&self, lower: &str) -> bool {
        self.valences.contains_key(lower)
    }

    #[inline]
    pub fn booster(&self, lower: &str) -> Option<f64> {
        self.boosters.get(lower).copied()
    }

    /// Negation words, including any contraction ending in n't
    pub fn is_negation(&self, lower: &str) -> bool {
        NEGATIONS.contains(&lower) || lower.contains("n't")
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
