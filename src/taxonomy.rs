//! Static guidance table used to steer prompt wording.
//!
//! One entry per Bloom level (description, verbs, example stems) and per
//! difficulty tier (description, characteristics). Lookups are total: the
//! typed keys always hit an entry, and raw strings resolve through the
//! `Understand` / `Medium` defaults first.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{BloomLevel, Difficulty};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct GuidanceEntry {
  pub description: &'static str,
  #[serde(skip_serializing_if = "<[_]>::is_empty")]
  pub verbs: &'static [&'static str],
  #[serde(skip_serializing_if = "<[_]>::is_empty")]
  pub example_stems: &'static [&'static str],
  #[serde(skip_serializing_if = "<[_]>::is_empty")]
  pub characteristics: &'static [&'static str],
}

impl GuidanceEntry {
  /// Verbs embedded in prompts; only the first five are used.
  pub fn prompt_verbs(&self) -> Vec<&'static str> {
    self.verbs.iter().take(5).copied().collect()
  }
}

static REMEMBER: GuidanceEntry = GuidanceEntry {
  description: "Focus on recalling facts, terms, basic concepts, or answers without necessarily understanding them.",
  verbs: &["define", "list", "memorize", "recall", "repeat", "identify", "name", "state", "label", "recognize"],
  example_stems: &[
    "What is the definition of...?",
    "Who discovered...?",
    "When did ___ happen?",
    "List the main components of...",
    "Identify the key features of...",
  ],
  characteristics: &[],
};

static UNDERSTAND: GuidanceEntry = GuidanceEntry {
  description: "Focus on demonstrating understanding of facts and ideas by organizing, comparing, translating, interpreting, giving descriptions, and stating main ideas.",
  verbs: &["explain", "describe", "interpret", "summarize", "translate", "classify", "compare", "contrast", "paraphrase"],
  example_stems: &[
    "Explain the concept of...",
    "Summarize the main points of...",
    "How would you compare...?",
    "What is the main idea of...?",
    "Describe in your own words what...",
  ],
  characteristics: &[],
};

static APPLY: GuidanceEntry = GuidanceEntry {
  description: "Focus on using acquired knowledge to solve problems in new situations by applying acquired knowledge, facts, techniques and rules.",
  verbs: &["apply", "use", "implement", "solve", "demonstrate", "compute", "calculate", "illustrate", "show"],
  example_stems: &[
    "How would you use ___ to solve...?",
    "Calculate the result when...",
    "Apply the concept of ___ to...",
    "What would happen if...?",
    "What examples can you find to...?",
  ],
  characteristics: &[],
};

static ANALYZE: GuidanceEntry = GuidanceEntry {
  description: "Focus on examining and breaking information into parts by identifying motives or causes; making inferences and finding evidence to support generalizations.",
  verbs: &["analyze", "differentiate", "distinguish", "examine", "categorize", "compare", "contrast", "investigate", "break down"],
  example_stems: &[
    "What are the parts or features of...?",
    "How would you categorize...?",
    "What evidence supports...?",
    "What is the relationship between...?",
    "Analyze why... occurred.",
  ],
  characteristics: &[],
};

static EVALUATE: GuidanceEntry = GuidanceEntry {
  description: "Focus on presenting and defending opinions by making judgments about information, validity of ideas, or quality of work based on a set of criteria.",
  verbs: &["evaluate", "judge", "critique", "justify", "defend", "recommend", "prioritize", "rate", "assess", "validate"],
  example_stems: &[
    "What is your opinion of...?",
    "How would you evaluate the effectiveness of...?",
    "Judge the value of... according to...",
    "What criteria would you use to assess...?",
    "How would you prioritize... based on...?",
  ],
  characteristics: &[],
};

static CREATE: GuidanceEntry = GuidanceEntry {
  description: "Focus on compiling information together in a different way by combining elements in a new pattern or proposing alternative solutions.",
  verbs: &["create", "design", "develop", "formulate", "construct", "imagine", "propose", "devise", "invent", "compose"],
  example_stems: &[
    "How would you design a new...?",
    "What alternative would you propose for...?",
    "Develop a plan to...",
    "Create a new model that...",
    "How would you compose a ___ that...?",
  ],
  characteristics: &[],
};

static EASY: GuidanceEntry = GuidanceEntry {
  description: "Focus on basic recall and simple comprehension. Use straightforward language and obvious connections.",
  verbs: &[],
  example_stems: &[],
  characteristics: &[
    "Direct questions with clear answers",
    "Focus on main concepts only",
    "Minimal complexity",
    "Obvious connections between concepts",
    "Uses familiar examples",
  ],
};

static MEDIUM: GuidanceEntry = GuidanceEntry {
  description: "Focus on deeper understanding and application. Requires some analysis but with clear parameters.",
  verbs: &[],
  example_stems: &[],
  characteristics: &[
    "Requires understanding beyond simple recall",
    "May involve multiple concepts",
    "Moderate complexity",
    "Some inference required",
    "May need application to new situations",
  ],
};

static HARD: GuidanceEntry = GuidanceEntry {
  description: "Focus on complex analysis, synthesis, or evaluation. Requires deeper thinking and connections.",
  verbs: &[],
  example_stems: &[],
  characteristics: &[
    "Requires synthesis of multiple concepts",
    "High complexity",
    "Significant critical thinking required",
    "May involve ambiguity or nuance",
    "Requires connections between disparate ideas",
  ],
};

pub fn lookup_bloom(level: BloomLevel) -> &'static GuidanceEntry {
  match level {
    BloomLevel::Remember => &REMEMBER,
    BloomLevel::Understand => &UNDERSTAND,
    BloomLevel::Apply => &APPLY,
    BloomLevel::Analyze => &ANALYZE,
    BloomLevel::Evaluate => &EVALUATE,
    BloomLevel::Create => &CREATE,
  }
}

pub fn lookup_difficulty(tier: Difficulty) -> &'static GuidanceEntry {
  match tier {
    Difficulty::Easy => &EASY,
    Difficulty::Medium => &MEDIUM,
    Difficulty::Hard => &HARD,
  }
}

/// Whole table keyed by level name, for clients that render the options.
#[derive(Serialize)]
pub struct GuidanceTable {
  pub bloom_levels: BTreeMap<&'static str, &'static GuidanceEntry>,
  pub difficulties: BTreeMap<&'static str, &'static GuidanceEntry>,
}

pub fn guidance_table() -> GuidanceTable {
  GuidanceTable {
    bloom_levels: BloomLevel::ALL.into_iter().map(|l| (l.as_str(), lookup_bloom(l))).collect(),
    difficulties: Difficulty::ALL.into_iter().map(|d| (d.as_str(), lookup_difficulty(d))).collect(),
  }
}
