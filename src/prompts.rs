//! Prompt rendering for the four question generators.
//!
//! Every prompt shares the same frame (task line, summary, Bloom block,
//! difficulty block); the numbered requirements and the JSON output contract
//! are specific to each question kind.

use crate::domain::{BloomLevel, Difficulty, QuestionKind};
use crate::taxonomy::{lookup_bloom, lookup_difficulty};

pub fn render_question_prompt(
  kind: QuestionKind,
  summary: &str,
  quantity: u32,
  difficulty: Difficulty,
  bloom: BloomLevel,
) -> String {
  let bloom_g = lookup_bloom(bloom);
  let diff_g = lookup_difficulty(difficulty);

  let label = match kind {
    QuestionKind::MultipleChoice => "multiple-choice",
    QuestionKind::TrueOrFalse => "true/false",
    QuestionKind::Identification => "identification/fill-in-the-blank",
    QuestionKind::OpenEnded => "open-ended",
  };

  let mut out = format!(
    "\nAs an expert educator, create {quantity} high-quality {label} questions at the {bloom} level of Bloom's taxonomy with {difficulty} difficulty based on this summary:\n\n\
     {summary}\n\n\
     BLOOM'S TAXONOMY LEVEL: {bloom}\n\
     {bloom_desc}\n\
     Appropriate verbs to use: {verbs}\n",
    bloom_desc = bloom_g.description,
    verbs = bloom_g.prompt_verbs().join(", "),
  );

  if kind == QuestionKind::OpenEnded {
    out.push_str("Example question stems: \n");
    for stem in bloom_g.example_stems.iter().take(2) {
      out.push_str(&format!("- {stem}\n"));
    }
  }

  out.push_str(&format!(
    "\nDIFFICULTY LEVEL: {difficulty}\n{diff_desc}\n\n",
    diff_desc = diff_g.description,
  ));
  out.push_str(&requirements(kind, bloom, difficulty));
  out.push_str("\nReturn JSON in this exact format:\n");
  out.push_str(&output_format(kind, bloom));
  out.push_str("\nOnly return valid JSON with NO additional explanations or text.\n");
  out
}

fn requirements(kind: QuestionKind, bloom: BloomLevel, difficulty: Difficulty) -> String {
  let (title, items): (&str, Vec<String>) = match kind {
    QuestionKind::MultipleChoice => ("MULTIPLE CHOICE QUESTIONS", vec![
      format!("Each question MUST truly reflect the {bloom} cognitive level"),
      "For higher cognitive levels, focus on application, comparison, evaluation rather than simple recall".into(),
      "Create exactly 4 options per question labeled A, B, C, D".into(),
      "ONLY ONE option should be correct".into(),
      "All distractors (wrong options) must be plausible".into(),
      "Avoid obvious wrong answers or silly distractors".into(),
      format!("For '{difficulty}' difficulty, make options appropriately challenging"),
      "The options should be distinct from one another (not overlapping)".into(),
      "Provide a clear explanation for why the correct answer is right and others are wrong".into(),
      format!("Include a clear justification explaining how the question meets the {bloom} level of Bloom's taxonomy"),
    ]),
    QuestionKind::TrueOrFalse => ("TRUE/FALSE QUESTIONS", vec![
      format!("Each question MUST truly reflect the {bloom} cognitive level"),
      "Statements must be fully true or fully false, with no ambiguity".into(),
      "Avoid absolutes like \"always\" or \"never\" unless truly appropriate".into(),
      "For false statements, ensure they're plausibly false (not obviously wrong)".into(),
      "For higher cognitive levels, focus on relationships, implications, or applications rather than simple facts".into(),
      "Include nuanced statements that require proper understanding, not just memorization".into(),
      format!("For '{difficulty}' difficulty, follow the difficulty guidance provided"),
    ]),
    QuestionKind::Identification => ("IDENTIFICATION QUESTIONS", vec![
      format!("Each question MUST truly reflect the {bloom} cognitive level"),
      "The blank or identification must be central to understanding the concept".into(),
      "For \"Remember\" level: Focus on key terms, definitions, or specific facts".into(),
      "For \"Understand\" level: Focus on explaining relationships or meanings".into(),
      "For \"Apply\" level: Focus on using concepts in specific contexts".into(),
      "For \"Analyze\" level: Focus on breaking down components or relationships".into(),
      "For \"Evaluate\" level: Focus on making judgments based on criteria".into(),
      "For \"Create\" level: Focus on generating new ideas or perspectives".into(),
      format!("For '{difficulty}' difficulty, make questions progressively more complex as specified"),
    ]),
    QuestionKind::OpenEnded => ("OPEN-ENDED QUESTIONS", vec![
      format!("Each question MUST truly reflect the {bloom} cognitive level without exception"),
      "For \"Remember/Understand\" levels: Questions should require explanation of concepts in own words".into(),
      "For \"Apply\" level: Questions should ask students to apply concepts to new situations".into(),
      "For \"Analyze\" level: Questions should require breaking down concepts or comparing elements".into(),
      "For \"Evaluate\" level: Questions should require making judgments based on criteria".into(),
      "For \"Create\" level: Questions should require generating new ideas, plans, or perspectives".into(),
      format!("Include challenging prompts appropriate for '{difficulty}' difficulty"),
      "Use the verbs and stems provided as guidance for the appropriate cognitive level".into(),
      "The sample answer should demonstrate the depth expected at this cognitive level".into(),
      "Key points must be concrete, assessable elements that would be in a quality answer".into(),
    ]),
  };

  let mut out = format!("STRICT REQUIREMENTS FOR {title}:\n");
  for (i, item) in items.iter().enumerate() {
    out.push_str(&format!("{}. {item}\n", i + 1));
  }
  out
}

fn output_format(kind: QuestionKind, bloom: BloomLevel) -> String {
  let body = match kind {
    QuestionKind::MultipleChoice => format!(
      r#"    "question": "The question text",
    "options": ["A. First option", "B. Second option", "C. Third option", "D. Fourth option"],
    "answer": "The letter of the correct option (A, B, C, or D)",
    "explanation": "Explanation of why this answer is correct and others are wrong",
    "bloom_justification": "Explanation of how this question aligns with the {bloom} level of Bloom's taxonomy""#
    ),
    QuestionKind::TrueOrFalse => format!(
      r#"    "question": "Statement that is either true or false",
    "answer": "True or False",
    "explanation": "Brief explanation of why this is true or false",
    "bloom_justification": "Brief explanation of how this question meets the {bloom} level""#
    ),
    QuestionKind::Identification => format!(
      r#"    "question": "Question asking to identify a term, concept, or fill in a blank",
    "answer": "The correct answer",
    "explanation": "Brief explanation of why this answer is correct",
    "bloom_justification": "Brief explanation of how this question meets the {bloom} level""#
    ),
    QuestionKind::OpenEnded => format!(
      r#"    "question": "Open-ended question that requires a detailed response",
    "answer": "Sample or model answer that demonstrates expected depth and quality",
    "key_points": ["Key point 1 that must be included in a quality answer", "Key point 2", "Key point 3"],
    "bloom_justification": "Brief explanation of how this question meets the {bloom} level",
    "grading_criteria": "Brief guidance on how to evaluate student responses""#
    ),
  };
  format!("[\n  {{\n{body}\n  }}\n]")
}
