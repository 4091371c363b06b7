use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Answer strings that count as "yes" for yes/no items.
const AFFIRMATIVE: &[&str] = &["a", "yes", "true", "1", "是", "y"];

/// A single raw answer as submitted by a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Textual form of a scalar answer. Multi-select answers have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AnswerValue::Bool(b) => Some(b.to_string()),
            AnswerValue::Number(n) => Some(format_number(*n)),
            AnswerValue::Text(t) => Some(t.trim().to_string()),
            AnswerValue::Choices(_) => None,
        }
    }

    /// Numeric form of the answer, parsing text when it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(t) => t.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether a yes/no answer reads as "yes".
    pub fn is_affirmative(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Number(n) => *n == 1.0,
            AnswerValue::Text(t) => {
                let lowered = t.trim().to_lowercase();
                AFFIRMATIVE.contains(&lowered.as_str())
            }
            AnswerValue::Choices(_) => false,
        }
    }

    /// Selected values of a multi-select answer; a scalar counts as one selection.
    pub fn choices(&self) -> Vec<String> {
        match self {
            AnswerValue::Choices(values) => values.clone(),
            other => other.as_text().into_iter().collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(t) => t.trim().is_empty(),
            AnswerValue::Choices(values) => values.is_empty(),
            _ => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Raw answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.0.insert(question_id.into(), value);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// Find the answer for a question, tolerating the key shapes candidates
    /// send: `"mbti_12"`, bare `"12"`, or a prefixed key for a bare id.
    /// Blank answers are treated as missing.
    pub fn lookup(&self, question_id: &str) -> Option<&AnswerValue> {
        self.lookup_any(question_id).filter(|v| !v.is_blank())
    }

    fn lookup_any(&self, question_id: &str) -> Option<&AnswerValue> {
        if let Some(value) = self.0.get(question_id) {
            return Some(value);
        }

        if let Some((_, bare)) = question_id.rsplit_once('_')
            && is_numeric(bare)
            && let Some(value) = self.0.get(bare)
        {
            return Some(value);
        }

        if is_numeric(question_id) {
            return self
                .0
                .iter()
                .find(|(key, _)| {
                    key.rsplit_once('_')
                        .is_some_and(|(_, bare)| bare == question_id)
                })
                .map(|(_, value)| value);
        }

        None
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl<K: Into<String>> FromIterator<(K, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    #[test]
    fn lookup_accepts_bare_and_prefixed_keys() {
        let answers: Answers = [("12", text("A")), ("epq_3", text("yes"))]
            .into_iter()
            .collect();

        assert_eq!(answers.lookup("mbti_12"), Some(&text("A")));
        assert_eq!(answers.lookup("3"), Some(&text("yes")));
        assert_eq!(answers.lookup("epq_3"), Some(&text("yes")));
        assert_eq!(answers.lookup("mbti_13"), None);
    }

    #[test]
    fn blank_answers_are_missing() {
        let answers: Answers = [("q1", text("  "))].into_iter().collect();
        assert_eq!(answers.lookup("q1"), None);
    }

    #[test]
    fn affirmative_forms() {
        for yes in ["A", "yes", "TRUE", "1", "是", "y"] {
            assert!(text(yes).is_affirmative(), "{yes}");
        }
        assert!(AnswerValue::Bool(true).is_affirmative());
        assert!(AnswerValue::Number(1.0).is_affirmative());
        assert!(!text("no").is_affirmative());
        assert!(!text("B").is_affirmative());
    }

    #[test]
    fn untagged_json_shapes() {
        let answers: Answers =
            serde_json::from_str(r#"{"a": true, "b": 4, "c": "B", "d": ["x", "y"]}"#).unwrap();
        assert_eq!(answers.get("a"), Some(&AnswerValue::Bool(true)));
        assert_eq!(answers.get("b"), Some(&AnswerValue::Number(4.0)));
        assert_eq!(answers.get("c"), Some(&text("B")));
        assert_eq!(
            answers.get("d").map(AnswerValue::choices),
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn numeric_text_parses() {
        assert_eq!(text(" 5 ").as_number(), Some(5.0));
        assert_eq!(AnswerValue::Number(3.0).as_text().as_deref(), Some("3"));
    }
}
