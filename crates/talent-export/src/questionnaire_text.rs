//! Questionnaire import and export.
//!
//! Plain text uses numbered question lines followed by lettered option
//! lines:
//!
//! ```text
//! 1. 我喜欢团队合作
//! A. 非常同意
//! B. 同意 (5分)
//! ```
//!
//! A question that is not single choice carries a `类型:` line naming its
//! kind, plus the range for scales (`类型: scale 1-5`). Scale end labels are
//! not carried.
//!
//! JSON accepts either a bare list of questions or an object with a
//! `questions` (or `items`) list, and tolerates the field aliases common in
//! hand-written files.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use talent_core::models::question::{
    Polarity, Question, QuestionKind, QuestionOption, ScaleRange,
};
use talent_core::models::questionnaire::Questionnaire;

use crate::error::ExportError;

static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])[.、)]\s*(.+)").expect("option line regex"));

/// `1.` `1、` `1)` `1：`, `(1)` `（1）`, `第1题`.
static NUMBERING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[.、)：:]|[（(]\d+[)）]|第\d+题[.、：:]?)\s*").expect("numbering regex")
});

/// `类型: scale 1-5`, `类型：long_text`.
static KIND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^类型[:：]\s*([a-z_]+)(?:\s+(-?\d+)-(-?\d+))?$").expect("kind line regex")
});

/// Trailing score marker on an option, `(5分)` or `（5分）`.
static SCORE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[(（](\d+(?:\.\d+)?)分[)）]\s*$").expect("score marker regex"));

const MULTIPLE_HINTS: &[&str] = &["多选", "可多选", "多项选择", "选择所有", "可以选择多个", "至少选择"];
const LONG_TEXT_HINTS: &[&str] = &["详细描述", "详细说明", "请详细", "具体说明", "补充说明"];
const SHORT_TEXT_HINTS: &[&str] = &[
    "请填写", "请输入", "简答", "填空", "请描述", "请说明", "请写出", "请列举", "您的建议", "你的建议", "其他意见",
];
const SCALE_HINTS: &[&str] = &["评分", "打分", "1-5", "1-10", "评价程度", "满意度", "认同程度", "从1到", "量表"];
const YES_NO_HINTS: &[&str] = &["是否", "是不是", "有没有", "对不对", "同不同意"];
const YES_NO_PAIRS: &[(&str, &str)] = &[
    ("是", "否"),
    ("对", "错"),
    ("有", "没有"),
    ("会", "不会"),
    ("同意", "不同意"),
    ("满意", "不满意"),
    ("yes", "no"),
    ("true", "false"),
    ("正确", "错误"),
];

/// Four-point agreement scale given to questions imported without options.
pub fn default_options() -> Vec<QuestionOption> {
    [("A", "非常同意"), ("B", "同意"), ("C", "不同意"), ("D", "非常不同意")]
        .into_iter()
        .map(|(value, label)| QuestionOption::new(value, label))
        .collect()
}

/// Parse questions from text. Every line that is not an option or kind line
/// starts a new single-choice question; options and kinds attach to the
/// question above them. Single-choice questions without options get
/// [`default_options`].
pub fn parse_text_with_options(text: &str) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = KIND_LINE.captures(line) {
            if let Some(current) = questions.last_mut() {
                apply_kind_line(current, &caps);
            }
            continue;
        }
        if let Some(caps) = OPTION_LINE.captures(line) {
            if let Some(current) = questions.last_mut() {
                current.options.push(parse_option(&caps[1], &caps[2]));
            }
            continue;
        }

        let stripped = strip_numbering(line);
        if stripped.is_empty() {
            continue;
        }
        let order = u32::try_from(questions.len() + 1).unwrap_or(u32::MAX);
        questions.push(Question::new(
            format!("import_{order}"),
            order,
            QuestionKind::SingleChoice,
            stripped,
        ));
    }

    for question in &mut questions {
        if question.kind == QuestionKind::SingleChoice && question.options.is_empty() {
            question.options = default_options();
        }
    }

    tracing::debug!(questions = questions.len(), "parsed questionnaire text");
    questions
}

fn apply_kind_line(question: &mut Question, caps: &regex::Captures<'_>) {
    question.kind = kind_from_label(&caps[1]);
    let bound = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i32>().ok());
    if let (Some(min), Some(max)) = (bound(2), bound(3)) {
        question.scale = Some(ScaleRange {
            min,
            max,
            ..ScaleRange::default()
        });
    }
}

fn kind_tag(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::YesNo => "yes_no",
        QuestionKind::Choice => "choice",
        QuestionKind::SingleChoice => "single_choice",
        QuestionKind::MultipleChoice => "multiple_choice",
        QuestionKind::Scale => "scale",
        QuestionKind::Nps => "nps",
        QuestionKind::ShortText => "short_text",
        QuestionKind::LongText => "long_text",
        QuestionKind::Date => "date",
    }
}

fn parse_option(letter: &str, rest: &str) -> QuestionOption {
    let rest = rest.trim();
    let (label, score) = match SCORE_MARKER.captures(rest) {
        Some(caps) => {
            let label = rest[..caps.get(0).map_or(rest.len(), |m| m.start())].trim();
            (label, caps[1].parse::<f64>().ok())
        }
        None => (rest, None),
    };
    QuestionOption {
        value: letter.to_uppercase(),
        label: label.to_string(),
        score,
    }
}

fn strip_numbering(line: &str) -> String {
    NUMBERING.replace(line, "").trim().to_string()
}

/// Refine the kind of imported single-choice questions from their wording
/// and options. Text questions lose their options.
pub fn infer_kinds(questions: &mut [Question]) {
    for question in questions.iter_mut() {
        if question.kind != QuestionKind::SingleChoice {
            continue;
        }
        let kind = infer_kind(question);
        if kind != question.kind {
            tracing::debug!(id = %question.id, ?kind, "inferred question kind");
        }
        question.kind = kind;
        match kind {
            QuestionKind::ShortText | QuestionKind::LongText => question.options.clear(),
            QuestionKind::Scale if question.scale.is_none() => {
                question.scale = Some(ScaleRange::default());
                question.options.clear();
            }
            _ => {}
        }
    }
}

fn infer_kind(question: &Question) -> QuestionKind {
    let text = question.text.as_str();
    let mentions = |hints: &[&str]| hints.iter().any(|h| text.contains(h));

    if mentions(MULTIPLE_HINTS) {
        return QuestionKind::MultipleChoice;
    }
    if mentions(LONG_TEXT_HINTS) {
        return QuestionKind::LongText;
    }
    if mentions(SHORT_TEXT_HINTS) {
        return QuestionKind::ShortText;
    }
    if mentions(SCALE_HINTS) {
        return QuestionKind::Scale;
    }
    if mentions(YES_NO_HINTS) {
        return QuestionKind::YesNo;
    }

    match question.options.as_slice() {
        [] => QuestionKind::ShortText,
        [a, b] => {
            let (a, b) = (a.label.to_lowercase(), b.label.to_lowercase());
            let yes_no = YES_NO_PAIRS.iter().any(|(yes, no)| {
                (a.contains(yes) && b.contains(no)) || (a.contains(no) && b.contains(yes))
            });
            let average_len = (a.chars().count() + b.chars().count()) / 2;
            if yes_no {
                QuestionKind::YesNo
            } else if average_len > 15 {
                QuestionKind::Choice
            } else {
                QuestionKind::SingleChoice
            }
        }
        options if options.len() > 6 => QuestionKind::MultipleChoice,
        _ => QuestionKind::SingleChoice,
    }
}

/// Text form read back by [`parse_text_with_options`]. Questions are
/// separated by a blank line; kinds other than single choice are kept with a
/// `类型:` line.
pub fn export_text(questions: &[Question]) -> String {
    let mut blocks = Vec::with_capacity(questions.len());
    for (n, question) in questions.iter().enumerate() {
        let mut block = format!("{}. {}", n + 1, question.text.trim());
        if question.kind != QuestionKind::SingleChoice {
            block.push_str(&format!("\n类型: {}", kind_tag(question.kind)));
            if let Some(scale) = &question.scale {
                block.push_str(&format!(" {}-{}", scale.min, scale.max));
            }
        }
        for (i, option) in question.options.iter().enumerate() {
            let letter = option_letter(&option.value, i);
            block.push_str(&format!("\n{letter}. {}", option.label.trim()));
            if let Some(score) = option.score {
                block.push_str(&format!(" ({score}分)"));
            }
        }
        blocks.push(block);
    }
    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

fn option_letter(value: &str, index: usize) -> String {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
        _ => letter_for(index),
    }
}

fn letter_for(index: usize) -> String {
    char::from_u32(u32::from(b'A') + (index % 26) as u32)
        .map(String::from)
        .unwrap_or_default()
}

/// A questionnaire read from an import file, before it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedQuestionnaire {
    pub name: String,
    pub description: String,
    pub estimated_minutes: u32,
    pub questions: Vec<Question>,
}

const DEFAULT_IMPORT_NAME: &str = "导入的问卷";
const DEFAULT_IMPORT_MINUTES: u32 = 15;

impl ImportedQuestionnaire {
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            name: DEFAULT_IMPORT_NAME.to_string(),
            description: String::new(),
            estimated_minutes: DEFAULT_IMPORT_MINUTES,
            questions,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<JsonQuestion>),
    Object(JsonQuestionnaire),
}

#[derive(Deserialize)]
struct JsonQuestionnaire {
    #[serde(default, alias = "title")]
    name: Option<String>,
    #[serde(default, alias = "desc")]
    description: Option<String>,
    #[serde(default, alias = "duration")]
    estimated_minutes: Option<u32>,
    #[serde(default, alias = "items")]
    questions: Vec<JsonQuestion>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonQuestion {
    Text(String),
    Full(JsonQuestionFields),
}

#[derive(Deserialize)]
struct JsonQuestionFields {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "question", alias = "title")]
    text: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, alias = "choices")]
    options: Vec<JsonOption>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    dimension: Option<String>,
    #[serde(default)]
    polarity: Option<Polarity>,
    /// `reverse: true` marks a negatively keyed item.
    #[serde(default)]
    reverse: Option<bool>,
    /// `positive: false` marks a negatively keyed item.
    #[serde(default)]
    positive: Option<bool>,
    #[serde(default)]
    scale: Option<ScaleRange>,
    #[serde(default, alias = "score")]
    max_score: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonOption {
    Text(String),
    Full {
        #[serde(default)]
        value: Option<serde_json::Value>,
        #[serde(default, alias = "text")]
        label: String,
        #[serde(default)]
        score: Option<f64>,
    },
}

/// Question kind from the labels found in import files.
pub fn kind_from_label(label: &str) -> QuestionKind {
    match label.trim().to_lowercase().as_str() {
        "multiple" | "multiple_choice" | "checkbox" => QuestionKind::MultipleChoice,
        "rating" | "scale" => QuestionKind::Scale,
        "yesno" | "yes_no" => QuestionKind::YesNo,
        "choice" => QuestionKind::Choice,
        "text" | "short_text" => QuestionKind::ShortText,
        "textarea" | "long_text" => QuestionKind::LongText,
        "nps" => QuestionKind::Nps,
        "date" => QuestionKind::Date,
        _ => QuestionKind::SingleChoice,
    }
}

/// Read a questionnaire from JSON.
pub fn import_json(json: &str) -> Result<ImportedQuestionnaire, ExportError> {
    let document: JsonDocument = serde_json::from_str(json)
        .map_err(|e| ExportError::InvalidImport(e.to_string()))?;

    let (mut imported, raw) = match document {
        JsonDocument::List(raw) => (ImportedQuestionnaire::from_questions(Vec::new()), raw),
        JsonDocument::Object(doc) => {
            let mut imported = ImportedQuestionnaire::from_questions(Vec::new());
            if let Some(name) = doc.name.filter(|n| !n.trim().is_empty()) {
                imported.name = name;
            }
            imported.description = doc.description.unwrap_or_default();
            if let Some(minutes) = doc.estimated_minutes {
                imported.estimated_minutes = minutes;
            }
            (imported, doc.questions)
        }
    };

    imported.questions = raw
        .into_iter()
        .zip(1u32..)
        .map(|(q, order)| normalize(q, order))
        .filter(|q| !q.text.trim().is_empty())
        .collect();

    if imported.questions.is_empty() {
        return Err(ExportError::EmptyImport("no questions found".to_string()));
    }
    tracing::debug!(
        name = %imported.name,
        questions = imported.questions.len(),
        "imported questionnaire JSON"
    );
    Ok(imported)
}

fn normalize(raw: JsonQuestion, order: u32) -> Question {
    let fields = match raw {
        JsonQuestion::Text(text) => {
            return Question::new(format!("q{order}"), order, QuestionKind::SingleChoice, text.trim());
        }
        JsonQuestion::Full(fields) => fields,
    };

    let kind = fields
        .kind
        .as_deref()
        .map(kind_from_label)
        .unwrap_or(QuestionKind::SingleChoice);
    let mut question = Question::new(
        fields.id.unwrap_or_else(|| format!("q{order}")),
        order,
        kind,
        fields.text.trim(),
    );
    question.required = fields.required.unwrap_or(true);
    question.dimension = fields.dimension;
    question.polarity = fields.polarity.or(match (fields.reverse, fields.positive) {
        (Some(true), _) | (_, Some(false)) => Some(Polarity::Negative),
        (Some(false), _) | (_, Some(true)) => Some(Polarity::Positive),
        (None, None) => None,
    });
    question.scale = fields.scale;
    question.max_score = fields.max_score;
    question.options = fields
        .options
        .into_iter()
        .enumerate()
        .map(|(i, option)| match option {
            JsonOption::Text(label) => QuestionOption::new(letter_for(i), label),
            JsonOption::Full {
                value,
                label,
                score,
            } => {
                let value = match value {
                    Some(serde_json::Value::String(s)) if !s.is_empty() => s,
                    Some(serde_json::Value::Number(n)) => n.to_string(),
                    _ => letter_for(i),
                };
                QuestionOption { value, label, score }
            }
        })
        .collect();
    question
}

/// Pretty JSON for a questionnaire, readable by [`import_json`].
pub fn export_json(questionnaire: &Questionnaire) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(questionnaire)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_prefixes_are_stripped() {
        assert_eq!(strip_numbering("12. 你喜欢什么"), "你喜欢什么");
        assert_eq!(strip_numbering("（3）你喜欢什么"), "你喜欢什么");
        assert_eq!(strip_numbering("第4题：你喜欢什么"), "你喜欢什么");
        assert_eq!(strip_numbering("你喜欢什么"), "你喜欢什么");
    }

    #[test]
    fn option_score_marker() {
        let option = parse_option("b", "比较符合 （3分）");
        assert_eq!(option.value, "B");
        assert_eq!(option.label, "比较符合");
        assert_eq!(option.score, Some(3.0));
    }

    #[test]
    fn kinds_inferred_from_wording_and_options() {
        let mut questions = vec![
            Question::new("1", 1, QuestionKind::SingleChoice, "您对工作环境是否满意"),
            Question::new("2", 2, QuestionKind::SingleChoice, "请详细描述您的职业规划"),
            Question::new("3", 3, QuestionKind::SingleChoice, "您的性别").with_options(vec![
                QuestionOption::new("A", "男"),
                QuestionOption::new("B", "女"),
            ]),
            Question::new("4", 4, QuestionKind::SingleChoice, "您的感受").with_options(vec![
                QuestionOption::new("A", "对"),
                QuestionOption::new("B", "错"),
            ]),
        ];
        infer_kinds(&mut questions);
        assert_eq!(questions[0].kind, QuestionKind::YesNo);
        assert_eq!(questions[1].kind, QuestionKind::LongText);
        assert!(questions[1].options.is_empty());
        assert_eq!(questions[2].kind, QuestionKind::SingleChoice);
        assert_eq!(questions[3].kind, QuestionKind::YesNo);
    }
}
