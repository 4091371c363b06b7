use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionKind {
    #[serde(alias = "yesno")]
    YesNo,
    /// Two-option A/B forced choice.
    Choice,
    #[serde(alias = "radio")]
    SingleChoice,
    #[serde(alias = "checkbox")]
    MultipleChoice,
    Scale,
    Nps,
    #[serde(alias = "text")]
    ShortText,
    #[serde(alias = "textarea")]
    LongText,
    Date,
}

impl QuestionKind {
    /// Kinds that never contribute to a score.
    pub fn is_free_form(self) -> bool {
        matches!(
            self,
            QuestionKind::ShortText | QuestionKind::LongText | QuestionKind::Date
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::YesNo => "是非题",
            QuestionKind::Choice => "二选一",
            QuestionKind::SingleChoice => "单选题",
            QuestionKind::MultipleChoice => "多选题",
            QuestionKind::Scale => "量表题",
            QuestionKind::Nps => "NPS",
            QuestionKind::ShortText => "填空题",
            QuestionKind::LongText => "问答题",
            QuestionKind::Date => "日期",
        }
    }
}

/// Whether a "yes" counts toward the question's dimension or against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Polarity {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl QuestionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleRange {
    pub min: i32,
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label: Option<String>,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: 5,
            min_label: None,
            max_label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<Polarity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
}

fn default_required() -> bool {
    true
}

impl Question {
    pub fn new(id: impl Into<String>, order: u32, kind: QuestionKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order,
            kind,
            text: text.into(),
            required: true,
            dimension: None,
            polarity: None,
            options: Vec::new(),
            scale: None,
            max_score: None,
        }
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_scale(mut self, scale: ScaleRange) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Upper bound of the answer scale; NPS runs 0-10, everything else
    /// defaults to a five-point scale.
    pub fn scale_max(&self) -> f64 {
        match (&self.scale, self.kind) {
            (Some(range), _) => f64::from(range.max),
            (None, QuestionKind::Nps) => 10.0,
            (None, _) => 5.0,
        }
    }

    /// Label shown for a stored answer value, falling back to the value itself.
    pub fn display_value(&self, value: &str) -> String {
        self.option(value)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_kind_aliases_deserialize() {
        let q: Question =
            serde_json::from_str(r#"{"id":"q1","type":"radio","text":"Pick one"}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::SingleChoice);
        assert!(q.required);

        let q: Question =
            serde_json::from_str(r#"{"id":"q2","type":"yesno","text":"Yes?"}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::YesNo);
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let q = Question::new("q1", 1, QuestionKind::Nps, "Recommend us?");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "nps");
        assert_eq!(q.scale_max(), 10.0);
    }

    #[test]
    fn display_value_uses_option_label() {
        let q = Question::new("q1", 1, QuestionKind::Choice, "?").with_options(vec![
            QuestionOption::new("A", "Outgoing"),
            QuestionOption::new("B", "Reserved"),
        ]);
        assert_eq!(q.display_value("B"), "Reserved");
        assert_eq!(q.display_value("Z"), "Z");
    }
}
