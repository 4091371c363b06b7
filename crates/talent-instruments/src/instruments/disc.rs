use std::sync::LazyLock;

use talent_core::models::answer::Answers;
use talent_core::models::question::{Question, QuestionKind, ScaleRange};
use talent_core::models::questionnaire::{DimensionDef, QuestionnaireType};
use talent_core::models::result::{DiscDimension, DiscResult, ResultDetails, ScoredResult};

use crate::Instrument;

/// `(code, label, style description)`; also the tie-break order for the dominant style.
const STYLES: [(&str, &str, &str); 4] = [
    ("D", "支配型", "D型 - 支配型：直接、果断、以结果为导向"),
    ("I", "影响型", "I型 - 影响型：外向、热情、善于社交"),
    ("S", "稳健型", "S型 - 稳健型：耐心、可靠、支持他人"),
    ("C", "谨慎型", "C型 - 谨慎型：精确、分析、注重细节"),
];

/// Forced-choice answers map letters to styles: A=D, B=I, C=S, D=C.
const LETTER_STYLES: [&str; 4] = ["A", "B", "C", "D"];

const SCALE_MAX: f64 = 5.0;

/// DISC: behavioural style profile, 28 five-point agreement items (7 per style).
pub struct Disc;

impl Instrument for Disc {
    fn kind(&self) -> QuestionnaireType {
        QuestionnaireType::Disc
    }

    fn name(&self) -> &str {
        "DISC 行为风格测评"
    }

    fn description(&self) -> &str {
        "评估支配、影响、稳健、谨慎四种行为风格倾向"
    }

    fn estimated_minutes(&self) -> u32 {
        10
    }

    fn dimensions(&self) -> &[DimensionDef] {
        static DIMENSIONS: LazyLock<Vec<DimensionDef>> = LazyLock::new(|| {
            STYLES
                .iter()
                .map(|(code, label, description)| DimensionDef::new(code, label, description))
                .collect()
        });
        &DIMENSIONS
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
            let scale = ScaleRange {
                min: 1,
                max: 5,
                min_label: Some("非常不同意".to_string()),
                max_label: Some("非常同意".to_string()),
            };
            ITEMS
                .iter()
                .map(|(order, dimension, text)| {
                    Question::new(format!("disc_{order}"), *order, QuestionKind::Scale, *text)
                        .with_dimension(*dimension)
                        .with_scale(scale.clone())
                })
                .collect()
        });
        &QUESTIONS
    }

    fn score(&self, questions: &[Question], answers: &Answers) -> ScoredResult {
        let mut raw = [0.0f64; 4];
        let mut items = [0u32; 4];

        for question in questions {
            let Some(slot) = question
                .dimension
                .as_deref()
                .and_then(|d| STYLES.iter().position(|(code, ..)| *code == d))
            else {
                continue;
            };
            items[slot] += 1;

            let Some(answer) = answers.lookup(&question.id) else {
                continue;
            };
            if let Some(value) = answer.as_number()
                && (1.0..=SCALE_MAX).contains(&value)
            {
                raw[slot] += value;
            } else if let Some(letter) = answer.as_text().map(|t| t.to_uppercase())
                && let Some(target) = LETTER_STYLES.iter().position(|l| *l == letter)
            {
                raw[target] += 1.0;
            }
        }

        let dimensions: Vec<DiscDimension> = STYLES
            .iter()
            .enumerate()
            .map(|(i, (code, label, _))| {
                let max = f64::from(items[i]) * SCALE_MAX;
                let value = if max > 0.0 {
                    ((raw[i] / max * 100.0) as u32).min(100)
                } else {
                    0
                };
                DiscDimension {
                    code: code.to_string(),
                    label: label.to_string(),
                    value,
                    raw_score: raw[i],
                }
            })
            .collect();

        // First maximum wins, so ties resolve in D, I, S, C order.
        let dominant = (1..4).fold(0, |best, i| if raw[i] > raw[best] { i } else { best });
        let (code, _, description) = STYLES[dominant];
        let total = f64::from(dimensions[dominant].value);

        ScoredResult {
            total_score: Some(total),
            grade: Some(self.grades().cutoffs().grade_for(total).to_string()),
            details: ResultDetails::Disc(DiscResult {
                disc_type: format!("{code}型"),
                dominant: code.to_string(),
                description: description.to_string(),
                dimensions,
            }),
        }
    }
}

/// `(order, dimension, text)`
const ITEMS: &[(u32, &str, &str)] = &[
    (1, "D", "我喜欢掌控局面并做出决策"),
    (2, "D", "我喜欢接受挑战和竞争"),
    (3, "D", "我倾向于直接表达自己的观点"),
    (4, "D", "我喜欢快速做出决定"),
    (5, "D", "我更关注结果而非过程"),
    (6, "D", "我喜欢领导团队"),
    (7, "D", "我不怕承担风险"),
    (8, "I", "我喜欢与人交流和社交活动"),
    (9, "I", "我善于激励和影响他人"),
    (10, "I", "我喜欢成为关注的焦点"),
    (11, "I", "我容易与人建立友好关系"),
    (12, "I", "我喜欢表达自己的想法和感受"),
    (13, "I", "我是一个乐观的人"),
    (14, "I", "我喜欢团队合作"),
    (15, "S", "我喜欢稳定和可预测的环境"),
    (16, "S", "我是一个有耐心的人"),
    (17, "S", "我喜欢帮助和支持他人"),
    (18, "S", "我不喜欢突然的变化"),
    (19, "S", "我是一个忠诚可靠的人"),
    (20, "S", "我喜欢按部就班地工作"),
    (21, "S", "我善于倾听他人"),
    (22, "C", "我注重细节和准确性"),
    (23, "C", "我喜欢遵循规则和程序"),
    (24, "C", "我在做决定前喜欢收集充分信息"),
    (25, "C", "我追求高质量和高标准"),
    (26, "C", "我是一个谨慎的人"),
    (27, "C", "我喜欢分析和解决问题"),
    (28, "C", "我注重事实和逻辑"),
];
