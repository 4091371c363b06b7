use std::sync::LazyLock;

use talent_core::models::answer::Answers;
use talent_core::models::question::{Polarity, Question, QuestionKind, QuestionOption};
use talent_core::models::questionnaire::{DimensionDef, QuestionnaireType};
use talent_core::models::result::{
    EpqDimension, EpqLevel, EpqResult, ResultDetails, ScoredResult,
};

use crate::Instrument;
use crate::scoring::TScoreScale;

/// `(code, label)` in report order.
const SCALES: [(&str, &str); 4] = [
    ("E", "外向性"),
    ("N", "神经质"),
    ("P", "精神质"),
    ("L", "掩饰性"),
];

/// Personality trait from the extraversion and neuroticism levels.
pub fn personality_trait(e: EpqLevel, n: EpqLevel) -> &'static str {
    match (e, n) {
        (EpqLevel::High, EpqLevel::Low) => "外向稳定型",
        (EpqLevel::High, EpqLevel::High) => "外向不稳定型",
        (EpqLevel::Low, EpqLevel::Low) => "内向稳定型",
        _ => "内向不稳定型",
    }
}

/// EPQ: Eysenck Personality Questionnaire, 88 yes/no items.
/// E 21, N 23, P 20, L 24. Negatively keyed items count a "no".
pub struct Epq;

impl Epq {
    pub fn score_with(
        &self,
        questions: &[Question],
        answers: &Answers,
        rescale: &TScoreScale,
    ) -> ScoredResult {
        let mut yes = [0u32; 4];
        let mut answered = [0u32; 4];

        for question in questions {
            let Some(slot) = question.dimension.as_deref().and_then(|d| {
                SCALES
                    .iter()
                    .position(|(code, _)| code.eq_ignore_ascii_case(d))
            }) else {
                continue;
            };
            let Some(answer) = answers.lookup(&question.id) else {
                continue;
            };
            answered[slot] += 1;

            let mut counts = answer.is_affirmative();
            if question.polarity == Some(Polarity::Negative) {
                counts = !counts;
            }
            if counts {
                yes[slot] += 1;
            }
        }

        let dimensions: Vec<EpqDimension> = SCALES
            .iter()
            .enumerate()
            .map(|(i, (code, label))| {
                let t_score = rescale.t_score(yes[i], answered[i]);
                EpqDimension {
                    code: code.to_string(),
                    label: label.to_string(),
                    raw_score: yes[i],
                    t_score,
                    level: EpqLevel::from_t_score(t_score),
                    total_questions: answered[i],
                }
            })
            .collect();

        let total = f64::from(dimensions.iter().map(|d| d.t_score).sum::<i32>() / 4);

        ScoredResult {
            total_score: Some(total),
            grade: Some(self.grades().cutoffs().grade_for(total).to_string()),
            details: ResultDetails::Epq(EpqResult {
                personality_trait: personality_trait(dimensions[0].level, dimensions[1].level)
                    .to_string(),
                dimensions,
            }),
        }
    }
}

impl Instrument for Epq {
    fn kind(&self) -> QuestionnaireType {
        QuestionnaireType::Epq
    }

    fn name(&self) -> &str {
        "EPQ 艾森克人格问卷"
    }

    fn description(&self) -> &str {
        "测量外向性、神经质、精神质与掩饰性四个人格维度"
    }

    fn estimated_minutes(&self) -> u32 {
        15
    }

    fn dimensions(&self) -> &[DimensionDef] {
        static DIMENSIONS: LazyLock<Vec<DimensionDef>> = LazyLock::new(|| {
            SCALES
                .iter()
                .map(|(code, label)| DimensionDef::new(code, label, ""))
                .collect()
        });
        &DIMENSIONS
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
            ITEMS
                .iter()
                .map(|(order, dimension, text, positive)| {
                    let polarity = if *positive {
                        Polarity::Positive
                    } else {
                        Polarity::Negative
                    };
                    Question::new(format!("epq_{order}"), *order, QuestionKind::YesNo, *text)
                        .with_dimension(*dimension)
                        .with_polarity(polarity)
                        .with_options(vec![
                            QuestionOption::new("yes", "是"),
                            QuestionOption::new("no", "否"),
                        ])
                })
                .collect()
        });
        &QUESTIONS
    }

    fn score(&self, questions: &[Question], answers: &Answers) -> ScoredResult {
        self.score_with(questions, answers, &TScoreScale::default())
    }
}

/// `(order, dimension, text, positive)`
const ITEMS: &[(u32, &str, &str, bool)] = &[
    (1, "E", "你是否喜欢周围热闹？", true),
    (2, "E", "你是否是一个健谈的人？", true),
    (3, "E", "你是否喜欢参加聚会？", true),
    (4, "E", "你是否喜欢结交新朋友？", true),
    (5, "E", "你是否喜欢和别人开玩笑？", true),
    (6, "E", "你是否宁愿看书也不愿去社交？", false),
    (7, "E", "你是否喜欢独处？", false),
    (8, "E", "在社交场合你是否容易放松？", true),
    (9, "E", "你是否善于使聚会活跃起来？", true),
    (10, "E", "你是否经常主动和陌生人交谈？", true),
    (11, "E", "你是否喜欢有许多人围着你？", true),
    (12, "E", "你是否喜欢安静的环境？", false),
    (13, "E", "你是否经常参加社交活动？", true),
    (14, "E", "你是否喜欢在人群中成为焦点？", true),
    (15, "E", "你是否容易和别人打成一片？", true),
    (16, "E", "你是否喜欢独自工作？", false),
    (17, "E", "你是否喜欢热闹的活动？", true),
    (18, "E", "你是否经常感到活力充沛？", true),
    (19, "E", "你是否喜欢冒险和刺激？", true),
    (20, "E", "你是否喜欢变化和新鲜感？", true),
    (21, "E", "你是否喜欢按计划行事而非随机应变？", false),
    (22, "N", "你是否经常感到紧张或焦虑？", true),
    (23, "N", "你是否容易感到不安？", true),
    (24, "N", "你是否经常感到孤独？", true),
    (25, "N", "你是否容易受伤害？", true),
    (26, "N", "你是否经常为过去的事情后悔？", true),
    (27, "N", "你是否容易发脾气？", true),
    (28, "N", "你是否经常失眠？", true),
    (29, "N", "你是否容易感到疲倦？", true),
    (30, "N", "你是否经常感到情绪低落？", true),
    (31, "N", "你是否容易被别人的情绪影响？", true),
    (32, "N", "你是否经常担心可能会发生不好的事？", true),
    (33, "N", "你是否经常感到紧张不安？", true),
    (34, "N", "你是否容易感到内疚？", true),
    (35, "N", "你是否经常觉得自己不如别人？", true),
    (36, "N", "你是否容易受批评影响？", true),
    (37, "N", "你是否经常感到心情起伏不定？", true),
    (38, "N", "你是否经常感到烦躁？", true),
    (39, "N", "你是否容易感到紧张和压力？", true),
    (40, "N", "你是否经常觉得自己会失败？", true),
    (41, "N", "你是否容易感到沮丧？", true),
    (42, "N", "你是否经常感到焦虑不安？", true),
    (43, "N", "你是否容易感到悲伤？", true),
    (44, "N", "你是否经常为小事烦恼？", true),
    (45, "P", "你是否喜欢恶作剧？", true),
    (46, "P", "你是否认为规则可以被打破？", true),
    (47, "P", "你是否喜欢与众不同？", true),
    (48, "P", "你是否不太关心别人的感受？", true),
    (49, "P", "你是否喜欢冒险而不考虑后果？", true),
    (50, "P", "你是否容易对别人感到厌烦？", true),
    (51, "P", "你是否不太在意社会规范？", true),
    (52, "P", "你是否喜欢做一些出格的事？", true),
    (53, "P", "你是否认为大多数人都太敏感了？", true),
    (54, "P", "你是否喜欢嘲笑别人？", true),
    (55, "P", "你是否不太考虑道德问题？", true),
    (56, "P", "你是否喜欢挑战权威？", true),
    (57, "P", "你是否容易感到无聊？", true),
    (58, "P", "你是否认为诚实有时候是愚蠢的？", true),
    (59, "P", "你是否不太在意别人怎么看你？", true),
    (60, "P", "你是否喜欢独来独往？", true),
    (61, "P", "你是否认为大多数人不值得信任？", true),
    (62, "P", "你是否不太感到内疚？", true),
    (63, "P", "你是否喜欢冷酷的幽默？", true),
    (64, "P", "你是否不太关心传统习俗？", true),
    (65, "L", "你是否总是说实话？", true),
    (66, "L", "你是否从不说谎？", true),
    (67, "L", "你是否总是遵守承诺？", true),
    (68, "L", "你是否从不迟到？", true),
    (69, "L", "你是否总是礼貌待人？", true),
    (70, "L", "你是否从不说别人坏话？", true),
    (71, "L", "你是否总是帮助别人？", true),
    (72, "L", "你是否从不发脾气？", true),
    (73, "L", "你是否总是按时完成任务？", true),
    (74, "L", "你是否从不嫉妒别人？", true),
    (75, "L", "你是否总是接受批评？", true),
    (76, "L", "你是否从不偷懒？", true),
    (77, "L", "你是否总是尊重别人？", true),
    (78, "L", "你是否从不抱怨？", true),
    (79, "L", "你是否总是乐于助人？", true),
    (80, "L", "你是否从不感到生气？", true),
    (81, "L", "你是否总是承认错误？", true),
    (82, "L", "你是否从不做坏事？", true),
    (83, "L", "你是否总是守时？", true),
    (84, "L", "你是否从不有私心？", true),
    (85, "L", "你是否总是公平对待别人？", true),
    (86, "L", "你是否从不感到嫉妒？", true),
    (87, "L", "你是否总是控制自己的情绪？", true),
    (88, "L", "你是否从不占别人便宜？", true),
];
