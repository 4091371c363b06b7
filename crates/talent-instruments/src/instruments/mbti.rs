use std::sync::LazyLock;

use talent_core::models::answer::Answers;
use talent_core::models::question::{Question, QuestionKind, QuestionOption};
use talent_core::models::questionnaire::{DimensionDef, QuestionnaireType};
use talent_core::models::result::{MbtiDimension, MbtiResult, ResultDetails, ScoredResult};

use crate::Instrument;

/// `(code, A pole, B pole, A label, B label)`, in type-letter order.
const PAIRS: [(&str, &str, &str, &str, &str); 4] = [
    ("EI", "E", "I", "外向型", "内向型"),
    ("SN", "S", "N", "感觉型", "直觉型"),
    ("TF", "T", "F", "思考型", "情感型"),
    ("JP", "J", "P", "判断型", "知觉型"),
];

const TYPE_DESCRIPTIONS: [(&str, &str); 16] = [
    ("INTJ", "建筑师 - 富有想象力和战略性的思考者"),
    ("INTP", "逻辑学家 - 具有创新性的发明家"),
    ("ENTJ", "指挥官 - 大胆、富有想象力且意志强大的领导者"),
    ("ENTP", "辩论家 - 聪明好奇的思想家"),
    ("INFJ", "提倡者 - 安静而神秘且充满灵感"),
    ("INFP", "调停者 - 诗意、善良且利他的人"),
    ("ENFJ", "主人公 - 具有魅力且鼓舞人心的领导者"),
    ("ENFP", "竞选者 - 热情、富有创造力和社交能力的自由人"),
    ("ISTJ", "物流师 - 实际且注重事实的个人"),
    ("ISFJ", "守卫者 - 非常专注且温暖的守护者"),
    ("ESTJ", "总经理 - 出色的管理者"),
    ("ESFJ", "执政官 - 极有同情心、受欢迎且乐于助人"),
    ("ISTP", "鉴赏家 - 大胆而实际的实验者"),
    ("ISFP", "探险家 - 灵活且富有魅力的艺术家"),
    ("ESTP", "企业家 - 聪明、精力充沛且善于察言观色"),
    ("ESFP", "表演者 - 自发的、精力充沛和热情的艺人"),
];

pub fn type_description(mbti_type: &str) -> String {
    TYPE_DESCRIPTIONS
        .iter()
        .find(|(t, _)| *t == mbti_type)
        .map(|(_, d)| d.to_string())
        .unwrap_or_else(|| format!("{mbti_type}人格类型"))
}

/// MBTI: Myers-Briggs Type Indicator, 93 forced-choice items.
/// Each item loads on one preference pair; answer A favours the first pole.
pub struct Mbti;

impl Instrument for Mbti {
    fn kind(&self) -> QuestionnaireType {
        QuestionnaireType::Mbti
    }

    fn name(&self) -> &str {
        "MBTI 职业性格测试"
    }

    fn description(&self) -> &str {
        "通过四个维度的偏好判断十六种人格类型"
    }

    fn estimated_minutes(&self) -> u32 {
        20
    }

    fn dimensions(&self) -> &[DimensionDef] {
        static DIMENSIONS: LazyLock<Vec<DimensionDef>> = LazyLock::new(|| {
            vec![
                DimensionDef::new("EI", "外向/内向", "精力来源"),
                DimensionDef::new("SN", "感觉/直觉", "信息获取方式"),
                DimensionDef::new("TF", "思考/情感", "决策方式"),
                DimensionDef::new("JP", "判断/知觉", "生活方式"),
            ]
        });
        &DIMENSIONS
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
            ITEMS
                .iter()
                .map(|(order, dimension, text, a, b)| {
                    Question::new(format!("mbti_{order}"), *order, QuestionKind::Choice, *text)
                        .with_dimension(*dimension)
                        .with_options(vec![
                            QuestionOption::new("A", *a),
                            QuestionOption::new("B", *b),
                        ])
                })
                .collect()
        });
        &QUESTIONS
    }

    fn score(&self, questions: &[Question], answers: &Answers) -> ScoredResult {
        let mut counts = [(0u32, 0u32); 4];

        for question in questions {
            let Some(slot) = question
                .dimension
                .as_deref()
                .and_then(|d| PAIRS.iter().position(|(code, ..)| *code == d))
            else {
                continue;
            };
            let choice = answers
                .lookup(&question.id)
                .and_then(|a| a.as_text())
                .map(|t| t.to_uppercase());
            match choice.as_deref() {
                Some("A") => counts[slot].0 += 1,
                Some("B") => counts[slot].1 += 1,
                _ => {}
            }
        }

        let mut mbti_type = String::new();
        let dimensions: Vec<MbtiDimension> = PAIRS
            .iter()
            .zip(counts)
            .map(|((code, a_pole, b_pole, a_label, b_label), (a, b))| {
                let total = a + b;
                let a_pct = if total == 0 {
                    50.0
                } else {
                    f64::from(a) / f64::from(total) * 100.0
                };
                let (tendency, label, value) = if a_pct > 50.0 {
                    (*a_pole, *a_label, a_pct as u32)
                } else {
                    (*b_pole, *b_label, (100.0 - a_pct) as u32)
                };
                mbti_type.push_str(tendency);
                MbtiDimension {
                    code: code.to_string(),
                    tendency: tendency.to_string(),
                    label: label.to_string(),
                    value,
                    description: format!("倾向于{label}"),
                }
            })
            .collect();

        let total = dimensions.iter().map(|d| d.value).sum::<u32>() / 4;
        let total = f64::from(total);

        ScoredResult {
            total_score: Some(total),
            grade: Some(self.grades().cutoffs().grade_for(total).to_string()),
            details: ResultDetails::Mbti(MbtiResult {
                description: type_description(&mbti_type),
                mbti_type,
                dimensions,
            }),
        }
    }
}

/// `(order, dimension, text, option_a, option_b)`
const ITEMS: &[(u32, &str, &str, &str, &str)] = &[
    (
        1,
        "EI",
        "在聚会上，你通常：",
        "与很多人交流，结交新朋友",
        "只与少数熟人深入交谈",
    ),
    (
        2,
        "EI",
        "你更喜欢：",
        "在人群中获得能量",
        "独处时充电恢复精力",
    ),
    (
        3,
        "EI",
        "在工作中，你倾向于：",
        "与他人合作讨论",
        "独立思考和工作",
    ),
    (
        4,
        "EI",
        "周末时，你更喜欢：",
        "参加社交活动",
        "在家安静休息",
    ),
    (
        5,
        "EI",
        "当你有新想法时，你通常：",
        "立即与他人分享讨论",
        "先自己思考整理",
    ),
    (
        6,
        "EI",
        "你的朋友圈：",
        "广泛，认识很多人",
        "小而深，几个知心好友",
    ),
    (
        7,
        "EI",
        "在会议中，你通常：",
        "积极发言表达观点",
        "倾听思考后发言",
    ),
    (
        8,
        "EI",
        "你更喜欢的学习方式：",
        "小组讨论学习",
        "自学看书研究",
    ),
    (
        9,
        "EI",
        "当遇到问题时，你倾向于：",
        "找人讨论寻求帮助",
        "自己先尝试解决",
    ),
    (
        10,
        "EI",
        "你更擅长：",
        "口头表达",
        "书面表达",
    ),
    (
        11,
        "EI",
        "在陌生环境中，你通常：",
        "主动与人交谈",
        "等待他人主动接近",
    ),
    (
        12,
        "EI",
        "长时间独处后，你会：",
        "渴望社交互动",
        "感到舒适自在",
    ),
    (
        13,
        "EI",
        "你的能量来源于：",
        "与他人的互动",
        "内心的思考",
    ),
    (
        14,
        "EI",
        "你更喜欢：",
        "热闹的环境",
        "安静的环境",
    ),
    (
        15,
        "EI",
        "当你需要做决定时：",
        "喜欢与他人讨论",
        "喜欢独自思考",
    ),
    (
        16,
        "EI",
        "你的思考方式：",
        "边说边想",
        "想好再说",
    ),
    (
        17,
        "EI",
        "在团队中，你更适合：",
        "协调沟通角色",
        "专注执行角色",
    ),
    (
        18,
        "EI",
        "你更喜欢的工作环境：",
        "开放式办公",
        "独立办公室",
    ),
    (
        19,
        "EI",
        "当你感到压力时：",
        "找人倾诉",
        "独自消化",
    ),
    (
        20,
        "EI",
        "你更容易：",
        "被打断思路",
        "过度沉浸在思考中",
    ),
    (
        21,
        "EI",
        "你的休闲活动：",
        "社交聚会",
        "阅读或个人爱好",
    ),
    (
        22,
        "EI",
        "在电话中，你通常：",
        "喜欢长时间聊天",
        "简短说完事情",
    ),
    (
        23,
        "EI",
        "你更喜欢：",
        "广泛涉猎各种话题",
        "深入研究某个领域",
    ),
    (
        24,
        "SN",
        "你更关注：",
        "具体的事实和细节",
        "可能性和整体概念",
    ),
    (
        25,
        "SN",
        "你更喜欢：",
        "实际可行的方案",
        "创新有想象力的方案",
    ),
    (
        26,
        "SN",
        "在描述事物时，你倾向于：",
        "具体详细",
        "概括抽象",
    ),
    (
        27,
        "SN",
        "你更信任：",
        "实际经验",
        "直觉感受",
    ),
    (
        28,
        "SN",
        "在学习新事物时，你偏好：",
        "实践操作，亲身体验",
        "理论思考，理解原理",
    ),
    (
        29,
        "SN",
        "你更喜欢的工作内容：",
        "明确具体的任务",
        "开放性的问题",
    ),
    (
        30,
        "SN",
        "当你阅读时，你更关注：",
        "字面意思",
        "言外之意",
    ),
    (
        31,
        "SN",
        "你更擅长记住：",
        "具体事实",
        "整体印象",
    ),
    (
        32,
        "SN",
        "当面对问题时，你首先：",
        "收集具体信息",
        "寻找模式规律",
    ),
    (
        33,
        "SN",
        "你更喜欢：",
        "按部就班的工作",
        "创新突破的工作",
    ),
    (
        34,
        "SN",
        "你的思维方式：",
        "从具体到抽象",
        "从抽象到具体",
    ),
    (
        35,
        "SN",
        "你更关心：",
        "现在发生的事",
        "未来的可能性",
    ),
    (
        36,
        "SN",
        "当别人描述事情时，你希望他们：",
        "详细具体",
        "简洁概括",
    ),
    (
        37,
        "SN",
        "你更喜欢：",
        "使用已验证的方法",
        "尝试新的方法",
    ),
    (
        38,
        "SN",
        "你的优势是：",
        "注重细节",
        "把握全局",
    ),
    (
        39,
        "SN",
        "你更喜欢：",
        "明确的指示",
        "大方向的指引",
    ),
    (
        40,
        "SN",
        "当遇到新情况时，你会：",
        "参考过去经验",
        "探索新可能",
    ),
    (
        41,
        "SN",
        "你更擅长：",
        "执行落实",
        "策划构思",
    ),
    (
        42,
        "SN",
        "你更喜欢讨论：",
        "实际问题",
        "理论观点",
    ),
    (
        43,
        "SN",
        "你的观察方式：",
        "关注具体细节",
        "关注整体模式",
    ),
    (
        44,
        "SN",
        "你更喜欢的书籍：",
        "实用类",
        "想象类",
    ),
    (
        45,
        "SN",
        "你更注重：",
        "实际可行性",
        "创新可能性",
    ),
    (
        46,
        "SN",
        "你的表达方式：",
        "直接明了",
        "含蓄委婉",
    ),
    (
        47,
        "TF",
        "做决定时，你更看重：",
        "逻辑分析和客观标准",
        "个人价值观和对他人的影响",
    ),
    (
        48,
        "TF",
        "当朋友有问题时，你通常：",
        "帮助分析问题找解决方案",
        "倾听并给予情感支持",
    ),
    (
        49,
        "TF",
        "你更欣赏的品质：",
        "公正客观",
        "善解人意",
    ),
    (
        50,
        "TF",
        "在争论中，你更注重：",
        "谁的观点更有道理",
        "维护关系和感情",
    ),
    (
        51,
        "TF",
        "批评别人时，你通常：",
        "直接指出问题",
        "考虑对方感受",
    ),
    (
        52,
        "TF",
        "你更看重：",
        "真相和事实",
        "和谐和感情",
    ),
    (
        53,
        "TF",
        "当你评估一件事时：",
        "用逻辑分析利弊",
        "用感觉判断好坏",
    ),
    (
        54,
        "TF",
        "你更喜欢被认为是：",
        "能干有能力",
        "善良有同情心",
    ),
    (
        55,
        "TF",
        "在团队中，你更关注：",
        "完成任务目标",
        "团队成员感受",
    ),
    (
        56,
        "TF",
        "当别人犯错时，你倾向于：",
        "指出错误帮助改正",
        "理解原因给予鼓励",
    ),
    (
        57,
        "TF",
        "你的沟通风格：",
        "直接坦率",
        "委婉体贴",
    ),
    (
        58,
        "TF",
        "你更容易被：",
        "逻辑论证说服",
        "情感诉求打动",
    ),
    (
        59,
        "TF",
        "你更重视：",
        "效率和成果",
        "过程和体验",
    ),
    (
        60,
        "TF",
        "当你需要给建议时：",
        "给出客观分析",
        "考虑对方感受",
    ),
    (
        61,
        "TF",
        "你更认同：",
        "对事不对人",
        "人情味更重要",
    ),
    (
        62,
        "TF",
        "处理冲突时，你倾向于：",
        "就事论事解决问题",
        "先安抚情绪再处理",
    ),
    (
        63,
        "TF",
        "你更希望别人：",
        "认可你的能力",
        "认可你的为人",
    ),
    (
        64,
        "TF",
        "在做选择时：",
        "理性分析各种因素",
        "跟随内心感受",
    ),
    (
        65,
        "TF",
        "你更看重朋友的：",
        "诚实直接",
        "体贴温暖",
    ),
    (
        66,
        "TF",
        "你的优势是：",
        "客观公正",
        "善解人意",
    ),
    (
        67,
        "TF",
        "当你不同意别人时：",
        "会直接表达",
        "会委婉暗示",
    ),
    (
        68,
        "TF",
        "你更关注：",
        "事情对不对",
        "别人感受好不好",
    ),
    (
        69,
        "TF",
        "你更喜欢：",
        "清晰的逻辑",
        "温暖的氛围",
    ),
    (
        70,
        "TF",
        "当需要做艰难决定时：",
        "依靠理性分析",
        "依靠直觉感受",
    ),
    (
        71,
        "JP",
        "你更喜欢的生活方式是：",
        "有计划、有组织的",
        "灵活、随性的",
    ),
    (
        72,
        "JP",
        "当面对任务时，你通常：",
        "提前规划按时完成",
        "临近截止日期才行动",
    ),
    (
        73,
        "JP",
        "你更喜欢：",
        "事情有定论",
        "保持开放选择",
    ),
    (
        74,
        "JP",
        "在日程安排上，你倾向于：",
        "详细计划每一天",
        "灵活应对变化",
    ),
    (
        75,
        "JP",
        "当计划被打乱时，你会：",
        "感到不安",
        "觉得没关系",
    ),
    (
        76,
        "JP",
        "你的工作台通常：",
        "整齐有序",
        "看似杂乱但自己能找到",
    ),
    (
        77,
        "JP",
        "做决定时，你倾向于：",
        "尽快做出决定",
        "收集更多信息再说",
    ),
    (
        78,
        "JP",
        "你更喜欢：",
        "按计划行事",
        "随机应变",
    ),
    (
        79,
        "JP",
        "在旅行时，你倾向于：",
        "提前规划好行程",
        "走到哪算哪",
    ),
    (
        80,
        "JP",
        "你更喜欢的工作方式：",
        "有明确的截止日期",
        "灵活的时间安排",
    ),
    (
        81,
        "JP",
        "当你完成一件事时，你会：",
        "感到满足，可以放松了",
        "开始想还有什么可以改进",
    ),
    (
        82,
        "JP",
        "你的优势是：",
        "按时完成任务",
        "适应变化",
    ),
    (
        83,
        "JP",
        "你更喜欢：",
        "确定的答案",
        "开放的问题",
    ),
    (
        84,
        "JP",
        "在做项目时，你倾向于：",
        "先做计划再执行",
        "边做边调整",
    ),
    (
        85,
        "JP",
        "你更喜欢：",
        "事先知道会发生什么",
        "惊喜和意外",
    ),
    (
        86,
        "JP",
        "当你购物时：",
        "列好清单按计划买",
        "随意逛看到喜欢就买",
    ),
    (
        87,
        "JP",
        "你更喜欢：",
        "快速做出决定",
        "保留选择权",
    ),
    (
        88,
        "JP",
        "在时间管理上，你：",
        "严格遵守时间表",
        "根据情况灵活调整",
    ),
    (
        89,
        "JP",
        "你更喜欢：",
        "完成一件事再开始下一件",
        "同时处理多件事",
    ),
    (
        90,
        "JP",
        "当有多个选择时，你：",
        "尽快确定一个",
        "尽量保持选择开放",
    ),
    (
        91,
        "JP",
        "你的生活节奏：",
        "有规律可预测",
        "多变有惊喜",
    ),
    (
        92,
        "JP",
        "你更喜欢：",
        "稳定的例行公事",
        "新鲜的变化",
    ),
    (
        93,
        "JP",
        "在完成任务后，你通常：",
        "检查确认后结束",
        "想着还有什么可以补充",
    ),
];
