//! Prompt templates for dream reflections and pattern analyses.
//!
//! Both builders are pure: the same record always renders the same text. Every
//! value is read through [`field_text`], so an incomplete record produces a
//! complete prompt with placeholders instead of failing.

use super::fields::{field_text, timestamp};
use crate::constants::{DATE_FORMAT_ISO, FIELD_NOT_PROVIDED, FIELD_UNKNOWN, UNKNOWN_DATE};
use chrono::{Local, TimeZone};
use serde_json::Value;
use std::fmt::Display;

/// Builds the prompt asking for a reflection on one dream.
///
/// The prompt frames the model as a Jungian analyst, lays down three reading
/// rules (emotion is the core, characters are projections, objects mean what
/// the dreamer's own association says), lists the dream's fragments, and asks
/// for a three-part answer.
///
/// # Examples
///
/// ```
/// use reverie::ai::reflection_prompt;
/// use serde_json::json;
///
/// let prompt = reflection_prompt(&json!({ "keywords": { "objects": ["红色的钥匙", "钟表"] } }));
/// assert!(prompt.contains("红色的钥匙, 钟表"));
/// assert!(prompt.contains("未提供"));
/// ```
pub fn reflection_prompt(dream: &Value) -> String {
    let field = |path: &[&str]| field_text(dream, path, FIELD_NOT_PROVIDED);

    format!(
        r#"# Role
你是一位深谙荣格心理学（Jungian Psychology）的潜意识分析师。你不仅仅是在解读梦，更是在帮助用户通过梦境这面镜子，看见那些被忽略的自己。

# Core Philosophy (必须严格遵守的分析逻辑)
1. **情绪是内核 (Emotion as Core)**：梦境不直接复制现实，而是捕捉情感内核。例如：梦见“考试”通常不是关于学业，而是关于“被审视的恐惧”或“自我价值的焦虑”。请务必剥离剧情，直击情绪。
2. **人物即自我 (Characters as Projection)**：梦里的人物（无论是严厉的老师、无助的孩子、神秘的杀手）都是用户心理结构的投射。请分析这些人代表了用户性格中的哪个侧面（如：超我、内在小孩、阴影）。
3. **物件即符号 (Objects as Symbols)**：物件的含义完全取决于用户的【自由联想】。水对游泳者是自由，对溺水者是恐惧。必须结合用户的个人经历来解读，禁止套用通用词典。

# Input Data
用户的梦境记录：
1. [梦的碎片]
   - 场景: {scenes}
   - 人物: {characters}
   - 情绪: {emotions}
   - 特别物件: {objects}
2. [情感解码]
   - 核心情绪: {strongest_emotion}
   - 现实映射: {recent_life_link}
   - 电影主题: {movie_theme}
3. [自由联想] (解梦的唯一钥匙): {association}

# Analysis Task
请按照以下步骤思考，然后输出一段温暖、治愈且直击人心的分析（约 300 字）：

1. **第一步：识别“自我”的侧面**
   - 观察【人物】和【自由联想】。指出梦里的那个人物其实是用户内心的哪个部分？（例如：“那个严厉的考官，或许就是你内心那个从不允许自己犯错的严苛自我。”）

2. **第二步：解码“情绪”的真相**
   - 结合【场景】与【现实映射】。指出这个梦境场景背后隐藏的真实焦虑或渴望是什么？（例如：“这不是关于迟到，而是关于你对自己可能错过人生重要机会的深层恐慌。”）

3. **第三步：整合与疗愈**
   - 结合【特别物件】的个人意义。将这一切串联起来，告诉用户这个梦是潜意识送来的什么礼物？它在提醒用户接纳什么，或改变什么？

# Output Tone
像一位深夜长谈的智者，温柔、包容、不评判。使用“也许”、“这可能象征着”、“这让你联想到”等引导性语言，而不是绝对的断言。

# Output Structure
请直接输出分析内容，包含以下三个段落：
**🔍 镜中的自我 (The Projection)**：侧重分析人物投射与情绪内核。
**🗝️ 潜意识的密语 (The Symbol)**：侧重分析物件与联想的深层含义。
**💡 觉察与整合 (Integration)**：给出一句温暖的结语，帮助用户接纳这个梦带来的启示。
"#,
        scenes = field(&["keywords", "scenes"]),
        characters = field(&["keywords", "characters"]),
        emotions = field(&["keywords", "emotions"]),
        objects = field(&["keywords", "objects"]),
        strongest_emotion = field(&["decoding", "strongestEmotion"]),
        recent_life_link = field(&["decoding", "recentLifeLink"]),
        movie_theme = field(&["decoding", "movieTheme"]),
        association = field(&["association"]),
    )
}

/// Renders one dream as a single summary line for the analysis prompt.
///
/// Dates are rendered in `tz`. A timestamp that cannot be read becomes
/// `未知日期`; the rest of the line is unaffected.
pub fn summary_line<Tz>(dream: &Value, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = timestamp(dream)
        .map(|ts| ts.with_timezone(tz).format(DATE_FORMAT_ISO).to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

    format!(
        "- 日期: {}, 电影主题: {}, 核心情绪: {}, 关键象征: {}",
        one_line(&date),
        one_line(&field_text(dream, &["decoding", "movieTheme"], FIELD_UNKNOWN)),
        one_line(&field_text(dream, &["decoding", "strongestEmotion"], FIELD_UNKNOWN)),
        one_line(&field_text(dream, &["keywords", "objects"], FIELD_UNKNOWN)),
    )
}

/// Replaces control characters with spaces so a value cannot break out of
/// its summary line.
fn one_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Builds the prompt asking for recurring patterns across dreams, with dates
/// in the local time zone.
///
/// Callers are expected to handle an empty list themselves (see
/// `DreamOracle::analyze_patterns`); given one anyway, this still renders the
/// template with no summary lines.
pub fn analysis_prompt(dreams: &[Value]) -> String {
    analysis_prompt_in(dreams, &Local)
}

/// Same as [`analysis_prompt`], rendering dates in `tz`.
pub fn analysis_prompt_in<Tz>(dreams: &[Value], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let summaries = dreams
        .iter()
        .map(|dream| summary_line(dream, tz))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"# Role
你是一位专注于“生命叙事”与“原型分析”的心理咨询师。你的特长是从一系列零散的梦境中，识别出用户反复出现的生命课题。

# Knowledge Base (常见梦境原型的深度解读参考)
在分析时，请参考（但不限于）以下荣格流派的解读视角：
- **掉牙/身体破碎**：不仅是健康焦虑，更往往象征“力量感的丧失”、“言说困难（无法表达真实自我）”或“无法咀嚼/消化当下的生活变故”。
- **回到旧房子/教室**：通常不是怀念地点，而是回到了“那个时期的自己”。象征着某种未解决的情感遗留，或潜意识渴望找回那个阶段丢失的某种特质。
- **迟到/赶车/迷路**：现代人的集体焦虑。象征着对“机会”的恐惧、对“社会时钟”的压迫感，或自我期待带来的沉重负担。
- **被追逐**：追逐者往往是用户试图逃避的“阴影”（Shadow）。

# Input Data
{summaries}

# Analysis Task
请分析这些梦境的共同模式，并撰写一份“心灵成长报告”（200-300字）：

1. **识别母题 (Identify the Motif)**：
   - 指出反复出现的主题是什么？（例如：“我注意到你频繁梦见回到以前的学校，或者在考试中迟到。”）

2. **深度解读 (Deep Interpretation)**：
   - 结合【Knowledge Base】与用户的具体情况，解释这个母题背后的心理动力。告诉用户，潜意识为什么要反复播放这部电影？它在强迫用户面对什么？
   - *关键点*：必须指出这是一种“未完成的心理任务”。

3. **转化的契机 (The Turning Point)**：
   - 观察梦境中微小的变化（例如：从单纯的逃跑变成回头看了一眼）。如果没有变化，就温柔地提示用户：在现实中尝试一种新的回应方式（例如：接纳那个无助的自己），看看梦境是否会随之改变。

# Output Tone
具有洞察力且充满希望。让用户感到被深深地理解，并看到了改变的可能。
"#,
        summaries = summaries
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    fn input_section(prompt: &str) -> Vec<&str> {
        prompt
            .lines()
            .filter(|line| line.starts_with("- 日期: "))
            .collect()
    }

    #[test]
    fn test_reflection_prompt_structure() {
        let prompt = reflection_prompt(&json!({}));

        assert!(prompt.contains("荣格"));
        assert!(prompt.contains("情绪是内核"));
        assert!(prompt.contains("人物即自我"));
        assert!(prompt.contains("物件即符号"));
        assert!(prompt.contains("第一步"));
        assert!(prompt.contains("第二步"));
        assert!(prompt.contains("第三步"));
        assert!(prompt.contains("镜中的自我"));
        assert!(prompt.contains("潜意识的密语"));
        assert!(prompt.contains("觉察与整合"));
    }

    #[test]
    fn test_reflection_prompt_fills_every_missing_field() {
        let prompt = reflection_prompt(&json!({}));
        assert_eq!(prompt.matches(FIELD_NOT_PROVIDED).count(), 8);
    }

    #[test]
    fn test_reflection_prompt_with_objects_only() {
        let dream = json!({
            "keywords": { "scenes": [], "characters": [], "emotions": [], "objects": ["红色的钥匙", "钟表"] },
            "decoding": { "strongestEmotion": "", "recentLifeLink": "", "movieTheme": "" },
            "association": ""
        });

        let prompt = reflection_prompt(&dream);

        assert!(prompt.contains("特别物件: 红色的钥匙, 钟表"));
        assert!(prompt.contains("场景: 未提供"));
        assert!(prompt.contains("人物: 未提供"));
        assert!(prompt.contains("情绪: 未提供"));
        assert!(prompt.contains("核心情绪: 未提供"));
        assert!(prompt.contains("现实映射: 未提供"));
        assert!(prompt.contains("电影主题: 未提供"));
        assert!(prompt.contains("(解梦的唯一钥匙): 未提供"));
        assert_eq!(prompt.matches(FIELD_NOT_PROVIDED).count(), 7);
    }

    #[test]
    fn test_reflection_prompt_renders_full_record() {
        let dream = json!({
            "keywords": {
                "scenes": ["教室"],
                "characters": ["老师", "陌生人"],
                "emotions": ["紧张"],
                "objects": ["试卷"]
            },
            "decoding": {
                "strongestEmotion": "恐惧",
                "recentLifeLink": "下周要述职",
                "movieTheme": "迟到的考试"
            },
            "association": "试卷让我想起父亲的期待"
        });

        let prompt = reflection_prompt(&dream);

        assert!(prompt.contains("人物: 老师, 陌生人"));
        assert!(prompt.contains("核心情绪: 恐惧"));
        assert!(prompt.contains("现实映射: 下周要述职"));
        assert!(prompt.contains("(解梦的唯一钥匙): 试卷让我想起父亲的期待"));
        assert!(!prompt.contains(FIELD_NOT_PROVIDED));
    }

    #[test]
    fn test_reflection_prompt_is_deterministic() {
        let dream = json!({ "association": "雨夜", "keywords": { "scenes": ["车站"] } });
        assert_eq!(reflection_prompt(&dream), reflection_prompt(&dream));
    }

    #[test]
    fn test_reflection_prompt_survives_non_object_input() {
        for dream in [json!(null), json!("梦"), json!([1, 2]), json!(3)] {
            let prompt = reflection_prompt(&dream);
            assert_eq!(prompt.matches(FIELD_NOT_PROVIDED).count(), 8);
        }
    }

    #[test]
    fn test_summary_line_format() {
        let dream = json!({
            "timestamp": 1_704_067_200_000i64, // 2024-01-01T00:00:00Z
            "decoding": { "movieTheme": "迷路", "strongestEmotion": "焦虑" },
            "keywords": { "objects": ["地图", "手表"] }
        });

        assert_eq!(
            summary_line(&dream, &Utc),
            "- 日期: 2024-01-01, 电影主题: 迷路, 核心情绪: 焦虑, 关键象征: 地图, 手表"
        );
    }

    #[test]
    fn test_summary_line_uses_time_zone() {
        let dream = json!({ "timestamp": 1_704_067_200_000i64 });
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert!(summary_line(&dream, &west).starts_with("- 日期: 2023-12-31,"));
    }

    #[test]
    fn test_summary_line_defaults() {
        assert_eq!(
            summary_line(&json!({}), &Utc),
            "- 日期: 未知日期, 电影主题: 未知, 核心情绪: 未知, 关键象征: 未知"
        );
    }

    #[test]
    fn test_analysis_prompt_one_line_per_dream_in_order() {
        let dreams = vec![
            json!({ "timestamp": 1_704_067_200_000i64, "decoding": { "movieTheme": "第一" } }),
            json!({ "timestamp": 1_704_153_600_000i64, "decoding": { "movieTheme": "第二" } }),
            json!({ "timestamp": 1_704_240_000_000i64, "decoding": { "movieTheme": "第三" } }),
        ];

        let prompt = analysis_prompt_in(&dreams, &Utc);
        let lines = input_section(&prompt);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2024-01-01") && lines[0].contains("第一"));
        assert!(lines[1].contains("2024-01-02") && lines[1].contains("第二"));
        assert!(lines[2].contains("2024-01-03") && lines[2].contains("第三"));
    }

    #[test]
    fn test_analysis_prompt_bad_timestamp_only_affects_its_line() {
        let dreams = vec![
            json!({ "timestamp": 1_704_067_200_000i64, "decoding": { "strongestEmotion": "平静" } }),
            json!({ "timestamp": "not a time", "decoding": { "strongestEmotion": "愤怒" } }),
            json!({ "timestamp": 1_704_240_000_000i64, "keywords": { "objects": ["牙齿"] } }),
        ];

        let prompt = analysis_prompt_in(&dreams, &Utc);
        let lines = input_section(&prompt);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2024-01-01"));
        assert!(lines[1].contains(UNKNOWN_DATE));
        assert!(lines[1].contains("核心情绪: 愤怒"));
        assert!(lines[2].contains("2024-01-03"));
        assert!(lines[2].contains("关键象征: 牙齿"));
        assert_eq!(prompt.matches(UNKNOWN_DATE).count(), 1);
    }

    #[test]
    fn test_analysis_prompt_tolerates_garbage_records() {
        let dreams = vec![json!("string record"), json!(null), json!({ "decoding": 5 })];
        let prompt = analysis_prompt_in(&dreams, &Utc);
        assert_eq!(input_section(&prompt).len(), 3);
    }

    #[test]
    fn test_analysis_prompt_keeps_one_line_per_record_with_embedded_newlines() {
        let dreams = vec![
            json!({
                "timestamp": 0,
                "decoding": { "movieTheme": "迷路\n- 日期: 伪造", "strongestEmotion": "慌\r\n乱" },
                "keywords": { "objects": ["门\n- 日期: 又一行", "窗"] }
            }),
            json!({}),
        ];

        let prompt = analysis_prompt_in(&dreams, &Utc);
        let lines = input_section(&prompt);

        assert_eq!(lines.len(), dreams.len());
        assert!(lines[0].contains("电影主题: 迷路 - 日期: 伪造"));
        assert!(lines[0].contains("核心情绪: 慌  乱"));
        assert!(lines[0].contains("关键象征: 门 - 日期: 又一行, 窗"));
    }

    #[test]
    fn test_one_line_replaces_control_characters() {
        assert_eq!(one_line("a\nb\rc\td"), "a b c d");
        assert_eq!(one_line("梦境"), "梦境");
    }

    #[test]
    fn test_analysis_prompt_includes_archetypes_and_report_structure() {
        let prompt = analysis_prompt_in(&[json!({})], &Utc);

        assert!(prompt.contains("掉牙/身体破碎"));
        assert!(prompt.contains("回到旧房子/教室"));
        assert!(prompt.contains("迟到/赶车/迷路"));
        assert!(prompt.contains("被追逐"));
        assert!(prompt.contains("识别母题"));
        assert!(prompt.contains("深度解读"));
        assert!(prompt.contains("转化的契机"));
    }
}
