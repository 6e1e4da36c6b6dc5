//! 指令解析器
//!
//! 从自由文本中识别语音控制指令，并将其合并为一组语音参数
//!
//! 两类指令：
//! 1. 位置指令（`speed` / `pitch` / `toot`）：关键字必须是完整的词，
//!    紧随其后的词解析为数值
//! 2. 子串指令（`normal` / `quickly` / ...）：文本中任意位置出现即生效，
//!    按固定顺序应用，后者覆盖前者
//!
//! 位置指令先于子串指令应用，因此同一参数上子串指令总是胜出

use super::value_objects::{SpeechParameters, DEFAULT_PITCH, DEFAULT_RATE, DEFAULT_VOLUME};

/// 已生效的指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppliedDirective {
    Speed(f32),
    Pitch(f32),
    Toot(f32),
    Normal,
    Quickly,
    Slowly,
    Low,
    High,
    Soft,
    Loud,
}

impl AppliedDirective {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Speed(_) => "speed",
            Self::Pitch(_) => "pitch",
            Self::Toot(_) => "toot",
            Self::Normal => "normal",
            Self::Quickly => "quickly",
            Self::Slowly => "slowly",
            Self::Low => "low",
            Self::High => "high",
            Self::Soft => "soft",
            Self::Loud => "loud",
        }
    }
}

/// 位置指令：关键字 + 后随数值
struct PositionalDirective {
    keyword: &'static str,
    directive: fn(f32) -> AppliedDirective,
    apply: fn(&mut SpeechParameters, f32),
}

/// 子串指令：出现即生效
struct SubstringDirective {
    keyword: &'static str,
    directive: AppliedDirective,
    apply: fn(&mut SpeechParameters),
}

const POSITIONAL_DIRECTIVES: &[PositionalDirective] = &[
    PositionalDirective {
        keyword: "speed",
        directive: AppliedDirective::Speed,
        apply: |p, v| p.rate = v,
    },
    PositionalDirective {
        keyword: "pitch",
        directive: AppliedDirective::Pitch,
        apply: |p, v| p.pitch = v,
    },
    PositionalDirective {
        keyword: "toot",
        directive: AppliedDirective::Toot,
        apply: |p, v| p.volume = v,
    },
];

/// 应用顺序即优先级顺序（越靠后优先级越高）
const SUBSTRING_DIRECTIVES: &[SubstringDirective] = &[
    SubstringDirective {
        keyword: "normal",
        directive: AppliedDirective::Normal,
        apply: |p| {
            p.rate = DEFAULT_RATE;
            p.pitch = DEFAULT_PITCH;
            p.volume = DEFAULT_VOLUME;
        },
    },
    SubstringDirective {
        keyword: "quickly",
        directive: AppliedDirective::Quickly,
        apply: |p| p.rate = 3.0,
    },
    SubstringDirective {
        keyword: "slowly",
        directive: AppliedDirective::Slowly,
        apply: |p| p.rate = 0.5,
    },
    SubstringDirective {
        keyword: "low",
        directive: AppliedDirective::Low,
        apply: |p| p.pitch = 0.5,
    },
    SubstringDirective {
        keyword: "high",
        directive: AppliedDirective::High,
        apply: |p| p.pitch = 3.0,
    },
    SubstringDirective {
        keyword: "soft",
        directive: AppliedDirective::Soft,
        apply: |p| p.volume = 0.1,
    },
    SubstringDirective {
        keyword: "loud",
        directive: AppliedDirective::Loud,
        apply: |p| p.volume = 1.0,
    },
];

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUtterance<'a> {
    /// 待朗读文本（原样保留，指令词不会被移除）
    pub text: &'a str,
    /// 合并后的参数
    pub parameters: SpeechParameters,
    /// 按应用顺序排列的已生效指令
    pub applied: Vec<AppliedDirective>,
}

/// 基于当前参数解析文本中的指令，返回新的参数
///
/// 纯函数：相同的文本与起始参数总是得到相同结果
pub fn resolve_parameters(text: &str, current: SpeechParameters) -> SpeechParameters {
    resolve_utterance(text, current).parameters
}

/// 解析文本中的指令，并记录哪些指令生效
pub fn resolve_utterance(text: &str, current: SpeechParameters) -> ResolvedUtterance<'_> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut parameters = current;
    let mut applied = Vec::new();

    for positional in POSITIONAL_DIRECTIVES {
        if let Some(value) = value_after(&tokens, positional.keyword) {
            (positional.apply)(&mut parameters, value);
            applied.push((positional.directive)(value));
        }
    }

    for substring in SUBSTRING_DIRECTIVES {
        if contains_directive(text, substring.keyword) {
            (substring.apply)(&mut parameters);
            applied.push(substring.directive);
        }
    }

    ResolvedUtterance {
        text,
        parameters,
        applied,
    }
}

/// 取关键字首次出现位置的下一个词，并解析为数值
///
/// 关键字缺失、位于末尾或后随词不是数值时返回 None
fn value_after(tokens: &[&str], keyword: &str) -> Option<f32> {
    let index = tokens.iter().position(|t| *t == keyword)?;
    tokens.get(index + 1)?.parse::<f32>().ok()
}

/// 检查子串指令是否出现
///
/// 不要求词边界（`softer` 触发 `soft`），但完全落在另一个更长指令关键字
/// 内部的出现不计数（`slowly` 中的 `low`）
fn contains_directive(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, _)| {
        let end = start + keyword.len();
        !is_shadowed(text, keyword, start, end)
    })
}

fn is_shadowed(text: &str, keyword: &str, start: usize, end: usize) -> bool {
    all_keywords()
        .filter(|other| other.len() > keyword.len() && other.contains(keyword))
        .any(|other| {
            text.match_indices(other)
                .any(|(other_start, _)| other_start <= start && end <= other_start + other.len())
        })
}

fn all_keywords() -> impl Iterator<Item = &'static str> {
    POSITIONAL_DIRECTIVES
        .iter()
        .map(|d| d.keyword)
        .chain(SUBSTRING_DIRECTIVES.iter().map(|d| d.keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SpeechParameters {
        SpeechParameters::default()
    }

    #[test]
    fn test_plain_text_leaves_parameters_unchanged() {
        let start = SpeechParameters::new(1.7, 0.9, 0.3);
        assert_eq!(resolve_parameters("what is the weather today", start), start);
        assert_eq!(resolve_parameters("", start), start);
        assert_eq!(resolve_parameters("   ", start), start);
    }

    #[test]
    fn test_slowly_only_changes_rate() {
        let params = resolve_parameters("say this slowly", defaults());
        assert_eq!(params.rate, 0.5);
        assert_eq!(params.pitch, 1.0);
        assert_eq!(params.volume, 0.5);
    }

    #[test]
    fn test_speed_and_pitch_values() {
        let params = resolve_parameters("speed 2.0 pitch 0.8", defaults());
        assert_eq!(params.rate, 2.0);
        assert_eq!(params.pitch, 0.8);
        assert_eq!(params.volume, 0.5);
    }

    #[test]
    fn test_toot_sets_volume() {
        let params = resolve_parameters("toot 0.3 please", defaults());
        assert_eq!(params.volume, 0.3);
    }

    #[test]
    fn test_integer_value_is_accepted() {
        let params = resolve_parameters("speed 2", defaults());
        assert_eq!(params.rate, 2.0);
    }

    #[test]
    fn test_non_numeric_value_is_ignored() {
        let params = resolve_parameters("speed abc", defaults());
        assert_eq!(params, defaults());

        let params = resolve_parameters("pitch up toot down", defaults());
        assert_eq!(params, defaults());
    }

    #[test]
    fn test_keyword_as_last_token_is_ignored() {
        assert_eq!(resolve_parameters("change the speed", defaults()), defaults());
        assert_eq!(resolve_parameters("toot", defaults()), defaults());
    }

    #[test]
    fn test_only_first_occurrence_is_considered() {
        // 首个 speed 后随词不是数值，后面的 speed 不再查找
        let params = resolve_parameters("speed speed 2.0", defaults());
        assert_eq!(params.rate, 1.0);

        let params = resolve_parameters("speed 1.5 then speed 2.5", defaults());
        assert_eq!(params.rate, 1.5);
    }

    #[test]
    fn test_positional_keyword_requires_whole_token() {
        assert_eq!(resolve_parameters("speedy 2.0", defaults()), defaults());
        assert_eq!(resolve_parameters("Speed 2.0", defaults()), defaults());
    }

    #[test]
    fn test_any_whitespace_separates_tokens() {
        let params = resolve_parameters("speed\t2.0\npitch  0.7", defaults());
        assert_eq!(params.rate, 2.0);
        assert_eq!(params.pitch, 0.7);
    }

    #[test]
    fn test_values_are_not_clamped() {
        let params = resolve_parameters("toot 5 speed -1 pitch 40", defaults());
        assert_eq!(params.volume, 5.0);
        assert_eq!(params.rate, -1.0);
        assert_eq!(params.pitch, 40.0);
    }

    // 子串指令覆盖同一参数上的显式数值（保留的既有行为）
    #[test]
    fn test_substring_keyword_overrides_positional_value() {
        assert_eq!(resolve_parameters("speed 2.0 normal", defaults()).rate, 1.0);
        assert_eq!(resolve_parameters("speed 2.0 quickly", defaults()).rate, 3.0);
        assert_eq!(resolve_parameters("pitch 0.8 high", defaults()).pitch, 3.0);
        assert_eq!(resolve_parameters("toot 0.9 soft", defaults()).volume, 0.1);
        assert_eq!(resolve_parameters("soft toot 0.9", defaults()).volume, 0.1);
    }

    #[test]
    fn test_normal_resets_everything() {
        let start = SpeechParameters::new(3.0, 3.0, 1.0);
        assert_eq!(resolve_parameters("back to normal", start), defaults());
    }

    #[test]
    fn test_later_substring_keyword_wins() {
        let params = resolve_parameters("quickly or slowly", defaults());
        assert_eq!(params.rate, 0.5);

        let params = resolve_parameters("high and low", defaults());
        assert_eq!(params.pitch, 3.0);

        let params = resolve_parameters("loud then soft", defaults());
        assert_eq!(params.volume, 1.0);

        let params = resolve_parameters("normal but quickly", defaults());
        assert_eq!(params.rate, 3.0);
        assert_eq!(params.pitch, 1.0);
    }

    #[test]
    fn test_substring_keyword_needs_no_word_boundary() {
        assert_eq!(resolve_parameters("a bit softer", defaults()).volume, 0.1);
        assert_eq!(resolve_parameters("louder", defaults()).volume, 1.0);
        assert_eq!(resolve_parameters("below", defaults()).pitch, 0.5);
        assert_eq!(resolve_parameters("thigh", defaults()).pitch, 3.0);
    }

    #[test]
    fn test_keyword_inside_longer_keyword_is_not_counted() {
        let params = resolve_parameters("slowly", defaults());
        assert_eq!(params.pitch, 1.0);

        // 独立出现的 low 仍然生效
        let params = resolve_parameters("slowly and low", defaults());
        assert_eq!(params.rate, 0.5);
        assert_eq!(params.pitch, 0.5);
    }

    #[test]
    fn test_applied_directives_are_reported_in_order() {
        let resolved = resolve_utterance("speed 2.0 toot 0.2 softly and quickly", defaults());
        assert_eq!(
            resolved.applied,
            vec![
                AppliedDirective::Speed(2.0),
                AppliedDirective::Toot(0.2),
                AppliedDirective::Quickly,
                AppliedDirective::Soft,
            ]
        );
        assert_eq!(resolved.text, "speed 2.0 toot 0.2 softly and quickly");
        assert_eq!(resolved.parameters, SpeechParameters::new(3.0, 1.0, 0.1));
    }

    #[test]
    fn test_resolve_is_pure() {
        let start = SpeechParameters::new(1.2, 0.7, 0.4);
        let text = "speed 2.5 high soft";
        assert_eq!(resolve_parameters(text, start), resolve_parameters(text, start));
    }
}
