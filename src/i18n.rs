//! Static interface strings

use crate::types::language::Language;

/// Every static label the page shows, in one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub language: &'static str,
    pub start: &'static str,
    pub random: &'static str,
    pub restart: &'static str,
    pub placeholder: &'static str,
    pub free_action: &'static str,
    pub execute: &'static str,
    pub end_story: &'static str,
    pub loading: &'static str,
}

const ZH: Labels = Labels {
    language: "语言:",
    start: "开始冒险",
    random: "随机世界",
    restart: "重新开始",
    placeholder: "输入关键词，用逗号分隔",
    free_action: "自由输入…",
    execute: "执行",
    end_story: "生成结局",
    loading: "加载中…",
};

const EN: Labels = Labels {
    language: "Language:",
    start: "Start",
    random: "Surprise me",
    restart: "Restart",
    placeholder: "Enter tags, e.g. isekai, comedy",
    free_action: "Free action…",
    execute: "Go",
    end_story: "End Story",
    loading: "Loading…",
};

/// Labels for a language
pub fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::Zh => &ZH,
        Language::En => &EN,
    }
}

const STAT_NAMES: [(&str, &str); 6] = [
    ("STR", "力量 Strength"),
    ("DEX", "敏捷 Dexterity"),
    ("CON", "体质 Constitution"),
    ("INT", "智力 Intelligence"),
    ("WIS", "感知 Wisdom"),
    ("CHA", "魅力 Charisma"),
];

/// Full display name of a stat code, or None if the code is unknown
pub fn stat_full_name(code: &str) -> Option<&'static str> {
    STAT_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_labels() {
        let l = labels(Language::En);
        assert_eq!(l.start, "Start");
        assert_eq!(l.end_story, "End Story");
    }

    #[test]
    fn every_language_has_distinct_start_label() {
        assert_ne!(labels(Language::Zh).start, labels(Language::En).start);
    }

    #[test]
    fn stat_names() {
        assert_eq!(stat_full_name("STR"), Some("力量 Strength"));
        assert_eq!(stat_full_name("LUCK"), None);
    }
}
