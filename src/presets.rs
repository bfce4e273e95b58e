//! Preset worlds for the random-start action

use crate::types::language::Language;
use rand::Rng;
use rand::seq::SliceRandom;

/// A fixed tag combination, written once per language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub zh: &'static str,
    pub en: &'static str,
}

impl Preset {
    /// Comma-separated tags in the given language
    pub fn tags(&self, lang: Language) -> &'static str {
        match lang {
            Language::Zh => self.zh,
            Language::En => self.en,
        }
    }
}

pub static PRESETS: [Preset; 4] = [
    Preset {
        zh: "赛博忍者,鲨鱼神教",
        en: "cyber ninja, shark cult",
    },
    Preset {
        zh: "维多利亚,蒸汽朋克,吸血鬼",
        en: "victorian, steampunk, vampire",
    },
    Preset {
        zh: "猫咪王国,宇宙歌剧",
        en: "cat kingdom, space opera",
    },
    Preset {
        zh: "校园恋爱,克苏鲁",
        en: "campus romance, cthulhu",
    },
];

/// Pick a preset uniformly at random
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static Preset {
    // PRESETS is non-empty, so choose always returns Some
    PRESETS.choose(rng).unwrap_or(&PRESETS[0])
}
