//! Language code table.
//!
//! Maps every known alias of a language (ISO 639-1, ISO 639-2 B/T, English
//! name, provider codes, regional spellings) to one canonical provider code.
//! The table is built once by [`LanguageTable::build`] and is immutable
//! afterwards, so it can be shared freely behind an `Arc`.
//!
//! When two entries claim the same key, the entry registered first keeps it.
//! European Portuguese is registered before Brazilian Portuguese, so the
//! country-neutral `pt` resolves to `por` while `pob`, `pb` and `pt br`
//! resolve to `pob`.

use std::collections::HashMap;

/// One language's code family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Canonical provider code (`eng`, `fre`, `pob`, ...).
    pub code: &'static str,
    /// ISO 639-1 two-letter code; empty when none exists.
    pub iso639_1: &'static str,
    /// ISO 639-2 bibliographic code.
    pub iso639_2: &'static str,
    /// ISO 639-2 terminology code, when it differs from the bibliographic one.
    pub iso639_2_alt: Option<&'static str>,
    /// English display name.
    pub name: &'static str,
    /// Extra lowercase keys. Multi-word keys are space-separated.
    pub aliases: &'static [&'static str],
}

impl LanguageInfo {
    /// Every lookup key of this entry, lowercased, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        [self.code, self.iso639_1, self.iso639_2]
            .into_iter()
            .chain(self.iso639_2_alt)
            .chain(std::iter::once(self.name))
            .chain(self.aliases.iter().copied())
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }
}

macro_rules! lang {
    ($code:literal, $iso1:literal, $iso2:literal, $name:literal) => {
        lang!($code, $iso1, $iso2, None, $name, [])
    };
    ($code:literal, $iso1:literal, $iso2:literal, $name:literal, [$($alias:literal),*]) => {
        lang!($code, $iso1, $iso2, None, $name, [$($alias),*])
    };
    ($code:literal, $iso1:literal, $iso2:literal, $alt:expr, $name:literal, [$($alias:literal),*]) => {
        LanguageInfo {
            code: $code,
            iso639_1: $iso1,
            iso639_2: $iso2,
            iso639_2_alt: $alt,
            name: $name,
            aliases: &[$($alias),*],
        }
    };
}

/// Built-in languages in registration order.
const LANGUAGES: &[LanguageInfo] = &[
    lang!("eng", "en", "eng", "English"),
    lang!("fre", "fr", "fre", Some("fra"), "French", ["francais"]),
    lang!("ger", "de", "ger", Some("deu"), "German", ["deutsch"]),
    lang!("spa", "es", "spa", "Spanish", ["espanol", "castellano"]),
    lang!("spl", "", "spl", "Spanish (Latin America)", ["es la", "es mx", "latino"]),
    lang!("ita", "it", "ita", "Italian", ["italiano"]),
    lang!("por", "pt", "por", "Portuguese", ["pt pt", "portugues"]),
    lang!("pob", "pt", "pob", "Portuguese (Brazil)", ["pb", "pt br", "ptbr", "brazilian", "brazilian portuguese"]),
    lang!("dut", "nl", "dut", Some("nld"), "Dutch", ["nederlands", "flemish"]),
    lang!("swe", "sv", "swe", "Swedish", ["svenska"]),
    lang!("nor", "no", "nor", "Norwegian", ["nb", "nob", "norsk"]),
    lang!("dan", "da", "dan", "Danish", ["dansk"]),
    lang!("fin", "fi", "fin", "Finnish", ["suomi"]),
    lang!("ice", "is", "ice", Some("isl"), "Icelandic", []),
    lang!("est", "et", "est", "Estonian"),
    lang!("lav", "lv", "lav", "Latvian"),
    lang!("lit", "lt", "lit", "Lithuanian"),
    lang!("pol", "pl", "pol", "Polish", ["polski"]),
    lang!("cze", "cs", "cze", Some("ces"), "Czech", []),
    lang!("slo", "sk", "slo", Some("slk"), "Slovak", []),
    lang!("slv", "sl", "slv", "Slovenian"),
    lang!("hun", "hu", "hun", "Hungarian", ["magyar"]),
    lang!("rum", "ro", "rum", Some("ron"), "Romanian", []),
    lang!("bul", "bg", "bul", "Bulgarian"),
    lang!("hrv", "hr", "hrv", "Croatian"),
    lang!("scc", "sr", "srp", "Serbian"),
    lang!("bos", "bs", "bos", "Bosnian"),
    lang!("mac", "mk", "mac", Some("mkd"), "Macedonian", []),
    lang!("alb", "sq", "alb", Some("sqi"), "Albanian", []),
    lang!("gre", "el", "gre", Some("ell"), "Greek", []),
    lang!("tur", "tr", "tur", "Turkish"),
    lang!("rus", "ru", "rus", "Russian"),
    lang!("ukr", "uk", "ukr", "Ukrainian"),
    lang!("bel", "", "bel", "Belarusian"),
    lang!("arm", "hy", "arm", Some("hye"), "Armenian", []),
    lang!("geo", "ka", "geo", Some("kat"), "Georgian", []),
    lang!("cat", "ca", "cat", "Catalan"),
    lang!("baq", "eu", "baq", Some("eus"), "Basque", []),
    lang!("glg", "gl", "glg", "Galician"),
    lang!("ara", "ar", "ara", "Arabic"),
    lang!("heb", "he", "heb", "Hebrew"),
    lang!("per", "fa", "per", Some("fas"), "Persian", ["farsi"]),
    lang!("hin", "hi", "hin", "Hindi"),
    lang!("ben", "bn", "ben", "Bengali"),
    lang!("tam", "ta", "tam", "Tamil"),
    lang!("tel", "te", "tel", "Telugu"),
    lang!("urd", "ur", "urd", "Urdu"),
    lang!("chi", "zh", "chi", Some("zho"), "Chinese", ["chs", "zh cn", "zhs", "simplified chinese"]),
    lang!("zht", "", "zht", "Chinese (Traditional)", ["cht", "zh tw", "zh hk", "traditional chinese"]),
    lang!("jpn", "ja", "jpn", "Japanese", ["jp"]),
    lang!("kor", "ko", "kor", "Korean"),
    lang!("tha", "th", "tha", "Thai"),
    lang!("vie", "vi", "vie", "Vietnamese"),
    lang!("ind", "id", "ind", "Indonesian"),
    lang!("may", "ms", "may", Some("msa"), "Malay", []),
    lang!("tgl", "tl", "tgl", "Tagalog", ["filipino"]),
    lang!("afr", "af", "afr", "Afrikaans"),
    lang!("swa", "sw", "swa", "Swahili"),
    lang!("epo", "eo", "epo", "Esperanto"),
];

/// Immutable alias-to-language index.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: Vec<LanguageInfo>,
    index: HashMap<String, usize>,
}

impl LanguageTable {
    /// Build the table from the built-in language list.
    pub fn build() -> Self {
        Self::from_entries(LANGUAGES.to_vec())
    }

    /// Build a table from an explicit entry list. Earlier entries keep any
    /// key a later entry also claims.
    pub fn from_entries(entries: Vec<LanguageInfo>) -> Self {
        let mut index = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            for key in entry.keys() {
                index.entry(key).or_insert(i);
            }
        }
        Self { entries, index }
    }

    /// Look up any alias, case-insensitively. Multi-word keys are matched
    /// with single spaces between words.
    pub fn lookup(&self, key: &str) -> Option<&LanguageInfo> {
        let key = key.trim().to_lowercase();
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// Resolve an alias straight to its canonical code.
    pub fn canonical_code(&self, key: &str) -> Option<&'static str> {
        self.lookup(key).map(|info| info.code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageInfo> {
        self.entries.iter()
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_every_code_kind() {
        let table = LanguageTable::build();
        assert_eq!(table.canonical_code("en"), Some("eng"));
        assert_eq!(table.canonical_code("eng"), Some("eng"));
        assert_eq!(table.canonical_code("English"), Some("eng"));
        assert_eq!(table.canonical_code("fra"), Some("fre"));
        assert_eq!(table.canonical_code("DEU"), Some("ger"));
        assert_eq!(table.canonical_code("srp"), Some("scc"));
        assert_eq!(table.canonical_code("klingon"), None);
    }

    #[test]
    fn first_registered_wins_for_shared_keys() {
        let table = LanguageTable::build();
        assert_eq!(table.canonical_code("pt"), Some("por"));
        assert_eq!(table.canonical_code("pob"), Some("pob"));
        assert_eq!(table.canonical_code("pb"), Some("pob"));
        assert_eq!(table.canonical_code("pt br"), Some("pob"));
        assert_eq!(table.canonical_code("brazilian portuguese"), Some("pob"));
    }

    #[test]
    fn tie_break_follows_registration_order() {
        let a = LanguageInfo {
            code: "aaa",
            iso639_1: "xx",
            iso639_2: "aaa",
            iso639_2_alt: None,
            name: "First",
            aliases: &[],
        };
        let b = LanguageInfo {
            code: "bbb",
            iso639_1: "xx",
            iso639_2: "bbb",
            iso639_2_alt: None,
            name: "Second",
            aliases: &[],
        };
        let forward = LanguageTable::from_entries(vec![a.clone(), b.clone()]);
        assert_eq!(forward.canonical_code("xx"), Some("aaa"));
        let reverse = LanguageTable::from_entries(vec![b, a]);
        assert_eq!(reverse.canonical_code("xx"), Some("bbb"));
    }

    #[test]
    fn every_entry_owns_its_code() {
        let table = LanguageTable::build();
        for info in table.iter() {
            assert_eq!(table.canonical_code(info.code), Some(info.code), "{}", info.name);
        }
        assert!(table.len() >= 50);
        assert!(table.iter().all(|info| info.code != "en"));
    }

    #[test]
    fn keys_are_lowercase_and_skip_empty() {
        let table = LanguageTable::build();
        let zht = table.lookup("zht").unwrap();
        let keys: Vec<String> = zht.keys().collect();
        assert!(keys.iter().all(|k| !k.is_empty() && *k == k.to_lowercase()));
        assert!(keys.contains(&"chinese (traditional)".to_string()));
        assert!(keys.contains(&"zh tw".to_string()));
    }
}
