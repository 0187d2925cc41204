//! Language name to translation code lookup.

/// Language display names (English, Polish and a few native spellings) and
/// their translation codes. Keys are lowercase.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("english", "en"),
    ("angielski", "en"),
    ("spanish", "es"),
    ("español", "es"),
    ("hiszpański", "es"),
    ("french", "fr"),
    ("français", "fr"),
    ("francuski", "fr"),
    ("german", "de"),
    ("deutsch", "de"),
    ("niemiecki", "de"),
    ("italian", "it"),
    ("italiano", "it"),
    ("włoski", "it"),
    ("polish", "pl"),
    ("polski", "pl"),
    ("portuguese", "pt"),
    ("portugalski", "pt"),
    ("portuguese (brazil)", "pt-BR"),
    ("portugalski (brazylia)", "pt-BR"),
    ("russian", "ru"),
    ("rosyjski", "ru"),
    ("chinese", "zh-CN"),
    ("chiński", "zh-CN"),
    ("japanese", "ja"),
    ("japoński", "ja"),
    ("korean", "ko"),
    ("koreański", "ko"),
    ("arabic", "ar"),
    ("arabski", "ar"),
    ("turkish", "tr"),
    ("turecki", "tr"),
    ("dutch", "nl"),
    ("holenderski", "nl"),
    ("hindi", "hi"),
    ("bengali", "bn"),
    ("bengalski", "bn"),
    ("vietnamese", "vi"),
    ("wietnamski", "vi"),
    ("thai", "th"),
    ("tajski", "th"),
    ("greek", "el"),
    ("grecki", "el"),
    ("czech", "cs"),
    ("czeski", "cs"),
    ("swedish", "sv"),
    ("szwedzki", "sv"),
    ("danish", "da"),
    ("duński", "da"),
    ("finnish", "fi"),
    ("fiński", "fi"),
    ("norwegian", "no"),
    ("norweski", "no"),
    ("hungarian", "hu"),
    ("węgierski", "hu"),
    ("hebrew", "he"),
    ("hebrajski", "he"),
    ("persian", "fa"),
    ("perski", "fa"),
    ("malay", "ms"),
    ("malajski", "ms"),
    ("indonesian", "id"),
    ("indonezyjski", "id"),
    ("filipino", "tl"),
    ("filipiński", "tl"),
    ("ukrainian", "uk"),
    ("ukraiński", "uk"),
    ("romanian", "ro"),
    ("rumuński", "ro"),
    ("slovak", "sk"),
    ("słowacki", "sk"),
    ("catalan", "ca"),
    ("kataloński", "ca"),
    ("serbian", "sr"),
    ("serbski", "sr"),
    ("croatian", "hr"),
    ("chorwacki", "hr"),
    ("bulgarian", "bg"),
    ("bułgarski", "bg"),
    ("lithuanian", "lt"),
    ("litewski", "lt"),
    ("latvian", "lv"),
    ("łotewski", "lv"),
    ("estonian", "et"),
    ("estoński", "et"),
    ("slovenian", "sl"),
    ("słoweński", "sl"),
    ("albanian", "sq"),
    ("albański", "sq"),
    ("macedonian", "mk"),
    ("macedoński", "mk"),
    ("afrikaans", "af"),
    ("swahili", "sw"),
    ("suahili", "sw"),
    ("zulu", "zu"),
    ("xhosa", "xh"),
    ("irish", "ga"),
    ("irlandzki", "ga"),
];

/// Fallback when a language name is unknown.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Map a language display name to its translation code, if it is known.
///
/// Names are matched case-insensitively. A value that already is a known
/// code is returned as-is.
pub fn try_language_code(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();

    LANGUAGE_CODES
        .iter()
        .find(|(lang, _)| *lang == key)
        .or_else(|| {
            LANGUAGE_CODES
                .iter()
                .find(|(_, code)| code.to_lowercase() == key)
        })
        .map(|(_, code)| *code)
}

/// Like [`try_language_code`], but unknown names fall back to English.
pub fn language_code(name: &str) -> &'static str {
    try_language_code(name).unwrap_or(DEFAULT_LANGUAGE_CODE)
}
