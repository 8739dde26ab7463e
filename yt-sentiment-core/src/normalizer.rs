use {
    std::collections::HashSet,
    anyhow::Result,
    once_cell::sync::Lazy,
    regex::Regex,
};

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "of", "is", "a", "in", "https", "yg", "gua", "gue", "lo", "lu", "gw",
];

const HYPERLINK_PATTERN: &str = r"https?://\S+|www\.\S+";
const EMOTICON_PATTERN: &str = r"[:;=X8B][-oO^']?[\)\(DPp\[\]{}@/\|\\<>*~]";
const EMOJI_PATTERN: &str = r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F700}-\x{1F77F}]";
const NUMBER_PATTERN: &str = r"\b\d+\b";
const SPECIAL_CHAR_PATTERN: &str = r"[^a-zA-Z\s]";
const WHITESPACE_PATTERN: &str = r"\s+";

struct Patterns {
    hyperlink: Regex,
    emoticon: Regex,
    emoji: Regex,
    number: Regex,
    special_char: Regex,
    whitespace: Regex,
}

// constant patterns, checked by `patterns_compile`
static PATTERNS: Lazy<Patterns> = Lazy::new(|| Patterns::compile().expect("normalizer patterns must compile"));

/// Case-insensitive set of tokens dropped from cleaned text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Result<String>;

    /// Used for a row whose `normalize` call failed.
    fn fallback(&self, text: &str) -> String {
        strip_to_letters(text)
    }
}

pub struct Normalizer {
    stopwords: Stopwords,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            hyperlink: Regex::new(HYPERLINK_PATTERN)?,
            emoticon: Regex::new(EMOTICON_PATTERN)?,
            emoji: Regex::new(EMOJI_PATTERN)?,
            number: Regex::new(NUMBER_PATTERN)?,
            special_char: Regex::new(SPECIAL_CHAR_PATTERN)?,
            whitespace: Regex::new(WHITESPACE_PATTERN)?,
        })
    }
}

impl Stopwords {
    pub fn new<I, S>(words: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        Self {
            words: words.into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    /// Adds words from a comma-separated list, as typed into the analysis form.
    pub fn with_custom(mut self, custom: &str) -> Self {
        self.words.extend(
            custom.split(',')
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
        );
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Normalizer {
    pub fn new(stopwords: Stopwords) -> Self {
        Self {
            stopwords,
        }
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }
}

impl TextNormalizer for Normalizer {
    fn normalize(&self, text: &str) -> Result<String> {
        Ok(normalize(text, &self.stopwords))
    }

    fn fallback(&self, text: &str) -> String {
        remove_stopwords(&strip_to_letters(text), &self.stopwords)
    }
}

pub fn normalize(text: &str, stopwords: &Stopwords) -> String {
    let patterns = &*PATTERNS;

    let text = patterns.hyperlink.replace_all(text, "");
    let text = patterns.emoticon.replace_all(&text, "");
    let text = patterns.emoji.replace_all(&text, "");
    let text = patterns.number.replace_all(&text, "");
    let text = patterns.special_char.replace_all(&text, "");
    let text = patterns.whitespace.replace_all(&text, " ");

    remove_stopwords(text.trim(), stopwords)
}

/// Keeps ASCII letters and single spaces only, without any pattern matching.
pub fn strip_to_letters(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn remove_stopwords(text: &str, stopwords: &Stopwords) -> String {
    if stopwords.is_empty() {
        return text.to_owned();
    }

    text.split(' ')
        .filter(|token| !stopwords.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> Stopwords {
        Stopwords::default()
    }

    fn assert_clean(text: &str) {
        assert!(text.chars().all(|c| c.is_ascii_alphabetic() || c == ' '), "unexpected character in {:?}", text);
        assert!(!text.contains("  "), "double space in {:?}", text);
        assert_eq!(text, text.trim());
    }

    #[test]
    fn patterns_compile() {
        assert!(Patterns::compile().is_ok());
    }

    #[test]
    fn strips_punctuation_emoticons_and_numbers() {
        assert_eq!(normalize("I love this!!! :) 123", &none()), "I love this");
        assert_eq!(normalize("terrible... waste of money", &none()), "terrible waste of money");
    }

    #[test]
    fn removes_links() {
        assert_eq!(normalize("watch https://youtu.be/abc?t=10 now", &none()), "watch now");
        assert_eq!(normalize("see www.example.com/page for more", &none()), "see for more");
    }

    #[test]
    fn removes_emoji_and_emoticons() {
        assert_eq!(normalize("so good \u{1F600}\u{1F680} ;-D =P", &none()), "so good");
    }

    #[test]
    fn removes_numbers_inside_words_too() {
        let cleaned = normalize("top10 at 5pm in 2024", &none());
        assert_eq!(cleaned, "top at pm in");
        assert_clean(&cleaned);
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(normalize("café señor", &none()), "caf seor");
    }

    #[test]
    fn empty_and_symbol_only_inputs_become_empty() {
        assert_eq!(normalize("", &none()), "");
        assert_eq!(normalize("   \t\n ", &none()), "");
        assert_eq!(normalize("!!! ??? 123 \u{1F600}", &none()), "");
    }

    #[test]
    fn stopwords_are_case_insensitive() {
        let stopwords = Stopwords::new(["the", "of"]);
        assert_eq!(normalize("one of the best videos", &stopwords), "one best videos");
        assert_eq!(normalize("The End OF days", &stopwords), "End days");
    }

    #[test]
    fn custom_stopwords_are_split_on_commas() {
        let stopwords = Stopwords::new(DEFAULT_STOPWORDS).with_custom(" Video, ,great ,");
        assert_eq!(stopwords.len(), DEFAULT_STOPWORDS.len() + 2);
        assert!(stopwords.contains("VIDEO"));
        assert!(stopwords.contains("great"));
        assert!(!stopwords.contains(""));
    }

    #[test]
    fn output_never_contains_digits_symbols_or_double_spaces() {
        let samples = [
            "Hello,   world!!  42 times\t\tover",
            "mixed 3d text w1th d1gits",
            "tabs\tand\nnewlines\r\nhere",
            "emoji \u{1F600}\u{1F64F}\u{1F300} and symbols #$%^&*",
            "XD XP 8) B) :( ;( =]",
            "\u{00A0}non\u{2003}breaking\u{00A0}",
        ];

        for sample in samples {
            assert_clean(&normalize(sample, &none()));
        }
    }

    #[test]
    fn no_token_survives_when_it_is_a_stopword() {
        let stopwords = Stopwords::new(["a", "is", "this"]);
        let cleaned = normalize("This IS a test, is it A good one?", &stopwords);

        for token in cleaned.split_whitespace() {
            assert!(!stopwords.contains(token), "stopword {:?} survived", token);
        }
        assert_eq!(cleaned, "test it good one");
    }

    #[test]
    fn fallback_keeps_letters_only() {
        let normalizer = Normalizer::new(Stopwords::new(["the"]));
        let fallback = normalizer.fallback("the http://x.y link \u{1F600} 42!");

        assert_eq!(fallback, "httpxy link");
        assert_clean(&fallback);
    }

    #[test]
    fn normalizer_trait_uses_its_stopwords() {
        let normalizer = Normalizer::new(Stopwords::new(["of"]));
        assert_eq!(normalizer.normalize("one of many").unwrap(), "one many");
    }
}
