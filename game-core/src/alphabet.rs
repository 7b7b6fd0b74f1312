/// The set of letters a word list is written in, with its casing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: &'static str,
    letters: Vec<char>,
    turkish_casing: bool,
}

const TURKISH_LETTERS: &str = "ABCÇDEFGĞHIİJKLMNOÖPRSŞTUÜVYZ";
const ENGLISH_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

impl Alphabet {
    pub fn turkish() -> Self {
        Self {
            name: "tr",
            letters: TURKISH_LETTERS.chars().collect(),
            turkish_casing: true,
        }
    }

    pub fn english() -> Self {
        Self {
            name: "en",
            letters: ENGLISH_LETTERS.chars().collect(),
            turkish_casing: false,
        }
    }

    /// Look up an alphabet by its short code (`tr`, `en`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "tr" | "turkish" => Some(Self::turkish()),
            "en" | "english" => Some(Self::english()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// Uppercase a typed letter and check it belongs to the alphabet.
    pub fn normalize(&self, letter: char) -> Option<char> {
        let upper = match letter {
            'i' if self.turkish_casing => 'İ',
            'ı' if self.turkish_casing => 'I',
            _ => {
                let mut upper = letter.to_uppercase();
                let first = upper.next()?;
                // Letters like 'ß' expand to more than one character
                if upper.next().is_some() {
                    return None;
                }
                first
            }
        };

        self.contains(upper).then_some(upper)
    }

    /// Normalize a whole word. `None` if any letter falls outside the alphabet.
    pub fn normalize_word(&self, word: &str) -> Option<Vec<char>> {
        word.trim().chars().map(|c| self.normalize(c)).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::turkish()
    }
}
