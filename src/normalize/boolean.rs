//! 布尔转换器
//!
//! 只看第一个词：命中否定表为 false，命中肯定表为 true。
//! 超过两个词或首词不是信号词时不可机读，避免 "versichert: ja" 这类组合误判

use crate::normalize::cleanup::{is_quote, trim_and_collapse, Tokenizer};
use crate::normalize::rules::SignalWords;
use crate::normalize::types::{CanonicalValue, Rejection};

/// 允许的最大词数
const MAX_TOKENS: usize = 2;

pub struct BooleanTransformer {
    signal_words: SignalWords,
}

impl BooleanTransformer {
    pub fn new(signal_words: SignalWords) -> Self {
        Self { signal_words }
    }

    pub fn transform(&self, offset: &str) -> Result<CanonicalValue, Rejection> {
        let text = trim_and_collapse(offset);
        let words = Tokenizer::words(&text);

        let Some(first) = words.first() else {
            return Err(Rejection::Empty);
        };
        if words.len() > MAX_TOKENS {
            return Err(Rejection::TooManyTokens(words.len()));
        }

        // 忽略首词两端的标点（"Ja." / "nein,"）
        let word = first.trim_matches(|ch: char| ch.is_ascii_punctuation() || is_quote(ch));

        self.signal_words
            .classify(word)
            .map(CanonicalValue::Boolean)
            .ok_or_else(|| Rejection::UnknownSignalWord(first.to_string()))
    }
}

impl Default for BooleanTransformer {
    fn default() -> Self {
        Self::new(SignalWords::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boolean(offset: &str) -> Option<bool> {
        match BooleanTransformer::default().transform(offset) {
            Ok(CanonicalValue::Boolean(b)) => Some(b),
            _ => None,
        }
    }

    #[test]
    fn test_first_token_signal() {
        assert_eq!(boolean("nicht versichert"), Some(false));
        assert_eq!(boolean("ohne Kind"), Some(false));
        assert_eq!(boolean("Ja"), Some(true));
        assert_eq!(boolean("mit Garage"), Some(true));
        assert_eq!(boolean("VORHANDEN"), Some(true));
        assert_eq!(boolean("no"), Some(false));
    }

    #[test]
    fn test_signal_word_not_first() {
        assert_eq!(boolean("versichert ja"), None);
        assert_eq!(boolean("versichert: ja"), None);
    }

    #[test]
    fn test_too_many_tokens() {
        assert_eq!(boolean("alleinstehend ohne Kind"), None);
        assert_eq!(boolean("nein nicht versichert"), None);
    }

    #[test]
    fn test_punctuation_and_quotes() {
        assert_eq!(boolean("\"Ja.\""), Some(true));
        assert_eq!(boolean("Nein, danke"), Some(false));
    }

    #[test]
    fn test_empty() {
        assert_eq!(boolean(""), None);
        assert_eq!(boolean("   "), None);
    }

    #[test]
    fn test_custom_lists() {
        let transformer = BooleanTransformer::new(SignalWords::new(["oui"], ["non"]));
        assert_eq!(
            transformer.transform("Oui").unwrap(),
            CanonicalValue::Boolean(true)
        );
        assert!(transformer.transform("ja").is_err());
    }
}
