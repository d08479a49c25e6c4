//! 规范化规则定义
//!
//! 包含数字词、"无值"词库、月份名、破折号字符、布尔信号词

use std::collections::{HashMap, HashSet};

use aho_corasick::AhoCorasick;

/// 破折号字符（连字符、各类 dash、数学减号）
pub const DASH_CHARS: &[char] = &['-', '‐', '‑', '‒', '–', '—', '−'];

/// 正号字符
pub const PLUS_CHARS: &[char] = &['+', '＋'];

pub fn is_dash(ch: char) -> bool {
    DASH_CHARS.contains(&ch)
}

/// "无值"词（整串匹配时视为 0）
const NOTHING_WORDS: [&str; 5] = ["NIL", "kein", "keinen", "keiner", "None"];

lazy_static::lazy_static! {
    /// "无值"词的子串检索器（ASCII 大小写不敏感）
    static ref NOTHING_SEARCHER: AhoCorasick = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(NOTHING_WORDS)
        .expect("nothing lexicon patterns are valid");
}

/// "无值"词匹配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingMatch {
    /// 整个字符串就是一个"无值"词
    Whole,
    /// "无值"词只是更长字符串的一部分
    Embedded,
    /// 不包含
    Absent,
}

/// "无值"词库
pub struct NothingLexicon;

impl NothingLexicon {
    pub fn classify(text: &str) -> NothingMatch {
        if NOTHING_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
            NothingMatch::Whole
        } else if NOTHING_SEARCHER.is_match(text) {
            NothingMatch::Embedded
        } else {
            NothingMatch::Absent
        }
    }
}

/// 数字词映射（一到十二，德语 + 英语）
pub struct NumberWords {
    map: HashMap<&'static str, u32>,
}

impl NumberWords {
    pub fn new() -> Self {
        let map = HashMap::from([
            // 德语
            ("ein", 1),
            ("eine", 1),
            ("eins", 1),
            ("zwei", 2),
            ("drei", 3),
            ("vier", 4),
            ("fünf", 5),
            ("fuenf", 5),
            ("sechs", 6),
            ("sieben", 7),
            ("acht", 8),
            ("neun", 9),
            ("zehn", 10),
            ("elf", 11),
            ("zwölf", 12),
            ("zwoelf", 12),
            // 英语
            ("one", 1),
            ("two", 2),
            ("three", 3),
            ("four", 4),
            ("five", 5),
            ("six", 6),
            ("seven", 7),
            ("eight", 8),
            ("nine", 9),
            ("ten", 10),
            ("eleven", 11),
            ("twelve", 12),
        ]);

        Self { map }
    }

    /// 整串匹配（大小写不敏感）
    pub fn lookup(&self, text: &str) -> Option<u32> {
        self.map.get(text.to_lowercase().as_str()).copied()
    }
}

impl Default for NumberWords {
    fn default() -> Self {
        Self::new()
    }
}

/// 月份名映射（德语 + 英语，全称与缩写）
pub struct MonthNames {
    map: HashMap<&'static str, u32>,
}

impl MonthNames {
    pub fn new() -> Self {
        let map = HashMap::from([
            // 一月
            ("januar", 1),
            ("jänner", 1),
            ("january", 1),
            ("jan", 1),
            // 二月
            ("februar", 2),
            ("feber", 2),
            ("february", 2),
            ("feb", 2),
            // 三月
            ("märz", 3),
            ("maerz", 3),
            ("march", 3),
            ("mär", 3),
            ("mrz", 3),
            ("mar", 3),
            // 四月
            ("april", 4),
            ("apr", 4),
            // 五月
            ("mai", 5),
            ("may", 5),
            // 六月
            ("juni", 6),
            ("june", 6),
            ("jun", 6),
            // 七月
            ("juli", 7),
            ("july", 7),
            ("jul", 7),
            // 八月
            ("august", 8),
            ("aug", 8),
            // 九月
            ("september", 9),
            ("sept", 9),
            ("sep", 9),
            // 十月
            ("oktober", 10),
            ("october", 10),
            ("okt", 10),
            ("oct", 10),
            // 十一月
            ("november", 11),
            ("nov", 11),
            // 十二月
            ("dezember", 12),
            ("december", 12),
            ("dez", 12),
            ("dec", 12),
        ]);

        Self { map }
    }

    /// 查找月份（大小写不敏感）
    pub fn lookup(&self, word: &str) -> Option<u32> {
        self.map.get(word.to_lowercase().as_str()).copied()
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::new()
    }
}

/// 布尔信号词表
///
/// 以大写形式存储，比较时大小写不敏感
#[derive(Debug, Clone)]
pub struct SignalWords {
    yes: HashSet<String>,
    no: HashSet<String>,
}

impl SignalWords {
    pub fn new<I, J>(yes: I, no: J) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        let upper = |w: &str| w.trim().to_uppercase();
        Self {
            yes: yes.into_iter().map(|w| upper(w.as_ref())).collect(),
            no: no.into_iter().map(|w| upper(w.as_ref())).collect(),
        }
    }

    /// 信号词对应的布尔值
    ///
    /// 同时出现在两个表中时以否定为准
    pub fn classify(&self, word: &str) -> Option<bool> {
        let key = word.to_uppercase();
        if self.no.contains(&key) {
            Some(false)
        } else if self.yes.contains(&key) {
            Some(true)
        } else {
            None
        }
    }
}

impl Default for SignalWords {
    fn default() -> Self {
        Self::new(
            ["VORHANDEN", "JA", "MIT", "YES"],
            ["NEIN", "NICHT", "KEIN", "OHNE", "NO"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_lexicon() {
        assert_eq!(NothingLexicon::classify("NIL"), NothingMatch::Whole);
        assert_eq!(NothingLexicon::classify("keinen"), NothingMatch::Whole);
        assert_eq!(NothingLexicon::classify("none"), NothingMatch::Whole);
        assert_eq!(NothingLexicon::classify("keine"), NothingMatch::Embedded);
        assert_eq!(NothingLexicon::classify("NIL-Betrag"), NothingMatch::Embedded);
        assert_eq!(NothingLexicon::classify("1.000,00"), NothingMatch::Absent);
    }

    #[test]
    fn test_number_words() {
        let words = NumberWords::new();
        assert_eq!(words.lookup("Zwölf"), Some(12));
        assert_eq!(words.lookup("EINS"), Some(1));
        assert_eq!(words.lookup("seven"), Some(7));
        assert_eq!(words.lookup("dreizehn"), None);
    }

    #[test]
    fn test_month_names() {
        let months = MonthNames::new();
        assert_eq!(months.lookup("November"), Some(11));
        assert_eq!(months.lookup("MÄRZ"), Some(3));
        assert_eq!(months.lookup("Okt"), Some(10));
        assert_eq!(months.lookup("Montag"), None);
    }

    #[test]
    fn test_signal_words() {
        let words = SignalWords::default();
        assert_eq!(words.classify("nicht"), Some(false));
        assert_eq!(words.classify("Ja"), Some(true));
        assert_eq!(words.classify("vielleicht"), None);
    }

    #[test]
    fn test_dash_chars() {
        assert!(is_dash('–'));
        assert!(is_dash('−'));
        assert!(!is_dash('_'));
    }
}
