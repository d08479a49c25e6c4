//! 公共清理工具
//!
//! Unicode 归一化、引号/空白剥离、分词，四个转换器共用

use unicode_normalization::UnicodeNormalization;

/// 引号字符（含德语/法语排版引号）
const QUOTE_CHARS: &[char] = &[
    '"', '\'', '`', '´', '„', '“', '”', '‚', '‘', '’', '«', '»', '‹', '›',
];

/// 是否为引号字符
pub fn is_quote(ch: char) -> bool {
    QUOTE_CHARS.contains(&ch)
}

/// NFC 归一化
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// 去除所有空白和引号（包括中间的）
///
/// 数字类转换器使用：`1 000,00` → `1000,00`，`1'000` → `1000`
pub fn strip_quotes_and_whitespace(text: &str) -> String {
    text.nfc()
        .filter(|ch| !ch.is_whitespace() && !is_quote(*ch))
        .collect()
}

/// 去除首尾引号，折叠空白
///
/// 日期、布尔、文本转换器使用，保留词之间的单个空格
pub fn trim_and_collapse(text: &str) -> String {
    let normalized = nfc(text);
    let trimmed = normalized.trim_matches(|ch: char| ch.is_whitespace() || is_quote(ch));

    // 空白折叠：多个连续空白 -> 单个空格
    let mut result = String::with_capacity(trimmed.len());
    let mut prev_whitespace = false;

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            if !prev_whitespace {
                result.push(' ');
                prev_whitespace = true;
            }
        } else {
            result.push(ch);
            prev_whitespace = false;
        }
    }

    result
}

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// ASCII 数字序列
    Digits,
    /// 字母序列（含变音字母）
    Letters,
    /// 空白符序列
    Whitespace,
    /// 标点/符号
    Symbol,
}

/// Token
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
}

/// 分词器
pub struct Tokenizer;

impl Tokenizer {
    /// 按字符类型将文本分割为 Token 序列
    pub fn tokenize(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_type: Option<TokenType> = None;
        let mut current_text = String::new();

        for ch in text.chars() {
            let char_type = Self::classify_char(ch);

            match current_type {
                Some(ct) if ct == char_type => current_text.push(ch),
                Some(ct) => {
                    // 类型切换，保存当前 token
                    tokens.push(Token {
                        text: std::mem::take(&mut current_text),
                        token_type: ct,
                    });
                    current_text.push(ch);
                    current_type = Some(char_type);
                }
                None => {
                    current_text.push(ch);
                    current_type = Some(char_type);
                }
            }
        }

        // 处理最后一个 token
        if let Some(ct) = current_type {
            tokens.push(Token {
                text: current_text,
                token_type: ct,
            });
        }

        tokens
    }

    /// 按空白切分（布尔转换器只关心词）
    pub fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    /// 字符分类
    fn classify_char(ch: char) -> TokenType {
        if ch.is_ascii_digit() {
            TokenType::Digits
        } else if ch.is_alphabetic() {
            TokenType::Letters
        } else if ch.is_whitespace() {
            TokenType::Whitespace
        } else {
            TokenType::Symbol
        }
    }
}
