//! Sentence and word tokenization for Vietnamese reference text.
//!
//! Three splitters, each serving one consumer:
//!
//! * [`split_sentences`] — reference text → sentence candidates (matcher).
//! * [`split_segments`] — full text → coarse scoring segments (pipeline
//!   accuracy measurement).
//! * [`word_tokens`] — text → word/punctuation tokens (diacritic booster).

// ---------------------------------------------------------------------------
// Unicode ranges
// ---------------------------------------------------------------------------

/// First codepoint of the accented-Latin range used for Vietnamese words.
///
/// U+00C0 (À) opens the Latin-1 Supplement letter block; together with the
/// Latin Extended Additional block it covers every precomposed Vietnamese
/// letter.
const VIET_RANGE_START: char = '\u{00C0}';

/// Last codepoint of the accented-Latin range (ỹ, U+1EF9 — the final letter
/// of Latin Extended Additional used by Vietnamese).
const VIET_RANGE_END: char = '\u{1EF9}';

/// Sentence-terminal punctuation recognized by [`split_sentences`].
const TERMINALS: [char; 4] = ['.', '!', '?', '…'];

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A single token produced by [`word_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Maximal run of word characters (ASCII alphanumerics plus the
    /// accented-Latin range).
    Word(String),
    /// Any single non-whitespace, non-word character.
    Punct(char),
}

impl Token {
    /// The token's text content.
    pub fn text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Punct(p) => p.to_string(),
        }
    }

    /// `true` when the token consists purely of letters (no digits) — the
    /// only tokens eligible for diacritic projection.
    pub fn is_letter_word(&self) -> bool {
        match self {
            Token::Word(w) => w.chars().all(is_letter_char),
            Token::Punct(_) => false,
        }
    }

    /// Length in chars, used to pick the closest donor variant.
    pub fn char_len(&self) -> usize {
        match self {
            Token::Word(w) => w.chars().count(),
            Token::Punct(_) => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split `text` into sentences.
///
/// A sentence ends after `.`, `!`, `?` or `…` when followed by whitespace,
/// or at a newline. Fragments are trimmed; empty fragments are dropped.
/// Order-preserving.
///
/// # Examples
///
/// ```
/// use viet_align::text::split_sentences;
///
/// let s = split_sentences("Câu một. Câu hai!\nCâu ba");
/// assert_eq!(s, vec!["Câu một.", "Câu hai!", "Câu ba"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut out, &mut cur);
            continue;
        }
        cur.push(c);
        if TERMINALS.contains(&c) && chars.peek().is_some_and(|n| n.is_whitespace()) {
            flush(&mut out, &mut cur);
        }
    }
    flush(&mut out, &mut cur);
    out
}

/// Split `text` into coarse scoring segments on any `.`, `!`, `?` or
/// newline, trimmed. Keeps only segments longer than `min_chars` characters.
///
/// This is the segmentation the pipeline scores final text against; short
/// fragments ("Ảnh:", initials, stray numbering) are noise for a similarity
/// metric and are filtered out.
pub fn split_segments(text: &str, min_chars: usize) -> Vec<&str> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|seg| seg.chars().count() > min_chars)
        .collect()
}

/// Tokenize `text` into [`Token::Word`] and [`Token::Punct`] tokens in
/// original order, discarding whitespace.
///
/// ```
/// use viet_align::text::{word_tokens, Token};
///
/// let t = word_tokens("tôi đi,làm");
/// assert_eq!(t, vec![
///     Token::Word("tôi".into()),
///     Token::Word("đi".into()),
///     Token::Punct(','),
///     Token::Word("làm".into()),
/// ]);
/// ```
pub fn word_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            if !c.is_whitespace() {
                tokens.push(Token::Punct(c));
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn flush(out: &mut Vec<String>, cur: &mut String) {
    let trimmed = cur.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    cur.clear();
}

/// Word characters: ASCII alphanumerics plus the accented-Latin range.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || (VIET_RANGE_START..=VIET_RANGE_END).contains(&c)
}

/// Letter characters: word characters minus ASCII digits.
#[inline]
fn is_letter_char(c: char) -> bool {
    c.is_ascii_alphabetic() || (VIET_RANGE_START..=VIET_RANGE_END).contains(&c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
