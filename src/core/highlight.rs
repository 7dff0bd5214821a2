/// Keyword highlighting — wraps game terms in semantic `<span>` markup.
///
/// Text is split into plain and markup segments on `<...>` boundaries and
/// only plain segments are scanned. Keywords are matched case-insensitively
/// on ASCII word boundaries, longest keyword first, with an optional
/// trailing "s".

use rustc_hash::FxHashMap;

use crate::schema::tables::ContentTables;

/// A piece of highlighter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSegment<'a> {
    Text(&'a str),
    /// A whole `<...>` tag, brackets included.
    Markup(&'a str),
}

/// Split text into alternating plain and `<...>` segments. An unclosed `<`
/// is plain text.
pub fn split_markup(input: &str) -> Vec<MarkupSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        let Some(len) = rest[open..].find('>') else {
            break;
        };
        if open > 0 {
            segments.push(MarkupSegment::Text(&rest[..open]));
        }
        segments.push(MarkupSegment::Markup(&rest[open..=open + len]));
        rest = &rest[open + len + 1..];
    }
    if !rest.is_empty() {
        segments.push(MarkupSegment::Text(rest));
    }
    segments
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    word: String,
    /// Singular form when `word` is itself an irregular plural.
    singular: Option<String>,
}

struct Match<'m> {
    len: usize,
    singular: Option<&'m str>,
}

/// Longest-first keyword matcher, built once per table set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatcher {
    entries: Vec<Entry>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I, irregular_plurals: &FxHashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Entry> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_ascii_uppercase())
            .filter(|k| !k.is_empty())
            .map(|word| Entry {
                singular: irregular_plurals.get(&word).cloned(),
                word,
            })
            .collect();
        // Stable, so equal-length keywords keep table order.
        entries.sort_by(|a, b| b.word.len().cmp(&a.word.len()));
        Self { entries }
    }

    pub fn from_tables(tables: &ContentTables) -> Self {
        Self::new(&tables.keywords, &tables.irregular_plurals)
    }

    /// Keywords in match order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }

    /// Whether `word` is a keyword or a keyword plus "s".
    pub fn is_keyword(&self, word: &str) -> bool {
        self.match_at(word, 0)
            .map(|m| m.len == word.len())
            .unwrap_or(false)
    }

    /// Wrap every keyword outside existing markup.
    ///
    /// Not idempotent: run it once per piece of generated text.
    pub fn highlight(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 2);
        for segment in split_markup(input) {
            match segment {
                MarkupSegment::Text(text) => self.highlight_text(text, &mut out),
                MarkupSegment::Markup(tag) => out.push_str(tag),
            }
        }
        out
    }

    fn highlight_text(&self, text: &str, out: &mut String) {
        let bytes = text.as_bytes();
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            let starts_word = is_word_byte(bytes[i]) && (i == 0 || !is_word_byte(bytes[i - 1]));
            if starts_word {
                if let Some(m) = self.match_at(text, i) {
                    out.push_str(&text[copied..i]);
                    push_span(out, &text[i..i + m.len], m.singular);
                    i += m.len;
                    copied = i;
                    continue;
                }
            }
            i += 1;
        }
        out.push_str(&text[copied..]);
    }

    fn match_at(&self, text: &str, at: usize) -> Option<Match<'_>> {
        let bytes = text.as_bytes();
        for entry in &self.entries {
            let end = at + entry.word.len();
            let Some(candidate) = bytes.get(at..end) else {
                continue;
            };
            if !candidate.eq_ignore_ascii_case(entry.word.as_bytes()) {
                continue;
            }
            if matches!(bytes.get(end), Some(b's' | b'S')) && ends_word(bytes, end + 1) {
                return Some(Match {
                    len: entry.word.len() + 1,
                    singular: Some(entry.word.as_str()),
                });
            }
            if ends_word(bytes, end) {
                return Some(Match {
                    len: entry.word.len(),
                    singular: entry.singular.as_deref(),
                });
            }
        }
        None
    }
}

/// `keyword-` plus the word with only its first letter upper-cased.
pub fn keyword_class(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => format!("keyword-{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "keyword-".to_string(),
    }
}

fn push_span(out: &mut String, surface: &str, singular: Option<&str>) {
    out.push_str("<span class=\"");
    out.push_str(&keyword_class(surface));
    if let Some(singular) = singular {
        out.push(' ');
        out.push_str(&keyword_class(singular));
    }
    out.push_str("\">");
    out.push_str(surface);
    out.push_str("</span>");
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn ends_word(bytes: &[u8], at: usize) -> bool {
    bytes.get(at).map_or(true, |b| !is_word_byte(*b))
}
