//! Tokenization and keyword tables for interpreting free-text rules.

/// Words carrying no content when matching a rule against a document.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "and", "or", "is", "are", "be", "been", "was",
    "were", "it", "its", "as", "by", "for", "with", "that", "this", "these", "those", "from",
    "into", "than", "then", "there", "their", "they", "what", "which", "who", "whom", "will",
    "would", "can", "could", "may", "might", "do", "does", "did", "done", "if", "when", "where",
];

/// Directive words common in rule phrasings ("document must mention ...").
/// They describe the check itself, not the content being checked for.
pub const DIRECTIVE_WORDS: &[&str] = &[
    "document", "pdf", "file", "page", "pages", "text", "content", "must", "should", "shall",
    "need", "needs", "required", "require", "requires", "contain", "contains", "containing",
    "contained", "include", "includes", "including", "included", "mention", "mentions",
    "mentioning", "mentioned", "reference", "references", "referencing", "referenced", "state",
    "states", "stating", "stated", "specify", "specifies", "specifying", "specified", "have",
    "has", "having", "present", "appear", "appears", "appearing", "exist", "exists", "least",
    "exactly", "valid", "any", "some", "all", "not", "never", "no", "none", "without", "one",
    "word", "words", "somewhere", "anywhere",
];

/// Phrases that flip a rule into an absence check.
pub const NEGATION_MARKERS: &[&str] = &[
    "must not",
    "should not",
    "shall not",
    "may not",
    "cannot",
    "can not",
    "does not",
    "do not",
    "doesn't",
    "don't",
    "must never",
    "should never",
    "not contain",
    "not include",
    "not mention",
    "without any",
    "free of",
    "no mention",
    "never",
];

/// Lowercase alphanumeric tokens of a piece of text.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(|t| t.to_string())
        .collect()
}

/// Content terms of a rule: its tokens minus stopwords and directive words,
/// deduplicated in order.
pub fn content_terms(rule: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for token in tokenize(rule) {
        if token.len() < 3 {
            continue;
        }
        if STOPWORDS.contains(&token.as_str()) || DIRECTIVE_WORDS.contains(&token.as_str()) {
            continue;
        }
        if !terms.contains(&token) {
            terms.push(token);
        }
    }
    terms
}

/// Whole-word occurrence check with light plural folding on both sides.
pub fn window_contains_term(window_lower: &str, term: &str) -> bool {
    if contains_word(window_lower, term) {
        return true;
    }
    // "dates" in the rule should match "date" in the document and vice versa
    if let Some(singular) = term.strip_suffix('s') {
        if singular.len() >= 3 && contains_word(window_lower, singular) {
            return true;
        }
    }
    contains_word(window_lower, &format!("{}s", term))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let boundary_before = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
        from = end;
    }
    false
}

/// Byte ranges of sentence-sized windows over the document text, trimmed of
/// surrounding whitespace. Punctuation only ends a window when followed by
/// whitespace or end-of-text, so amounts ("$120.00"), email addresses, and
/// URLs stay intact.
pub fn sentence_windows(text: &str) -> Vec<(usize, usize)> {
    let mut windows = Vec::new();
    let mut start = 0usize;

    for (i, ch) in text.char_indices() {
        let is_break = match ch {
            '\n' => true,
            '.' | ';' | '!' | '?' => {
                let after = i + ch.len_utf8();
                text[after..].chars().next().map_or(true, char::is_whitespace)
            }
            _ => false,
        };
        if is_break {
            let end = i + ch.len_utf8();
            push_trimmed(text, start, end, &mut windows);
            start = end;
        }
    }
    push_trimmed(text, start, text.len(), &mut windows);
    windows
}

fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<(usize, usize)>) {
    let slice = &text[start..end];
    let ltrim = slice.len() - slice.trim_start().len();
    let rtrim = slice.len() - slice.trim_end().len();
    let s = start + ltrim;
    let e = end - rtrim;
    if s < e {
        out.push((s, e));
    }
}

/// Clip an excerpt to at most `max_chars` characters. The returned slice is
/// always a verbatim span of the input.
pub fn clip_excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_end, _)) => text[..byte_end].trim_end(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_terms_drop_directives() {
        assert_eq!(content_terms("Document must mention a refund policy"), vec!["refund", "policy"]);
        assert_eq!(content_terms("must not contain a phone number"), vec!["phone", "number"]);
    }

    #[test]
    fn test_content_terms_dedupe() {
        assert_eq!(content_terms("warranty, warranty and WARRANTY"), vec!["warranty"]);
    }

    #[test]
    fn test_word_boundary_matching() {
        // "date" must not match inside "candidate"
        assert!(!window_contains_term("the candidate arrived", "date"));
        assert!(window_contains_term("the due date is near", "date"));
    }

    #[test]
    fn test_plural_folding() {
        assert!(window_contains_term("several dates listed", "date"));
        assert!(window_contains_term("the date listed", "dates"));
    }

    #[test]
    fn test_sentence_windows_keep_amounts_whole() {
        let text = "Total due: $120.00 now. Next item.";
        let windows = sentence_windows(text);
        let first = &text[windows[0].0..windows[0].1];
        assert_eq!(first, "Total due: $120.00 now.");
    }

    #[test]
    fn test_sentence_windows_keep_emails_whole() {
        let text = "Write to billing@example.com today. Thanks.";
        let windows = sentence_windows(text);
        let first = &text[windows[0].0..windows[0].1];
        assert_eq!(first, "Write to billing@example.com today.");
    }

    #[test]
    fn test_windows_are_trimmed_spans() {
        let text = "First line.\n  Second line  \nThird";
        for &(s, e) in &sentence_windows(text) {
            let w = &text[s..e];
            assert_eq!(w, w.trim());
            assert!(!w.is_empty());
        }
    }

    #[test]
    fn test_clip_excerpt_is_substring() {
        let text = "abcdefghij";
        assert_eq!(clip_excerpt(text, 4), "abcd");
        assert_eq!(clip_excerpt(text, 100), text);
    }

    #[test]
    fn test_clip_excerpt_multibyte_safe() {
        let text = "héllo wörld ünicode";
        let clipped = clip_excerpt(text, 7);
        assert!(text.contains(clipped));
    }
}
