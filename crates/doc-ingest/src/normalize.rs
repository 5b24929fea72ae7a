//! Text cleanup applied to every extractor's output before evaluation.

/// Normalize raw extracted text: CRLF becomes LF, control characters are
/// stripped (newline and form feed kept, form feed marks a page break),
/// runs of blank lines collapse to one.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut newlines = 0usize;
    for ch in unified.chars() {
        match ch {
            '\n' => {
                newlines += 1;
                if newlines <= 2 {
                    out.push('\n');
                }
            }
            '\u{000C}' => {
                newlines = 0;
                out.push('\u{000C}');
            }
            '\t' => {
                newlines = 0;
                out.push(' ');
            }
            c if c.is_control() => {}
            c => {
                newlines = 0;
                out.push(c);
            }
        }
    }
    out.trim().to_string()
}

/// Split normalized text into per-page spans using the extractor's form-feed
/// page breaks. Falls back to a single span when the break count does not
/// line up with the page count reported by the parser.
pub fn paginate(raw: &str, expected_pages: usize) -> (String, Vec<String>) {
    let cleaned = normalize_text(raw);

    let chunks: Vec<String> = cleaned
        .split('\u{000C}')
        .map(|c| c.trim().to_string())
        .collect();

    if chunks.len() == expected_pages {
        let text = chunks
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        (text, chunks)
    } else {
        let text = cleaned.replace('\u{000C}', "\n").trim().to_string();
        (text.clone(), vec![text])
    }
}
