use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").expect("valid hyphenation regex")
});

/// Cleans text pulled out of a PDF page: NFKC normalization, re-joined hyphenated
/// line breaks, collapsed whitespace, and at most one blank line between paragraphs.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().filter(|c| *c != '\0').collect();
    let de_hyphenated = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut prev_was_blank = false;

    for line in de_hyphenated.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            prev_was_blank = true;
            continue;
        }

        if !result.is_empty() {
            result.push_str(if prev_was_blank { "\n\n" } else { "\n" });
        }
        collapse_internal_whitespace(trimmed, &mut result);
        prev_was_blank = false;
    }

    result
}

fn collapse_internal_whitespace(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
