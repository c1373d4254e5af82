//! crates/pdf_chat_core/src/citations.rs
//!
//! Parses `[Page N]` markers out of an assistant answer.
//!
//! Cleaning policy: markers are removed until none remain. Where a marker sat
//! between two blanks only the first blank is kept, and a marker that ends a
//! line takes the blanks before it along. Everything else, indentation
//! included, is left as the model wrote it, and the whole text is trimmed.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Citation;

/// An answer with its citation markers separated from the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitedAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

fn citation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Nine digits always fit in a u32; longer runs are treated as malformed.
    RE.get_or_init(|| Regex::new(r"\[Page\s*(\d{1,9})\]").expect("citation pattern is valid"))
}

const BLANK: &[char] = &[' ', '\t'];

/// Extracts cited pages in order of first appearance and strips the markers.
pub fn extract_citations(raw: &str) -> CitedAnswer {
    let re = citation_regex();

    let mut seen = HashSet::new();
    let mut citations = Vec::new();
    for caps in re.captures_iter(raw) {
        let Ok(page) = caps[1].parse::<u32>() else {
            continue;
        };
        // Pseudo-pages are numbered from 1.
        if page == 0 {
            continue;
        }
        if seen.insert(page) {
            citations.push(Citation::for_page(page));
        }
    }

    CitedAnswer {
        text: clean_text(raw),
        citations,
    }
}

/// Removes every citation marker and the spacing it leaves behind.
pub fn clean_text(raw: &str) -> String {
    let re = citation_regex();

    // Removing "[Page 1]" from "[Page [Page 1]2]" exposes a new marker.
    let mut stripped = raw.to_string();
    while re.is_match(&stripped) {
        stripped = strip_markers(re, &stripped);
    }

    stripped.trim().to_string()
}

fn strip_markers(re: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        last = m.end();

        let rest = &text[last..];
        let after = rest.trim_start_matches(BLANK);
        if after.is_empty() || after.starts_with(&['\n', '\r'][..]) {
            let kept = out.trim_end_matches(BLANK).len();
            out.truncate(kept);
            last += rest.len() - after.len();
        } else if out.ends_with(BLANK) {
            last += rest.len() - after.len();
        }
    }
    out.push_str(&text[last..]);
    out
}
