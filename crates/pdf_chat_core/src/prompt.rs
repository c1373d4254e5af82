//! crates/pdf_chat_core/src/prompt.rs
//!
//! Assembles the prompt sent to the LLM: a fixed instruction preamble, the
//! page-tagged document excerpt, then the user's question.
//!
//! Only the beginning of long documents fits in the excerpt budget. There is no
//! retrieval or ranking step.

use crate::domain::PseudoPage;

/// Default number of excerpt characters shown to the model.
pub const DEFAULT_CHAR_BUDGET: usize = 6000;

const PREAMBLE: &str = r#"You are an AI assistant that answers questions STRICTLY based on the provided PDF content.

1. Use Markdown formatting (e.g., **bold**, lists, headers) for clear readability.
2. IMPORTANT: Always cite the source page(s) using the exact format [Page X] immediately following the piece of information derived from that page.
3. If the answer is not in the document, state clearly that you cannot find the information in the provided PDF."#;

/// Renders every page as `\n--- PAGE n ---\n<text>` and joins them with newlines.
pub fn page_tagged_excerpt(pages: &[PseudoPage]) -> String {
    pages
        .iter()
        .map(|p| format!("\n--- PAGE {} ---\n{}", p.page_number, p.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps at most `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the complete prompt for one question.
pub fn build_prompt(pages: &[PseudoPage], question: &str, char_budget: usize) -> String {
    let excerpt = page_tagged_excerpt(pages);
    let excerpt = truncate_chars(&excerpt, char_budget);

    format!(
        "\n{PREAMBLE}\n\n--- PDF Content (First ~{char_budget} characters) ---\n{excerpt}\n\n--- Question ---\nQuestion: {question}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{paginate, WORDS_PER_PAGE};

    #[test]
    fn prompt_contains_preamble_pages_and_question() {
        let pages = paginate("the quick brown fox", WORDS_PER_PAGE);
        let prompt = build_prompt(&pages, "What jumps?", DEFAULT_CHAR_BUDGET);

        assert!(prompt.contains("STRICTLY based on the provided PDF content"));
        assert!(prompt.contains("[Page X]"));
        assert!(prompt.contains("\n--- PAGE 1 ---\nthe quick brown fox"));
        assert!(prompt.trim_end().ends_with("Question: What jumps?"));
    }

    #[test]
    fn pages_are_tagged_in_order() {
        let pages = paginate("a b c d", 2);
        assert_eq!(
            page_tagged_excerpt(&pages),
            "\n--- PAGE 1 ---\na b\n\n--- PAGE 2 ---\nc d"
        );
    }

    #[test]
    fn excerpt_is_cut_at_the_budget() {
        let text = "word ".repeat(3000);
        let pages = paginate(&text, WORDS_PER_PAGE);
        let prompt = build_prompt(&pages, "q?", 100);

        let start = prompt.find("characters) ---\n").unwrap() + "characters) ---\n".len();
        let end = prompt.find("\n\n--- Question ---").unwrap();
        assert_eq!(prompt[start..end].chars().count(), 100);
        assert!(!prompt.contains("--- PAGE 2 ---"));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("日本語", 2), "日本");
        assert_eq!(truncate_chars("short", 50), "short");
    }
}
