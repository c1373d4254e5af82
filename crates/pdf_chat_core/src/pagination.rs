//! crates/pdf_chat_core/src/pagination.rs
//!
//! Splits extracted text into fixed-size pseudo-pages. The numbering is derived
//! purely from word count and does not follow the PDF's visual pages.

use crate::domain::PseudoPage;

/// Number of whitespace-separated words per pseudo-page.
pub const WORDS_PER_PAGE: usize = 500;

/// Groups the words of `text` into pages of at most `words_per_page` words.
///
/// Words inside a page are joined with a single space. Only the last page may
/// be shorter. Text without any words produces no pages.
pub fn paginate(text: &str, words_per_page: usize) -> Vec<PseudoPage> {
    let words_per_page = words_per_page.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(words_per_page)
        .enumerate()
        .map(|(index, chunk)| PseudoPage {
            page_number: index + 1,
            text: chunk.join(" "),
        })
        .collect()
}

/// The number of pages `paginate` would produce, without building them.
pub fn page_count(text: &str, words_per_page: usize) -> usize {
    text.split_whitespace()
        .count()
        .div_ceil(words_per_page.max(1))
}
