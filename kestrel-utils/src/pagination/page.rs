//! Pure pagination math and page-list shaping helpers.

use kestrel_core::Page;

use crate::embed::build_paginated_embed;

/// Compute the number of pages for a paginated list.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

/// Cursor after a `next` press, wrapping to the first page.
pub fn next_cursor(cursor: usize, len: usize) -> usize {
    (cursor + 1) % len.max(1)
}

/// Cursor after a `prev` press, wrapping to the last page.
pub fn prev_cursor(cursor: usize, len: usize) -> usize {
    let len = len.max(1);
    (cursor + len - 1) % len
}

/// Return start/end indices for a zero-based page window.
pub fn page_window(total_items: usize, per_page: usize, index: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = index.saturating_mul(safe_per_page).min(total_items);
    let end = (start + safe_per_page).min(total_items);
    (start, end)
}

/// Split `items` into bullet-list embed pages of `per_page` entries each.
///
/// An empty list still yields one page so a paginator can always be built.
pub fn list_pages(title: &str, items: &[String], per_page: usize) -> Vec<Page> {
    let total = total_pages(items.len(), per_page).max(1);

    (0..total)
        .map(|index| {
            let (start, end) = page_window(items.len(), per_page, index);
            let description = if start == end {
                String::from("Nothing to show.")
            } else {
                format!("- {}", items[start..end].join("\n- "))
            };
            build_paginated_embed(title, description, index + 1, total)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_both_ways() {
        assert_eq!(next_cursor(2, 3), 0);
        assert_eq!(next_cursor(0, 3), 1);
        assert_eq!(prev_cursor(0, 3), 2);
        assert_eq!(prev_cursor(1, 3), 0);
        assert_eq!(next_cursor(0, 1), 0);
        assert_eq!(prev_cursor(0, 1), 0);
    }

    #[test]
    fn list_pages_chunks_items() {
        let items: Vec<String> = (1..=12).map(|n| format!("item {n}")).collect();
        let pages = list_pages("Items", &items, 5);

        assert_eq!(pages.len(), 3);
        let last = pages[2].embed.as_ref().unwrap();
        assert_eq!(last.description.as_deref(), Some("- item 11\n- item 12"));
        assert_eq!(last.footer.as_deref(), Some("Page 3/3"));
    }

    #[test]
    fn empty_list_yields_one_page() {
        let pages = list_pages("Empty", &[], 5);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].embed.as_ref().unwrap().footer, None);
    }
}
