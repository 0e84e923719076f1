use kestrel_core::{EmbedPage, Page};

/// Build a standard paginated embed page with consistent styling.
pub fn build_paginated_embed(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
) -> Page {
    build_paginated_embed_with_footer_note(title, description, page, total_pages, None)
}

/// Build a standard paginated embed page with an optional footer suffix.
pub fn build_paginated_embed_with_footer_note(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
    footer_note: Option<&str>,
) -> Page {
    let page = page.max(1);
    let total_pages = total_pages.max(1);

    let footer_text = if total_pages > 1 {
        match footer_note {
            Some(note) if !note.is_empty() => format!("Page {page}/{total_pages} • {note}"),
            _ => format!("Page {page}/{total_pages}"),
        }
    } else {
        footer_note.unwrap_or_default().to_owned()
    };

    Page::embed(
        EmbedPage::new(title)
            .description(description)
            .footer(footer_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_carries_position_and_note() {
        let page = build_paginated_embed_with_footer_note("T", "d", 2, 4, Some("sorted"));
        let embed = page.embed.unwrap();

        assert_eq!(embed.footer.as_deref(), Some("Page 2/4 • sorted"));
    }

    #[test]
    fn single_page_has_no_position() {
        let page = build_paginated_embed_with_footer_note("T", "d", 1, 1, Some("note"));
        assert_eq!(page.embed.unwrap().footer.as_deref(), Some("note"));

        let page = build_paginated_embed("T", "d", 1, 1);
        assert_eq!(page.embed.unwrap().footer, None);
    }
}
