//! Habit ID generation
//!
//! All IDs use the format: `{6-char-hex}-{slug}`
//! Example: `019430-morning-run`

/// Generate a habit ID from a title
pub fn generate_id(title: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    let slug = slugify(title);
    if slug.is_empty() {
        hex_prefix.to_string()
    } else {
        format!("{}-{}", hex_prefix, slug)
    }
}

/// Slugify a title for use in IDs
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id("Drink More Water");
        assert!(id.len() > 7);
        assert!(id.ends_with("-drink-more-water"));
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id("Run");
        let b = generate_id("Run");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_id_symbol_only_title() {
        // Slug collapses to nothing; the hex prefix still stands alone
        let id = generate_id("!!!");
        assert_eq!(id.len(), 6);
        assert!(!id.contains('-'));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Read 10 pages!"), "read-10-pages");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("don't snooze"), "dont-snooze");
        assert_eq!(slugify("it's working"), "its-working");
    }
}
