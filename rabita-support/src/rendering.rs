//! Text rendering utilities for human-friendly output.
//!
//! Used by the container's error messages (dependency chains, "did you
//! mean?" suggestions) and by the boot report summary.

/// Renders a key chain as a readable string.
///
/// # Examples
/// ```
/// use rabita_support::rendering::render_chain;
///
/// let chain = vec!["services.User", "repositories.User", "services.User"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "services.User → repositories.User → services.User");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use rabita_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    // Keep the last segment of each path component:
    // "my_app::services::UserService" → "UserService"
    // "Arc<dyn my_app::Logger>" → "Arc<dyn Logger>"
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Generates "did you mean?" suggestions from the registered names.
///
/// Compares the requested name against the available ones and returns
/// up to `max_suggestions` close matches, best first.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&name| {
            if name == requested {
                return None;
            }
            let name_lower = name.to_lowercase();

            // Exact substring match wins
            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            // Otherwise score by common prefix length
            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Renders labelled count rows as an aligned table.
///
/// ```text
/// repositories  discovered 4  loaded 4  errors 0
/// services      discovered 1  loaded 0  errors 1
/// ```
pub fn render_count_table(rows: &[(String, Vec<(&'static str, usize)>)]) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut result = String::new();
    for (label, counts) in rows {
        result.push_str(&format!("{label:<label_width$}"));
        for (name, count) in counts {
            result.push_str(&format!("  {name} {count}"));
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_chain() {
        let chain = vec!["a", "b", "c", "a"];
        assert_eq!(render_chain(&chain), "a → b → c → a");
    }

    #[test]
    fn render_single_element_chain() {
        let chain = vec!["a"];
        assert_eq!(render_chain(&chain), "a");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<&str> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn shorten_simple_path() {
        assert_eq!(
            shorten_type_name("my_app::services::UserService"),
            "UserService"
        );
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("String"), "String");
    }

    #[test]
    fn suggest_similar_names() {
        let available = vec![
            "services.MailerService",
            "services.UserService",
            "repositories.UserRepository",
            "config",
        ];

        let suggestions = suggest_similar("services.Mailer", &available, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "services.MailerService");
    }

    #[test]
    fn suggest_skips_exact_match() {
        let available = vec!["config"];
        let suggestions = suggest_similar("config", &available, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["config"];
        let suggestions = suggest_similar("xyz", &available, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn count_table_aligns_labels() {
        let rows = vec![
            ("repositories".to_string(), vec![("loaded", 4), ("errors", 0)]),
            ("services".to_string(), vec![("loaded", 1), ("errors", 1)]),
        ];

        let table = render_count_table(&rows);
        assert!(table.contains("repositories  loaded 4  errors 0"));
        assert!(table.contains("services      loaded 1  errors 1"));
    }
}
