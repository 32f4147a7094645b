//! Case-insensitive substring matching over entry names.
//!
//! Pure functions, no I/O. The walker builds one [`NameMatcher`] per search so
//! the term is lowercased once instead of once per entry.

/// Markers wrapped around the matched part of a rendered name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emphasis {
    pub open: String,
    pub close: String,
}

impl Emphasis {
    /// `<b>` / `</b>`, the markup the result list renders.
    pub fn html() -> Self {
        Self::new("<b>", "</b>")
    }

    /// ANSI bold on / reset, for terminals.
    pub fn ansi() -> Self {
        Self::new("\u{1b}[1m", "\u{1b}[0m")
    }

    /// No markers at all. Rendering degrades to plain lowercasing.
    pub fn none() -> Self {
        Self::new("", "")
    }

    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Emphasis {
    fn default() -> Self {
        Self::html()
    }
}

/// Returns `true` if `term` occurs in `name`, ignoring case.
///
/// An empty term matches every name.
pub fn matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Lowercases `name` and wraps the first occurrence of `term` in `<b>`/`</b>`.
///
/// Returns the lowercased name unchanged when `term` does not occur in it.
///
/// ```
/// assert_eq!(dirsift::render("Apple.TXT", "apple"), "<b>apple</b>.txt");
/// ```
pub fn render(name: &str, term: &str) -> String {
    render_with(name, term, &Emphasis::html())
}

/// [`render`] with caller-chosen markers.
pub fn render_with(name: &str, term: &str, emphasis: &Emphasis) -> String {
    emphasize(name.to_lowercase(), &term.to_lowercase(), emphasis)
}

fn emphasize(lowered: String, needle: &str, emphasis: &Emphasis) -> String {
    if needle.is_empty() {
        return lowered;
    }
    let Some(start) = lowered.find(needle) else {
        return lowered;
    };
    let end = start + needle.len();

    let mut out = String::with_capacity(lowered.len() + emphasis.open.len() + emphasis.close.len());
    out.push_str(&lowered[..start]);
    out.push_str(&emphasis.open);
    out.push_str(&lowered[start..end]);
    out.push_str(&emphasis.close);
    out.push_str(&lowered[end..]);
    out
}

/// A search term lowercased once, plus the markers used to render hits.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    needle: String,
    emphasis: Emphasis,
}

impl NameMatcher {
    pub fn new(term: &str, emphasis: Emphasis) -> Self {
        Self {
            needle: term.to_lowercase(),
            emphasis,
        }
    }

    /// The lowercased term.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Test `name` and, on a hit, return its rendered form.
    pub fn check(&self, name: &str) -> Option<String> {
        let lowered = name.to_lowercase();
        if !lowered.contains(&self.needle) {
            return None;
        }
        Some(emphasize(lowered, &self.needle, &self.emphasis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn matches_ignores_case() {
        assert!(matches("Apple.txt", "apple"));
        assert!(matches("apple.txt", "APPLE"));
        assert!(matches("GreenAPPLE", "pLe"));
        assert!(!matches("banana", "apple"));
    }

    #[test]
    fn empty_term_matches_everything() {
        assert!(matches("anything", ""));
        assert!(matches("", ""));
    }

    #[test]
    fn render_wraps_first_occurrence_only() {
        assert_eq!(render("apple.txt", "apple"), "<b>apple</b>.txt");
        assert_eq!(render("Apple2.TXT", "apple"), "<b>apple</b>2.txt");
        assert_eq!(render("papaya_pap", "PAP"), "<b>pap</b>aya_pap");
    }

    #[test]
    fn render_without_hit_only_lowercases() {
        assert_eq!(render("Banana.TXT", "apple"), "banana.txt");
        assert_eq!(render("Banana", ""), "banana");
    }

    #[test]
    fn render_with_custom_markers() {
        let em = Emphasis::new("[", "]");
        assert_eq!(render_with("MyReport.pdf", "report", &em), "my[report].pdf");
        assert_eq!(render_with("MyReport.pdf", "report", &Emphasis::none()), "myreport.pdf");
    }

    #[test]
    fn render_handles_multibyte_names() {
        assert_eq!(render("Ärger_Äpfel.txt", "äpfel"), "ärger_<b>äpfel</b>.txt");
    }

    #[test]
    fn name_matcher_agrees_with_free_functions() {
        let m = NameMatcher::new("Apple", Emphasis::html());
        assert_eq!(m.needle(), "apple");
        assert_eq!(m.check("GREEN_APPLE"), Some("green_<b>apple</b>".to_string()));
        assert_eq!(m.check("pear"), None);
    }

    proptest! {
        #[test]
        fn matches_is_lowercase_containment(name in "[a-zA-Z0-9_.]{0,24}", term in "[a-zA-Z0-9_.]{0,4}") {
            let expected = name.to_lowercase().contains(&term.to_lowercase());
            prop_assert_eq!(matches(&name, &term), expected);
        }

        #[test]
        fn render_has_one_marker_on_hit(prefix in "[a-z0-9]{0,8}", term in "[a-zA-Z]{1,6}", suffix in "[a-z0-9]{0,8}") {
            let name = format!("{prefix}{}{suffix}", term.to_uppercase());
            let out = render(&name, &term);
            prop_assert_eq!(out.matches("<b>").count(), 1);
            prop_assert_eq!(out.matches("</b>").count(), 1);

            let lowered = name.to_lowercase();
            let needle = term.to_lowercase();
            let start = lowered.find(&needle).unwrap();
            let expected = format!(
                "{}<b>{}</b>{}",
                &lowered[..start],
                needle,
                &lowered[start + needle.len()..]
            );
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn render_without_hit_is_lowercase(name in "[a-zA-Z0-9]{0,16}") {
            prop_assert_eq!(render(&name, "~"), name.to_lowercase());
        }
    }
}
