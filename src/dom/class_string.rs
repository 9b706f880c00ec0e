//! `className` string edits for nodes without a native class list.

/// Whitespace-separated class tokens.
pub fn tokens(class_name: &str) -> impl Iterator<Item = &str> {
    class_name.split_whitespace()
}

pub fn contains(class_name: &str, class: &str) -> bool {
    tokens(class_name).any(|t| t == class)
}

/// Append `class` unless already present.
pub fn add(class_name: &str, class: &str) -> String {
    let mut out: Vec<&str> = tokens(class_name).collect();
    if !class.is_empty() && !out.contains(&class) {
        out.push(class);
    }
    out.join(" ")
}

/// Drop every occurrence of each space-separated name in `classes`.
pub fn remove(class_name: &str, classes: &str) -> String {
    let drop: Vec<&str> = tokens(classes).collect();
    tokens(class_name)
        .filter(|t| !drop.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn toggle(class_name: &str, class: &str) -> String {
    if contains(class_name, class) {
        remove(class_name, class)
    } else {
        add(class_name, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        assert_eq!(add("", "a"), "a");
        assert_eq!(add("a", "a"), "a");
        assert_eq!(add(" a  b ", "c"), "a b c");
        assert_eq!(add("a\tb", "b"), "a b");
    }

    #[test]
    fn remove_matches_whole_tokens_only() {
        assert_eq!(remove("flash-success flash", "flash"), "flash-success");
        assert_eq!(remove("a b a", "a"), "b");
        assert_eq!(remove("a b c", "a c"), "b");
    }

    #[test]
    fn contains_does_not_match_substrings() {
        assert!(contains("grabbable js-modal-header", "js-modal-header"));
        assert!(!contains("js-modal-header", "js-modal"));
    }

    #[test]
    fn toggle_flips_membership() {
        assert_eq!(toggle("a", "b"), "a b");
        assert_eq!(toggle("a b", "b"), "a");
    }
}
