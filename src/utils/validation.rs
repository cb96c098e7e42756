//! Input validation primitives.

/// True when the value is absent, empty, or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Names of the fields whose values are blank, in the order given.
pub fn blank_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| is_blank(*value))
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_blank_for_none() {
        assert!(is_blank(None));
    }

    #[test]
    fn is_blank_for_whitespace_only() {
        assert!(is_blank(Some("   ")));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("\t\n")));
    }

    #[test]
    fn is_blank_false_for_content() {
        assert!(!is_blank(Some(" x ")));
    }

    #[test]
    fn blank_fields_keeps_order() {
        let fields = [("name", Some(" ")), ("package", None), ("other", Some("ok"))];
        assert_eq!(blank_fields(&fields), vec!["name", "package"]);
    }
}
