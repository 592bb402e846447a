//! Contact-field normalization.
//!
//! Both transforms are best-effort text cleanup: idempotent, side-effect
//! free, and never rejecting — validation is not their job. Already-normal
//! input passes through unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// Lowercase/trim an email address and rewrite spelled-out forms
/// ("jane dot doe at example dot com") into address syntax. Applied only
/// when the input has no `@` of its own.
pub fn normalize_email(raw: &str) -> String {
    static SPELLED_AT: OnceLock<Regex> = OnceLock::new();
    static SPELLED_DOT: OnceLock<Regex> = OnceLock::new();

    let mut email = raw.trim().to_lowercase();

    if !email.contains('@') {
        let at = SPELLED_AT.get_or_init(|| Regex::new(r"\s+at\s+").unwrap());
        email = at.replace_all(&email, "@").into_owned();
    }
    if email.contains('@') {
        let dot = SPELLED_DOT.get_or_init(|| Regex::new(r"\s+dot\s+").unwrap());
        email = dot.replace_all(&email, ".").into_owned();
    }

    // Whatever spaces survive were not separators; drop them.
    email.retain(|c| !c.is_whitespace());
    email
}

/// Strip decoration (whitespace, parentheses, dots) from a phone number,
/// keeping digits, grouping hyphens, and one leading `+`. Grouping the
/// caller chose survives; only decoration goes.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let plus = trimmed.starts_with('+');
    let kept: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    if plus {
        format!("+{kept}")
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_lowercases_and_trims() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn email_rewrites_spelled_out_forms() {
        assert_eq!(
            normalize_email("jane dot doe at example dot com"),
            "jane.doe@example.com"
        );
    }

    #[test]
    fn email_leaves_dotted_local_part_alone_when_at_present() {
        // "dot" rewriting never fires on the literal form.
        assert_eq!(normalize_email("dorothy@example.com"), "dorothy@example.com");
    }

    #[test]
    fn phone_strips_decoration_but_keeps_grouping() {
        assert_eq!(normalize_phone("(555) 123 4567"), "5551234567");
        assert_eq!(normalize_phone("+1 555 123 4567"), "+15551234567");
        assert_eq!(normalize_phone("555-1234"), "555-1234");
    }

    #[test]
    fn both_are_idempotent() {
        for raw in ["jane dot doe at example dot com", "JANE@EXAMPLE.COM", "x@y.z"] {
            let once = normalize_email(raw);
            assert_eq!(normalize_email(&once), once);
        }
        for raw in ["(555) 123-4567", "+1-555-123-4567", "5551234"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }
}
