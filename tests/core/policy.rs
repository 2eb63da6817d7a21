use crate::helpers::store_with_enforce;
use actix_web_csp_compiler::core::CspPolicy;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_policy_renders_nothing() {
        let policy = CspPolicy::new();

        assert!(policy.is_empty());
        assert_eq!(policy.render(), "");
        assert!(policy.header_value().unwrap().is_none());
    }

    #[test]
    fn test_render_end_to_end() {
        let store = store_with_enforce(&[
            ("default-src", &["self"]),
            ("img-src", &["self", "https://cdn.example.com"]),
        ]);

        let expected = "default-src 'self';img-src 'self' https://cdn.example.com;";
        assert_eq!(store.enforce().render(), expected);
        assert_eq!(store.enforce().render(), expected);

        let header = store.enforce().header_value().unwrap().unwrap();
        assert_eq!(header.to_str().unwrap(), expected);
    }

    #[test]
    fn test_render_keeps_declaration_order() {
        let store = store_with_enforce(&[
            ("script-src", &["self"]),
            ("default-src", &["none"]),
            ("style-src", &["unsafe-inline"]),
        ]);

        assert_eq!(
            store.enforce().render(),
            "script-src 'self';default-src 'none';style-src 'unsafe-inline';"
        );
    }

    #[test]
    fn test_render_valueless_directive() {
        let store = store_with_enforce(&[("sandbox", &[]), ("default-src", &["self"])]);

        assert_eq!(store.enforce().render(), "sandbox;default-src 'self';");
    }

    #[test]
    fn test_policy_accessors() {
        let store = store_with_enforce(&[("img-src", &["self", "*.example.com"])]);
        let policy = store.enforce();

        assert_eq!(policy.len(), 1);
        let directive = policy.get_directive("img-src").unwrap();
        assert_eq!(directive.name(), "img-src");
        assert!(directive.contains_raw("*.example.com"));
        assert!(directive.contains_raw("self"));
        assert!(!directive.contains_raw("'self'"));
        assert_eq!(policy.directives().count(), 1);
        assert!(policy.estimated_size() >= policy.render().len());
    }
}
