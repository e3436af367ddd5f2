pub const ROUTINE_SYSTEM: &str = include_str!("../data/prompts/routine_system.txt");
pub const ROUTINE_USER: &str = include_str!("../data/prompts/routine_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "acne")]),
            "acne and {{b}}"
        );
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!ROUTINE_SYSTEM.is_empty());
        assert!(!ROUTINE_USER.is_empty());
    }

    #[test]
    fn test_routine_user_has_placeholders() {
        assert!(ROUTINE_USER.contains("{{condition}}"));
        assert!(ROUTINE_USER.contains("{{probability}}"));
    }

    #[test]
    fn test_routine_user_names_recognized_headings() {
        assert!(ROUTINE_USER.contains("Natural Remedies:"));
        assert!(ROUTINE_USER.contains("Conventional Treatments:"));
    }
}
