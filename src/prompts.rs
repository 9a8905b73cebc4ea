use crate::models::{KeywordPair, PromptPair};

pub const COUPLET_SYSTEM: &str = include_str!("../data/prompts/couplet_system.txt");
pub const COUPLET_USER: &str = include_str!("../data/prompts/couplet_user.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is single pass, so placeholder syntax inside a value is left
/// untouched. Unknown placeholders are kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Render the system and user instructions for one keyword pair.
pub fn build(keywords: &KeywordPair) -> PromptPair {
    PromptPair {
        system: COUPLET_SYSTEM.trim_end().to_string(),
        user: render(
            COUPLET_USER,
            &[
                ("keyword1", &keywords.keyword1),
                ("keyword2", &keywords.keyword2),
            ],
        )
        .trim_end()
        .to_string(),
    }
}
