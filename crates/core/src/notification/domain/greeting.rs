pub const DEFAULT_GREETING: &str = "Hello {name}";

const NAME_PLACEHOLDER: &str = "{name}";

/// Fills every `{name}` placeholder in `template`. A template without a
/// placeholder gets the name appended after a space.
pub fn render_greeting(template: &str, name: &str) -> String {
    if template.contains(NAME_PLACEHOLDER) {
        template.replace(NAME_PLACEHOLDER, name)
    } else if template.is_empty() {
        name.to_string()
    } else {
        format!("{template} {name}")
    }
}
