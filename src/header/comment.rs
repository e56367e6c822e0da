// Header comment templates

/// Substitute `{Name}` and `{Date}` in `template` and split it into lines.
///
/// An empty template yields no lines. Trailing `\r` is stripped so templates
/// saved with Windows line endings render the same.
pub fn render_comment(template: &str, name: &str, date: &str) -> Vec<String> {
    if template.trim().is_empty() {
        return Vec::new();
    }

    template
        .replace("{Name}", name)
        .replace("{Date}", date)
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
