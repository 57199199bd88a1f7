use crate::ExportFormat;

/// Windows-safe export name: `{sanitized_basename}.{ext}`.
pub fn export_filename(basename: &str, format: ExportFormat) -> String {
    format!("{}.{}", sanitize_basename(basename), format.extension())
}

fn sanitize_basename(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    let mut compacted = String::with_capacity(replaced.len());
    for c in replaced.trim_matches(&['_', ' ', '.'][..]).chars() {
        if c == '_' && compacted.ends_with('_') {
            continue;
        }
        compacted.push(c);
    }
    if compacted.is_empty() {
        compacted.push_str("messages");
    }
    if compacted.chars().count() > 80 {
        compacted = compacted.chars().take(80).collect();
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_characters_collapse() {
        assert_eq!(
            export_filename("DM: alice / bob??", ExportFormat::Markdown),
            "DM_ alice _ bob.md"
        );
    }

    #[test]
    fn empty_and_reserved_names_are_patched() {
        assert_eq!(export_filename("  ..", ExportFormat::Text), "messages.txt");
        assert_eq!(export_filename("con", ExportFormat::Json), "con_.json");
    }
}
