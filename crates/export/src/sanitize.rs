//! Cell cleanup shared by both export formats.

/// Mojibake left behind when a U+FFFE marker from the statement PDF is
/// decoded as UTF-8 and re-read as Mac Roman.
pub const CORRUPTED_ARTIFACT: &str = "√Ø¬ø¬æ";

pub fn strip_artifact(s: &str) -> String {
    s.replace(CORRUPTED_ARTIFACT, "")
}

/// Replaces each run of `\r`, `\n` and `\t` with one space.
pub fn collapse_control_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if matches!(c, '\r' | '\n' | '\t') {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// A cell as written to the tabular export, before quoting.
pub fn clean_cell(s: &str) -> String {
    collapse_control_whitespace(&strip_artifact(s)).trim().to_string()
}

/// Escapes the five XML special characters. `&` is handled in the same
/// pass as the others, so entities produced here are never re-escaped.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Noncharacters and private-use code points that the voucher importer
/// rejects.
fn is_unrepresentable(c: char) -> bool {
    matches!(c, '\u{FFFE}' | '\u{FFFF}' | '\u{E000}'..='\u{F8FF}')
}

/// Narration text safe to embed in a voucher element.
pub fn clean_narration(s: &str) -> String {
    let escaped = escape_xml(&collapse_control_whitespace(&strip_artifact(s)));
    escaped
        .chars()
        .map(|c| if is_unrepresentable(c) { ' ' } else { c })
        .filter(|&c| (c as u32) >= 0x20 && (c as u32) < 0xFFFE)
        .collect::<String>()
        .trim()
        .to_string()
}
