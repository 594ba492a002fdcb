/// Split one CSV line on commas, treating a comma as a delimiter only when an
/// even number of `"` characters precede it on the line. Equivalently: a
/// comma inside a pair of double quotes is not a split point.
///
/// Doubled quotes (`""`) carry no escape meaning here; the wire format this
/// crate consumes never produces them.
pub fn split_quoted(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Trim whitespace and strip one layer of surrounding double quotes.
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}
