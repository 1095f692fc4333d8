// Helpers shared by the feed readers.

/// Keeps a string only if it has some content.
pub fn non_empty(s: &Option<String>) -> Option<String> {
    match s {
        Some(x) if !x.trim().is_empty() => Some(x.trim().to_string()),
        _ => None,
    }
}

/// Joins the parts that have some content.
pub fn join_present(parts: &[Option<String>], sep: &str) -> Option<String> {
    let present: Vec<String> = parts.iter().filter_map(non_empty).collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}

/// One-line postal address: "line1, line2, city, ST 12345".
pub fn format_address(
    lines: &[Option<String>],
    city: &Option<String>,
    state: &Option<String>,
    zip: &Option<String>,
) -> Option<String> {
    let region = join_present(&[state.clone(), zip.clone()], " ");
    let locality = join_present(&[city.clone(), region], ", ");
    let mut parts: Vec<Option<String>> = lines.to_vec();
    parts.push(locality);
    join_present(&parts, ", ")
}
