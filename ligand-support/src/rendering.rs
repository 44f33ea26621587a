//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution paths, type names,
//! and "did you mean?" suggestions in error output.

/// Renders a resolution path as a readable string.
///
/// # Examples
/// ```
/// use ligand_support::rendering::render_path;
///
/// let path = vec!["Engine", "Gearbox", "Engine"];
/// assert_eq!(render_path(&path), "Engine → Gearbox → Engine");
/// ```
pub fn render_path(path: &[impl AsRef<str>]) -> String {
    let mut rendered = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            rendered.push_str(" → ");
        }
        rendered.push_str(segment.as_ref());
    }
    rendered
}

/// Strips module paths from a fully qualified type name.
///
/// Generic arguments keep their structure, only the path prefix of every
/// segment is removed.
///
/// ```
/// use ligand_support::rendering::simple_type_name;
///
/// assert_eq!(simple_type_name("garage::cars::Car"), "Car");
/// assert_eq!(
///     simple_type_name("alloc::sync::Arc<dyn garage::parts::Wheel>"),
///     "Arc<dyn Wheel>"
/// );
/// ```
pub fn simple_type_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (idx, ch) in full_name.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            out.push_str(last_path_segment(&full_name[segment_start..idx]));
            out.push(ch);
            segment_start = idx + ch.len_utf8();
        }
    }
    out.push_str(last_path_segment(&full_name[segment_start..]));
    out
}

fn last_path_segment(segment: &str) -> &str {
    segment.rsplit("::").next().unwrap_or(segment)
}

/// Picks registered type names that look like the requested one.
///
/// Matching is done on simple names, case-insensitively: containment in
/// either direction scores highest, then a shared prefix of at least
/// three characters. At most `limit` names are returned, best first.
pub fn suggest_similar<'a>(requested: &str, available: &[&'a str], limit: usize) -> Vec<&'a str> {
    let wanted = simple_type_name(requested).to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &'a str)> = available
        .iter()
        .filter_map(|&candidate| {
            let short = simple_type_name(candidate).to_lowercase();
            if short == wanted {
                return None;
            }
            if short.contains(&wanted) || wanted.contains(&short) {
                return Some((100, candidate));
            }
            let prefix = short
                .chars()
                .zip(wanted.chars())
                .take_while(|(a, b)| a == b)
                .count();
            (prefix >= 3).then_some((prefix * 10, candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}
