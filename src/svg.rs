/// Width and height of an SVG document, taken from its `width`/`height`
/// attributes or, failing that, its `viewBox`. `None` if the bytes are not
/// an SVG or carry no usable size.
pub fn svg_intrinsic_size(data: &[u8]) -> Option<(f64, f64)> {
    let text = std::str::from_utf8(data).ok()?;
    let doc = roxmltree::Document::parse(text).ok()?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" { return None; }

    let mut width = root.attribute("width").and_then(parse_length);
    let mut height = root.attribute("height").and_then(parse_length);
    if let Some(viewbox) = root.attribute("viewBox") {
        let parts: Vec<f64> = viewbox
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if parts.len() == 4 {
            width = width.or(Some(parts[2]));
            height = height.or(Some(parts[3]));
        }
    }
    match (width, height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

// Percentages say nothing about intrinsic size.
fn parse_length(value: &str) -> Option<f64> {
    let v = value.trim();
    if v.ends_with('%') { return None; }
    v.trim_end_matches("px").trim().parse::<f64>().ok()
}
