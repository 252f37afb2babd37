// color.rs
// CSS named colours used by the trail table, converted to linear RGB for the surface format.

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn named_srgb(name: &str) -> Option<[u8; 3]> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "green" => [0, 128, 0],
        "orange" => [255, 165, 0],
        "hotpink" => [255, 105, 180],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        "blue" => [0, 0, 255],
        "dodgerblue" => [30, 144, 255],
        "red" => [255, 0, 0],
        "yellow" => [255, 255, 0],
        "brown" => [165, 42, 42],
        "teal" => [0, 128, 128],
        _ => return None,
    };
    Some(rgb)
}

fn hex_srgb(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 { return None; }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([byte(0)?, byte(2)?, byte(4)?])
}

/// Linear RGB for a CSS colour name or `#rrggbb`. Unknown values draw black.
pub fn css_to_linear(name: &str) -> [f32; 3] {
    match named_srgb(name).or_else(|| hex_srgb(name)) {
        Some([r, g, b]) => [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)],
        None => {
            log::warn!("Unknown colour {:?}, drawing black", name);
            [0.0, 0.0, 0.0]
        }
    }
}
