use {
    std::{collections::HashMap, fmt::Write},
    crate::entity::SentimentLabel,
    super::escape_xml,
};

pub const MAX_WORDS: usize = 150;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MIN_FONT_SIZE: f64 = 12.0;
const MAX_FONT_SIZE: f64 = 72.0;
const SPIRAL_STEPS: usize = 3000;

const GREENS: &[&str] = &["#00441b", "#006d2c", "#238b45", "#41ab5d", "#74c476"];
const REDS: &[&str] = &["#67000d", "#a50f15", "#cb181d", "#ef3b2c", "#fb6a4a"];
const BLUES: &[&str] = &["#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6"];

#[derive(Debug, Clone, PartialEq)]
struct PlacedWord {
    text: String,
    font_size: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: &'static str,
}

/// Most frequent words of a corpus, most frequent first. Ties are broken alphabetically, single letters are ignored.
pub fn top_words(corpus: &str, limit: usize) -> Vec<(String, usize)> {
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for word in corpus.split_whitespace() {
        if word.chars().count() < 2 {
            continue;
        }
        *frequencies.entry(word.to_lowercase()).or_insert(0) += 1;
    }

    let mut words: Vec<_> = frequencies.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words
}

pub fn palette(label: SentimentLabel) -> &'static [&'static str] {
    match label {
        SentimentLabel::Positive => GREENS,
        SentimentLabel::Negative => REDS,
        SentimentLabel::Neutral => BLUES,
    }
}

/// Renders a word cloud as SVG. Returns None when there are no words to draw.
pub fn render_svg(words: &[(String, usize)], label: SentimentLabel) -> Option<String> {
    let placed = layout(words, palette(label));
    if placed.is_empty() {
        return None;
    }

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#, w = WIDTH, h = HEIGHT);
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    for word in &placed {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="Helvetica, Arial, sans-serif" font-size="{:.1}" font-weight="bold" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            word.x,
            word.y,
            word.font_size,
            word.color,
            escape_xml(&word.text),
        );
    }
    svg.push_str("</svg>\n");

    Some(svg)
}

fn layout(words: &[(String, usize)], colors: &'static [&'static str]) -> Vec<PlacedWord> {
    let max_count = match words.iter().map(|(_, count)| *count).max() {
        Some(max_count) if max_count > 0 => max_count as f64,
        _ => return Vec::new(),
    };

    let mut placed: Vec<PlacedWord> = Vec::new();

    for (rank, (text, count)) in words.iter().take(MAX_WORDS).enumerate() {
        let font_size = MIN_FONT_SIZE + (MAX_FONT_SIZE - MIN_FONT_SIZE) * (*count as f64 / max_count).sqrt();
        let width = estimated_width(text, font_size);
        let height = font_size;
        if width > WIDTH {
            continue;
        }

        let color = colors[rank % colors.len()];
        if let Some((x, y)) = find_position(&placed, width, height) {
            placed.push(PlacedWord {
                text: text.clone(),
                font_size,
                x,
                y,
                width,
                height,
                color,
            });
        }
    }

    placed
}

/// Walks an Archimedean spiral out of the centre until the box fits.
fn find_position(placed: &[PlacedWord], width: f64, height: f64) -> Option<(f64, f64)> {
    for step in 0..SPIRAL_STEPS {
        let angle = step as f64 * 0.1;
        let radius = 2.0 * angle;
        let x = WIDTH / 2.0 + radius * angle.cos();
        let y = HEIGHT / 2.0 + radius * angle.sin() * (HEIGHT / WIDTH);

        let inside = x - width / 2.0 >= 0.0
            && x + width / 2.0 <= WIDTH
            && y - height / 2.0 >= 0.0
            && y + height / 2.0 <= HEIGHT;

        if inside && !placed.iter().any(|other| overlaps(other, x, y, width, height)) {
            return Some((x, y));
        }
    }

    None
}

fn overlaps(other: &PlacedWord, x: f64, y: f64, width: f64, height: f64) -> bool {
    (other.x - x).abs() * 2.0 < other.width + width && (other.y - y).abs() * 2.0 < other.height + height
}

fn estimated_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.62
}
