use {
    std::fmt::Write,
    crate::{aggregate::SentimentCounts, entity::SentimentLabel},
};

pub const TITLE: &str = "Sentiment Distribution Analysis";

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 440.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 60.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const BAR_WIDTH_RATIO: f64 = 0.6;

pub fn color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "#10B981",
        SentimentLabel::Neutral => "#F59E0B",
        SentimentLabel::Negative => "#EF4444",
    }
}

/// Bar chart of comment counts per label with value labels on top of each bar.
pub fn render_svg(counts: &SentimentCounts) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let max = counts.max().max(1) as f64;
    let slot = plot_width / SentimentLabel::ALL.len() as f64;
    let bar_width = slot * BAR_WIDTH_RATIO;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#, w = WIDTH, h = HEIGHT);
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r##"<text x="{:.1}" y="36" font-family="Helvetica, Arial, sans-serif" font-size="20" font-weight="bold" text-anchor="middle" fill="#1F2937">{}</text>"##,
        WIDTH / 2.0,
        TITLE,
    );

    for tick in 0..=4 {
        let y = baseline - plot_height * tick as f64 / 4.0;
        let value = max * tick as f64 / 4.0;
        let _ = writeln!(svg, r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#E5E7EB" stroke-dasharray="4 4"/>"##, MARGIN_LEFT, y, WIDTH - MARGIN_RIGHT, y);
        let _ = writeln!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" font-family="Helvetica, Arial, sans-serif" font-size="12" text-anchor="end" fill="#6B7280">{:.0}</text>"##,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            value,
        );
    }

    for (i, (label, count)) in counts.iter().enumerate() {
        let bar_height = plot_height * count as f64 / max;
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = baseline - bar_height;
        let center = x + bar_width / 2.0;

        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" rx="4"><title>{}: {}</title></rect>"#,
            x, y, bar_width, bar_height, color(label), label.title(), count,
        );
        let _ = writeln!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" font-family="Helvetica, Arial, sans-serif" font-size="14" font-weight="bold" text-anchor="middle" fill="#111827">{}</text>"##,
            center, y - 8.0, count,
        );
        let _ = writeln!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" font-family="Helvetica, Arial, sans-serif" font-size="14" text-anchor="middle" fill="#374151">{}</text>"##,
            center, baseline + 24.0, label.title(),
        );
    }

    let _ = writeln!(svg, r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#9CA3AF"/>"##, MARGIN_LEFT, baseline, WIDTH - MARGIN_RIGHT, baseline);
    svg.push_str("</svg>\n");
    svg
}
