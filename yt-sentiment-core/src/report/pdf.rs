use {
    std::{collections::BTreeMap, path::Path},
    anyhow::{anyhow, Context, Result},
    lopdf::{
        dictionary,
        content::{Content, Operation},
        Document,
        Object,
        Stream,
    },
    pulldown_cmark::{Event, Options, Parser, Tag, TagEnd},
    crate::{
        aggregate::SentimentCounts,
        entity::SentimentLabel,
        insights::Insights,
    },
};

pub const TITLE: &str = "YouTube Sentiment Analysis Report";
pub const SUMMARY_TITLE: &str = "Executive Summary & Recommendations";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
// average Helvetica glyph width as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.5;

pub struct PdfContent<'a> {
    pub video_id: &'a str,
    pub created_at: &'a str,
    pub counts: &'a SentimentCounts,
    pub top_words: &'a BTreeMap<SentimentLabel, Vec<(String, usize)>>,
    pub insights: &'a Insights,
}

struct PageWriter {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

/// Drops everything the built-in PDF fonts cannot show.
pub fn safe_encode(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii() && (!c.is_ascii_control() || *c == '\n'))
        .collect()
}

/// Turns generated markdown into plain lines. Blocks are separated by an empty line, list items keep a "-" or "1." marker indented by depth.
fn plain_text(markdown: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Start(Tag::List(start)) => {
                flush_line(&mut lines, &mut line);
                lists.push(start);
            },
            Event::End(TagEnd::List(_)) => {
                flush_line(&mut lines, &mut line);
                lists.pop();
                if lists.is_empty() {
                    end_block(&mut lines);
                }
            },
            Event::Start(Tag::Item) => {
                flush_line(&mut lines, &mut line);
                let marker = match lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}.", number);
                        *number += 1;
                        marker
                    },
                    _ => "-".to_owned(),
                };
                line = format!("{}{} ", "  ".repeat(lists.len().saturating_sub(1)), marker);
            },
            Event::End(TagEnd::Item) => flush_line(&mut lines, &mut line),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock | TagEnd::BlockQuote(_)) => {
                flush_line(&mut lines, &mut line);
                if lists.is_empty() {
                    end_block(&mut lines);
                }
            },
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => line.push_str(&text),
            Event::SoftBreak => line.push(' '),
            Event::HardBreak => flush_line(&mut lines, &mut line),
            _ => {},
        }
    }

    flush_line(&mut lines, &mut line);
    while lines.last().map_or(false, String::is_empty) {
        lines.pop();
    }

    lines
}

fn flush_line(lines: &mut Vec<String>, line: &mut String) {
    let text = std::mem::take(line);
    let text = text.trim_end();
    if !text.trim().is_empty() {
        lines.push(text.to_owned());
    }
}

fn end_block(lines: &mut Vec<String>) {
    if lines.last().map_or(false, |last| !last.is_empty()) {
        lines.push(String::new());
    }
}

fn wrap(text: &str, font_size: i64) -> Vec<String> {
    let max_chars = (((PAGE_WIDTH - 2 * MARGIN) as f64) / (font_size as f64 * GLYPH_WIDTH)) as usize;
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);

        while line.len() > max_chars {
            let rest = line.split_off(max_chars);
            lines.push(std::mem::replace(&mut line, rest));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: i64) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn text(&mut self, font: &str, font_size: i64, x: i64, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), font_size.into()]),
            Operation::new("Td", vec![x.into(), self.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(safe_encode(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn centered(&mut self, font: &str, font_size: i64, text: &str) {
        let width = (safe_encode(text).len() as f64 * font_size as f64 * GLYPH_WIDTH) as i64;
        let x = ((PAGE_WIDTH - width) / 2).max(MARGIN);
        self.ensure_space(font_size);
        self.y -= font_size;
        self.text(font, font_size, x, text);
        self.y -= font_size / 2;
    }

    fn paragraph(&mut self, font_size: i64, text: &str) {
        let line_height = font_size + font_size / 2;
        for line in wrap(&safe_encode(text), font_size) {
            self.ensure_space(line_height);
            self.y -= line_height;
            self.text(REGULAR_FONT, font_size, MARGIN, &line);
        }
    }

    fn gap(&mut self, height: i64) {
        self.y -= height;
    }

    fn fill_color(&mut self, label: SentimentLabel) {
        let rgb = match label {
            SentimentLabel::Positive => vec![Object::Real(0.063), Object::Real(0.725), Object::Real(0.506)],
            SentimentLabel::Neutral => vec![Object::Real(0.961), Object::Real(0.62), Object::Real(0.043)],
            SentimentLabel::Negative => vec![Object::Real(0.937), Object::Real(0.267), Object::Real(0.267)],
        };
        self.current.push(Operation::new("rg", rgb));
    }

    fn bar_chart(&mut self, counts: &SentimentCounts) {
        let chart_height: i64 = 220;
        let label_height: i64 = 30;
        self.ensure_space(chart_height + label_height * 2);

        self.y -= label_height;
        let baseline = self.y - chart_height;
        let slot = (PAGE_WIDTH - 2 * MARGIN) / SentimentLabel::ALL.len() as i64;
        let bar_width = slot * 3 / 5;
        let max = counts.max().max(1) as i64;

        for (i, (label, count)) in counts.iter().enumerate() {
            let bar_height = chart_height * count as i64 / max;
            let x = MARGIN + slot * i as i64 + (slot - bar_width) / 2;

            self.current.push(Operation::new("q", vec![]));
            self.fill_color(label);
            self.current.push(Operation::new("re", vec![x.into(), baseline.into(), bar_width.into(), bar_height.into()]));
            self.current.push(Operation::new("f", vec![]));
            self.current.push(Operation::new("Q", vec![]));

            let value = count.to_string();
            self.y = baseline + bar_height + 6;
            self.text(BOLD_FONT, 12, x + bar_width / 2 - value.len() as i64 * 3, &value);
            self.y = baseline - 18;
            self.text(REGULAR_FONT, 12, x + bar_width / 2 - label.title().len() as i64 * 3, label.title());
        }

        self.y = baseline - label_height;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.new_page();
        self.pages
    }
}

fn layout(content: &PdfContent) -> Vec<Vec<Operation>> {
    let mut writer = PageWriter::new();

    writer.centered(BOLD_FONT, 18, TITLE);
    writer.centered(REGULAR_FONT, 10, &format!("Video {} - generated {}", content.video_id, content.created_at));
    writer.gap(10);
    writer.paragraph(12, &format!("Total comments analyzed: {}", content.counts.total()));
    for (label, count) in content.counts.iter() {
        writer.paragraph(12, &format!("{}: {}", label.title(), count));
    }
    writer.bar_chart(content.counts);

    for label in SentimentLabel::ALL {
        let words = match content.top_words.get(&label) {
            Some(words) if !words.is_empty() => words,
            _ => continue,
        };

        writer.new_page();
        writer.centered(BOLD_FONT, 14, &format!("{} Sentiment Analysis", label.title()));

        let words = words.iter().take(30).map(|(word, count)| format!("{} ({})", word, count)).collect::<Vec<_>>().join(", ");
        writer.paragraph(10, &format!("Top words: {}", words));
        writer.gap(10);

        let insight = match content.insights.for_label(label) {
            Some(insight) => insight,
            None => continue,
        };
        for line in plain_text(insight) {
            if line.is_empty() {
                writer.gap(6);
            } else {
                writer.paragraph(10, &line);
            }
        }
    }

    if let Some(summary) = content.insights.summary() {
        writer.new_page();
        writer.centered(BOLD_FONT, 14, SUMMARY_TITLE);
        writer.gap(10);
        for line in plain_text(summary) {
            if line.is_empty() {
                writer.gap(6);
            } else {
                writer.paragraph(10, &line);
            }
        }
    }

    writer.finish()
}

pub fn write_pdf(path: &Path, content: &PdfContent) -> Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_font_id,
            BOLD_FONT => bold_font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout(content) {
        let encoded = Content { operations }.encode()
            .map_err(|err| anyhow!("failed to encode pdf page: {}", err))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    }));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)
        .with_context(|| format!("failed to save pdf report to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            aggregate::aggregate,
            insights::{generate_insights, TextGenerator},
        },
    };

    struct Offline;

    impl TextGenerator for Offline {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("offline"))
        }
    }

    #[test]
    fn safe_encode_keeps_ascii_and_newlines() {
        assert_eq!(safe_encode("Great \u{1F600} café!\nNext\tline"), "Great  caf!\nNextline");
    }

    #[test]
    fn wrap_respects_page_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let lines = wrap(&text, 10);
        let max_chars = ((PAGE_WIDTH - 2 * MARGIN) as f64 / 5.0) as usize;

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.len() <= max_chars));
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn wrap_splits_very_long_words() {
        let lines = wrap(&"x".repeat(250), 10);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines.concat().len(), 250);
    }

    #[test]
    fn markdown_is_flattened() {
        let lines = plain_text("## Key points\n* **Audio** is too quiet\n\nUse `captions`");

        assert_eq!(lines, vec!["Key points", "", "- Audio is too quiet", "", "Use captions"]);
    }

    #[test]
    fn ordered_and_nested_lists_keep_their_markers() {
        let lines = plain_text("1. **Audio** is quiet\n   - nested _point_\n2. Pacing");

        assert_eq!(lines, vec!["1. Audio is quiet", "  - nested point", "2. Pacing"]);
    }

    #[tokio::test]
    async fn labels_without_words_get_no_page() {
        let counts = aggregate(&[]);
        let mut top_words = BTreeMap::new();
        top_words.insert(SentimentLabel::Positive, vec![("great".to_owned(), 3)]);
        top_words.insert(SentimentLabel::Negative, Vec::new());
        let insights = generate_insights::<Offline>(None, "question", &top_words, &counts).await;
        let content = PdfContent {
            video_id: "dQw4w9WgXcQ",
            created_at: "2024-01-01 00:00:00",
            counts: &counts,
            top_words: &top_words,
            insights: &insights,
        };

        let pages = layout(&content);

        // title, positive label page, summary
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn long_text_spills_onto_extra_pages() {
        let mut writer = PageWriter::new();
        for _ in 0..200 {
            writer.paragraph(10, "a line of insight text");
        }

        assert!(writer.finish().len() > 1);
    }
}
