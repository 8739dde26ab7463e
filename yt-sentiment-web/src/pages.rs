use {
    std::fmt::Write,
    pulldown_cmark::{html::push_html, Event, Options, Parser},
    yt_sentiment_core::{
        entity::SentimentLabel,
        pipeline::FallbackSummary,
        report::{escape_xml as escape_html, Report, chart},
    },
};

pub const STATIC_PREFIX: &str = "/static";

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Inter, Helvetica, Arial, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; color: #1f2937; padding: 2rem 1rem; }
.container { max-width: 1100px; margin: 0 auto; background: white; border-radius: 16px; padding: 2rem; box-shadow: 0 20px 40px rgba(0, 0, 0, 0.15); }
h1 { font-size: 2rem; margin-bottom: 1rem; }
h2 { font-size: 1.4rem; margin: 1.5rem 0 0.75rem; }
h3 { font-size: 1.1rem; margin: 1rem 0 0.5rem; }
p, li { line-height: 1.6; }
ul { margin: 0.5rem 0 0.5rem 1.5rem; }
label { display: block; font-weight: 600; margin: 1rem 0 0.4rem; }
input, textarea { width: 100%; padding: 0.75rem; border: 1px solid #d1d5db; border-radius: 8px; font-size: 1rem; }
button, .btn { display: inline-block; margin-top: 1.5rem; padding: 0.8rem 1.6rem; border: none; border-radius: 8px; background: #667eea; color: white; font-size: 1rem; text-decoration: none; cursor: pointer; }
.stats { display: flex; gap: 1rem; flex-wrap: wrap; }
.stat { flex: 1; min-width: 160px; border-radius: 12px; padding: 1rem; color: white; text-align: center; }
.stat .value { font-size: 2rem; font-weight: 700; }
.panel { border: 1px solid #e5e7eb; border-radius: 12px; padding: 1rem 1.25rem; margin-top: 1rem; }
.error { color: #b91c1c; }
.muted { color: #6b7280; font-size: 0.9rem; }
img { max-width: 100%; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#, title = escape_html(title), style = STYLE, body = body)
}

pub fn index(default_question: &str) -> String {
    layout("YouTube Sentiment Analyzer", &format!(r#"<h1>YouTube Sentiment Analyzer</h1>
<p class="muted">Paste a video link to classify its most relevant comments and get a PDF report with insights.</p>
<form method="post" action="/analyze">
<label for="youtube_url">YouTube URL</label>
<input id="youtube_url" name="youtube_url" type="text" placeholder="https://www.youtube.com/watch?v=..." required>
<label for="custom_stopwords">Extra stopwords (comma separated)</label>
<input id="custom_stopwords" name="custom_stopwords" type="text" placeholder="video, channel">
<label for="custom_question">Question for the insights</label>
<textarea id="custom_question" name="custom_question" rows="3">{question}</textarea>
<button type="submit">Analyze comments</button>
</form>"#, question = escape_html(default_question)))
}

pub fn error(title: &str, message: &str) -> String {
    layout(title, &format!(r#"<h1 class="error">{title}</h1>
<p>{message}</p>
<a class="btn" href="/">Try another video</a>"#, title = escape_html(title), message = escape_html(message)))
}

pub fn no_data(message: &str) -> String {
    error("Failed to fetch comments", &format!("Please check the YouTube URL. {}", message))
}

pub fn no_comments() -> String {
    layout("No Comments Found", r#"<h1>No Comments Found</h1>
<p>We couldn't find any comments for this video. This might happen if:</p>
<ul>
<li>Comments are disabled on the video</li>
<li>The video is private or doesn't exist</li>
<li>There are no comments yet</li>
</ul>
<a class="btn" href="/">Try another video</a>"#)
}

pub fn results(report: &Report, fallbacks: &FallbackSummary) -> String {
    let mut body = String::new();
    let total = report.counts.total();

    let _ = writeln!(body, "<h1>Analysis Complete!</h1>");
    let _ = writeln!(body, r#"<p class="muted">Video {} &middot; {} comments &middot; report {}</p>"#, escape_html(&report.video_id), total, escape_html(&report.id));

    let _ = writeln!(body, r#"<div class="stats">"#);
    for (label, count) in report.counts.iter() {
        let share = if total > 0 { count as f64 * 100.0 / total as f64 } else { 0.0 };
        let _ = writeln!(
            body,
            r#"<div class="stat" style="background: {}"><div class="value">{}</div><div>{} ({:.1}%)</div></div>"#,
            chart::color(label), count, label.title(), share,
        );
    }
    let _ = writeln!(body, "</div>");

    if fallbacks.classification > 0 || fallbacks.normalization > 0 {
        let _ = writeln!(
            body,
            r#"<p class="muted">{} comments could not be classified and were counted as neutral, {} were cleaned with a fallback.</p>"#,
            fallbacks.classification, fallbacks.normalization,
        );
    }

    let _ = writeln!(body, r#"<h2>Sentiment Distribution</h2><img src="{}" alt="Sentiment distribution chart">"#, report.url(STATIC_PREFIX, &report.chart_file));

    for label in SentimentLabel::ALL {
        let cloud = report.word_cloud_files.get(&label);
        let insight = report.insights.for_label(label);
        if cloud.is_none() && insight.is_none() {
            continue;
        }

        let _ = writeln!(body, r#"<div class="panel"><h2>{} Sentiment</h2>"#, label.title());
        if let Some(cloud) = cloud {
            let _ = writeln!(body, r#"<img src="{}" alt="{} word cloud">"#, report.url(STATIC_PREFIX, cloud), label);
        }
        if let Some(insight) = insight {
            body.push_str(&markdown_to_html(insight));
        }
        let _ = writeln!(body, "</div>");
    }

    if let Some(summary) = report.insights.summary() {
        let _ = writeln!(body, r#"<div class="panel"><h2>Executive Summary &amp; Strategic Recommendations</h2>{}</div>"#, markdown_to_html(summary));
    }

    let _ = writeln!(body, "<h2>Download Your Report</h2>");
    let _ = writeln!(body, r#"<a class="btn" href="{}" download>PDF report</a> "#, report.url(STATIC_PREFIX, &report.pdf_file));
    let _ = writeln!(body, r#"<a class="btn" href="{}" download>Labeled comments (CSV)</a> "#, report.url(STATIC_PREFIX, &report.dataset_file));
    let _ = writeln!(body, r#"<a class="btn" href="/">Analyze another video</a>"#);

    layout("Analysis Complete", &body)
}

/// Renders generated markdown. Raw HTML in the text is shown escaped, never passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES)
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            event => event,
        });

    let mut html = String::new();
    push_html(&mut html, events);
    html
}
