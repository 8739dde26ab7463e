use crate::entity::SentimentLabel;

pub fn label_insights(question: &str, label: SentimentLabel, top_words: &[(String, usize)]) -> String {
    let words = top_words.iter()
        .map(|(word, count)| format!("{} ({})", word, count))
        .collect::<Vec<_>>()
        .join(", ");

    format!(r#"{question} As a marketing consultant, I aim to analyze consumer insights derived from the {label} sentiment word cloud of YouTube comments. Please provide actionable insights and recommendations based on this {label} sentiment analysis in a structured format with bullet points.

MOST FREQUENT WORDS (word (count)):
<{words}>"#, question = question, label = label, words = words)
}

pub fn executive_summary(question: &str, counts: &[(SentimentLabel, usize)]) -> String {
    let distribution = counts.iter()
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect::<Vec<_>>()
        .join(", ");

    format!(r#"{question} Based on the overall sentiment analysis of YouTube comments, please provide a comprehensive business strategy summary with key insights and actionable recommendations.

SENTIMENT DISTRIBUTION:
<{distribution}>"#, question = question, distribution = distribution)
}
