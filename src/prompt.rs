use crate::config::SummaryLength;
use crate::extract::PageContent;
use crate::locale::LocaleBundle;

/// Builds the summary prompt. Pure: identical inputs always produce the
/// identical string.
pub fn summary(content: &PageContent, length: SummaryLength, bundle: &LocaleBundle) -> String {
    let length_phrase = match length {
        SummaryLength::Short => bundle.length_short,
        SummaryLength::Medium => bundle.length_medium,
        SummaryLength::Long => bundle.length_long,
    };
    let intro = bundle.summary_intro.replace("{length}", length_phrase);

    let title = non_empty_or(&content.title, bundle.no_title);
    let url = non_empty_or(&content.url, bundle.no_url);
    let text = non_empty_or(&content.text, bundle.no_content);

    let headings_part = if content.headings.is_empty() {
        String::new()
    } else {
        let joined = content
            .headings
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("\n{}: {}", bundle.label_headings, joined)
    };

    format!(
        "{intro}\n\n{title_label}: {title}\n{url_label}: {url}\n\n{content_label}:\n{text}\n\n{headings_part}\n\n{instruction}",
        title_label = bundle.label_title,
        url_label = bundle.label_url,
        content_label = bundle.label_content,
        instruction = bundle.summary_instruction,
    )
}

/// Builds the sentiment prompt around the cleaned page text. The JSON
/// response skeleton keeps English keys so parsing stays language-neutral.
pub fn sentiment(text: &str, bundle: &LocaleBundle) -> String {
    format!(
        "{instruction}\n\n{text_label}:\n{text}\n\n{format_intro}:\n{{\n  \"category\": \"{categories}\",\n  \"confidence\": 0.85,\n  \"explanation\": \"{hint}\"\n}}\n\n{closing}",
        instruction = bundle.sentiment_instruction,
        text_label = bundle.sentiment_text_label,
        format_intro = bundle.sentiment_format_intro,
        categories = bundle.sentiment_categories,
        hint = bundle.sentiment_explanation_hint,
        closing = bundle.sentiment_closing,
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
