use crate::analyze::{AnalysisResult, ConnectionReport, SentimentCategory};
use crate::gallery::Gallery;

const THUMBNAIL_STRIP: usize = 10;

pub fn sentiment_icon(category: SentimentCategory) -> &'static str {
    match category {
        SentimentCategory::Joyful => "😊",
        SentimentCategory::Toxic => "😠",
        SentimentCategory::Neutral => "😐",
    }
}

/// Renders an analysis result for the terminal.
pub fn analysis(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Summary {
            content,
            word_count,
        } => {
            format!("Page Summary\n\n{content}\n\nSource: {word_count} words analyzed\n")
        }
        AnalysisResult::Sentiment {
            sentiment,
            confidence,
            explanation,
            word_count,
        } => {
            let icon = sentiment_icon(*sentiment);
            let percent = (confidence * 100.0).round() as u32;
            let category = sentiment.as_str().to_uppercase();
            format!(
                "Sentiment Analysis\n\n{icon} {category} ({percent}% confidence)\n\n{explanation}\n\nAnalyzed {word_count} words\n"
            )
        }
    }
}

pub fn connection(report: &ConnectionReport) -> String {
    format!("{}\nResponse: {}\n", report.message, report.response)
}

/// Renders the gallery: the selected image in detail, then a thumbnail
/// strip of up to ten entries with an overflow marker.
pub fn gallery(gallery: &Gallery) -> String {
    let mut out = format!("Image Gallery ({} images)\n", gallery.len());

    let Some(current) = gallery.current() else {
        out.push_str("\nNo images found on this page.\n");
        return out;
    };

    let label = if !current.alt.is_empty() {
        current.alt.as_str()
    } else if !current.title.is_empty() {
        current.title.as_str()
    } else {
        "Untitled"
    };
    out.push_str(&format!(
        "\n{label}\n{src}\n{width} × {height}\n{position} / {total}\n",
        src = current.src,
        width = current.width,
        height = current.height,
        position = gallery.index() + 1,
        total = gallery.len(),
    ));

    out.push('\n');
    for (i, image) in gallery.images().iter().take(THUMBNAIL_STRIP).enumerate() {
        let marker = if i == gallery.index() { ">" } else { " " };
        out.push_str(&format!("{marker} {n}. {src}\n", n = i + 1, src = image.src));
    }
    if gallery.len() > THUMBNAIL_STRIP {
        out.push_str(&format!("  +{} more\n", gallery.len() - THUMBNAIL_STRIP));
    }

    out
}
