use std::collections::BTreeMap;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::page::{BackgroundElement, ImageElement, PageAccessor, collapse_whitespace};

pub const MAX_TEXT_CHARS: usize = 10_000;
pub const MAX_SENTIMENT_CHARS: usize = 5_000;
pub const MAX_IMAGES: usize = 100;

/// Content-area selectors tried in priority order before falling back to
/// paragraphs and finally the whole body.
pub const CONTENT_SELECTORS: [&str; 9] = [
    "article",
    "[role=\"main\"]",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "main",
    "#content",
    ".main-content",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub url: String,
    pub text: String,
    pub headings: Vec<Heading>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentText {
    pub text: String,
    #[serde(rename = "wordCount")]
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub index: ImageIndex,
    #[serde(rename = "isBackground", default)]
    pub is_background: bool,
}

/// Foreground images keep their numeric `<img>` position; background images
/// carry a `bg-N` tag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageIndex {
    Element(usize),
    Background(usize),
}

impl Serialize for ImageIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Element(index) => serializer.serialize_u64(*index as u64),
            Self::Background(index) => serializer.serialize_str(&format!("bg-{index}")),
        }
    }
}

impl<'de> Deserialize<'de> for ImageIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl Visitor<'_> for IndexVisitor {
            type Value = ImageIndex;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an image index number or a bg-N tag")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(ImageIndex::Element(value as usize))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                let index = value
                    .strip_prefix("bg-")
                    .and_then(|rest| rest.parse::<usize>().ok())
                    .ok_or_else(|| E::custom(format!("invalid image index: {value}")))?;
                Ok(ImageIndex::Background(index))
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

/// Pulls the page title, url, main text, headings, and meta tags.
pub fn page_content(page: &impl PageAccessor) -> PageContent {
    let headings = page
        .headings()
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(level, text)| Heading { level, text })
        .collect();

    let mut metadata = BTreeMap::new();
    for (key, value) in page.metadata() {
        // Last write wins on duplicate meta keys.
        metadata.insert(key, value);
    }

    PageContent {
        title: page.title(),
        url: page.url(),
        text: main_text(page),
        headings,
        metadata,
    }
}

fn main_text(page: &impl PageAccessor) -> String {
    for selector in CONTENT_SELECTORS {
        if let Some(text) = page.first_text(selector) {
            return clean_text(&text);
        }
    }

    let paragraphs = page
        .all_texts("p")
        .into_iter()
        .filter(|text| text.chars().count() > 20)
        .collect::<Vec<_>>()
        .join(" ");

    if paragraphs.is_empty() {
        clean_text(&page.body_text())
    } else {
        clean_text(&paragraphs)
    }
}

/// Gathers the text blocks used for sentiment analysis: normalized
/// whitespace, punctuation outside `.,!?;:"'-` removed, capped at 5000
/// chars. The word count is computed on the final text, so stripping that
/// merges words undercounts; that matches the shipped behavior.
pub fn text_for_sentiment(page: &impl PageAccessor) -> SentimentText {
    const TEXT_SELECTORS: [&str; 5] = [
        "p",
        "h1, h2, h3, h4, h5, h6",
        "article",
        "[role=\"main\"]",
        ".content, .post, .article",
    ];

    let mut combined = String::new();
    for selector in TEXT_SELECTORS {
        for block in page.all_texts(selector) {
            if block.chars().count() > 10 {
                combined.push_str(&block);
                combined.push(' ');
            }
        }
    }

    if combined.trim().is_empty() {
        combined = page.body_text();
    }

    let collapsed = collapse_whitespace(&combined);
    let filtered = collapsed
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || *c == '_'
                || c.is_whitespace()
                || ".,!?;:\"'-".contains(*c)
        })
        .collect::<String>();
    let text = truncate_chars(filtered.trim(), MAX_SENTIMENT_CHARS);
    let word_count = word_count(&text);

    SentimentText { text, word_count }
}

/// Collects visible images (>= 50px both ways) plus large background images
/// (>= 100px both ways), foreground first, capped at 100 entries.
pub fn images(page: &impl PageAccessor) -> Vec<ImageDescriptor> {
    let mut images = page
        .image_elements()
        .into_iter()
        .filter(is_valid_image)
        .map(|img| ImageDescriptor {
            src: img.src,
            alt: img.alt,
            title: img.title,
            width: img.width,
            height: img.height,
            index: ImageIndex::Element(img.index),
            is_background: false,
        })
        .collect::<Vec<_>>();

    images.extend(
        page.background_elements()
            .into_iter()
            .filter(|bg| bg.box_width >= 100.0 && bg.box_height >= 100.0)
            .map(|bg| ImageDescriptor {
                src: bg.image_url,
                alt: bg.alt,
                title: bg.title,
                width: bg.box_width as u32,
                height: bg.box_height as u32,
                index: ImageIndex::Background(bg.index),
                is_background: true,
            }),
    );

    images.truncate(MAX_IMAGES);
    images
}

fn is_valid_image(img: &ImageElement) -> bool {
    if img.src.is_empty() || img.src.starts_with("data:") {
        return false;
    }
    if img.width < 50 || img.height < 50 {
        return false;
    }
    if img.hidden {
        return false;
    }
    img.box_width >= 50.0 && img.box_height >= 50.0
}

fn clean_text(text: &str) -> String {
    truncate_chars(&collapse_whitespace(text), MAX_TEXT_CHARS)
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

/// Split on single spaces, like the popup's word counter. Empty segments
/// count, so `""` counts as one word.
pub(crate) fn word_count(text: &str) -> usize {
    text.split(' ').count()
}
