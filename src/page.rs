use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One `<img>` element as seen by the extractor.
///
/// `width`/`height` are the intrinsic dimensions; `box_width`/`box_height`
/// are the rendered bounding box. A static-HTML accessor approximates both
/// from markup, a live accessor would report layout values.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub box_width: f64,
    pub box_height: f64,
    pub hidden: bool,
    /// Position among all `<img>` elements in document order.
    pub index: usize,
}

/// An element carrying a CSS `background-image` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundElement {
    pub image_url: String,
    pub alt: String,
    pub title: String,
    pub box_width: f64,
    pub box_height: f64,
    /// Position among all elements in document order.
    pub index: usize,
}

/// Capability interface over a loaded page.
///
/// The extraction heuristics only ever touch a page through this trait, so
/// tests can substitute a fake document with arbitrary measurements.
pub trait PageAccessor {
    fn title(&self) -> String;
    fn url(&self) -> String;
    /// Collapsed text of the first element matching `selector`, if any.
    fn first_text(&self, selector: &str) -> Option<String>;
    /// Collapsed text of every element matching `selector`, in document order.
    fn all_texts(&self, selector: &str) -> Vec<String>;
    /// Every h1-h6 as (level, collapsed text), in document order.
    fn headings(&self) -> Vec<(u8, String)>;
    /// Every meta[name]/meta[property] pair with non-empty content.
    fn metadata(&self) -> Vec<(String, String)>;
    fn body_text(&self) -> String;
    fn image_elements(&self) -> Vec<ImageElement>;
    fn background_elements(&self) -> Vec<BackgroundElement>;
}

/// Scraper-backed accessor over a parsed HTML document.
///
/// Static HTML has no layout engine: rendered sizes come from the
/// `width`/`height` attributes and visibility from the inline `style`
/// attribute. Relative image sources are resolved against the page URL.
pub struct DomPage {
    html: Html,
    url: String,
    base: Option<Url>,
}

impl DomPage {
    pub fn parse(html: &str, url: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.to_owned(),
            base: Url::parse(url).ok(),
        }
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        let Ok(selector) = Selector::parse(selector) else {
            tracing::debug!(selector, "invalid selector; returning no matches");
            return Vec::new();
        };
        self.html.select(&selector).collect()
    }

    fn resolve_src(&self, src: &str) -> String {
        if src.is_empty() || src.starts_with("data:") {
            return src.to_owned();
        }
        if Url::parse(src).is_ok() {
            return src.to_owned();
        }
        match &self.base {
            Some(base) => match base.join(src) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => src.to_owned(),
            },
            None => src.to_owned(),
        }
    }
}

impl PageAccessor for DomPage {
    fn title(&self) -> String {
        self.first_text("title").unwrap_or_default()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        self.select_all(selector)
            .into_iter()
            .next()
            .map(|el| element_text(el))
    }

    fn all_texts(&self, selector: &str) -> Vec<String> {
        self.select_all(selector)
            .into_iter()
            .map(element_text)
            .collect()
    }

    fn headings(&self) -> Vec<(u8, String)> {
        self.select_all("h1, h2, h3, h4, h5, h6")
            .into_iter()
            .filter_map(|el| {
                let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
                Some((level, element_text(el)))
            })
            .collect()
    }

    fn metadata(&self) -> Vec<(String, String)> {
        self.select_all("meta[name], meta[property]")
            .into_iter()
            .filter_map(|el| {
                let key = el
                    .value()
                    .attr("name")
                    .or_else(|| el.value().attr("property"))?;
                let content = el.value().attr("content")?;
                if key.is_empty() || content.is_empty() {
                    return None;
                }
                Some((key.to_owned(), content.to_owned()))
            })
            .collect()
    }

    fn body_text(&self) -> String {
        self.first_text("body").unwrap_or_default()
    }

    fn image_elements(&self) -> Vec<ImageElement> {
        self.select_all("img")
            .into_iter()
            .enumerate()
            .map(|(index, el)| {
                let attrs = el.value();
                let style = attrs.attr("style").unwrap_or_default();
                let width = parse_dimension(attrs.attr("width"));
                let height = parse_dimension(attrs.attr("height"));
                ImageElement {
                    src: self.resolve_src(attrs.attr("src").unwrap_or_default()),
                    alt: attrs.attr("alt").unwrap_or_default().to_owned(),
                    title: attrs.attr("title").unwrap_or_default().to_owned(),
                    width,
                    height,
                    box_width: f64::from(width),
                    box_height: f64::from(height),
                    hidden: is_hidden(style),
                    index,
                }
            })
            .collect()
    }

    fn background_elements(&self) -> Vec<BackgroundElement> {
        self.select_all("*")
            .into_iter()
            .enumerate()
            .filter_map(|(index, el)| {
                let attrs = el.value();
                let style = attrs.attr("style")?;
                let image_url = style_property(style, "background-image")
                    .and_then(|value| css_url(&value))?;
                let width = parse_dimension(style_property(style, "width").as_deref());
                let height = parse_dimension(style_property(style, "height").as_deref());
                Some(BackgroundElement {
                    image_url: self.resolve_src(&image_url),
                    alt: attrs.attr("alt").unwrap_or_default().to_owned(),
                    title: attrs.attr("title").unwrap_or("Background Image").to_owned(),
                    box_width: f64::from(width),
                    box_height: f64::from(height),
                    index,
                })
            })
            .collect()
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&joined)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_dimension(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0)
}

fn is_hidden(style: &str) -> bool {
    let display_none = style_property(style, "display").is_some_and(|v| v == "none");
    let visibility_hidden = style_property(style, "visibility").is_some_and(|v| v == "hidden");
    display_none || visibility_hidden
}

fn style_property(style: &str, name: &str) -> Option<String> {
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        if property.trim().eq_ignore_ascii_case(name) {
            return Some(value.trim().to_owned());
        }
    }
    None
}

/// Extracts the URL from a CSS `url(...)` value, stripping optional quotes.
fn css_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return None;
    }
    let inner = value.strip_prefix("url(")?.strip_suffix(')')?;
    let inner = inner.trim().trim_matches(|c| c == '\'' || c == '"');
    if inner.is_empty() {
        return None;
    }
    Some(inner.to_owned())
}
