/// Template strings for one response language. Bundles are immutable
/// statics; prompt builders receive one by reference and never mutate it.
#[derive(Debug)]
pub struct LocaleBundle {
    pub code: &'static str,

    // Summary prompt pieces. `summary_intro` carries a `{length}` slot for
    // the length phrase.
    pub summary_intro: &'static str,
    pub length_short: &'static str,
    pub length_medium: &'static str,
    pub length_long: &'static str,
    pub label_title: &'static str,
    pub label_url: &'static str,
    pub label_content: &'static str,
    pub label_headings: &'static str,
    pub no_title: &'static str,
    pub no_url: &'static str,
    pub no_content: &'static str,
    pub summary_instruction: &'static str,

    // Sentiment prompt pieces. The JSON keys in the response format stay
    // English in every language; only the surrounding text is translated.
    pub sentiment_instruction: &'static str,
    pub sentiment_text_label: &'static str,
    pub sentiment_format_intro: &'static str,
    pub sentiment_categories: &'static str,
    pub sentiment_explanation_hint: &'static str,
    pub sentiment_closing: &'static str,

    // Fallback strings for sentiment responses that fail to parse.
    pub no_explanation: &'static str,
    pub positive_explanation: &'static str,
    pub negative_explanation: &'static str,
    pub neutral_explanation: &'static str,
    pub positive_keywords: &'static [&'static str],
    pub negative_keywords: &'static [&'static str],
}

pub static EN: LocaleBundle = LocaleBundle {
    code: "en",
    summary_intro: "Please provide a summary of the following webpage content {length}:",
    length_short: "in 1-2 concise sentences",
    length_medium: "in 3-4 clear sentences",
    length_long: "in 1-2 detailed paragraphs",
    label_title: "Title",
    label_url: "URL",
    label_content: "Main Content",
    label_headings: "Key Headings",
    no_title: "No title",
    no_url: "Unknown",
    no_content: "No content available",
    summary_instruction: "Focus on the main points and key information. Be concise and informative.",
    sentiment_instruction: "Analyze the sentiment and emotional tone of the following text. Categorize it as one of: joyful, neutral, or toxic.",
    sentiment_text_label: "Text to analyze",
    sentiment_format_intro: "Please respond in the following JSON format",
    sentiment_categories: "joyful/neutral/toxic",
    sentiment_explanation_hint: "Brief explanation of why this sentiment was chosen",
    sentiment_closing: "Be thorough in your analysis, considering context, tone, and overall emotional impact.",
    no_explanation: "No explanation provided",
    positive_explanation: "Detected positive sentiment",
    negative_explanation: "Detected negative sentiment",
    neutral_explanation: "No strong sentiment detected",
    positive_keywords: &["joyful", "positive", "happy"],
    negative_keywords: &["toxic", "negative", "hostile"],
};

// Spanish keeps the English keywords as well: providers frequently reply in
// English even when prompted in Spanish.
pub static ES: LocaleBundle = LocaleBundle {
    code: "es",
    summary_intro: "Proporciona un resumen del siguiente contenido de la página web {length}:",
    length_short: "en 1-2 frases concisas",
    length_medium: "en 3-4 frases claras",
    length_long: "en 1-2 párrafos detallados",
    label_title: "Título",
    label_url: "URL",
    label_content: "Contenido principal",
    label_headings: "Encabezados clave",
    no_title: "Sin título",
    no_url: "Desconocida",
    no_content: "Sin contenido disponible",
    summary_instruction: "Céntrate en los puntos principales y la información clave. Sé conciso e informativo.",
    sentiment_instruction: "Analiza el sentimiento y el tono emocional del siguiente texto. Clasifícalo como uno de: alegre, neutral o tóxico.",
    sentiment_text_label: "Texto a analizar",
    sentiment_format_intro: "Responde en el siguiente formato JSON",
    sentiment_categories: "joyful/neutral/toxic",
    sentiment_explanation_hint: "Breve explicación de por qué se eligió este sentimiento",
    sentiment_closing: "Sé minucioso en tu análisis, considerando el contexto, el tono y el impacto emocional general.",
    no_explanation: "No se proporcionó explicación",
    positive_explanation: "Se detectó un sentimiento positivo",
    negative_explanation: "Se detectó un sentimiento negativo",
    neutral_explanation: "No se detectó un sentimiento marcado",
    positive_keywords: &["joyful", "positive", "happy", "alegre", "positivo", "feliz"],
    negative_keywords: &["toxic", "negative", "hostile", "tóxico", "negativo", "hostil"],
};

/// Looks up the bundle for a language code, falling back to English for
/// anything unknown. Region subtags are ignored (`es-MX` -> `es`).
pub fn bundle(code: &str) -> &'static LocaleBundle {
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match primary.as_str() {
        "es" => &ES,
        "en" => &EN,
        other => {
            if !other.is_empty() {
                tracing::debug!(language = other, "no locale bundle; falling back to en");
            }
            &EN
        }
    }
}
