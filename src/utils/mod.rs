/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        return format!("{}ms", (seconds * 1000.0).round() as u64);
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{:.1}s", seconds)
    }
}

/// Map a language code to the language name used in prompts
pub fn normalize_language(lang: &str) -> String {
    let lang = lang.trim();

    let normalized = match lang.to_lowercase().as_str() {
        "en" | "en-us" | "en-gb" | "english" => "English",
        "es" | "es-es" | "spanish" => "Spanish",
        "fr" | "fr-fr" | "french" => "French",
        "de" | "de-de" | "german" => "German",
        "it" | "it-it" | "italian" => "Italian",
        "pt" | "pt-br" | "portuguese" => "Portuguese",
        "ja" | "ja-jp" | "japanese" => "Japanese",
        "ko" | "ko-kr" | "korean" => "Korean",
        "zh" | "zh-cn" | "chinese" => "Chinese",
        "ar" | "ar-sa" | "arabic" => "Arabic",
        "hi" | "hi-in" | "hindi" => "Hindi",
        "ru" | "ru-ru" | "russian" => "Russian",
        _ => lang, // Return as-is if no mapping found
    };

    normalized.to_string()
}

/// Shorten text for log lines, appending an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
