//! Markup helpers shared by the views.

/// Simple HTML escaping for text and attribute values
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// One "label: value" line
pub fn label_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="info-row"><span class="info-label">{}:</span> <span class="info-value">{}</span></div>"#,
        escape(label),
        escape(value)
    )
}

/// Warning block used by both views' error state
pub fn error_panel(title: &str, message: &str, action: &str) -> String {
    format!(
        r#"<div class="error-state" role="alert"><h3>{}</h3><p class="error-message">{}</p>{}</div>"#,
        escape(title),
        escape(message),
        action
    )
}
