//! Dashboard module - candlestick chart web interface
//!
//! Single-page dashboard served inline from the worker.
//! Separated into HTML, CSS, and JS submodules for maintainability.
//!
//! # Architecture
//! - `html.rs`: Page structure and layout
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: API calls, canvas chart rendering, user interactions
//!
//! Rendering is display glue only: it consumes the normalized series
//! from `/api/candles` and the opaque text from `/api/analyze`.

mod css;
mod html;
mod js;

/// Generate the complete dashboard HTML page
pub fn dashboard_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Crypto Analyzer Pro</title>
    <style>
{css}
    </style>
</head>
<body>
{html}
    <script>
{js}
    </script>
</body>
</html>"#,
        css = css::STYLES,
        html = html::TEMPLATE,
        js = js::SCRIPT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_assembles_all_parts() {
        let page = dashboard_html();
        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains("candleChart"));
        assert!(page.contains("analyzeBtn"));
        assert!(page.contains("/api/candles"));
    }
}
