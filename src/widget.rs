//! Login widget page rendering
//!
//! The request phase serves a minimal HTML page that loads the provider's
//! widget script. The script reads its configuration from `data-*` attributes
//! on its own `<script>` tag.

use html_escape::encode_double_quoted_attribute;
use log::warn;
use std::collections::BTreeMap;

use crate::settings::WidgetSettings;

/// Content type of the rendered page
pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Attribute appended when the widget should ask for permission to message the user
pub const REQUEST_ACCESS_ATTRIBUTE: &str = r#"data-request-access="write""#;

/// Renders the request-phase page
pub struct WidgetRenderer;

impl WidgetRenderer {
    /// Build the `data-*` attribute list for button options
    ///
    /// Keys have underscores replaced by dashes (`corner_radius` becomes
    /// `data-corner-radius`). Values are attribute-escaped. Keys outside
    /// `[A-Za-z0-9_-]` are skipped.
    #[must_use]
    pub fn data_attributes(
        settings: &WidgetSettings,
        button_options: &BTreeMap<String, String>,
    ) -> String {
        let mut attributes: Vec<String> = button_options
            .iter()
            .filter(|(key, _)| {
                let valid = Self::is_valid_option_key(key);
                if !valid {
                    warn!("Skipping button option with invalid key {key:?}");
                }
                valid
            })
            .map(|(key, value)| {
                format!(
                    r#"data-{}="{}""#,
                    key.replace('_', "-"),
                    encode_double_quoted_attribute(value)
                )
            })
            .collect();

        if settings.request_access {
            attributes.push(REQUEST_ACCESS_ATTRIBUTE.to_string());
        }

        attributes.join(" ")
    }

    /// Whether `key` can be used as part of an attribute name
    #[must_use]
    pub fn is_valid_option_key(key: &str) -> bool {
        !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }

    /// Render the full login page
    #[must_use]
    pub fn render(
        settings: &WidgetSettings,
        bot_name: &str,
        callback_url: &str,
        button_options: &BTreeMap<String, String>,
    ) -> String {
        let mut script = format!(
            r#"<script async src="{}" data-telegram-login="{}" data-auth-url="{}""#,
            encode_double_quoted_attribute(&settings.button_script_url),
            encode_double_quoted_attribute(bot_name),
            encode_double_quoted_attribute(callback_url),
        );
        let attributes = Self::data_attributes(settings, button_options);
        if !attributes.is_empty() {
            script.push(' ');
            script.push_str(&attributes);
        }
        script.push_str("></script>");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
{script}
</body>
</html>
"#,
            title = html_escape::encode_text(&settings.request_phase_title),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_button_option_rendered_as_data_attribute() {
        let attributes =
            WidgetRenderer::data_attributes(&WidgetSettings::default(), &options(&[("radius", "10")]));
        assert_eq!(attributes, r#"data-radius="10""#);
    }

    #[test]
    fn test_request_access_appends_write_attribute() {
        let settings = WidgetSettings {
            request_access: true,
            ..WidgetSettings::default()
        };
        let attributes = WidgetRenderer::data_attributes(&settings, &options(&[("radius", "10")]));

        assert!(attributes.contains(r#"data-radius="10""#));
        assert!(attributes.ends_with(REQUEST_ACCESS_ATTRIBUTE));
    }

    #[test]
    fn test_underscores_become_dashes() {
        let attributes = WidgetRenderer::data_attributes(
            &WidgetSettings::default(),
            &options(&[("corner_radius", "20"), ("userpic", "false")]),
        );
        assert_eq!(attributes, r#"data-corner-radius="20" data-userpic="false""#);
    }

    #[test]
    fn test_values_are_escaped() {
        let attributes = WidgetRenderer::data_attributes(
            &WidgetSettings::default(),
            &options(&[("size", r#"large" onload="alert(1)"#)]),
        );
        assert!(!attributes.contains(r#"" onload=""#));
        assert!(attributes.contains("&quot;"));
    }

    #[test]
    fn test_invalid_option_keys_are_skipped() {
        let attributes = WidgetRenderer::data_attributes(
            &WidgetSettings::default(),
            &options(&[
                (r#"x="" onload="alert(1)"#, "1"),
                ("", "empty"),
                ("data size", "large"),
                ("radius", "10"),
            ]),
        );
        assert_eq!(attributes, r#"data-radius="10""#);
    }

    #[test]
    fn test_option_key_validation() {
        assert!(WidgetRenderer::is_valid_option_key("corner_radius"));
        assert!(WidgetRenderer::is_valid_option_key("user-pic2"));
        assert!(!WidgetRenderer::is_valid_option_key(""));
        assert!(!WidgetRenderer::is_valid_option_key("a\"b"));
        assert!(!WidgetRenderer::is_valid_option_key("a b"));
        assert!(!WidgetRenderer::is_valid_option_key("a>b"));
    }

    #[test]
    fn test_render_page() {
        let page = WidgetRenderer::render(
            &WidgetSettings::default(),
            "example_bot",
            "https://example.com/auth/telegram/callback",
            &options(&[("size", "large")]),
        );

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Telegram Login</title>"));
        assert!(page.contains(
            r#"<script async src="https://telegram.org/js/telegram-widget.js?22" data-telegram-login="example_bot" data-auth-url="https://example.com/auth/telegram/callback" data-size="large"></script>"#
        ));
        assert!(!page.contains("data-request-access"));
    }

    #[test]
    fn test_render_without_options() {
        let page = WidgetRenderer::render(
            &WidgetSettings::default(),
            "example_bot",
            "/cb",
            &BTreeMap::new(),
        );
        assert!(page.contains(r#"data-auth-url="/cb"></script>"#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let settings = WidgetSettings {
            request_access: true,
            request_phase_title: "Sign in".to_string(),
            ..WidgetSettings::default()
        };
        let opts = options(&[("size", "medium"), ("radius", "4")]);

        assert_eq!(
            WidgetRenderer::render(&settings, "bot", "/cb", &opts),
            WidgetRenderer::render(&settings, "bot", "/cb", &opts)
        );
    }
}
