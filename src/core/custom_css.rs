use crate::core::styles::GradientTable;
use crate::domain::model::{CustomStyleParams, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// Comfortable reading line height applied to paragraphs and list items.
pub const CUSTOM_LINE_HEIGHT: &str = "1.7";

/// Characters that could end a declaration, a rule or the `<style>` element.
const FORBIDDEN_VALUE_CHARS: &[char] = &['<', '>', '{', '}', ';'];

/// A single CSS property value taken from the request, or `default` when it
/// is blank or could escape its declaration.
fn css_value<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() || value.contains(FORBIDDEN_VALUE_CHARS) {
        if !value.is_empty() {
            tracing::debug!(value, "Rejected custom style value");
        }
        default
    } else {
        value
    }
}

/// Generates the style sheet for the custom profile using the built-in
/// gradient table.
pub fn generate_custom_css(font_size: &str, font_family: &str, gradient_key: &str) -> String {
    generate_custom_css_with(&GradientTable::built_in(), font_size, font_family, gradient_key)
}

pub fn generate_custom_css_with(
    gradients: &GradientTable,
    font_size: &str,
    font_family: &str,
    gradient_key: &str,
) -> String {
    let gradient = gradients.resolve(gradient_key);
    let font_size = css_value(font_size, DEFAULT_FONT_SIZE);
    let font_family = css_value(font_family, DEFAULT_FONT_FAMILY);

    format!(
        r#"
html {{
    font-size: {font_size} !important;
}}
body, body * {{
    font-family: {font_family} !important;
}}
body {{
    background: {gradient} !important;
    background-attachment: fixed !important;
    color: #ffffff !important;
}}
p, li {{
    line-height: {line_height} !important;
}}
"#,
        font_size = font_size,
        font_family = font_family,
        gradient = gradient,
        line_height = CUSTOM_LINE_HEIGHT,
    )
}

pub fn css_for_params(gradients: &GradientTable, params: &CustomStyleParams) -> String {
    generate_custom_css_with(
        gradients,
        &params.font_size,
        &params.font_family,
        &params.gradient,
    )
}
