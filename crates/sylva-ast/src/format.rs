//! Output options for the renderer

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delimiter used for string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
    /// Emit the literal's raw text unchanged
    Preserve,
}

impl QuoteStyle {
    pub fn delimiter(self) -> Option<char> {
        match self {
            QuoteStyle::Double => Some('"'),
            QuoteStyle::Single => Some('\''),
            QuoteStyle::Preserve => None,
        }
    }
}

/// Controls whitespace, bracing and comment output.
///
/// Deserializes from a camelCase JSON object; missing keys take the pretty
/// print defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Formatter {
    /// Line separator. Empty puts everything on one line.
    pub new_line: String,
    /// One level of indentation
    pub indentation: String,
    pub new_line_before_curly_bracket: bool,
    /// Wrap single-statement `if` bodies in braces
    pub always_require_block: bool,
    pub spaces_around_operators: bool,
    pub spaces_inside_round_brackets: bool,
    pub render_comments: bool,
    pub quote: QuoteStyle,
}

impl Formatter {
    /// Readable output with four space indentation
    pub fn pretty_print() -> Self {
        Self {
            new_line: "\n".to_string(),
            indentation: "    ".to_string(),
            new_line_before_curly_bracket: false,
            always_require_block: true,
            spaces_around_operators: true,
            spaces_inside_round_brackets: false,
            render_comments: true,
            quote: QuoteStyle::Double,
        }
    }

    /// Smallest output: no newlines, no optional spaces, no comments
    pub fn compact() -> Self {
        Self {
            new_line: String::new(),
            indentation: String::new(),
            new_line_before_curly_bracket: false,
            always_require_block: false,
            spaces_around_operators: false,
            spaces_inside_round_brackets: false,
            render_comments: false,
            quote: QuoteStyle::Double,
        }
    }

    /// Pretty print with braces on their own line and padded brackets
    pub fn expanded() -> Self {
        Self {
            new_line_before_curly_bracket: true,
            spaces_inside_round_brackets: true,
            ..Self::pretty_print()
        }
    }

    /// Apply a partial camelCase JSON object on top of these options
    pub fn with_overrides(&self, overrides: &Value) -> Result<Self, serde_json::Error> {
        let mut merged = serde_json::to_value(self)?;
        if let (Value::Object(target), Value::Object(source)) = (&mut merged, overrides) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        } else if !overrides.is_null() {
            // Let serde produce the error for a non-object override.
            return serde_json::from_value(overrides.clone());
        }
        serde_json::from_value(merged)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::pretty_print()
    }
}

/// Named formatter preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Pretty,
    Compact,
    Expanded,
}

impl Style {
    pub fn formatter(self) -> Formatter {
        match self {
            Style::Pretty => Formatter::pretty_print(),
            Style::Compact => Formatter::compact(),
            Style::Expanded => Formatter::expanded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_take_pretty_defaults() {
        let formatter: Formatter = serde_json::from_value(json!({"indentation": "\t"})).unwrap();
        assert_eq!(formatter.indentation, "\t");
        assert_eq!(formatter.new_line, "\n");
        assert!(formatter.render_comments);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let formatter = Formatter::compact()
            .with_overrides(&json!({"spacesAroundOperators": true, "quote": "single"}))
            .unwrap();
        assert!(formatter.spaces_around_operators);
        assert_eq!(formatter.quote, QuoteStyle::Single);
        assert_eq!(formatter.new_line, "");
        assert!(!formatter.render_comments);
    }

    #[test]
    fn bad_override_is_an_error() {
        assert!(Formatter::default()
            .with_overrides(&json!({"renderComments": "yes"}))
            .is_err());
        assert!(Formatter::default().with_overrides(&json!([1, 2])).is_err());
        assert_eq!(
            Formatter::expanded().with_overrides(&Value::Null).unwrap(),
            Formatter::expanded()
        );
    }

    #[test]
    fn style_names() {
        let style: Style = serde_json::from_value(json!("expanded")).unwrap();
        assert_eq!(style.formatter(), Formatter::expanded());
        assert_eq!(Style::default().formatter(), Formatter::default());
    }
}
