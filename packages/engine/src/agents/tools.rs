// packages/engine/src/agents/tools.rs
//! Image generation tool and the plain-text URL hand-off
//!
//! The designer publishes image URLs as `Generated Token Image URL: <url>`.
//! Downstream agents find the URL again by scanning for that label; the URL
//! itself is not validated.

use crate::agents::backend::ToolSpec;
use serde::Deserialize;

/// Tool name exposed to the model
pub const IMAGE_TOOL_NAME: &str = "generate_image";

/// Label preceding an image URL in agent output
pub const IMAGE_URL_LABEL: &str = "Generated Token Image URL:";

/// Arguments of a `generate_image` call
#[derive(Debug, Clone, Deserialize)]
pub struct ImageToolArgs {
    pub prompt: String,
}

/// Function-tool description of the image generator
pub fn image_tool_spec() -> ToolSpec {
    ToolSpec {
        name: IMAGE_TOOL_NAME.to_string(),
        description: "Generate a token image from a text prompt and return its URL".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Description of the image to generate"
                }
            },
            "required": ["prompt"]
        }),
    }
}

/// Render a URL in the hand-off format
pub fn format_image_url(url: &str) -> String {
    format!("{} {}", IMAGE_URL_LABEL, url)
}

/// First URL published in the hand-off format, if any
pub fn extract_image_url(text: &str) -> Option<String> {
    text.match_indices(IMAGE_URL_LABEL).find_map(|(idx, _)| {
        let rest = &text[idx + IMAGE_URL_LABEL.len()..];
        let token = rest.split_whitespace().next()?;
        let url = token
            .trim_matches(|c: char| matches!(c, '\'' | '"' | '`' | '<' | '>' | '(' | ')' | '*'))
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';'));

        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_then_extract() {
        let line = format_image_url("https://img.example/abc.png");
        assert_eq!(line, "Generated Token Image URL: https://img.example/abc.png");
        assert_eq!(
            extract_image_url(&line).as_deref(),
            Some("https://img.example/abc.png")
        );
    }

    #[test]
    fn test_extract_from_prose() {
        let text = "Here it is!\n'Generated Token Image URL: <https://x.test/1.png>'.\nEnjoy";
        assert_eq!(extract_image_url(text).as_deref(), Some("https://x.test/1.png"));
    }

    #[test]
    fn test_extract_skips_label_without_url() {
        let text = "Generated Token Image URL: \n... later Generated Token Image URL: https://b.test/2.png";
        assert_eq!(extract_image_url(text).as_deref(), Some("https://b.test/2.png"));

        assert_eq!(extract_image_url("no image yet"), None);
        assert_eq!(extract_image_url("Generated Token Image URL:"), None);
    }

    #[test]
    fn test_tool_spec_shape() {
        let spec = image_tool_spec();
        assert_eq!(spec.name, IMAGE_TOOL_NAME);
        assert_eq!(spec.parameters["required"][0], "prompt");
    }
}
