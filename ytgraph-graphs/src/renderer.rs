//! Graph rendering trait

use crate::GraphConfig;
use plotters::prelude::*;
use std::path::Path;
use ytgraph_common::Result;

/// Trait for rendering graphs to files and inline SVG
#[async_trait::async_trait]
pub trait GraphRenderer {
    /// Render a graph to a PNG file
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()>;

    /// Render a graph to an SVG string for inline embedding
    fn render_svg(&self, config: &GraphConfig) -> Result<String>;

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }

    /// Get axis text color from style config
    fn get_text_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .text_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(0, 0, 0))
    }
}
