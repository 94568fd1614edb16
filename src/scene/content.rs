use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

const HEADING_FONT: &str = "60px Arial";
const BODY_FONT: &str = "36px Arial";
const TEXT_X: f64 = 40.0;
const HEADING_Y: f64 = 100.0;
const BODY_Y: f64 = 160.0;
const LINE_STEP: f64 = 55.0;

/// Placement of the one decorative image, in panel canvas pixels.
#[derive(Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    pub path: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One portfolio section: a planet plus its label and information panel.
#[derive(Serialize, Deserialize, Clone)]
pub struct SectionConfig {
    pub label: String,
    pub color: [f32; 3],
    #[serde(default = "default_radius")]
    pub radius: f32,
    pub heading: String,
    pub body: Vec<String>,
    #[serde(default = "default_panel_height")]
    pub panel_height: f32,
    #[serde(default)]
    pub image: Option<ImageConfig>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub sections: Vec<SectionConfig>,
}

fn default_radius() -> f32 {
    2.5
}

fn default_panel_height() -> f32 {
    4.0
}

fn section(
    label: &str,
    color: [f32; 3],
    radius: f32,
    heading: &str,
    body: &[&str],
) -> SectionConfig {
    SectionConfig {
        label: label.to_string(),
        color,
        radius,
        heading: heading.to_string(),
        body: body.iter().map(|s| s.to_string()).collect(),
        panel_height: default_panel_height(),
        image: None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut about = section(
            "About me",
            [0.0, 0.0, 1.0],
            2.5,
            "I am a developer.",
            &[
                "I designed and developed this 3D portfolio.",
                "Expert in programming.",
                "I love creating 3D web projects.",
            ],
        );
        about.panel_height = 5.0;
        about.image = Some(ImageConfig {
            path: "assets/bulb.svg".to_string(),
            x: 40.0,
            y: 300.0,
            width: 200.0,
            height: 200.0,
        });

        let skills = section(
            "Skills",
            [1.0, 1.0, 0.0],
            2.0,
            "Skills:",
            &[
                "I have experience with Rust, WebGL, HTML,",
                "and CSS for creating 3D web projects.",
            ],
        );

        let projects = section(
            "Projects",
            [1.0, 0.0, 0.0],
            2.0,
            "Projects:",
            &[
                "You can view my projects on the website:",
                "karajkoamir.wordpress.com",
            ],
        );

        let contact = section(
            "Contact me",
            [0.0, 1.0, 0.0],
            2.0,
            "Contact:",
            &["Email: amir.karajko@gmail.com"],
        );

        AppConfig { sections: vec![about, skills, projects, contact] }
    }
}

/// Paints a section's heading and body lines onto a panel canvas. The
/// background was already filled by the panel factory.
pub fn paint_section(ctx: &CanvasRenderingContext2d, section: &SectionConfig) -> Result<(), JsValue> {
    ctx.set_fill_style_str("white");
    ctx.set_font(HEADING_FONT);
    ctx.fill_text(&section.heading, TEXT_X, HEADING_Y)?;

    ctx.set_font(BODY_FONT);
    let mut y = BODY_Y;
    for line in &section.body {
        ctx.fill_text(line, TEXT_X, y)?;
        y += LINE_STEP;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_four_sections() {
        let config = AppConfig::default();
        assert_eq!(config.sections.len(), 4);
        let labels: Vec<&str> = config.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["About me", "Skills", "Projects", "Contact me"]);
    }

    #[test]
    fn only_the_first_section_carries_the_decorative_image() {
        let config = AppConfig::default();
        assert!(config.sections[0].image.is_some());
        assert!(config.sections[1..].iter().all(|s| s.image.is_none()));
    }

    #[test]
    fn the_about_panel_is_taller_than_the_rest() {
        let config = AppConfig::default();
        assert_eq!(config.sections[0].panel_height, 5.0);
        assert!(config.sections[1..].iter().all(|s| s.panel_height == 4.0));
    }

    #[test]
    fn partial_json_falls_back_to_field_defaults() {
        let json = r#"{
            "sections": [
                { "label": "Hello", "color": [0.2, 0.4, 0.6],
                  "heading": "Hi:", "body": ["one line"] }
            ]
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        let s = &config.sections[0];
        assert_eq!(s.radius, 2.5);
        assert_eq!(s.panel_height, 4.0);
        assert!(s.image.is_none());
    }
}
