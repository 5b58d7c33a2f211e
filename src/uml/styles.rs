//! Style preamble generation for the diagram markup.
//!
//! A style sheet renders the macro definitions and skinparam directives that
//! precede the entity blocks. The default sheet draws colored key glyphs and
//! a seagreen class palette; the monochrome sheet swaps the palette for
//! PlantUML's monochrome mode; the text sheet strips all styling so the
//! server's ASCII renderer gets plain identifiers.

use super::{DiagramFlags, Direction, Format};
use ahash::AHashMap;

/// Skin parameters shared by all style sheets
#[derive(Debug, Clone)]
pub struct SkinParams {
    pub direction: Direction,
    pub handwritten: bool,
    pub roundcorner: u32,
    pub linetype: String,
    pub shadowing: bool,
    pub entity_names_only: bool,
    pub table_names_only: bool,
    pub colors: AHashMap<String, String>,
}

impl Default for SkinParams {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            handwritten: false,
            roundcorner: 5,
            linetype: "ortho".to_string(),
            shadowing: false,
            entity_names_only: false,
            table_names_only: false,
            colors: AHashMap::new(),
        }
    }
}

impl SkinParams {
    /// Build skin parameters from diagram flags
    pub fn from_flags(flags: &DiagramFlags) -> Self {
        Self {
            direction: flags.direction,
            handwritten: flags.handwritten,
            entity_names_only: flags.entity_names_only,
            table_names_only: flags.table_names_only,
            colors: flags.colors.clone(),
            ..Default::default()
        }
    }

    /// Look up a color override, falling back to the built-in default
    fn color<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.colors.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// A style sheet for the diagram preamble. Sections come with default
/// bodies; variants override only the sections they change.
pub trait StyleSheet {
    fn skin(&self) -> &SkinParams;

    /// The `table(ename, dbname)` macro, selecting the entity title layout
    fn define_table(&self) -> String {
        let skin = self.skin();
        if skin.entity_names_only {
            "!define table(ename, dbname) entity \"<b>ename</b>\"\n".to_string()
        } else if skin.table_names_only {
            "!define table(ename, dbname) entity \"<b>dbname</b>\"\n".to_string()
        } else {
            "!define table(ename, dbname) entity \"<b>ename</b>\\n<font size=10 color=gray>(dbname)</font>\"\n"
                .to_string()
        }
    }

    /// The column macros with key glyphs and colors
    fn define_columns(&self) -> String {
        let skin = self.skin();
        format!(
            "!define pkey(x) {{field}} <b><color:{}><&key></color> x</b>\n\
             !define fkey(x) {{field}} <color:{}><&key></color> x\n\
             !define column(x) {{field}} <color:{}><&media-record></color> x\n\
             !define rcolumn(x) {{field}} <color:{}><&media-record></color> x\n",
            skin.color("pkey", "DarkGoldenRod"),
            skin.color("fkey", "#AAAAAA"),
            skin.color("column", "#EFEFEF"),
            skin.color("rcolumn", "#A19F9F"),
        )
    }

    /// Hide diagram elements that only add noise
    fn hide_ui(&self) -> String {
        "hide stereotypes\nhide methods\nhide circle\n".to_string()
    }

    /// The arrow direction directive
    fn define_direction(&self) -> String {
        match self.skin().direction {
            Direction::LeftToRight => "left to right direction\n".to_string(),
            Direction::TopToBottom => "top to bottom direction\n".to_string(),
        }
    }

    /// General skinparam directives
    fn define_skin_params(&self) -> String {
        let skin = self.skin();
        format!(
            "skinparam roundcorner {}\nskinparam linetype {}\nskinparam shadowing {}\nskinparam handwritten {}\n",
            skin.roundcorner, skin.linetype, skin.shadowing, skin.handwritten,
        )
    }

    /// The class color block
    fn define_colors(&self) -> String {
        let skin = self.skin();
        format!(
            "skinparam class {{\n    BackgroundColor {}\n    ArrowColor {}\n    BorderColor {}\n}}\n",
            skin.color("class.BackgroundColor", "white"),
            skin.color("class.ArrowColor", "seagreen"),
            skin.color("class.BorderColor", "seagreen"),
        )
    }

    /// Render all sections, separated by blank lines
    fn render(&self) -> String {
        let sections = [
            self.define_table(),
            self.define_columns(),
            self.hide_ui(),
            self.define_direction(),
            self.define_skin_params(),
            self.define_colors(),
        ];

        let mut out = String::new();
        for section in sections.iter().filter(|s| !s.is_empty()) {
            out.push_str(section);
            out.push('\n');
        }
        out
    }
}

/// Default colored style sheet
pub struct DefaultStyles {
    skin: SkinParams,
}

impl DefaultStyles {
    pub fn new(skin: SkinParams) -> Self {
        Self { skin }
    }
}

impl StyleSheet for DefaultStyles {
    fn skin(&self) -> &SkinParams {
        &self.skin
    }
}

/// Monochrome style sheet: the class palette becomes PlantUML monochrome mode
pub struct MonochromeStyles {
    skin: SkinParams,
}

impl MonochromeStyles {
    pub fn new(skin: SkinParams) -> Self {
        Self { skin }
    }
}

impl StyleSheet for MonochromeStyles {
    fn skin(&self) -> &SkinParams {
        &self.skin
    }

    fn define_colors(&self) -> String {
        "skinparam monochrome true\n".to_string()
    }
}

/// Plain-text style sheet for the `txt` format: no glyphs, no colors,
/// no skin params
pub struct TextStyles {
    skin: SkinParams,
}

impl TextStyles {
    pub fn new(skin: SkinParams) -> Self {
        Self { skin }
    }
}

impl StyleSheet for TextStyles {
    fn skin(&self) -> &SkinParams {
        &self.skin
    }

    fn define_columns(&self) -> String {
        "!define pkey(x) x\n!define fkey(x) x\n!define column(x) x\n!define rcolumn(x) x\n"
            .to_string()
    }

    fn define_skin_params(&self) -> String {
        String::new()
    }

    fn define_colors(&self) -> String {
        String::new()
    }
}

/// Select the style sheet matching the diagram flags
pub fn styles_for(flags: &DiagramFlags) -> Box<dyn StyleSheet> {
    let skin = SkinParams::from_flags(flags);

    if flags.monochrome {
        Box::new(MonochromeStyles::new(skin))
    } else if flags.format == Format::Txt {
        Box::new(TextStyles::new(skin))
    } else {
        Box::new(DefaultStyles::new(skin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        let styles = DefaultStyles::new(SkinParams::default());
        let out = styles.render();

        assert!(out.contains("!define pkey(x) {field} <b><color:DarkGoldenRod><&key></color> x</b>"));
        assert!(out.contains("hide stereotypes"));
        assert!(out.contains("top to bottom direction"));
        assert!(out.contains("skinparam roundcorner 5"));
        assert!(out.contains("ArrowColor seagreen"));
        assert!(!out.contains("monochrome"));
    }

    #[test]
    fn test_monochrome_styles() {
        let styles = MonochromeStyles::new(SkinParams::default());
        let out = styles.render();

        assert!(out.contains("skinparam monochrome true"));
        assert!(!out.contains("ArrowColor"));
    }

    #[test]
    fn test_text_styles() {
        let styles = TextStyles::new(SkinParams::default());
        let out = styles.render();

        assert!(out.contains("!define pkey(x) x"));
        assert!(!out.contains("skinparam roundcorner"));
        assert!(!out.contains("<color:"));
    }

    #[test]
    fn test_color_overrides() {
        let mut skin = SkinParams::default();
        skin.colors
            .insert("pkey".to_string(), "red".to_string());
        skin.colors
            .insert("class.ArrowColor".to_string(), "blue".to_string());
        let out = DefaultStyles::new(skin).render();

        assert!(out.contains("<color:red><&key>"));
        assert!(out.contains("ArrowColor blue"));
    }

    #[test]
    fn test_entity_name_display_modes() {
        let mut skin = SkinParams::default();
        skin.entity_names_only = true;
        let out = DefaultStyles::new(skin).render();
        assert!(out.contains("entity \"<b>ename</b>\"\n"));

        let mut skin = SkinParams::default();
        skin.table_names_only = true;
        let out = DefaultStyles::new(skin).render();
        assert!(out.contains("entity \"<b>dbname</b>\"\n"));
    }
}
