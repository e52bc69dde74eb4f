//! Quill configuration system
//!
//! This crate provides centralized configuration for the editor bridge,
//! loading settings from `quill.toml` with environment variable overrides.
//! Theme colours, tab settings and lexer keywords live here and are handed
//! to each editor instance at construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "quill.toml";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct QuillConfig {
    /// Editing behaviour and fonts
    pub editor: EditorConfig,
    /// Lexer language, keyword sets and properties
    pub lexer: LexerConfig,
    /// Syntax colours
    pub theme: ThemeConfig,
    /// Display metrics used for font sizing and monitor bounds
    pub display: DisplayConfig,
    /// Clipboard fetch protocol
    pub clipboard: ClipboardConfig,
    /// Log filtering
    pub logging: LoggingConfig,
}

/// Line wrapping strategy requested from the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    None,
    Word,
    Char,
}

/// Editor behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Font face requested from the host for every style
    pub font_face: String,
    /// Font size in points
    pub font_size: i32,
    /// Tab and indent width in columns
    pub tab_size: i32,
    /// Insert spaces instead of tab characters
    pub use_spaces_for_tabs: bool,
    /// Render whitespace markers
    pub visible_whitespace: bool,
    /// Wrap mode
    pub wrap: WrapMode,
    /// Start new editors read-only
    pub read_only: bool,
    /// Width of the line number margin in pixels (editable mode only)
    pub line_number_margin: i32,
}

/// A numbered keyword list handed to the lexer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordSet {
    pub index: usize,
    pub words: String,
}

/// Lexer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LexerConfig {
    /// Lexer language name understood by the engine (e.g. "cpp")
    pub language: String,
    /// Keyword sets, by set index
    pub keywords: Vec<KeywordSet>,
    /// Raw lexer properties
    pub properties: BTreeMap<String, String>,
}

/// Syntax colours, packed as `0xAABBGGRR`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub text: u32,
    pub string: u32,
    pub comment: u32,
    pub number: u32,
    pub operator: u32,
    pub keyword: u32,
    pub r#type: u32,
    pub builtin: u32,
    pub preprocessor: u32,
    pub selection_color: u32,
    pub char_background: u32,
    /// Paint `char_background` behind styled text instead of opaque black
    pub use_char_background: bool,
}

/// Display metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Vertical DPI used to convert point sizes to pixels
    pub dpi: i32,
    /// Monitor width in pixels
    pub width: i32,
    /// Monitor height in pixels
    pub height: i32,
}

/// Clipboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Size of the first-phase probe buffer in bytes
    pub probe_size: usize,
    /// Pass the full reallocated length as `max_length` on the second fetch.
    /// When false the probe size is passed again, which existing hosts expect.
    pub refetch_full_length: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level (error, warn, info, debug, trace)
    pub level: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_face: "SourceCodePro-Regular.ttf".to_string(),
            font_size: 10,
            tab_size: 4,
            use_spaces_for_tabs: true,
            visible_whitespace: true,
            wrap: WrapMode::Word,
            read_only: false,
            line_number_margin: 40,
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        let mut properties = BTreeMap::new();
        // Keep code inside #if/#else/#endif at full colour
        properties.insert("lexer.cpp.track.preprocessor".to_string(), "0".to_string());
        // Colorize the content of #defines
        properties.insert("styling.within.preprocessor".to_string(), "1".to_string());

        Self {
            language: "cpp".to_string(),
            keywords: vec![
                KeywordSet {
                    index: 0,
                    words: "var const while for if else function in".to_string(),
                },
                KeywordSet {
                    index: 1,
                    words: "and or not".to_string(),
                },
                KeywordSet {
                    index: 3,
                    words: "return continue break".to_string(),
                },
            ],
            properties,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            text: 0xFFFF_FFFF,
            string: 0xFF00_00CC,
            comment: 0xFF00_FF00,
            number: 0xFF00_80FF,
            operator: 0xFF00_CCFF,
            keyword: 0xFF00_66FF,
            r#type: 0xFFFF_FF00,
            builtin: 0xFF88_FF44,
            preprocessor: 0xFFC0_C0C0,
            selection_color: 0xC0CC_9966,
            char_background: 0xC000_0000,
            use_char_background: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dpi: 96,
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            probe_size: 1024,
            refetch_full_length: false,
        }
    }
}

impl ThemeConfig {
    /// Background painted behind styled text.
    pub fn text_background(&self) -> u32 {
        if self.use_char_background {
            self.char_background
        } else {
            0xFF00_0000
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl QuillConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `quill.toml` in the current directory
    /// or return default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        // Editor settings
        if let Ok(font) = std::env::var("QUILL_FONT") {
            self.editor.font_face = font;
        }
        if let Ok(val) = std::env::var("QUILL_FONT_SIZE") {
            if let Ok(size) = val.parse::<i32>() {
                self.editor.font_size = size;
            }
        }
        if let Ok(val) = std::env::var("QUILL_TAB_SIZE") {
            if let Ok(size) = val.parse::<i32>() {
                self.editor.tab_size = size;
            }
        }
        if let Ok(val) = std::env::var("QUILL_READ_ONLY") {
            self.editor.read_only = env_flag(&val);
        }
        if let Ok(val) = std::env::var("QUILL_VISIBLE_WHITESPACE") {
            self.editor.visible_whitespace = env_flag(&val);
        }

        // Display settings
        if let Ok(val) = std::env::var("QUILL_DPI") {
            if let Ok(dpi) = val.parse::<i32>() {
                self.display.dpi = dpi;
            }
        }

        // Clipboard settings
        if let Ok(val) = std::env::var("QUILL_CLIPBOARD_PROBE") {
            if let Ok(size) = val.parse::<usize>() {
                self.clipboard.probe_size = size;
            }
        }
        if let Ok(val) = std::env::var("QUILL_CLIPBOARD_REFETCH_FULL") {
            self.clipboard.refetch_full_length = env_flag(&val);
        }

        if let Ok(level) = std::env::var("QUILL_LOG") {
            self.logging.level = Some(level);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from quill.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = QuillConfig::default();
        assert_eq!(config.editor.font_size, 10);
        assert_eq!(config.editor.tab_size, 4);
        assert!(config.editor.use_spaces_for_tabs);
        assert_eq!(config.clipboard.probe_size, 1024);
        assert!(!config.clipboard.refetch_full_length);
        assert_eq!(config.theme.text, 0xFFFF_FFFF);
        assert_eq!(config.lexer.language, "cpp");
        assert_eq!(config.lexer.keywords.len(), 3);
    }

    #[test]
    fn test_text_background() {
        let mut theme = ThemeConfig::default();
        assert_eq!(theme.text_background(), 0xFF00_0000);
        theme.use_char_background = true;
        assert_eq!(theme.text_background(), 0xC000_0000);
    }

    #[test]
    fn test_toml_serialization() {
        let config = QuillConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: QuillConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[editor]\nfont_size = 14\nwrap = \"none\"\n\n[theme]\nkeyword = 0xFF123456"
        )
        .unwrap();

        let config = QuillConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.editor.font_size, 14);
        assert_eq!(config.editor.wrap, WrapMode::None);
        assert_eq!(config.editor.tab_size, 4);
        assert_eq!(config.theme.keyword, 0xFF12_3456);
        assert_eq!(config.theme.string, 0xFF00_00CC);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuillConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if quill.toml doesn't exist
        let config = QuillConfig::load_or_default();
        assert!(config.display.dpi > 0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("QUILL_FONT_SIZE", "12");
            std::env::set_var("QUILL_CLIPBOARD_REFETCH_FULL", "true");
        }

        let mut config = QuillConfig::default();
        config.merge_with_env();

        assert_eq!(config.editor.font_size, 12);
        assert!(config.clipboard.refetch_full_length);

        unsafe {
            std::env::remove_var("QUILL_FONT_SIZE");
            std::env::remove_var("QUILL_CLIPBOARD_REFETCH_FULL");
        }
    }
}
