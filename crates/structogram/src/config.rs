//! Configuration types for Structogram documents.
//!
//! This module provides configuration structures that control the metadata
//! and colors of generated diagrams. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining document and style settings.
//! - [`DocumentConfig`] - Author, program name and origin written into the root element.
//! - [`StyleConfig`] - Colors of the element families.
//!
//! # Example
//!
//! ```
//! # use structogram::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().palette().is_ok());
//! ```

use serde::Deserialize;

use structogram_core::color::Color;

use crate::export::{Palette, RenderOptions};

/// Top-level application configuration combining document and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document metadata section.
    #[serde(default)]
    document: DocumentConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified document and style configurations.
    pub fn new(document: DocumentConfig, style: StyleConfig) -> Self {
        Self { document, style }
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Render options described by this configuration.
    ///
    /// Unset values keep the defaults of [`RenderOptions`].
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color cannot be parsed.
    pub fn render_options(&self) -> Result<RenderOptions, String> {
        let mut options = RenderOptions::default().with_palette(self.style.palette()?);

        if let Some(author) = &self.document.author {
            options = options.with_author(author);
        }
        if let Some(name) = &self.document.program_name {
            options = options.with_program_name(name);
        }
        if let Some(origin) = &self.document.origin {
            options = options.with_origin(origin);
        }
        Ok(options)
    }
}

/// Metadata written into the root element of every document.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    author: Option<String>,

    /// Title of the diagram.
    #[serde(default)]
    program_name: Option<String>,

    /// Tool recorded as the creator of the document.
    #[serde(default)]
    origin: Option<String>,
}

impl DocumentConfig {
    /// Creates a new [`DocumentConfig`].
    pub fn new(
        author: Option<String>,
        program_name: Option<String>,
        origin: Option<String>,
    ) -> Self {
        Self {
            author,
            program_name,
            origin,
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

/// Colors of the element families, as color strings.
///
/// Fields that are not set fall back to the Structorizer defaults of
/// [`Palette`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    default_color: Option<String>,

    #[serde(default)]
    jump_color: Option<String>,

    #[serde(default)]
    external_jump_color: Option<String>,

    #[serde(default)]
    database_color: Option<String>,
}

impl StyleConfig {
    /// Returns the configured [`Palette`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first color string that cannot be parsed
    /// into a valid [`Color`].
    pub fn palette(&self) -> Result<Palette, String> {
        let defaults = Palette::default();

        Ok(Palette {
            default: parse_color("default_color", &self.default_color)?
                .unwrap_or(defaults.default),
            jump: parse_color("jump_color", &self.jump_color)?.unwrap_or(defaults.jump),
            external_jump: parse_color("external_jump_color", &self.external_jump_color)?
                .unwrap_or(defaults.external_jump),
            database: parse_color("database_color", &self.database_color)?
                .unwrap_or(defaults.database),
        })
    }
}

fn parse_color(key: &str, value: &Option<String>) -> Result<Option<Color>, String> {
    value
        .as_deref()
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {key} in config: {err}"))
}
