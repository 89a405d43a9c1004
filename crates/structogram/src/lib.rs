//! Structogram - convert grammar parse trees into Structorizer diagrams.
//!
//! Reads the parse tree export of a GOLD Parser grammar and writes the
//! program as a Nassi-Shneiderman diagram in the Structorizer `.nsd` format.
//! Conversion runs in three stages: the export is read into a grammar tree,
//! every grammar node is mapped to a diagram statement and the statements
//! collect their text (build pass), then the diagram is written out (render
//! pass).

pub mod config;
pub mod diagram;
pub mod export;
pub mod factory;

mod build;
mod error;

pub use structogram_core::{color, grammar};

pub use error::StructogramError;

use std::io::Write;

use log::{debug, info, trace};

use structogram_core::grammar::GrammarTree;

use config::AppConfig;
use diagram::Diagram;
use export::RenderOptions;
use factory::StatementFactory;

/// Converter from parse tree exports to Structorizer documents.
///
/// # Examples
///
/// ```
/// use structogram::{Converter, config::AppConfig};
///
/// let source = "Parse Tree\n\
///               \n\
///               +--<program> ::= <statement_list>\n\
///               |  +--<MOVE> ::= MOVE <operand> TO <operand>\n\
///               |  |  +--MOVE\n\
///               |  |  +--1\n\
///               |  |  +--TO\n\
///               |  |  +--#A\n";
///
/// let converter = Converter::new(AppConfig::default());
/// let options = converter.render_options().expect("valid config");
///
/// let xml = converter
///     .convert_to_string(source, &options)
///     .expect("Failed to convert");
/// assert!(xml.contains(r#"<instruction text="MOVE 1 TO #A""#));
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
    factory: StatementFactory,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            factory: StatementFactory::new(),
        }
    }

    /// The configuration of this converter.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render options described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StructogramError::Config`] if a configured color is invalid.
    pub fn render_options(&self) -> Result<RenderOptions, StructogramError> {
        self.config
            .render_options()
            .map_err(StructogramError::Config)
    }

    /// Read a parse tree export into a grammar tree.
    ///
    /// # Errors
    ///
    /// Returns [`StructogramError::Parse`] when the export has no tree
    /// section or the tree section is malformed.
    pub fn parse(&self, source: &str) -> Result<GrammarTree, StructogramError> {
        info!("Reading parse tree");

        let tree = structogram_parser::parse(source)
            .map_err(|err| StructogramError::new_parse_error(err, source))?;

        debug!(nodes = tree.len(); "Parse tree read successfully");
        Ok(tree)
    }

    /// Map the grammar tree to diagram statements and run the build pass.
    pub fn build(&self, tree: &GrammarTree) -> Diagram {
        info!("Building diagram");

        let mut diagram = Diagram::import(tree, &self.factory);
        build::build(&mut diagram, tree);

        debug!(statements = diagram.len(); "Diagram built");
        trace!(diagram:?; "Built diagram");
        diagram
    }

    /// Write a built diagram as a Structorizer document.
    ///
    /// # Errors
    ///
    /// Returns [`StructogramError::Io`] if writing fails.
    pub fn render<W: Write>(
        &self,
        diagram: &Diagram,
        options: &RenderOptions,
        writer: &mut W,
    ) -> Result<(), StructogramError> {
        info!(program = options.program_name(); "Rendering diagram");
        export::render(diagram, options, writer)?;
        Ok(())
    }

    /// Convert a parse tree export and write the document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed export and an I/O error if
    /// writing fails.
    pub fn convert<W: Write>(
        &self,
        source: &str,
        options: &RenderOptions,
        writer: &mut W,
    ) -> Result<(), StructogramError> {
        let tree = self.parse(source)?;
        let diagram = self.build(&tree);
        self.render(&diagram, options, writer)
    }

    /// Convert a parse tree export into a document string.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed export.
    pub fn convert_to_string(
        &self,
        source: &str,
        options: &RenderOptions,
    ) -> Result<String, StructogramError> {
        let mut buffer = Vec::new();
        self.convert(source, options, &mut buffer)?;

        String::from_utf8(buffer)
            .map_err(|err| StructogramError::Io(std::io::Error::other(err)))
    }
}
