//! CLI logic for the Structogram converter.
//!
//! Each input file is one conversion unit. Units are converted
//! independently, so a malformed export does not stop the others.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};

use structogram::{Converter, StructogramError, export::RenderOptions};

/// File extension of Structorizer documents.
const OUTPUT_EXTENSION: &str = "nsd";

/// Run the Structogram CLI application
///
/// Without inputs the export is read from standard input. A single
/// document goes to `--output`, or to standard output when it is not set.
/// Several inputs are written as `<stem>.nsd` into the `--output` directory,
/// or next to each input.
///
/// # Errors
///
/// Returns every error that occurred: a configuration error stops the run
/// before any unit is converted, otherwise one error per failed unit.
pub fn run(args: &Args) -> Result<(), Vec<StructogramError>> {
    let converter = config::load_config(args.config.as_ref())
        .map(Converter::new)
        .map_err(|err| vec![err])?;

    let mut options = converter.render_options().map_err(|err| vec![err])?;
    if let Some(name) = &args.name {
        options = options.with_program_name(name);
    }

    let output = args.output.as_deref();
    match args.inputs.as_slice() {
        [] => convert_stdin(&converter, &options, output).map_err(|err| vec![err]),
        [input] => convert_file(&converter, &options, input, output).map_err(|err| vec![err]),
        inputs => convert_batch(&converter, &options, inputs, output),
    }
}

fn convert_stdin(
    converter: &Converter,
    options: &RenderOptions,
    output: Option<&Path>,
) -> Result<(), StructogramError> {
    info!("Processing standard input");

    let source = io::read_to_string(io::stdin())?;
    let document = converter.convert_to_string(&source, options)?;
    write_document(&document, output)
}

fn convert_file(
    converter: &Converter,
    options: &RenderOptions,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), StructogramError> {
    info!(input_path:% = input.display(); "Processing parse tree");

    let source = fs::read_to_string(input)?;
    let document = converter.convert_to_string(&source, options)?;
    write_document(&document, output)
}

fn convert_batch(
    converter: &Converter,
    options: &RenderOptions,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<(), Vec<StructogramError>> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir).map_err(|err| vec![StructogramError::from(err)])?;
    }

    let errors: Vec<_> = inputs
        .iter()
        .filter_map(|input| {
            let output = batch_output_path(input, output_dir);
            convert_file(converter, options, input, Some(&output))
                .inspect_err(|err| warn!(input_path:% = input.display(), err:%; "Conversion failed"))
                .err()
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        warn!(failed = errors.len(), total = inputs.len(); "Some inputs failed to convert");
        Err(errors)
    }
}

fn batch_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = Path::new(input.file_stem().unwrap_or(input.as_os_str()))
        .with_extension(OUTPUT_EXTENSION);

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn write_document(document: &str, output: Option<&Path>) -> Result<(), StructogramError> {
    match output {
        Some(path) => {
            fs::write(path, document)?;
            info!(output_file:% = path.display(); "Diagram exported successfully");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
