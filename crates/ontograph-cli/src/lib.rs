//! Ontograph CLI library
//!
//! This module contains the core CLI logic for the Ontograph translator.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write, path::Path};

use log::info;

use ontograph::{OntographError, OntologyBuilder, model::Diagram};

/// Run the Ontograph CLI application
///
/// This function reads the input document, translates it (or exports its
/// diagram graph) and writes the result to the output file, or to standard
/// output when no output file is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `OntographError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed documents
/// - Synthesis errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), OntographError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_deref().map(Path::new))?;
    if let Some(format) = args.format {
        app_config = app_config.with_format(format);
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = OntologyBuilder::new(app_config);
    let diagram = builder.load(&source)?;
    let output = render(&builder, &diagram, args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Output written successfully");
        }
        None => std::io::stdout().write_all(output.as_bytes())?,
    }

    Ok(())
}

fn render(
    builder: &OntologyBuilder,
    diagram: &Diagram,
    args: &Args,
) -> Result<String, OntographError> {
    #[cfg(feature = "graphviz")]
    if args.dot {
        return Ok(builder.export_dot(diagram));
    }

    if args.graph {
        return builder.export_graph(diagram);
    }

    let ontology = builder.synthesize(diagram)?;
    builder.render(&ontology)
}
