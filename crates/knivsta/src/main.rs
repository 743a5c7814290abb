#![forbid(unsafe_code)]

//! Knivsta CLI — canonicalize XML documents and compare them structurally.

use clap::{Parser, Subcommand};
use knivsta_canon::CanonOptions;
use knivsta_core::Error;
use knivsta_xml::XmlDocument;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "knivsta",
    about = "Knivsta — canonical XML normalizer for structural comparison",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize an XML document
    Canon {
        /// Input XML file ("-" for stdin)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit an XML declaration before the root element
        #[arg(long)]
        declaration: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare two XML documents structurally
    Diff {
        /// First XML file
        a: PathBuf,

        /// Second XML file
        b: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Canon {
            file,
            output,
            declaration,
            indent,
            verbose,
        } => cmd_canon(file, output, declaration, indent, verbose),

        Commands::Diff { a, b, verbose } => cmd_diff(a, b, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn cmd_canon(
    file: PathBuf,
    output: Option<PathBuf>,
    declaration: bool,
    indent: usize,
    verbose: bool,
) -> Result<(), Error> {
    let input = read_input(&file)?;
    let document = XmlDocument::parse(input)?;

    if verbose {
        eprintln!("Canonicalizing: {}", file.display());
    }

    let options = CanonOptions {
        indent: " ".repeat(indent),
        xml_declaration: declaration,
    };
    let doc = document.parse_doc()?;
    let canonical = knivsta_canon::canonicalize_doc(&doc, &options);
    write_output(output, canonical.as_bytes())
}

fn cmd_diff(a: PathBuf, b: PathBuf, verbose: bool) -> Result<(), Error> {
    let text_a = read_input(&a)?;
    let text_b = read_input(&b)?;

    if verbose {
        eprintln!("Comparing: {} and {}", a.display(), b.display());
    }

    if knivsta_canon::equivalent(&text_a, &text_b)? {
        println!("identical");
        Ok(())
    } else {
        println!("different");
        process::exit(1);
    }
}

// ── Utility functions ────────────────────────────────────────────────

fn read_input(path: &PathBuf) -> Result<String, Error> {
    if path.as_os_str() == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Error::Other(format!("stdin: {e}")))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| Error::Other(format!("{}: {e}", path.display())))
    }
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data)
            .map_err(|e| Error::Other(format!("{}: {e}", p.display()))),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(data)
                .map_err(|e| Error::Serialize(format!("stdout: {e}")))
        }
    }
}
