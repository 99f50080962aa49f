//! docreflow CLI - document recomposition tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;

use docreflow::{Conversion, OutputFormat};

#[derive(Parser)]
#[command(name = "docreflow")]
#[command(version)]
#[command(
    about = "Strip boilerplate from Word/PowerPoint/PDF documents and recompose them",
    long_about = None
)]
struct Cli {
    /// Input document (.docx, .pptx, .pdf)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file or directory (defaults to the input's directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Target format
    #[arg(long = "to", value_enum, default_value = "pdf")]
    format: TargetFormat,

    /// Extract, deduplicate and render embedded images
    #[arg(short, long)]
    images: bool,

    /// Output file stem (extension is derived from the target format)
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Print pipeline statistics as JSON to stdout
    #[arg(long)]
    stats: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum TargetFormat {
    Pdf,
    Word,
}

impl From<TargetFormat> for OutputFormat {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Pdf => OutputFormat::Pdf,
            TargetFormat::Word => OutputFormat::Word,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> docreflow::Result<()> {
    let mut conversion = Conversion::new(cli.format.into()).with_images(cli.images);
    if let Some(name) = &cli.name {
        conversion = conversion.with_output_name(name.clone());
    }

    let result = conversion.run_file(&cli.input)?;

    let fallback_stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let target = output_path(cli.output.as_deref(), &cli.input, &result.file_name(fallback_stem));
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&target, &result.bytes)?;
    info!("wrote {} bytes to {}", result.bytes.len(), target.display());

    if cli.stats {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.stats).unwrap_or_default()
        );
    }
    println!("{} {}", "Created".green().bold(), target.display());
    Ok(())
}

/// Resolve where the output file lands.
///
/// An explicit file path wins; an explicit directory (or the input's
/// directory by default) gets the computed file name appended.
fn output_path(output: Option<&Path>, input: &Path, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
            .join(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_explicit_file() {
        let path = output_path(
            Some(Path::new("/tmp/custom.pdf")),
            Path::new("/data/in.pptx"),
            "in.pdf",
        );
        assert_eq!(path, Path::new("/tmp/custom.pdf"));
    }

    #[test]
    fn test_output_path_defaults_to_input_dir() {
        let path = output_path(None, Path::new("/data/in.pptx"), "in.pdf");
        assert_eq!(path, Path::new("/data/in.pdf"));
    }

    #[test]
    fn test_output_path_directory_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(Some(dir.path()), Path::new("in.pptx"), "in.docx");
        assert_eq!(path, dir.path().join("in.docx"));
    }
}
