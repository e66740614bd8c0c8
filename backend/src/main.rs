//! FastForm CLI - Parse spreadsheets into form questions
//!
//! # Main Commands
//!
//! ```bash
//! fastform serve                    # Start HTTP server (port 3000)
//! fastform parse input.csv          # Parse a spreadsheet to questions JSON
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! fastform preflight input.xlsx     # Format/size check without parsing
//! fastform validate questions.json  # Validate questions against the schema
//! ```

use clap::{Parser, Subcommand};
use fastform::{
    media_type_for_extension, parse_path, validate_file_format, validate_question, UploadedFile,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fastform")]
#[command(about = "Parse spreadsheets into Google Form questions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV/XLSX file and output questions as JSON
    Parse {
        /// Input file (.csv, .xlsx or .xls)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the preflight format check without parsing
    Preflight {
        /// Input file
        input: PathBuf,
    },

    /// Validate a questions JSON file against the embedded schema
    Validate {
        /// Input JSON file (array of questions)
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()).await,

        Commands::Preflight { input } => cmd_preflight(&input),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let outcome = parse_path(input).await?;

    if let Some(ref encoding) = outcome.info.encoding {
        eprintln!("   Encoding: {}", encoding);
    }
    if let Some(delimiter) = outcome.info.delimiter {
        eprintln!(
            "   Delimiter: '{}'",
            match delimiter {
                '\t' => "\\t".to_string(),
                c => c.to_string(),
            }
        );
    }
    eprintln!(
        "   Rows: {} ({})",
        outcome.info.row_count,
        if outcome.info.has_headers {
            "header row detected"
        } else {
            "no header row"
        }
    );
    if !outcome.skipped.is_empty() {
        eprintln!("   ⚠ Skipped {} row(s):", outcome.skipped.len());
        for skip in outcome.skipped.iter().take(5) {
            eprintln!("     - line {}: {}", skip.line, skip.reason);
        }
    }
    eprintln!("✅ Parsed {} questions", outcome.questions.len());

    let json = serde_json::to_string_pretty(&outcome.questions)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_preflight(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let media_type = input
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(media_type_for_extension)
        .unwrap_or("application/octet-stream");
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from);

    let file = UploadedFile::new(name, media_type, bytes);
    let report = validate_file_format(&file);

    for warning in &report.warnings {
        eprintln!("⚠  {}", warning);
    }

    if report.is_valid {
        eprintln!(
            "✅ {} looks parseable ({}, {} bytes)",
            input.display(),
            media_type,
            file.size
        );
        Ok(())
    } else {
        Err(report.errors.join("; ").into())
    }
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(input)?;
    let questions: Vec<Value> = serde_json::from_str(&content)?;

    let mut invalid = 0;
    for (i, question) in questions.iter().enumerate() {
        if let Err(errors) = validate_question(question) {
            invalid += 1;
            eprintln!("❌ Question {}:", i);
            for err in errors.iter().take(3) {
                eprintln!("     - {}", err);
            }
        }
    }

    if invalid == 0 {
        eprintln!("✅ All {} questions valid", questions.len());
        Ok(())
    } else {
        Err(format!(
            "{} of {} questions failed schema validation",
            invalid,
            questions.len()
        )
        .into())
    }
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // .env can override the default port
    let port = std::env::var("FASTFORM_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(port);

    fastform::server::start_server(port).await
}

fn write_output(json: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!("   Written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
