// Command line front end for MRZ parsing and validation

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use mrzkit::{
    models::{MrzInfo, MrzRules, VerificationResult},
    MrzError, PassportValidator,
};
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mrzkit", version, about = "Parse and validate ICAO 9303 machine readable zones")]
struct Cli {
    #[arg(long, global = true, help = "JSON file with OCR substitution rules")]
    rules: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the parsed fields as JSON
    Parse {
        file: Option<PathBuf>,
    },
    /// Check digits, required fields and expiry
    Validate {
        file: Option<PathBuf>,
        #[arg(long, help = "Reference date (YYYY-MM-DD) for the expiry check")]
        today: Option<NaiveDate>,
        #[arg(long, default_value_t = false, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Print the cleaned candidate lines
    Clean {
        file: Option<PathBuf>,
    },
    /// Print the MRZ information used for chip access
    AccessKey {
        file: Option<PathBuf>,
    },
}

// Function to print a detailed validation report
fn print_detailed_report(result: &VerificationResult, info: &MrzInfo) {
    println!("\n===============================================");
    println!("        MRZ VALIDATION DETAILED REPORT");
    println!("===============================================\n");

    println!("DOCUMENT INFORMATION:");
    println!("  Document Type: {}", result.document_type);
    println!("  Document Code: {}", info.document_code);
    println!("  Issuing State: {}", info.issuing_state);
    println!("  Document Number: {}", info.document_number);
    println!("  Surname: {}", info.primary_identifier);
    println!("  Given Names: {}", info.secondary_identifier);
    println!("  Nationality: {}", info.nationality);
    println!("  Date of Birth: {}", info.date_of_birth);
    println!("  Gender: {}", info.gender);
    println!("  Date of Expiry: {}", info.date_of_expiry);
    println!("  Optional Data: {}", info.optional_data);

    let status = |passed: bool| if passed { "PASSED" } else { "FAILED" };
    println!("\nVALIDATION STEPS:");
    println!("  1. Check Digits: {}", status(result.mrz_validation.is_valid));
    println!("  2. Format Validation: {}", status(result.format_validation.is_valid));
    println!("  3. Expiry Validation: {}", status(result.expiry_validation.is_valid));

    if !result.issues.is_empty() {
        println!("\nISSUES FOUND:");
        for issue in &result.issues {
            println!("  - [{}] {}", issue.issue_type, issue.message);
        }
    }

    println!(
        "\nMRZ validation result: {}",
        if result.is_valid { "VALID" } else { "INVALID" }
    );
}

fn read_input(file: Option<&PathBuf>) -> Result<String, MrzError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run(cli: Cli) -> Result<bool, MrzError> {
    let rules = match &cli.rules {
        Some(path) => MrzRules::from_file(path)?,
        None => MrzRules::default(),
    };
    let validator = PassportValidator::with_rules(rules);

    match cli.command {
        Commands::Parse { file } => {
            let record = validator.parse_mrz(&read_input(file.as_ref())?)?;
            let output = json!({
                "documentType": validator.document_type(&record).as_str(),
                "mrzInfo": MrzInfo::from_record(&record),
                "lines": record.to_lines(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(true)
        }
        Commands::Validate { file, today, json } => {
            let record = validator.parse_mrz(&read_input(file.as_ref())?)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let result = validator.verify(&record, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_detailed_report(&result, &MrzInfo::from_record(&record));
            }
            Ok(result.is_valid)
        }
        Commands::Clean { file } => {
            println!("{}", validator.clean_mrz_string(&read_input(file.as_ref())?));
            Ok(true)
        }
        Commands::AccessKey { file } => {
            let record = validator.parse_mrz(&read_input(file.as_ref())?)?;
            println!("{}", validator.access_key(&record)?.mrz_information()?);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}
