use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use seaplus_cli::report::{format_token, load_source, CheckReport};
use seaplus_cli::tree;
use seaplus_parse::{parse_str, tokenize, LexWarning, Parsed};
use seaplus_sema::analyze;

#[derive(Parser, Debug)]
#[command(name = "seaplus")]
#[command(about = "SeaPlus+: scanner, parser and semantic checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tokens of a source file
    Tokens {
        /// Path to source file
        file: String,
    },

    /// Parse a source file and dump the syntax tree
    Parse {
        /// Path to source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Parse and semantically check a source file
    Check {
        /// Path to source file
        file: String,

        /// Emit a JSON report instead of plain diagnostics
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
    Tree,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Parse { file, format } => cmd_parse(&file, format),
        Commands::Check { file, json } => cmd_check(&file, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_warnings(warnings: &[LexWarning]) {
    for w in warnings {
        eprintln!("warning: {}", w);
    }
}

fn load_and_parse(path: &str) -> Result<Parsed> {
    let src = load_source(path)?;
    let parsed = parse_str(&src)?;
    Ok(parsed)
}

fn cmd_tokens(file: &str) -> Result<bool> {
    let src = load_source(file)?;
    let (tokens, warnings) = tokenize(&src);

    let mut clean = true;
    for tok in &tokens {
        println!("{}", format_token(tok));
        clean &= tok.error.is_none();
    }
    print_warnings(&warnings);
    Ok(clean)
}

fn cmd_parse(file: &str, format: Format) -> Result<bool> {
    let parsed = load_and_parse(file)?;
    print_warnings(&parsed.warnings);

    match format {
        Format::Pretty => println!("{:#?}", parsed.program),
        Format::Json => println!("{}", serde_json::to_string_pretty(&parsed.program)?),
        Format::Tree => print!("{}", tree::render(&parsed.program)),
    }
    Ok(true)
}

fn cmd_check(file: &str, json: bool) -> Result<bool> {
    let parsed = load_and_parse(file)?;
    let analysis = analyze(&parsed.program);

    if json {
        let warnings = parsed.warnings.iter().map(|w| w.to_string()).collect();
        let report = CheckReport::new(file, warnings, &analysis);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(analysis.ok);
    }

    print_warnings(&parsed.warnings);
    for d in &analysis.diagnostics {
        eprintln!("{}", d);
    }
    if analysis.ok {
        println!("{}: no semantic errors", file);
    } else {
        let errors = analysis.diagnostics.iter().filter(|d| d.is_error()).count();
        eprintln!("{}: {} semantic error(s)", file, errors);
    }
    Ok(analysis.ok)
}
