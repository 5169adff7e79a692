//! richdoc CLI - rich-text markup conversion tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use richdoc::{
    convert_batch, BlockType, ConvertOptions, JsonFormat, OutputFormat, PageOptions, Richdoc,
    WordBankEntry,
};

#[derive(Parser)]
#[command(name = "richdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Convert rich-text markup to document service requests and page plans",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markup to a remote service batch update body
    Requests {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document index where the text is inserted
        #[arg(long, default_value = "1")]
        start_index: usize,

        /// JSON file with word bank entries ([{"term": .., "definition": ..}])
        #[arg(long, value_name = "FILE")]
        word_bank: Option<PathBuf>,

        /// Instructions text appended after the content
        #[arg(long, env = "RICHDOC_INSTRUCTIONS")]
        instructions: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Lay out markup on pages and print the drawing plan
    Pages {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page margin in points
        #[arg(long, default_value = "54")]
        margin: f32,

        /// JSON file with word bank entries
        #[arg(long, value_name = "FILE")]
        word_bank: Option<PathBuf>,

        /// Instructions text appended after the content
        #[arg(long, env = "RICHDOC_INSTRUCTIONS")]
        instructions: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the parsed block list as JSON
    Blocks {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert markup to a Markdown preview
    #[command(alias = "md")]
    Markdown {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert markup to plain text
    Text {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show block statistics for a markup file
    Info {
        /// Input markup file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert many files in parallel
    Batch {
        /// Input markup files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "requests")]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Remote service batch update body
    Requests,
    /// Paginated drawing plan
    Pages,
    /// Parsed block list
    Blocks,
    /// Markdown preview
    Markdown,
    /// Plain text
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Requests => OutputFormat::Requests,
            FormatArg::Pages => OutputFormat::Pages,
            FormatArg::Blocks => OutputFormat::Blocks,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Requests {
            input,
            start_index,
            word_bank,
            instructions,
            output,
            compact,
        } => cmd_requests(
            &input,
            start_index,
            word_bank.as_deref(),
            instructions,
            output.as_deref(),
            compact,
        ),
        Commands::Pages {
            input,
            margin,
            word_bank,
            instructions,
            output,
            compact,
        } => cmd_pages(
            &input,
            margin,
            word_bank.as_deref(),
            instructions,
            output.as_deref(),
            compact,
        ),
        Commands::Blocks {
            input,
            output,
            compact,
        } => cmd_blocks(&input, output.as_deref(), compact),
        Commands::Markdown { input, output } => cmd_markdown(&input, output.as_deref()),
        Commands::Text { input, output } => cmd_text(&input, output.as_deref()),
        Commands::Info { input } => cmd_info(&input),
        Commands::Batch {
            inputs,
            format,
            output,
        } => cmd_batch(&inputs, format.into(), &output),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read markup from a file, or stdin for "-".
fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if input == Path::new("-") {
        let mut markup = String::new();
        std::io::stdin().read_to_string(&mut markup)?;
        Ok(markup)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_word_bank(path: Option<&Path>) -> Result<Vec<WordBankEntry>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            let entries: Vec<WordBankEntry> = serde_json::from_str(&json)
                .map_err(|e| format!("Invalid word bank {}: {}", path.display(), e))?;
            Ok(entries)
        }
        None => Ok(Vec::new()),
    }
}

fn builder(
    word_bank: Option<&Path>,
    instructions: Option<String>,
) -> Result<Richdoc, Box<dyn std::error::Error>> {
    let mut builder = Richdoc::new().with_word_bank(read_word_bank(word_bank)?);
    if let Some(text) = instructions {
        builder = builder.with_instructions(text);
    }
    Ok(builder)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_requests(
    input: &Path,
    start_index: usize,
    word_bank: Option<&Path>,
    instructions: Option<String>,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let result = builder(word_bank, instructions)?.parse(&markup);

    let batch = result.to_service_requests(start_index);
    log::info!(
        "{} requests, {} characters of text",
        batch.requests.len(),
        batch.text.chars().count()
    );

    let json = batch.to_request_body(json_format(compact))?;
    write_output(&json, output)
}

fn cmd_pages(
    input: &Path,
    margin: f32,
    word_bank: Option<&Path>,
    instructions: Option<String>,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let result = builder(word_bank, instructions)?
        .with_page_options(PageOptions::new().with_margin(margin))
        .parse(&markup);

    let plan = result.to_pages()?;
    log::info!("{} pages", plan.page_count());

    let json = richdoc::render::to_json(&plan, json_format(compact))?;
    write_output(&json, output)
}

fn cmd_blocks(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let json = Richdoc::new().parse(&markup).to_json(json_format(compact))?;
    write_output(&json, output)
}

fn cmd_markdown(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let markdown = Richdoc::new().parse(&markup).to_markdown();
    write_output(&markdown, output)
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let text = Richdoc::new().parse(&markup).to_text();
    write_output(&text, output)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let result = Richdoc::new().parse(&markup);
    let doc = &result.document;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Markup bytes".bold(), markup.len());
    println!("{}: {}", "Blocks".bold(), doc.len());

    let headings: usize = (1..=4).map(|level| doc.count(BlockType::heading(level))).sum();
    let list_items = doc.count(BlockType::ListBullet) + doc.count(BlockType::ListNumber);

    println!("{}: {}", "Headings".bold(), headings);
    println!("{}: {}", "Paragraphs".bold(), doc.count(BlockType::Paragraph));
    println!("{}: {}", "List items".bold(), list_items);
    println!("{}: {}", "Dividers".bold(), doc.count(BlockType::Divider));

    println!();
    println!("{}", "Output".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let batch = result.to_service_requests(1);
    let plan = result.to_pages()?;

    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Service requests".bold(), batch.requests.len());
    println!("{}: {}", "Pages".bold(), plan.page_count());

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    format: OutputFormat,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading...");
    let mut markups = Vec::with_capacity(inputs.len());
    for input in inputs {
        markups.push(fs::read_to_string(input)?);
        pb.inc(1);
    }

    pb.set_message("Converting...");
    let options = ConvertOptions::new().with_format(format);
    let results = convert_batch(&markups, &options);

    let mut failed = 0;
    let mut written = Vec::new();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(converted) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let name = format!("{}.{}", stem, format.extension());
                fs::write(output.join(&name), &converted.content)?;
                written.push(name);
            }
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "richdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rich-text markup conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/richdoc".dimmed());
    println!("License: MIT");
}
