//! exampaper CLI - build exam papers from photographed questions

mod gemini;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use exampaper::render::commands_to_json;
use exampaper::{
    labels_for, Alignment, CancellationToken, ExportFormat, ExtractionBatch, FormatPatch,
    ImageInput, JsonFormat, LineFormat, Locale, PaperBuilder, PaperResult, Session, TextExtractor,
};

use gemini::GeminiExtractor;

#[derive(Parser)]
#[command(name = "exampaper")]
#[command(author = "exampaper contributors")]
#[command(version)]
#[command(about = "Build print-ready exam papers from photographed questions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract question text from images
    Extract {
        /// Question images (at most 4)
        #[arg(value_name = "IMAGE", required = true)]
        images: Vec<PathBuf>,

        /// Language of the questions
        #[arg(short, long, default_value = "english")]
        lang: Locale,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Write the texts as a JSON array to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Read all images at the same time
        #[arg(long)]
        parallel: bool,
    },

    /// Build a paper from text files, one question per file
    Build {
        /// Question text files
        #[arg(value_name = "FILE", required = true)]
        texts: Vec<PathBuf>,

        #[command(flatten)]
        paper: PaperArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Extract, build and export in one go
    Create {
        /// Question images (at most 4)
        #[arg(value_name = "IMAGE", required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        paper: PaperArgs,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Print the page commands of a paper as JSON
    Commands {
        /// Question text files
        #[arg(value_name = "FILE", required = true)]
        texts: Vec<PathBuf>,

        #[command(flatten)]
        paper: PaperArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the labels, class and subject lists of a language
    Labels {
        /// Language
        #[arg(short, long, default_value = "english")]
        lang: Locale,
    },

    /// Show version information
    Version,
}

/// Header fields and the starting line format.
#[derive(Args)]
struct PaperArgs {
    /// Language of the paper
    #[arg(short, long, default_value = "english")]
    lang: Locale,

    /// School name (defaults to the language's school name)
    #[arg(long)]
    school: Option<String>,

    /// Class, e.g. "Class 5"
    #[arg(long)]
    class: String,

    /// Subject
    #[arg(long)]
    subject: String,

    /// Exam duration, e.g. "2 hours"
    #[arg(long)]
    time: String,

    /// Total marks
    #[arg(long)]
    marks: String,

    /// Exam term, e.g. "Half Yearly"
    #[arg(long)]
    term: Option<String>,

    /// Print student name and roll number fields
    #[arg(long)]
    student_fields: bool,

    /// Font size of every line, in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Bold every line
    #[arg(long)]
    bold: bool,

    /// Alignment of every line (left, center, right)
    #[arg(long)]
    align: Option<Alignment>,
}

impl PaperArgs {
    fn school_name(&self) -> String {
        self.school
            .clone()
            .unwrap_or_else(|| labels_for(self.lang).default_school_name.to_string())
    }

    fn format_patch(&self) -> FormatPatch {
        let mut patch = FormatPatch::new();
        if let Some(size) = self.font_size {
            patch = patch.font_size(size);
        }
        if self.bold {
            patch = patch.bold(true);
        }
        if let Some(alignment) = self.align {
            patch = patch.alignment(alignment);
        }
        patch
    }

    fn build(&self, raw_texts: &[String]) -> PaperResult {
        let mut format = LineFormat::default();
        format.apply(&self.format_patch());

        let mut builder = PaperBuilder::with_locale(self.lang)
            .with_school(self.school_name())
            .with_class(&self.class)
            .with_subject(&self.subject)
            .with_exam_time(&self.time)
            .with_total_marks(&self.marks)
            .with_default_format(format);
        if let Some(ref term) = self.term {
            builder = builder.with_exam_term(term);
        }
        if self.student_fields {
            builder = builder.with_student_fields();
        }
        builder.build(raw_texts)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Print-ready PDF (default)
    Pdf,
    /// HTML print preview
    Html,
    /// Plain text
    Text,
    /// Document model as JSON
    Json,
    /// Every format
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::Html => vec![ExportFormat::Html],
            FormatArg::Text => vec![ExportFormat::Text],
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            images,
            lang,
            api_key,
            output,
            parallel,
        } => cmd_extract(&images, lang, &api_key, output.as_deref(), parallel),
        Commands::Build {
            texts,
            paper,
            format,
            output,
        } => cmd_build(&texts, &paper, format, output.as_deref()),
        Commands::Create {
            images,
            paper,
            api_key,
            format,
            output,
        } => cmd_create(&images, &paper, &api_key, format, output.as_deref()),
        Commands::Commands {
            texts,
            paper,
            output,
            compact,
        } => cmd_commands(&texts, &paper, output.as_deref(), compact),
        Commands::Labels { lang } => {
            cmd_labels(lang);
            Ok(())
        }
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

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageInput>, Box<dyn std::error::Error>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(ImageInput::from_path(path)?);
    }
    Ok(images)
}

fn load_texts(paths: &[PathBuf]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut texts = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        texts.push(text);
    }
    Ok(texts)
}

fn report_failures(batch: &ExtractionBatch, names: &[String]) {
    for (index, error) in batch.failures() {
        let name = names.get(index).map(String::as_str).unwrap_or("?");
        eprintln!("{} {}: {}", "Warning".yellow().bold(), name, error);
    }
}

fn output_dir(output: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn print_written(paths: &[PathBuf]) {
    println!("\n{}", "Output files:".green().bold());
    for (i, path) in paths.iter().enumerate() {
        let branch = if i + 1 == paths.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
}

fn cmd_extract(
    paths: &[PathBuf],
    lang: Locale,
    api_key: &str,
    output: Option<&Path>,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let images = load_images(paths)?;
    let names: Vec<String> = images.iter().map(|i| i.name.clone()).collect();
    let extractor = GeminiExtractor::new(api_key)?;
    let cancel = CancellationToken::new();

    let pb = progress_bar(images.len());
    let progress = |index: usize, _total: usize| {
        pb.set_position(index as u64);
        pb.set_message(format!("Reading {}...", names[index]));
    };
    let batch = if parallel {
        exampaper::extract_parallel(&extractor, &images, lang, &cancel, progress)?
    } else {
        exampaper::extract_sequential(&extractor, &images, lang, &cancel, progress)?
    };
    pb.finish_with_message("Done!");

    report_failures(&batch, &names);
    let texts = batch.successful_texts();
    if texts.is_empty() {
        return Err(labels_for(lang).extraction_error.into());
    }

    if let Some(path) = output {
        fs::write(path, serde_json::to_string_pretty(&texts)?)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        for (i, text) in texts.iter().enumerate() {
            println!("{}", format!("── {} {} ──", labels_for(lang).question, i + 1).cyan());
            println!("{}", text.trim_end());
        }
    }

    Ok(())
}

fn cmd_build(
    paths: &[PathBuf],
    args: &PaperArgs,
    format: FormatArg,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let texts = load_texts(paths)?;
    let paper = args.build(&texts);
    let dir = output_dir(output)?;

    let mut written = Vec::new();
    for format in format.formats() {
        written.push(paper.export(format, &dir)?);
    }

    println!(
        "{} {} questions, {} pages",
        "Built".green().bold(),
        paper.paper().block_count(),
        paper.page_count()
    );
    print_written(&written);
    Ok(())
}

fn cmd_create(
    paths: &[PathBuf],
    args: &PaperArgs,
    api_key: &str,
    format: FormatArg,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let images = load_images(paths)?;
    let names: Vec<String> = images.iter().map(|i| i.name.clone()).collect();
    let dir = output_dir(output)?;
    let extractor = GeminiExtractor::new(api_key)?;

    let mut session = Session::new(args.lang);
    session.submit_details(&args.school_name(), &args.class, &args.subject)?;
    for image in images {
        let name = image.name.clone();
        if !session.add_image(image) {
            eprintln!("{} {}: image limit reached", "Skipped".yellow().bold(), name);
        }
    }

    let pb = progress_bar(session.images().len());
    let batch = session.run_extraction_with(
        &extractor as &dyn TextExtractor,
        &CancellationToken::new(),
        |index, _total| {
            pb.set_position(index as u64);
            pb.set_message(format!("Reading {}...", names[index]));
        },
    )?;
    pb.finish_with_message("Done!");
    report_failures(&batch, &names);
    if batch.success_count() == 0 {
        return Err(batch
            .first_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| labels_for(args.lang).extraction_error.to_string())
            .into());
    }

    session.set_metadata_fields(
        &args.time,
        &args.marks,
        args.term.as_deref(),
        args.student_fields,
    )?;
    session.set_default_format(&args.format_patch())?;
    session.enter_preview()?;

    let mut written = Vec::new();
    for format in format.formats() {
        written.push(session.export(format, &dir)?);
    }

    println!(
        "{} {} of {} images read",
        "Created".green().bold(),
        batch.success_count(),
        session.images().len()
    );
    print_written(&written);
    Ok(())
}

fn cmd_commands(
    paths: &[PathBuf],
    args: &PaperArgs,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let texts = load_texts(paths)?;
    let paper = args.build(&texts);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = commands_to_json(&paper.commands(), format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_labels(lang: Locale) {
    let labels = labels_for(lang);

    println!("{}", labels.preview_title.cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Steps".bold(), labels.steps.join(" → "));
    println!("{}: {}", "School".bold(), labels.default_school_name);
    println!("{}: {}", "Duration".bold(), labels.exam_time);
    println!("{}: {}", "Marks".bold(), labels.total_marks);
    println!("{}: {}", "Term".bold(), labels.exam_term);
    println!("{}: {}", "Page".bold(), labels.page);

    println!();
    println!("{}", "Classes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for class in labels.classes {
        println!("  {}", class);
    }

    println!();
    println!("{}", "Subjects".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for subject in labels.subjects {
        println!("  {}", subject);
    }
}

fn cmd_version() {
    println!("{} {}", "exampaper".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam paper builder");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/exampaper/exampaper".dimmed()
    );
    println!("License: MIT");
}
