use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grit::assignment::{GoalAssignment, RENDER_HINT};
use grit::layout::LayoutEngine;
use grit::serializer::serialize;
use grit::store::{DEFAULT_DB_FILE, SqliteStore};
use grit::svg::SvgRenderer;
use grit::tree::GoalTree;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grit", version, about = "Build, store and render goal trees")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a goal tree from a goal file, or from the database when no file is given
    Render {
        input: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_DB_FILE)]
        db: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Format::Svg)]
        format: Format,
    },
    /// Parse a goal file and store it, replacing what was stored before
    Save {
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_DB_FILE)]
        db: PathBuf,
    },
    /// Print the stored goals in goal notation
    Show {
        #[arg(long, default_value = DEFAULT_DB_FILE)]
        db: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    /// Node positions as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Render {
            input,
            db,
            output,
            format,
        } => run_render(input.as_deref(), &db, output.as_deref(), format),
        Commands::Save { input, db } => run_save(&input, &db),
        Commands::Show { db } => run_show(&db),
    }
}

fn read_goals(path: &Path) -> Result<GoalAssignment> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    grit::parser::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

fn open_store(db: &Path) -> Result<SqliteStore> {
    SqliteStore::open(db).with_context(|| format!("Failed to open database {}", db.display()))
}

fn run_render(input: Option<&Path>, db: &Path, output: Option<&Path>, format: Format) -> Result<()> {
    let assignment = match input {
        Some(path) => read_goals(path)?,
        None => open_store(db)?.load().context("Failed to load goals")?,
    };

    if !assignment.is_renderable() {
        eprintln!("{}", RENDER_HINT);
        return Ok(());
    }

    let tree = GoalTree::build(&assignment)?;
    let layout = LayoutEngine::default().layout(&tree);

    let rendered = match format {
        Format::Svg => SvgRenderer::default().render(&tree, &layout),
        Format::Json => serde_json::to_string_pretty(&layout.placements(&tree))? + "\n",
    };

    match output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn run_save(input: &Path, db: &Path) -> Result<()> {
    let assignment = read_goals(input)?;
    let unassigned = assignment.unassigned_low_goals();
    if !unassigned.is_empty() {
        log::warn!(
            "{} low goal(s) not linked to a mid goal will not be stored: {}",
            unassigned.len(),
            unassigned.join(", ")
        );
    }
    open_store(db)?
        .save(&assignment)
        .context("Failed to save goals")?;
    Ok(())
}

fn run_show(db: &Path) -> Result<()> {
    let assignment = open_store(db)?.load().context("Failed to load goals")?;
    print!("{}", serialize(&assignment));
    Ok(())
}
