use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medusa_align::ScoringWeights;
use medusa_core::{MedusaError, Summarizable};
use medusa_profile::engine::{ProfileEngine, ProfileOptions};
use medusa_profile::matching::{AlignmentBlock, Correspondence, SourceRef};
use medusa_profile::persist::write_matrix_report;
use medusa_profile::render::{RenderOptions, SvgRenderer};
use medusa_profile::secondary::Square;
use medusa_struct::pdb::parse_pdb_file;
use medusa_struct::types::Model;

mod config;

use config::{RunConfig, StructureEntry};

#[derive(Debug, Parser)]
#[command(name = "medusa", version, about = "Deformation profiles for biomolecular conformers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full profile job from a TOML config file.
    Run(RunArgs),
    /// Compare two structures with inferred correspondence and defaults.
    Quick(QuickArgs),
    /// Print the models, chains, and residues of a structure file.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Path to the run configuration.
    #[arg(short, long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct QuickArgs {
    /// Reference structure file.
    reference: PathBuf,
    /// Comparison structure file.
    comparison: PathBuf,
    /// Directory for the .dat and .svg outputs.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Structure file to describe.
    path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Run(args) => run(&args.config),
        Commands::Quick(args) => quick(&args),
        Commands::Inspect(args) => inspect(&args.path),
    }
}

fn run(config_path: &Path) -> Result<()> {
    let cfg = RunConfig::load(config_path)?;
    cfg.validate()?;

    let comparisons = cfg.resolve_comparisons()?;
    let blocks = cfg.alignment_blocks()?;
    let squares = cfg.squares()?;

    let job = Job {
        out_dir: cfg.out_dir.clone(),
        reference: cfg.reference.clone(),
        blocks,
        squares,
        options: ProfileOptions {
            normalize: cfg.normalize,
        },
        render: RenderOptions::for_normalization(cfg.normalize),
        save_matrix: cfg.output.matrix,
        save_svg: cfg.output.svg,
    };
    job.run(&comparisons)
}

fn quick(args: &QuickArgs) -> Result<()> {
    let job = Job {
        out_dir: args.out_dir.clone(),
        reference: StructureEntry {
            path: args.reference.clone(),
            model: 0,
        },
        blocks: Vec::new(),
        squares: Vec::new(),
        options: ProfileOptions::default(),
        render: RenderOptions::default(),
        save_matrix: true,
        save_svg: true,
    };
    job.run(&[StructureEntry {
        path: args.comparison.clone(),
        model: 0,
    }])
}

/// One reference compared against each comparison in turn.
struct Job {
    out_dir: PathBuf,
    reference: StructureEntry,
    blocks: Vec<AlignmentBlock>,
    squares: Vec<Square>,
    options: ProfileOptions,
    render: RenderOptions,
    save_matrix: bool,
    save_svg: bool,
}

impl Job {
    fn run(&self, comparisons: &[StructureEntry]) -> Result<()> {
        tracing::info!(path = %self.reference.path.display(), "opening reference file");
        let ref_structure = parse_pdb_file(&self.reference.path)?;
        let ref_model = select_model(&ref_structure.models, &self.reference)?;
        let ref_source = source_ref(&self.reference);

        for entry in comparisons {
            tracing::info!(path = %entry.path.display(), "opening comparison file");
            let cmp_structure = parse_pdb_file(&entry.path)?;
            let cmp_model = select_model(&cmp_structure.models, entry)?;

            let correspondence = if self.blocks.is_empty() {
                Correspondence::inferred(
                    ref_model,
                    cmp_model,
                    &ScoringWeights::default(),
                    ref_source.clone(),
                    source_ref(entry),
                )
            } else {
                Correspondence::from_blocks(
                    ref_model,
                    cmp_model,
                    &self.blocks,
                    ref_source.clone(),
                    source_ref(entry),
                )?
            };

            if let Err(e) = correspondence.check_composition() {
                tracing::warn!("{e}");
            }
            println!("{}", correspondence.table());

            tracing::info!(pairs = correspondence.len(), "comparing models");
            let engine =
                ProfileEngine::new(&correspondence, self.squares.clone(), self.options);
            let profile = engine.compute()?;

            if self.save_matrix {
                let path = self.output_path(&entry.path, "dat");
                tracing::info!(path = %path.display(), "saving data file");
                write_matrix_report(&path, &correspondence, &profile)?;
            }
            if self.save_svg {
                let path = self.output_path(&entry.path, "svg");
                tracing::info!(path = %path.display(), "saving svg file");
                let svg = SvgRenderer::new(&profile, &correspondence, self.render.clone())
                    .render()?;
                std::fs::write(&path, svg)?;
            }
        }

        Ok(())
    }

    /// Output path: the comparison file's name, minus a `.pdb` extension,
    /// plus the new extension, under the output directory.
    fn output_path(&self, cmp_path: &Path, extension: &str) -> PathBuf {
        let name = cmp_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "profile".into());
        let stem = name.strip_suffix(".pdb").unwrap_or(&name);
        self.out_dir.join(format!("{stem}.{extension}"))
    }
}

fn source_ref(entry: &StructureEntry) -> SourceRef {
    SourceRef::new(entry.path.display().to_string(), entry.model)
}

fn select_model<'a>(models: &'a [Model], entry: &StructureEntry) -> Result<&'a Model> {
    models.get(entry.model).ok_or_else(|| {
        MedusaError::Config(format!(
            "no model '{}' in structure file '{}'",
            entry.model,
            entry.path.display()
        ))
        .into()
    })
}

fn inspect(path: &Path) -> Result<()> {
    let structure = parse_pdb_file(path)?;
    println!("{}", structure.summary());

    for (index, model) in structure.models.iter().enumerate() {
        println!(
            "  model {} (serial {}, {} chain(s)):",
            index,
            model.serial,
            model.chains.len()
        );
        for chain in &model.chains {
            println!("    chain '{}' ({} residues):", chain.id, chain.residue_count());
            let mut ids = String::new();
            let mut names = String::new();
            for residue in &chain.residues {
                ids.push_str(&format!("{:>4} ", residue.seq_num));
                names.push_str(&format!("{:>4} ", residue.name));
            }
            println!("      {ids}\n      {names}");
        }
    }
    Ok(())
}
