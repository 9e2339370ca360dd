//! # lottie-inspect
//!
//! Command-line front end for `lottie-data`.
//!
//! ## Commands
//! - `decode`: Print a summary and the layer tree of one file
//! - `compare`: Run both decoders on each file and report any divergence

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lottie_data::model::{Layer, LayerIndex, LayerKind};
use lottie_data::{
    AnimationDocument, DecodeStrategy, Equivalence, Harness, RandomIndices, SequentialIndices,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lottie-inspect")]
#[command(about = "Decode Lottie animations and cross-check both decoders")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one file and print its layer tree
    Decode {
        /// Path to the Lottie JSON file
        file: PathBuf,

        /// Decoder to run
        #[arg(short, long, value_enum, default_value_t = Strategy::Structured)]
        strategy: Strategy,

        /// Number missing layer indices from this value instead of randomly
        #[arg(long)]
        seed: Option<i64>,
    },

    /// Decode each file with both decoders and compare the results
    Compare {
        /// Lottie JSON files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// First generated index handed to both decoders
        #[arg(long, default_value_t = 0)]
        seed: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Structured,
    Dynamic,
}

impl From<Strategy> for DecodeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Structured => DecodeStrategy::Structured,
            Strategy::Dynamic => DecodeStrategy::Dynamic,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            file,
            strategy,
            seed,
        } => cmd_decode(&file, strategy.into(), seed),
        Commands::Compare { files, seed } => cmd_compare(&files, seed),
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(file = %path.display(), bytes = bytes.len(), "read input");
    Ok(bytes)
}

fn cmd_decode(file: &Path, strategy: DecodeStrategy, seed: Option<i64>) -> Result<()> {
    let bytes = read(file)?;
    let decoded = match seed {
        Some(first) => {
            lottie_data::decode(&bytes, strategy, &mut SequentialIndices::starting_at(first))
        }
        None => lottie_data::decode(&bytes, strategy, &mut RandomIndices::new()),
    };
    let doc = decoded.with_context(|| format!("Failed to decode {}", file.display()))?;

    print_summary(file, strategy, &doc);
    Ok(())
}

fn print_summary(file: &Path, strategy: DecodeStrategy, doc: &AnimationDocument) {
    println!("{} ({} decoder)", file.display(), strategy);
    println!("========================================");
    println!("  version:  {}", doc.version());
    println!("  canvas:   {} x {}", doc.width(), doc.height());
    println!(
        "  frames:   {} to {} at {} fps",
        doc.start_frame(),
        doc.end_frame(),
        doc.framerate()
    );
    if let Some(lib) = doc.asset_library() {
        println!(
            "  assets:   {} precomps, {} images",
            lib.precomps().count(),
            lib.images().count()
        );
    }
    if let Some(fonts) = doc.fonts() {
        println!("  fonts:    {}", fonts.fonts.len());
    }
    if let Some(glyphs) = doc.glyphs() {
        println!("  glyphs:   {}", glyphs.len());
    }

    println!("\nLayers ({}):", doc.layers().len());
    print_layer_tree(doc.layers());

    for precomp in doc.asset_library().into_iter().flat_map(|lib| lib.precomps()) {
        println!("\nPrecomp `{}` ({}):", precomp.id, precomp.layers.len());
        print_layer_tree(&precomp.layers);
    }

    if let Some(markers) = doc.markers() {
        println!("\nMarkers:");
        for marker in markers {
            println!(
                "  • {} at frame {} for {}",
                marker.name, marker.frame, marker.duration
            );
        }
    }
}

/// Children are printed under the layer their `parent` points at. Layers
/// whose parent is missing, or caught in a parent cycle, print at the top.
fn print_layer_tree(layers: &[Layer]) {
    for (depth, i) in layer_tree(layers) {
        println!("{}• {}", "  ".repeat(depth), describe(&layers[i]));
    }
}

/// Depth-first `(depth, position)` order of `layers`, walked with an explicit
/// stack so long parent chains cannot exhaust the call stack.
fn layer_tree(layers: &[Layer]) -> Vec<(usize, usize)> {
    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, layer) in layers.iter().enumerate() {
        if let Some(parent) = layer.parent {
            children.entry(parent).or_default().push(i);
        }
    }
    let indices: HashSet<i64> = layers.iter().map(|l| l.index.value()).collect();
    let roots = layers
        .iter()
        .enumerate()
        .filter(|(_, l)| l.parent.map_or(true, |p| !indices.contains(&p)))
        .map(|(i, _)| i);

    let mut visited = vec![false; layers.len()];
    let mut order = Vec::with_capacity(layers.len());
    for root in roots.chain(0..layers.len()) {
        let mut stack = vec![(1, root)];
        while let Some((depth, i)) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            order.push((depth, i));

            if let Some(kids) = children.get(&layers[i].index.value()) {
                stack.extend(kids.iter().rev().map(|&child| (depth + 1, child)));
            }
        }
    }
    order
}

fn describe(layer: &Layer) -> String {
    let index = match layer.index {
        LayerIndex::Declared(i) => format!("#{i}"),
        LayerIndex::Generated(i) => format!("~{i}"),
    };
    let detail = match &layer.kind {
        LayerKind::PreComp(content) => format!(" -> {}", content.reference_id),
        LayerKind::Solid(content) => format!(" {}", content.color),
        LayerKind::Image(content) => format!(" -> {}", content.reference_id),
        LayerKind::Shape(content) => format!(" {} items", content.items.len()),
        LayerKind::Unknown { tag } => format!(" tag {tag}"),
        LayerKind::Null | LayerKind::Text(_) => String::new(),
    };
    let hidden = if layer.hidden { " [hidden]" } else { "" };

    format!(
        "{index} {} ({}{detail}){hidden}",
        layer.name,
        layer.layer_type().name()
    )
}

fn cmd_compare(files: &[PathBuf], seed: i64) -> Result<()> {
    let harness = Harness::new().with_seed(seed);
    let mut diverged = 0;

    println!("Comparing structured and dynamic decoders:");
    println!("==========================================");
    for file in files {
        let bytes = read(file)?;
        match harness.check(&bytes) {
            Equivalence::Agree(doc) => {
                println!("  ✓ {} ({} layers)", file.display(), doc.layers().len())
            }
            Equivalence::BothFailed { structured, .. } => {
                println!("  ✓ {} (both rejected: {})", file.display(), structured)
            }
            Equivalence::Diverged(divergence) => {
                diverged += 1;
                println!("  ✗ {}: {}", file.display(), divergence.first_difference);
            }
        }
    }

    println!("\n{} of {} files agree", files.len() - diverged, files.len());
    if diverged > 0 {
        bail!("{diverged} file(s) decoded differently");
    }
    Ok(())
}
