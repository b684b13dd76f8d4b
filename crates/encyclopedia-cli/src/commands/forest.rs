//! Forest commands

use std::path::PathBuf;

use clap::{Args, Subcommand};
use encyclopedia_core::{Forest, Node, Operand};
use serde::Serialize;

use crate::input::{build_forest, read_lines};
use crate::output::print_output;
use crate::AppContext;

#[derive(Args)]
pub struct ForestArgs {
    #[command(subcommand)]
    pub command: ForestCommands,
}

/// Where the forest comes from
#[derive(Args, Debug, Clone)]
pub struct ForestInput {
    /// Edge as PARENT>CHILD (repeatable); unknown parents start a new tree
    #[arg(short, long = "edge")]
    pub edges: Vec<String>,

    /// Extra root alias (repeatable)
    #[arg(short, long = "tree")]
    pub trees: Vec<String>,

    /// File with one edge per line ('#' starts a comment)
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Drop structurally duplicate trees before running the command
    #[arg(long)]
    pub prune: bool,
}

#[derive(Subcommand)]
pub enum ForestCommands {
    /// Print the forest
    Show {
        #[command(flatten)]
        input: ForestInput,
    },
    /// Summary statistics
    Stats {
        #[command(flatten)]
        input: ForestInput,
    },
    /// Leaves reachable from an alias
    Leaves {
        alias: String,
        #[command(flatten)]
        input: ForestInput,
    },
    /// Roots of the trees holding an alias
    Root {
        alias: String,
        #[command(flatten)]
        input: ForestInput,
    },
    /// Ancestor chain of an alias
    Limb {
        alias: String,
        #[command(flatten)]
        input: ForestInput,
    },
    /// Subforest rooted at an alias
    Cut {
        alias: String,
        /// Shift every node id by this amount
        #[arg(long, default_value = "0")]
        offset: u64,
        #[command(flatten)]
        input: ForestInput,
    },
    /// Forest without structurally duplicate trees
    Prune {
        #[command(flatten)]
        input: ForestInput,
    },
    /// N disjoint copies of the forest
    Scale {
        times: usize,
        #[command(flatten)]
        input: ForestInput,
    },
}

#[derive(Debug, Serialize)]
pub struct ForestStats {
    pub trees: usize,
    pub nodes: usize,
    pub aliases: usize,
    pub height: Option<usize>,
    pub canopy: usize,
    pub counter: u64,
}

impl ForestStats {
    fn of(forest: &Forest) -> Self {
        Self {
            trees: forest.trees().count(),
            nodes: forest.len(),
            aliases: forest.keys().count(),
            height: forest.height(),
            canopy: forest.canopy().len(),
            counter: forest.counter(),
        }
    }
}

fn load(input: &ForestInput, ctx: &AppContext) -> anyhow::Result<Forest> {
    let mut edges = match &input.from {
        Some(path) => read_lines(path)?,
        None => Vec::new(),
    };
    edges.extend(input.edges.iter().cloned());

    let forest = build_forest(&input.trees, &edges, &ctx.config.edge_separator)?;
    if input.prune || ctx.config.prune {
        return Ok(forest.prune());
    }
    Ok(forest)
}

fn show(forest: &Forest, ctx: &AppContext) -> anyhow::Result<()> {
    print_output(&forest.snapshot(), ctx.format, |_| forest.to_string())
}

fn list<'a>(nodes: impl IntoIterator<Item = &'a Node<String>>, ctx: &AppContext) -> anyhow::Result<()> {
    let nodes: Vec<&Node<String>> = nodes.into_iter().collect();
    print_output(&nodes, ctx.format, |nodes| {
        nodes
            .iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub fn run(args: &ForestArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        ForestCommands::Show { input } => {
            let forest = load(input, ctx)?;
            show(&forest, ctx)?;
        }
        ForestCommands::Stats { input } => {
            let forest = load(input, ctx)?;
            let stats = ForestStats::of(&forest);
            print_output(&stats, ctx.format, |s| {
                let height = s.height.map_or_else(|| "-".to_string(), |h| h.to_string());
                format!(
                    "trees:   {}\nnodes:   {}\naliases: {}\nheight:  {}\ncanopy:  {}",
                    s.trees, s.nodes, s.aliases, height, s.canopy
                )
            })?;
        }
        ForestCommands::Leaves { alias, input } => {
            let forest = load(input, ctx)?;
            list(&forest.leaves(alias.as_str())?, ctx)?;
        }
        ForestCommands::Root { alias, input } => {
            let forest = load(input, ctx)?;
            list(&forest.root(alias.as_str())?, ctx)?;
        }
        ForestCommands::Limb { alias, input } => {
            let forest = load(input, ctx)?;
            show(&forest.limb(alias.as_str(), 0)?, ctx)?;
        }
        ForestCommands::Cut { alias, offset, input } => {
            let forest = load(input, ctx)?;
            show(&forest.cutting(alias.as_str(), *offset, None)?, ctx)?;
        }
        ForestCommands::Prune { input } => {
            let forest = load(input, ctx)?;
            let pruned = forest.prune();
            tracing::info!("Pruned {} nodes", forest.len() - pruned.len());
            show(&pruned, ctx)?;
        }
        ForestCommands::Scale { times, input } => {
            let forest = load(input, ctx)?;
            show(&forest.compose(Operand::Scale(*times))?, ctx)?;
        }
    }
    Ok(())
}
