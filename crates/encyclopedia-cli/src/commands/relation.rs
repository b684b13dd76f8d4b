//! Relation commands

use clap::{Args, Subcommand};
use encyclopedia_core::{Cardinality, Relation};

use crate::input::build_relation;
use crate::output::print_output;
use crate::AppContext;

#[derive(Args)]
pub struct RelationArgs {
    #[command(subcommand)]
    pub command: RelationCommands,
}

#[derive(Subcommand)]
pub enum RelationCommands {
    /// Compose two relations (left then right)
    Compose {
        /// Pair of the left relation as DOMAIN=RANGE (repeatable)
        #[arg(short, long)]
        left: Vec<String>,
        /// Pair of the right relation as DOMAIN=RANGE (repeatable)
        #[arg(short, long)]
        right: Vec<String>,
        /// Cardinality of the left relation: 1:1, 1:M, M:1, M:M
        #[arg(long)]
        left_cardinality: Option<Cardinality>,
        /// Cardinality of the right relation
        #[arg(long)]
        right_cardinality: Option<Cardinality>,
    },
    /// Swap the domain and range of a relation
    Invert {
        /// Pair as DOMAIN=RANGE (repeatable)
        #[arg(short, long = "pair")]
        pairs: Vec<String>,
        /// Cardinality: 1:1, 1:M, M:1, M:M
        #[arg(long)]
        cardinality: Option<Cardinality>,
    },
}

fn show(relation: &Relation<String, String>, ctx: &AppContext) -> anyhow::Result<()> {
    print_output(relation, ctx.format, |r| r.to_string())
}

pub fn run(args: &RelationArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let separator = ctx.config.pair_separator.as_str();
    let default = ctx.config.cardinality;

    match &args.command {
        RelationCommands::Compose {
            left,
            right,
            left_cardinality,
            right_cardinality,
        } => {
            let left = build_relation(left, separator, left_cardinality.unwrap_or(default))?;
            let right = build_relation(right, separator, right_cardinality.unwrap_or(default))?;
            tracing::debug!(
                "Composing {} with {}",
                left.cardinality(),
                right.cardinality()
            );
            show(&left.compose_relation(&right), ctx)?;
        }
        RelationCommands::Invert { pairs, cardinality } => {
            let relation = build_relation(pairs, separator, cardinality.unwrap_or(default))?;
            show(&relation.invert(), ctx)?;
        }
    }
    Ok(())
}
