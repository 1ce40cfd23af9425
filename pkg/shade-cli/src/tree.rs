use std::path::{Path, PathBuf};

use clap::Subcommand;
use eyre::{bail, eyre, WrapErr};
use serde::Serialize;
use shade_primitives::Element;
use shade_tree::{root_of_leaves, zero_hash, MerklePath, DEFAULT_DEPTH, MAX_DEPTH};
use shade_vault::DepositEvent;

#[derive(Debug, Subcommand)]
pub enum TreeCommand {
    /// Print the root of an empty subtree at each level
    Zeros {
        /// The highest level to print
        #[arg(
            long,
            default_value_t = DEFAULT_DEPTH as u64,
            value_parser = clap::value_parser!(u64).range(..=MAX_DEPTH as u64),
        )]
        depth: u64,
    },
    /// Recompute the root of the tree from a deposit log
    Root {
        /// A JSON array of deposit events
        #[arg(long)]
        log: PathBuf,
    },
}

#[derive(Debug, Serialize)]
pub struct ZeroLevel {
    pub level: usize,
    pub value: Element,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRoot {
    pub root: Element,
    pub leaf_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOutput {
    pub root: Element,
    pub commitment: Element,
    #[serde(flatten)]
    pub path: MerklePath<DEFAULT_DEPTH>,
}

/// The zero hashes for levels `0..=depth`, stopping early at [`MAX_DEPTH`]
pub fn zeros(depth: usize) -> Vec<ZeroLevel> {
    (0..=depth)
        .map_while(|level| {
            Some(ZeroLevel {
                level,
                value: zero_hash(level)?,
            })
        })
        .collect()
}

pub fn run(command: TreeCommand) -> eyre::Result<serde_json::Value> {
    let value = match command {
        TreeCommand::Zeros { depth } => serde_json::to_value(zeros(usize::try_from(depth)?))?,
        TreeCommand::Root { log } => {
            let leaves = read_log(&log)?;
            serde_json::to_value(TreeRoot {
                root: root_of_leaves::<DEFAULT_DEPTH>(&leaves)?,
                leaf_count: leaves.len(),
            })?
        }
    };

    Ok(value)
}

/// Rebuild the authentication path of `commitment` from the ordered leaves
pub fn path(leaves: &[Element], commitment: Element) -> eyre::Result<PathOutput> {
    let index = leaves
        .iter()
        .position(|leaf| *leaf == commitment)
        .ok_or_else(|| eyre!("commitment {commitment} is not in the deposit log"))?;

    let path = MerklePath::from_leaves(leaves, index as u64)?;
    let root = path.compute_root(commitment);
    tracing::debug!(%root, index, "rebuilt path");

    Ok(PathOutput {
        root,
        commitment,
        path,
    })
}

/// Read a deposit log and return its commitments in leaf order
pub fn read_log(path: &Path) -> eyre::Result<Vec<Element>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let events: Vec<DepositEvent> =
        serde_json::from_str(&json).wrap_err("failed to parse the deposit log")?;

    leaves_from_log(events)
}

fn leaves_from_log(mut events: Vec<DepositEvent>) -> eyre::Result<Vec<Element>> {
    events.sort_by_key(|event| event.leaf_index);

    for (expected, event) in (0u64..).zip(&events) {
        if event.leaf_index != expected {
            bail!("the deposit log has no leaf {expected}");
        }
    }

    Ok(events.into_iter().map(|event| event.commitment).collect())
}
