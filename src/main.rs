//! org-walker - Parallel AWS Organizations Hierarchy Walker
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use org_walker::config::{CliArgs, TreeFormat, WalkConfig};
use org_walker::graph::OrgGraphBuilder;
use org_walker::org::{OrgApi, OrgChildSource, OrgNode, OrgRootSource, SnapshotOrg};
use org_walker::tree::{render_text_tree, to_flat_json, to_nested_json, OrgTree, OrgTreeBuilder};
use org_walker::walker::{Traversal, TraversalReport};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let config = WalkConfig::from_args(args).context("Invalid configuration")?;

    let api = Arc::new(
        SnapshotOrg::from_json_file(&config.input)
            .with_context(|| format!("Failed to load snapshot '{}'", config.input.display()))?
            .with_page_size(config.page_size),
    );
    let roots = OrgRootSource::new(Arc::clone(&api));
    let children = OrgChildSource::new(api);

    let traversal = Traversal::new(config.traverse_options());

    // Ctrl-C cancels the walk; whatever was discovered so far still renders
    let cancel = traversal.cancel_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        cancel.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let output = match config.tree_format {
        TreeFormat::Dot => {
            let builder = OrgGraphBuilder::new();
            let report = traversal
                .run(&roots, &children, &builder)
                .context("Traversal failed")?;
            report_outcome(&report);
            builder.into_graph().to_dot()
        }
        TreeFormat::TextTree => {
            let tree = walk_tree(&traversal, &roots, &children)?;
            render_text_tree(&tree, &config.node_format)
        }
        TreeFormat::JsonFlat => {
            let tree = walk_tree(&traversal, &roots, &children)?;
            to_flat_json(&tree).context("Failed to serialize tree")?
        }
        TreeFormat::JsonTree => {
            let tree = walk_tree(&traversal, &roots, &children)?;
            to_nested_json(&tree).context("Failed to serialize tree")?
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

/// Walk the hierarchy into a tree, logging any abandoned subtrees.
fn walk_tree<A: OrgApi>(
    traversal: &Traversal,
    roots: &OrgRootSource<A>,
    children: &OrgChildSource<A>,
) -> Result<OrgTree> {
    let builder = OrgTreeBuilder::new();
    let report = traversal
        .run(roots, children, &builder)
        .context("Traversal failed")?;
    report_outcome(&report);
    Ok(builder.into_tree())
}

fn report_outcome(report: &TraversalReport<OrgNode>) {
    if !report.completed {
        warn!("traversal was interrupted before completion");
    }
    for failure in &report.failures {
        warn!(
            node = failure.node.id(),
            stage = %failure.stage,
            error = %failure.error,
            "subtree abandoned"
        );
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("org_walker=debug,warn")
    } else {
        EnvFilter::new("org_walker=info,warn")
    };

    // Logs go to stderr; stdout carries the rendered output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
