//! Configuration for org-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::org::snapshot::DEFAULT_PAGE_SIZE;
use crate::tree::render::{NodeFormat, DEFAULT_NODE_FORMAT};
use crate::walker::coordinator::{TraverseOptions, DEFAULT_WORKER_COUNT};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 64;

/// Minimum poll timeout in milliseconds
const MIN_POLL_TIMEOUT_MS: u64 = 10;

/// Parallel AWS Organizations hierarchy walker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "org-walker",
    version,
    about = "Walk an AWS Organizations hierarchy and print it as a tree, JSON, or DOT graph",
    long_about = "Walks an organization snapshot with a pool of worker threads, discovering\n\
                  roots, organizational units, and accounts through paginated listings, and\n\
                  renders the hierarchy in the requested format.",
    after_help = "EXAMPLES:\n    \
        org-walker org.json\n    \
        org-walker org.json --tree-format json-flat\n    \
        org-walker org.json --node-name-format '{Name} <{Email}>' -w 8\n    \
        org-walker org.json --tree-format dot | dot -Tpng -o org.png"
)]
pub struct CliArgs {
    /// Organization snapshot file (JSON)
    #[arg(value_name = "SNAPSHOT")]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = TreeFormat::TextTree, value_name = "FORMAT")]
    pub tree_format: TreeFormat,

    /// Node label template over provider attributes (Id, Arn, Name, Email, ...)
    #[arg(long, default_value = DEFAULT_NODE_FORMAT, value_name = "TEMPLATE")]
    pub node_name_format: String,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKER_COUNT, value_name = "NUM")]
    pub workers: usize,

    /// Idle dequeue wait before a worker re-checks shutdown (milliseconds)
    #[arg(long, default_value = "500", value_name = "MS")]
    pub poll_timeout_ms: u64,

    /// Page size the snapshot source serves listings with
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_name = "NUM")]
    pub page_size: usize,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Output format for the walked hierarchy
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    /// Indented text tree, one line per node
    TextTree,
    /// Level-ordered JSON array of nodes, each with a Parent id
    JsonFlat,
    /// Nested JSON with Children arrays
    JsonTree,
    /// Graphviz DOT of the parent/child graph
    Dot,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Snapshot input path
    pub input: PathBuf,

    /// Output format
    pub tree_format: TreeFormat,

    /// Parsed node label template
    pub node_format: NodeFormat,

    /// Number of worker threads
    pub worker_count: usize,

    /// Worker idle poll timeout
    pub poll_timeout: Duration,

    /// Snapshot page size
    pub page_size: usize,

    /// Verbose logging
    pub verbose: bool,
}

impl WalkConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        if args.poll_timeout_ms < MIN_POLL_TIMEOUT_MS {
            return Err(ConfigError::InvalidPollTimeout {
                millis: args.poll_timeout_ms,
                min: MIN_POLL_TIMEOUT_MS,
            });
        }

        if args.page_size == 0 {
            return Err(ConfigError::InvalidPageSize {
                size: args.page_size,
            });
        }

        let node_format = NodeFormat::parse(&args.node_name_format)?;

        Ok(Self {
            input: args.input,
            tree_format: args.tree_format,
            node_format,
            worker_count: args.workers,
            poll_timeout: Duration::from_millis(args.poll_timeout_ms),
            page_size: args.page_size,
            verbose: args.verbose,
        })
    }

    /// Engine options derived from this configuration
    pub fn traverse_options(&self) -> TraverseOptions {
        TraverseOptions {
            worker_count: self.worker_count,
            poll_timeout: self.poll_timeout,
        }
    }
}
