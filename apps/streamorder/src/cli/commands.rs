//! # CLI Command Implementations
//!
//! File handling, engine dispatch and output for each subcommand.

use serde::Serialize;
use std::path::{Path, PathBuf};
use streamorder_core::primitives::MAX_ARC_COUNT;
use streamorder_core::{
    AdjacencyIndex, ArcId, EngineKind, EngineSettings, Network, NetworkMetrics, NodeId,
    OrderReport, SerializableNetwork, ShreveIterative, StreamOrderError, is_snapshot,
    network_from_bytes, network_to_bytes,
};

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Maximum network input size (500 MB).
const MAX_NETWORK_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Extension that selects the binary snapshot format on output.
pub const SNAPSHOT_EXTENSION: &str = "srn";

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StreamOrderError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StreamOrderError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StreamOrderError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and require a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StreamOrderError> {
    let canonical = path.canonicalize().map_err(|e| {
        StreamOrderError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StreamOrderError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path, which must be a directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, StreamOrderError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        StreamOrderError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(StreamOrderError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| StreamOrderError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn wants_snapshot(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION))
}

/// Load a network, detecting the binary snapshot by its magic bytes and
/// treating anything else as JSON.
pub fn load_network(path: &Path) -> Result<Network, StreamOrderError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_NETWORK_FILE_SIZE)?;

    let bytes = std::fs::read(&path)
        .map_err(|e| StreamOrderError::IoError(format!("Failed to read file: {}", e)))?;

    if is_snapshot(&bytes) {
        return network_from_bytes(&bytes);
    }

    let serializable: SerializableNetwork = serde_json::from_slice(&bytes)
        .map_err(|e| StreamOrderError::DeserializationError(format!("Invalid JSON: {}", e)))?;

    if serializable.arcs.len() > MAX_ARC_COUNT {
        return Err(StreamOrderError::DeserializationError(format!(
            "Arc count {} exceeds maximum {}",
            serializable.arcs.len(),
            MAX_ARC_COUNT
        )));
    }
    Network::try_from(serializable)
}

/// Write a network as a snapshot (`.srn`) or pretty JSON.
pub fn save_network(network: &Network, path: &Path) -> Result<(), StreamOrderError> {
    let path = validate_output_path(path)?;

    let bytes = if wants_snapshot(&path) {
        network_to_bytes(network)?
    } else {
        serde_json::to_vec_pretty(&SerializableNetwork::from(network))
            .map_err(|e| StreamOrderError::SerializationError(e.to_string()))?
    };

    std::fs::write(&path, bytes)
        .map_err(|e| StreamOrderError::IoError(format!("Failed to write file: {}", e)))
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), StreamOrderError> {
    let path = validate_output_path(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StreamOrderError::SerializationError(e.to_string()))?;
    std::fs::write(&path, json)
        .map_err(|e| StreamOrderError::IoError(format!("Failed to write file: {}", e)))
}

/// Build and validate the adjacency index for a loaded network.
fn index_network(network: &Network) -> Result<AdjacencyIndex, StreamOrderError> {
    let adjacency = AdjacencyIndex::from_network(network);
    adjacency.validate(network)?;
    Ok(adjacency)
}

// =============================================================================
// COMPUTE COMMAND
// =============================================================================

/// Resolved arguments of the `compute` command.
#[derive(Debug, Clone)]
pub struct ComputeRequest {
    pub input: PathBuf,
    pub sink: u64,
    pub node: Option<u64>,
    pub engine: EngineKind,
    pub settings: EngineSettings,
    pub output: Option<PathBuf>,
}

/// Run an engine on a network file and return the report.
///
/// The network is recomputed from scratch: orders carried in the input are
/// cleared first.
pub fn run_compute(request: &ComputeRequest) -> Result<(OrderReport, Network), StreamOrderError> {
    let mut network = load_network(&request.input)?;
    network.reset_orders();
    let adjacency = index_network(&network)?;

    let sink = ArcId(request.sink);
    let at_node = match request.node {
        Some(node) => NodeId(node),
        None => network.arc(sink)?.upstream_node,
    };

    tracing::debug!(
        arcs = network.len(),
        nodes = adjacency.node_count(),
        engine = %request.engine,
        rule = %request.settings.confluence_rule,
        "Network indexed"
    );

    let report = match request.engine {
        EngineKind::ShreveIterative => {
            let engine = ShreveIterative::new(request.settings.confluence_rule);
            let outcome = engine.run(&mut network, &adjacency, sink, at_node)?;
            tracing::debug!(
                requeued = outcome.stats.requeued,
                skipped = outcome.stats.skipped,
                max_stack_depth = outcome.stats.max_stack_depth,
                "Iterative traversal finished"
            );
            OrderReport::from_network(
                request.engine.as_str(),
                &network,
                sink,
                at_node,
                outcome.sink_order,
            )
            .with_stats(outcome.stats)
        }
        kind => {
            let engine = kind.build(&request.settings);
            let order = engine.compute(&mut network, &adjacency, sink, at_node)?;
            OrderReport::from_network(engine.name(), &network, sink, at_node, order)
        }
    };

    tracing::info!(
        engine = %report.engine,
        sink = report.sink,
        order = report.sink_order,
        resolved = report.resolved,
        "Orders computed"
    );

    Ok((report, network))
}

/// Compute orders and print or write the result.
pub fn cmd_compute(request: &ComputeRequest, json_mode: bool) -> Result<(), StreamOrderError> {
    let (report, network) = run_compute(request)?;

    match &request.output {
        Some(path) if wants_snapshot(path) => {
            save_network(&network, path)?;
            tracing::info!(path = %path.display(), "Resolved network written");
        }
        Some(path) => {
            write_json(&report, path)?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None if json_mode => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
        None => {
            println!("Stream Orders");
            println!("=============");
            println!("Engine:     {}", report.engine);
            println!("Sink arc:   {}", report.sink);
            println!("Sink node:  {}", report.sink_node);
            println!("Sink order: {}", report.sink_order);
            println!("Resolved:   {} of {} arcs", report.resolved, report.arcs.len());
            if let Some(stats) = &report.stats {
                println!("Requeued:   {}", stats.requeued);
                println!("Skipped:    {}", stats.skipped);
                println!("Max stack:  {}", stats.max_stack_depth);
            }
            println!();
            for entry in report.arcs.iter().filter(|e| e.order.is_some()) {
                println!(
                    "  arc {:>6}  {:>6} -> {:<6}  order {}",
                    entry.index,
                    entry.upstream_node,
                    entry.downstream_node,
                    entry.order.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Load and validate a network, returning its metrics.
pub fn run_inspect(input: &Path) -> Result<NetworkMetrics, StreamOrderError> {
    let network = load_network(input)?;
    let adjacency = index_network(&network)?;
    Ok(NetworkMetrics::from_parts(&network, &adjacency))
}

/// Print network metrics.
pub fn cmd_inspect(input: &Path, json_mode: bool) -> Result<(), StreamOrderError> {
    let metrics = run_inspect(input)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&metrics).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Network");
    println!("=======");
    println!("Arcs:        {}", metrics.arc_count);
    println!("Nodes:       {}", metrics.node_count);
    println!("Headwaters:  {}", metrics.headwater_count);
    println!("Confluences: {}", metrics.confluence_count);
    println!("Outlets:     {}", metrics.outlet_count);
    println!("Resolved:    {}", metrics.resolved_count);
    if let Some(max) = metrics.max_order {
        println!("Max order:   {}", max);
        for (order, count) in &metrics.order_histogram {
            println!("  order {:>4}: {}", order, count);
        }
    }

    Ok(())
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Convert a network between JSON and binary snapshot.
pub fn cmd_convert(input: &Path, output: &Path) -> Result<(), StreamOrderError> {
    let network = load_network(input)?;
    save_network(&network, output)?;

    tracing::info!(
        arcs = network.len(),
        format = if wants_snapshot(output) { "snapshot" } else { "json" },
        path = %output.display(),
        "Network converted"
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
