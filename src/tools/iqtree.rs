use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tools::runner::{StdoutTarget, ToolError, ToolInvocation, ToolRunner};

/// Options for an IQ-TREE run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IqTreeParams {
    /// Executable name (`iqtree`, `iqtree2`, ...)
    pub program: String,
    /// `-m`: ModelFinder with partition merging by default
    pub model: String,
    /// `-nt`
    pub threads: String,
    /// `-bb`: ultrafast bootstrap replicates
    pub bootstrap: u32,
}

impl Default for IqTreeParams {
    fn default() -> Self {
        Self {
            program: "iqtree".to_string(),
            model: "MFP+MERGE".to_string(),
            threads: "AUTO".to_string(),
            bootstrap: 1000,
        }
    }
}

/// IQ-TREE command run inside `gene_dir`; `alignment` and `partition` are file
/// names relative to it and every output file is named `<prefix>.*`.
#[must_use]
pub fn invocation(
    gene_dir: &Path,
    alignment: &str,
    partition: &str,
    prefix: &str,
    params: &IqTreeParams,
) -> ToolInvocation {
    ToolInvocation::new(params.program.clone())
        .arg("-s")
        .arg(alignment)
        .arg("-sp")
        .arg(partition)
        .arg("-m")
        .arg(&params.model)
        .arg("-nt")
        .arg(&params.threads)
        .arg("-pre")
        .arg(prefix)
        .arg("-bb")
        .arg(params.bootstrap.to_string())
        .current_dir(gene_dir)
        .stdout(StdoutTarget::Discard)
}

/// Infer a partitioned maximum-likelihood tree
///
/// # Errors
///
/// Returns a `ToolError` if IQ-TREE cannot be run or exits unsuccessfully.
pub fn infer_tree(
    runner: &dyn ToolRunner,
    gene_dir: &Path,
    alignment: &str,
    partition: &str,
    prefix: &str,
    params: &IqTreeParams,
) -> Result<(), ToolError> {
    runner
        .run(&invocation(gene_dir, alignment, partition, prefix, params))?
        .check(&params.program)?;
    Ok(())
}
