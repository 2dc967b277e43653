use std::path::Path;

use crate::tools::runner::{StdoutTarget, ToolError, ToolInvocation, ToolRunner};

pub const PROGRAM: &str = "mafft";

/// `mafft --auto <input>` with the alignment written to `output`
#[must_use]
pub fn invocation(input: &Path, output: &Path) -> ToolInvocation {
    ToolInvocation::new(PROGRAM)
        .arg("--auto")
        .arg(input)
        .stdout(StdoutTarget::File(output.to_path_buf()))
}

/// Align `input` into `output`
///
/// # Errors
///
/// Returns a `ToolError` if mafft cannot be run or exits unsuccessfully.
pub fn align(runner: &dyn ToolRunner, input: &Path, output: &Path) -> Result<(), ToolError> {
    runner.run(&invocation(input, output))?.check(PROGRAM)?;
    Ok(())
}
