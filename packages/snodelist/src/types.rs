// Public API types for snodelist.
//
// These types are used by main.rs and exposed via the crate's public API.

use std::path::PathBuf;

use crate::{MachinefileSummary, Template};

/// Environment variable holding the host list of the current job.
pub const JOB_NODELIST_VAR: &str = "SLURM_JOB_NODELIST";

/// Environment variable holding the task counts of the current job, e.g. `2(x3),1`.
pub const TASKS_PER_NODE_VAR: &str = "SLURM_TASKS_PER_NODE";

/// How the host list is displayed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum Mode {
    /// Individual host names separated by a delimiter.
    #[default]
    Expand,

    /// The compact host-list form, e.g. `n[000-003]`.
    Compress,

    /// An MPI-style machine file built from the job's host list and task counts.
    Machinefile,
}

/// Input parameters for the `run` function.
///
/// This is the parsed and validated input that the core logic operates on.
#[doc(hidden)]
#[derive(Clone, Debug)]
#[allow(
    clippy::exhaustive_structs,
    reason = "This is a hidden struct for internal/test use only"
)]
pub struct RunInput {
    /// How the host list is displayed.
    pub mode: Mode,

    /// Environment variables whose values are host-list expressions to include.
    pub include_env: Vec<String>,

    /// Files holding host-list expressions to include, `-` meaning standard input.
    pub nodelists: Vec<PathBuf>,

    /// Host-list expressions given directly.
    pub expressions: Vec<String>,

    /// Sort the host list and remove duplicates (expand and compress modes).
    pub unique: bool,

    /// Text placed between host names in expand mode.
    pub delimiter: String,

    /// Line template for machinefile mode.
    pub format: String,

    /// In machinefile mode, write one line per host even if the template has no count token.
    pub no_repeats: bool,
}

impl Default for RunInput {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            include_env: Vec::new(),
            nodelists: Vec::new(),
            expressions: Vec::new(),
            unique: false,
            delimiter: "\n".to_string(),
            format: Template::DEFAULT.to_string(),
            no_repeats: false,
        }
    }
}

/// The outcome of a successful run.
#[doc(hidden)]
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "This is a hidden enum for internal/test use only"
)]
pub enum RunOutcome {
    /// The host list was displayed in expand or compress mode.
    Listed {
        /// The number of host names in the displayed list.
        hosts: usize,
    },

    /// A machine file was written.
    Machinefile(MachinefileSummary),
}
