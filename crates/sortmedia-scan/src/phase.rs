//! Run phases.

use strum::Display;

/// The phases of one sorting run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RunPhase {
    /// Validating the source root and resolving the directory policy.
    Initializing,
    /// Transferring no-process roots wholesale.
    ProcessingNoProcessRoots,
    /// Visiting every file under the source root.
    WalkingTree,
    /// Reporting totals.
    Finalizing,
}
