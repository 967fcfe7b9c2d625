//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use sweepa_core::prelude::*;
//! ```

// Core analysis types
pub use crate::analyzer::{AnalysisReport, Sweepa};
pub use crate::error::{SweepaError, SweepaResult};
pub use crate::issues::{Confidence, Issue, IssueKind};

// Facade
pub use crate::facade::{CompilerFacade, MemoryFacade, ModuleFacts, ProgramSnapshot};

// Configuration
pub use crate::config::{load_config, SweepaConfig};

// Baseline protocol
pub use crate::baseline::{create_baseline, filter_issues, load_baseline, save_baseline, Baseline};

// Fixers
pub use crate::fixers::{move_dependencies, remove_dependencies, FixResult};

// Reporting
pub use crate::report::{print_json, print_plain};
