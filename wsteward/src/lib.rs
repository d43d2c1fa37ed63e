//! Steward phase: decision prompting, tolerant parsing, and hand-off to the router.
//!
//! A language model is shown the capability catalog and asked for a JSON
//! decision. The decision is parsed without ever failing, converted into
//! tool call requests, and executed by a [`wrouter::ToolRouter`]. The
//! resulting evidence can be rendered back into prompt text for the
//! deliberation stage.

mod decision;
mod error;
mod hooks;
mod parser;
mod phase;
mod prompt;

pub mod prelude {
    pub use crate::{
        Decision, StewardAction, StewardError, StewardHooks, StewardModel, StewardPhase,
        StewardReport, parse_steward_output, render_evidence_section, render_steward_prompt,
    };
}

pub use decision::{
    Decision, JSON_DECODE_ERROR, MISSING_ACTION_FIELD, MODEL_UNAVAILABLE, OUTPUT_PARSING_FAILED,
    PARSER_UNEXPECTED_ERROR, SkippedCall, StewardAction,
};
pub use error::{StewardError, StewardErrorKind};
pub use hooks::{NoopStewardHooks, StewardHooks};
pub use parser::parse_steward_output;
pub use phase::{StewardFuture, StewardModel, StewardPhase, StewardReport};
pub use prompt::{
    EVIDENCE_HEADER, render_deliberation_prompt, render_evidence_section, render_steward_prompt,
};
