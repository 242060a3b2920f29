// Collaborator boundary: command parsing, the async engine facade and reply rendering
pub mod analysis_service;
pub mod command;
pub mod render;

pub use analysis_service::AnalysisEngine;
pub use command::Command;
pub use render::{ParseMode, RenderedReply};
