//! Report assembly and rendering.

pub mod assembler;
pub mod chart;
pub mod generator;

pub use assembler::{assemble, AssembleOptions, ReportError};
pub use chart::ChartStyle;
pub use generator::{generate_json_report, generate_markdown_report};
