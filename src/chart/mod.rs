//! Chart Renderer
//!
//! Maps derived tables to declarative chart specifications and draws them
//! as standalone SVG.
//!
//! - **spec**: `ChartSpec` and the fixed chart set of each report family
//! - **svg**: SVG drawing for line, bar and pie specs

pub mod spec;
pub mod svg;

pub use spec::{recession_charts, yearly_charts, ChartKind, ChartSpec, Mapping};
pub use svg::render_svg;
