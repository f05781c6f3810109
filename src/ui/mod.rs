pub mod plain;
pub mod renderer;

pub use plain::{resolve_color_enabled, OutputMode, PlainRenderer, Theme};
pub use renderer::{
    KeyValue, MessageBlock, NoticeLevel, Renderer, StepState, SummaryCounts, TableSpec, UiError,
    UiResult,
};
