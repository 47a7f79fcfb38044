//! 翻译管道模块
//!
//! 标注 → 遍历 → 提取 → 批次翻译 → 回写 → 清理标注

pub mod batch;
pub mod bypass;
pub mod collector;
pub mod reassembler;
pub mod walker;

pub use batch::{select_strategy, BatchOutcome, BatchStrategy, Batched, RunFailure, Unbatched};
pub use bypass::{AnnotationStats, BypassAnnotator};
pub use collector::{Granularity, Run, RunExtractor};
pub use reassembler::{normalize_segment, NodeWrite, Reassembler};
pub use walker::{TreeWalker, WalkStats};
