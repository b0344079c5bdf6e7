// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 命令行参数
pub mod detection; // 检测后处理: 聚类、剪枝、精度评估
pub mod error; // 错误类型
pub mod input; // 图像与真值输入
pub mod models; // 检测器接口与回放实现
pub mod pipeline; // 逐图像处理流水线
pub mod refine_config; // 后处理参数配置

pub use crate::config::Args;
pub use crate::detection::{Detection, IouMode, MatchPolicy, MergedDetection, Rect};
pub use crate::error::RefineError;
pub use crate::models::{Detect, ReplayDetector, ReplayLog};
pub use crate::pipeline::{BoatDetector, ImageReport, RunReport};
pub use crate::refine_config::RefineConfig;

/// 把检测器的原始分数映射到 [0,1]
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

pub fn gen_time_string(delimiter: &str) -> String {
    let t_now = chrono::Local::now();
    let fmt = format!(
        "%Y{}%m{}%d{}%H{}%M{}%S",
        delimiter, delimiter, delimiter, delimiter, delimiter
    );
    t_now.format(&fmt).to_string()
}
