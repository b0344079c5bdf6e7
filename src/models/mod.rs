/// 检测器接口 (Detector capability)
///
/// # 架构说明
///
/// 主检测器和二次校验器都是外部引擎, 这里只约定接口:
/// 输入一块灰度图像区域, 输出该区域内的检测框。
/// 后处理流程 (聚类/剪枝/评估) 只依赖 `Detect`, 测试时可换成确定性的假实现。
///
/// ## 坐标约定
/// - `image`: 待检测的像素区域 (整图或裁剪后的子图)
/// - `roi`:   该区域在整图中的位置
/// - 返回的框相对于 `image` 左上角
///
/// ## 实现
/// - **ReplayDetector**: 回放检测器导出的 JSON 结果
///   - 文件: `replay.rs`
use anyhow::Result;
use image::GrayImage;

use crate::{Detection, Rect};

/// 统一的检测器接口
///
/// 剪枝阶段可能在多个线程上同时调用 `detect`, 实现不应修改共享状态
pub trait Detect: Send + Sync {
    /// 检测: 图像区域 → 原始检测框 (分数未归一化)
    fn detect(&self, image: &GrayImage, roi: Rect) -> Result<Vec<Detection>>;
}

pub mod replay;

pub use replay::{ReplayDetector, ReplayLog, ReplayRecord};
