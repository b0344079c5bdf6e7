/// 批处理流水线 (Processing Pipeline)
///
/// 逐张图像顺序处理, 上一张评估完成后才开始下一张:
/// - 列出图像 → 加载真值 → 校验数量对齐
/// - 每张图像: BoatDetector::process
/// - 汇总为 RunReport (JSON)
pub mod detector;

pub use detector::BoatDetector;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::input::{self, check_alignment, load_ground_truth};
use crate::models::ReplayLog;
use crate::refine_config::RefineConfig;
use crate::MergedDetection;

/// 单张图像的结果, `boxes` 与 `ious` 按下标对齐
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub image: String,
    pub raw_detections: usize,
    pub boxes: Vec<MergedDetection>,
    pub ious: Vec<f64>,
}

/// 整次运行的结果
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub images: Vec<ImageReport>,
    /// 所有最终框 IoU 的平均值, 没有框时为 None
    pub mean_iou: Option<f64>,
}

impl RunReport {
    pub fn new(images: Vec<ImageReport>) -> Self {
        let ious: Vec<f64> = images.iter().flat_map(|r| r.ious.iter().copied()).collect();
        let mean_iou = if ious.is_empty() {
            None
        } else {
            Some(ious.iter().sum::<f64>() / ious.len() as f64)
        };
        Self { images, mean_iou }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("无法写入报告: {}", path))?;
        info!("💾 报告已保存到 {}", path);
        Ok(())
    }
}

/// 处理目录下的全部图像
pub fn run(
    images_dir: &Path,
    ext: &str,
    ground_truth_dir: &Path,
    replay: &ReplayLog,
    config: &RefineConfig,
) -> Result<RunReport> {
    let images = input::list_images(images_dir, ext)?;
    info!("🖼️  图像数量: {}", images.len());

    let ground_truth = load_ground_truth(ground_truth_dir)?;
    check_alignment(images.len(), ground_truth.len())?;
    if ground_truth.len() > images.len() {
        warn!(
            "⚠️  真值多于图像 ({} > {}), 多余部分忽略",
            ground_truth.len(),
            images.len()
        );
    }

    let mut reports = Vec::with_capacity(images.len());
    for (path, truth) in images.iter().zip(&ground_truth) {
        let name = input::image_name(path);
        let image = input::open_image(path)?;
        let detector = BoatDetector::new(
            Box::new(replay.primary(&name)),
            Box::new(replay.verifier(&name)),
            config.clone(),
        );
        reports.push(detector.process(&name, &image, truth)?);
    }

    Ok(RunReport::new(reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn report(ious: Vec<f64>) -> ImageReport {
        ImageReport {
            image: "x.png".to_string(),
            raw_detections: ious.len(),
            boxes: ious
                .iter()
                .map(|_| MergedDetection {
                    rect: Rect::new(0, 0, 1, 1),
                    score: 0.5,
                    members: 1,
                })
                .collect(),
            ious,
        }
    }

    #[test]
    fn test_mean_iou() {
        let run = RunReport::new(vec![report(vec![1.0, 0.0]), report(vec![]), report(vec![0.5])]);
        assert_eq!(run.mean_iou, Some(0.5));
        assert_eq!(RunReport::new(vec![report(vec![])]).mean_iou, None);
    }
}
