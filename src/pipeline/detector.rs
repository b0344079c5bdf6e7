//! 船只检测器 (BoatDetector)
//! 职责: 灰度图 → 主检测 → 聚类合并 → 二次校验剪枝 → IoU 评估

use anyhow::Result;
use image::{DynamicImage, GrayImage};
use log::{debug, info};
use std::time::Instant;

use super::ImageReport;
use crate::detection::{accuracy, cluster, prune, Preprocessed};
use crate::error::RefineError;
use crate::models::Detect;
use crate::refine_config::RefineConfig;
use crate::{sigmoid, Detection, MergedDetection, Rect};

pub struct BoatDetector {
    primary: Box<dyn Detect>,
    verifier: Box<dyn Detect>,
    config: RefineConfig,
}

impl BoatDetector {
    pub fn new(primary: Box<dyn Detect>, verifier: Box<dyn Detect>, config: RefineConfig) -> Self {
        Self {
            primary,
            verifier,
            config,
        }
    }

    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// 加载图像并转为灰度, 空图像直接报错
    pub fn load_image(&self, name: &str, image: &DynamicImage) -> Result<GrayImage, RefineError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RefineError::EmptyInput {
                image: name.to_string(),
            });
        }
        Ok(image.to_luma8())
    }

    /// 主检测, 分数经 sigmoid 归一化到 [0,1]
    pub fn detect_boats(&self, gray: &GrayImage) -> Result<Vec<Detection>> {
        let frame = Rect::new(0, 0, gray.width() as i32, gray.height() as i32);
        let mut detections = self.primary.detect(gray, frame)?;
        for d in detections.iter_mut() {
            d.score = sigmoid(d.score);
        }
        Ok(detections)
    }

    /// 聚类合并后剪枝, 返回最终的框
    pub fn cluster_boxes(
        &self,
        detections: &[Detection],
        image: &Preprocessed,
    ) -> Result<Vec<MergedDetection>> {
        if detections.is_empty() {
            return Ok(Vec::new());
        }
        let merged = cluster(detections, self.config.merge_distance);
        let clusters = merged.len();
        let kept = prune(
            merged,
            image,
            self.verifier.as_ref(),
            self.config.parallel_prune,
        )?;
        debug!("🧩 {} 个簇, 剪枝后剩余 {}", clusters, kept.len());
        Ok(kept)
    }

    /// 每个框一个 IoU
    pub fn get_accuracy(&self, boxes: &[MergedDetection], ground_truth: &[Rect]) -> Vec<f64> {
        let rects: Vec<Rect> = boxes.iter().map(|b| b.rect).collect();
        accuracy::score(&rects, ground_truth, &self.config.scoring())
    }

    /// 处理单张图像
    pub fn process(
        &self,
        name: &str,
        image: &DynamicImage,
        ground_truth: &[Rect],
    ) -> Result<ImageReport> {
        let start = Instant::now();
        let gray = self.load_image(name, image)?;

        let detections = self.detect_boats(&gray)?;
        if detections.is_empty() {
            info!("🚫 {}: 未检测到船只", name);
            return Ok(ImageReport {
                image: name.to_string(),
                raw_detections: 0,
                boxes: Vec::new(),
                ious: Vec::new(),
            });
        }

        let preprocessed = Preprocessed::new(&gray, &self.config);
        let boxes = self.cluster_boxes(&detections, &preprocessed)?;
        let ious = self.get_accuracy(&boxes, ground_truth);

        info!(
            "✅ {}: 原始 {} 个 → 最终 {} 个, IoU {:?} ({:.1}ms)",
            name,
            detections.len(),
            boxes.len(),
            ious,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(ImageReport {
            image: name.to_string(),
            raw_detections: detections.len(),
            boxes,
            ious,
        })
    }
}
