// 回放检测器 (Replay Detector)
// 读取外部检测引擎导出的 JSON, 按图像名回放检测结果

use anyhow::{Context, Result};
use image::GrayImage;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

use super::Detect;
use crate::{Detection, Rect};

/// 单张图像的检测记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// 主检测器原始输出 (整图坐标, 未归一化分数)
    pub detections: Vec<Detection>,
    /// 二次检测器输出 (整图坐标), 缺省时复用 `detections`
    #[serde(default)]
    pub verifications: Option<Vec<Detection>>,
}

/// 图像名 → 检测记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayLog {
    records: BTreeMap<String, ReplayRecord>,
}

impl ReplayLog {
    pub fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("无法读取检测结果: {}", path))?;
        serde_json::from_str(&json).with_context(|| format!("检测结果格式错误: {}", path))
    }

    pub fn insert(&mut self, image: impl Into<String>, record: ReplayRecord) {
        self.records.insert(image.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record(&self, image: &str) -> Option<&ReplayRecord> {
        let record = self.records.get(image);
        if record.is_none() {
            warn!("⚠️  检测结果中没有 {}", image);
        }
        record
    }

    /// 主检测器
    pub fn primary(&self, image: &str) -> ReplayDetector {
        ReplayDetector::new(
            self.record(image)
                .map(|r| r.detections.clone())
                .unwrap_or_default(),
        )
    }

    /// 二次校验器
    pub fn verifier(&self, image: &str) -> ReplayDetector {
        ReplayDetector::new(
            self.record(image)
                .map(|r| r.verifications.clone().unwrap_or_else(|| r.detections.clone()))
                .unwrap_or_default(),
        )
    }
}

/// 回放固定的检测结果: 只返回完全落在 roi 内的框, 坐标转换到 roi 局部
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    detections: Vec<Detection>,
}

impl ReplayDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }
}

impl Detect for ReplayDetector {
    fn detect(&self, _image: &GrayImage, roi: Rect) -> Result<Vec<Detection>> {
        Ok(self
            .detections
            .iter()
            .filter(|d| roi.contains(&d.rect))
            .map(|d| Detection {
                rect: d.rect.translate(-roi.x, -roi.y),
                ..*d
            })
            .collect())
    }
}
