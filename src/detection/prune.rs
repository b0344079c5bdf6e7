//! 二次校验剪枝 (Verification Pruning)
//!
//! 对每个合并框, 在预处理后的图像上裁剪对应区域, 交给二次检测器重新检测。
//! 区域内没有任何检测结果的框被丢弃。

use anyhow::{Context, Result};
use image::{imageops, GrayImage};
use imageproc::{edges::canny, filter::box_filter};
use log::debug;
use rayon::prelude::*;

use super::types::{MergedDetection, Rect};
use crate::models::Detect;
use crate::refine_config::RefineConfig;

/// 预处理图像: 均值模糊 → Canny边缘 → 模糊图减去边缘图
///
/// 每张输入图只计算一次, 剪枝期间只读共享
pub struct Preprocessed {
    image: GrayImage,
}

impl Preprocessed {
    pub fn new(gray: &GrayImage, config: &RefineConfig) -> Self {
        let radius = config.blur_kernel / 2;
        let blurred = box_filter(gray, radius, radius);
        // 阈值颠倒时按大小交换
        let low = config.canny_low.min(config.canny_high);
        let high = config.canny_low.max(config.canny_high);
        let edges = canny(&blurred, low, high);

        let mut image = blurred;
        for (p, e) in image.pixels_mut().zip(edges.pixels()) {
            p.0[0] = p.0[0].saturating_sub(e.0[0]);
        }
        Self { image }
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 裁剪出框对应的区域 (超出图像的部分被截掉), 空区域返回 None
    pub fn crop(&self, rect: &Rect) -> Option<(GrayImage, Rect)> {
        let roi = rect.clamp_to(self.width(), self.height());
        if roi.is_empty() {
            return None;
        }
        let region = imageops::crop_imm(
            &self.image,
            roi.x as u32,
            roi.y as u32,
            roi.width as u32,
            roi.height as u32,
        )
        .to_image();
        Some((region, roi))
    }
}

/// 单个框的二次校验
fn verify(image: &Preprocessed, verifier: &dyn Detect, rect: &Rect) -> Result<bool> {
    let Some((region, roi)) = image.crop(rect) else {
        debug!("⚠️  框 {:?} 在图像外, 丢弃", rect);
        return Ok(false);
    };
    let found = verifier
        .detect(&region, roi)
        .with_context(|| format!("二次校验失败: {:?}", roi))?;
    debug!("🔍 框 {:?}: 二次检测 {} 个", roi, found.len());
    Ok(!found.is_empty())
}

/// 剪枝: 丢弃二次检测为空的框, 保留顺序
pub fn prune(
    merged: Vec<MergedDetection>,
    image: &Preprocessed,
    verifier: &dyn Detect,
    parallel: bool,
) -> Result<Vec<MergedDetection>> {
    let keep: Vec<bool> = if parallel {
        merged
            .par_iter()
            .map(|m| verify(image, verifier, &m.rect))
            .collect::<Result<_>>()?
    } else {
        merged
            .iter()
            .map(|m| verify(image, verifier, &m.rect))
            .collect::<Result<_>>()?
    };

    Ok(merged
        .into_iter()
        .zip(keep)
        .filter_map(|(m, k)| k.then_some(m))
        .collect())
}
