//! 精度评估 (Accuracy / IoU)
//!
//! 每个最终框单独与真值框比较, 不做一对一匹配: 同一个真值框可以被多个检测框认领。

use serde::{Deserialize, Serialize};

use super::types::Rect;

/// 默认面积比阈值
pub const COMPARABLE_RATIO: f64 = 0.15;

/// 多个真值框都满足条件时取哪一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// 按真值顺序, 最后一个满足条件的覆盖前面的
    #[default]
    Last,
    /// 取满足条件的最大 IoU
    Max,
}

/// IoU 的分母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IouMode {
    /// 两框外接矩形的面积
    #[default]
    Enclosing,
    /// 两框覆盖区域的面积 (a + b - 交集)
    Union,
}

/// 评估参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoring {
    pub comparable_ratio: f64,
    pub policy: MatchPolicy,
    pub iou_mode: IouMode,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            comparable_ratio: COMPARABLE_RATIO,
            policy: MatchPolicy::Last,
            iou_mode: IouMode::Enclosing,
        }
    }
}

/// 两框是否重叠
pub fn overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// 两框面积是否可比: 小面积 / 大面积 > threshold
pub fn are_comparable(a: &Rect, b: &Rect, threshold: f64) -> bool {
    let (small, large) = if a.area() <= b.area() {
        (a.area(), b.area())
    } else {
        (b.area(), a.area())
    };
    if large == 0 {
        return false;
    }
    small as f64 / large as f64 > threshold
}

pub fn iou(a: &Rect, b: &Rect, mode: IouMode) -> f64 {
    let denominator = match mode {
        IouMode::Enclosing => a.bounding_union(b).area(),
        IouMode::Union => a.union_area(b),
    };
    if denominator == 0 {
        return 0.0;
    }
    a.intersection_area(b) as f64 / denominator as f64
}

/// 单个检测框对一组真值框的 IoU, 没有合格匹配时为 0
pub fn box_iou(rect: &Rect, ground_truth: &[Rect], scoring: &Scoring) -> f64 {
    let mut best = 0.0;
    for gt in ground_truth.iter().filter(|gt| overlap(rect, gt)) {
        let candidate = iou(rect, gt, scoring.iou_mode);
        if candidate > 0.0 && are_comparable(rect, gt, scoring.comparable_ratio) {
            best = match scoring.policy {
                MatchPolicy::Last => candidate,
                MatchPolicy::Max => f64::max(best, candidate),
            };
        }
    }
    best
}

/// 每个检测框一个 IoU, 顺序与输入一致
pub fn score(boxes: &[Rect], ground_truth: &[Rect], scoring: &Scoring) -> Vec<f64> {
    boxes
        .iter()
        .map(|b| box_iou(b, ground_truth, scoring))
        .collect()
}
