/// 检测后处理系统 (Detection Refinement)
///
/// 原始检测 → 聚类合并 → 二次校验剪枝 → 与真值比较
/// - types:    矩形/检测框等基础类型
/// - cluster:  并查集聚类
/// - prune:    二次校验剪枝
/// - accuracy: IoU 精度评估
pub mod accuracy;
pub mod cluster;
pub mod prune;
pub mod types;

pub use accuracy::{
    are_comparable, iou, overlap, score, IouMode, MatchPolicy, Scoring, COMPARABLE_RATIO,
};
pub use cluster::{cluster, mergeable, partition, UnionFind, MERGE_DISTANCE};
pub use prune::{prune, Preprocessed};
pub use types::{center_distance, Detection, MergedDetection, Rect};
