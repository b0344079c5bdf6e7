//! 检测框聚类 (Detection Clustering)
//!
//! 多尺度扫描会在同一目标周围产生一串相互重叠或相邻的框。
//! 这里把 "可合并" 关系当作图的边, 用并查集求连通分量, 每个分量合并成一个框:
//! - 框: 所有成员的最小外接矩形
//! - 分数: 成员分数的算术平均

use super::types::{center_distance, Detection, MergedDetection, Rect};

/// 默认中心距离阈值 (像素)
pub const MERGE_DISTANCE: f64 = 80.0;

/// 并查集 (Disjoint-set over detection indices)
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        // 路径减半
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// 按首次出现顺序返回各分量的成员下标
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut slot_of_root = vec![usize::MAX; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot_of_root[root]].push(i);
        }
        groups
    }
}

/// 两个框是否属于同一目标: 有重叠, 或中心距离小于阈值
pub fn mergeable(a: &Rect, b: &Rect, merge_distance: f64) -> bool {
    a.intersection_area(b) > 0 || center_distance(a, b) < merge_distance
}

/// 按传递闭包划分检测框, 返回每个簇的成员下标 (首次出现顺序)
pub fn partition(detections: &[Detection], merge_distance: f64) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(detections.len());
    for i in 0..detections.len() {
        for j in (i + 1)..detections.len() {
            if mergeable(&detections[i].rect, &detections[j].rect, merge_distance) {
                uf.union(i, j);
            }
        }
    }
    uf.groups()
}

/// 聚类并合并检测框
pub fn cluster(detections: &[Detection], merge_distance: f64) -> Vec<MergedDetection> {
    if detections.is_empty() {
        return Vec::new();
    }

    partition(detections, merge_distance)
        .into_iter()
        .map(|members| {
            let first = detections[members[0]].rect;
            let rect = members
                .iter()
                .fold(first, |acc, &i| acc.bounding_union(&detections[i].rect));
            let sum: f64 = members.iter().map(|&i| detections[i].score).sum();
            MergedDetection {
                rect,
                score: sum / members.len() as f64,
                members: members.len(),
            }
        })
        .collect()
}
