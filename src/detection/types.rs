// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use serde::{Deserialize, Serialize};

/// 矩形框 (Axis-aligned rectangle)
///
/// 像素坐标, 左上角 + 宽高, 宽高非负
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 由两个角点构造, 角点顺序颠倒时自动规整; 宽高超出 i32 时返回 None
    pub fn from_corners(tl: (i32, i32), br: (i32, i32)) -> Option<Self> {
        let width = br.0.checked_sub(tl.0)?.checked_abs()?;
        let height = br.1.checked_sub(tl.1)?.checked_abs()?;
        Some(Self {
            x: tl.0.min(br.0),
            y: tl.1.min(br.1),
            width,
            height,
        })
    }

    pub fn xmax(&self) -> i32 {
        self.x + self.width
    }

    pub fn ymax(&self) -> i32 {
        self.y + self.height
    }

    pub fn tl(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn br(&self) -> (i32, i32) {
        (self.xmax(), self.ymax())
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.,
            self.y as f64 + self.height as f64 / 2.,
        )
    }

    /// 交集矩形, 不相交时返回零面积矩形
    pub fn intersection(&self, another: &Rect) -> Rect {
        let l = self.x.max(another.x);
        let t = self.y.max(another.y);
        let r = self.xmax().min(another.xmax());
        let b = self.ymax().min(another.ymax());
        if r <= l || b <= t {
            return Rect::default();
        }
        Rect::new(l, t, r - l, b - t)
    }

    pub fn intersection_area(&self, another: &Rect) -> i64 {
        self.intersection(another).area()
    }

    /// 覆盖两个矩形的最小矩形
    pub fn bounding_union(&self, another: &Rect) -> Rect {
        let l = self.x.min(another.x);
        let t = self.y.min(another.y);
        let r = self.xmax().max(another.xmax());
        let b = self.ymax().max(another.ymax());
        Rect::new(l, t, r - l, b - t)
    }

    /// 并集面积 (两矩形覆盖区域的面积)
    pub fn union_area(&self, another: &Rect) -> i64 {
        self.area() + another.area() - self.intersection_area(another)
    }

    pub fn overlaps(&self, another: &Rect) -> bool {
        self.intersection_area(another) > 0
    }

    /// `another` 是否完全落在 `self` 内部
    pub fn contains(&self, another: &Rect) -> bool {
        another.x >= self.x
            && another.y >= self.y
            && another.xmax() <= self.xmax()
            && another.ymax() <= self.ymax()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// 裁剪到 `[0, width) x [0, height)` 范围内
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        self.intersection(&Rect::new(0, 0, width as i32, height as i32))
    }
}

/// 两矩形中心点的欧氏距离
pub fn center_distance(a: &Rect, b: &Rect) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

/// 原始检测 (Raw detection)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    pub rect: Rect,
    pub score: f64,
    /// 检测器金字塔层级, 仅透传
    #[serde(default)]
    pub level: i32,
}

impl Detection {
    pub fn new(rect: Rect, score: f64) -> Self {
        Self {
            rect,
            score,
            level: 0,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }
}

/// 合并后的检测框 (cluster → 一个框)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedDetection {
    pub rect: Rect,
    /// 簇内分数的算术平均
    pub score: f64,
    pub members: usize,
}
