//! 后处理参数配置 - 通过JSON文件调整参数

use anyhow::Context;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::detection::{IouMode, MatchPolicy, Scoring, COMPARABLE_RATIO, MERGE_DISTANCE};

/// 后处理参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    // === 聚类参数 ===
    pub merge_distance: f64, // 中心距离阈值(像素)

    // === 剪枝预处理 ===
    pub blur_kernel: u32, // 均值模糊核大小(奇数)
    pub canny_low: f32,   // Canny低阈值
    pub canny_high: f32,  // Canny高阈值
    pub parallel_prune: bool,

    // === 精度评估 ===
    pub comparable_ratio: f64, // 面积比阈值
    pub match_policy: MatchPolicy,
    pub iou_mode: IouMode, // IoU分母: 外接矩形或覆盖区域
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            merge_distance: MERGE_DISTANCE,

            blur_kernel: 5,
            canny_low: 100.0,
            canny_high: 200.0,
            parallel_prune: false,

            comparable_ratio: COMPARABLE_RATIO,
            match_policy: MatchPolicy::Last,
            iou_mode: IouMode::Enclosing,
        }
    }
}

impl RefineConfig {
    /// 从JSON文件加载配置, 文件不存在时写出默认配置
    ///
    /// 解析失败或参数不合法时返回错误
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let config: Self = match fs::read_to_string(path) {
            Ok(json) => {
                let config = serde_json::from_str(&json)
                    .with_context(|| format!("配置文件解析失败: {}", path))?;
                info!("✅ 配置已从 {} 加载", path);
                config
            }
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                config.save(path);
                config
            }
        };
        config
            .validate()
            .with_context(|| format!("配置文件参数不合法: {}", path))?;
        Ok(config)
    }

    /// 精度评估参数
    pub fn scoring(&self) -> Scoring {
        Scoring {
            comparable_ratio: self.comparable_ratio,
            policy: self.match_policy,
            iou_mode: self.iou_mode,
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    error!("❌ 保存配置失败: {}", e);
                } else {
                    info!("💾 配置已保存到 {}", path);
                }
            }
            Err(e) => error!("❌ 序列化配置失败: {}", e),
        }
    }

    /// 参数合法性检查
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.blur_kernel >= 1 && self.blur_kernel % 2 == 1,
            "blur_kernel 必须是正奇数, 当前 {}",
            self.blur_kernel
        );
        anyhow::ensure!(
            self.canny_low <= self.canny_high,
            "canny_low ({}) 不能大于 canny_high ({})",
            self.canny_low,
            self.canny_high
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.comparable_ratio),
            "comparable_ratio 必须在 [0, 1) 内, 当前 {}",
            self.comparable_ratio
        );
        anyhow::ensure!(
            self.merge_distance >= 0.0,
            "merge_distance 不能为负, 当前 {}",
            self.merge_distance
        );
        Ok(())
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        info!("🎛️  当前后处理配置:");
        info!("  聚类距离阈值: {:.1}px", self.merge_distance);
        info!("  模糊核: {}x{}", self.blur_kernel, self.blur_kernel);
        info!("  Canny阈值: {:.0}/{:.0}", self.canny_low, self.canny_high);
        info!("  并行剪枝: {}", self.parallel_prune);
        info!("  面积比阈值: {:.2}", self.comparable_ratio);
        info!("  匹配策略: {:?}", self.match_policy);
        info!("  IoU分母: {:?}", self.iou_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RefineConfig::default();
        assert_eq!(config.merge_distance, 80.0);
        assert_eq!(config.blur_kernel, 5);
        assert_eq!(config.comparable_ratio, 0.15);
        assert_eq!(config.match_policy, MatchPolicy::Last);
        assert_eq!(config.iou_mode, IouMode::Enclosing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RefineConfig =
            serde_json::from_str(r#"{ "merge_distance": 40.0, "match_policy": "max" }"#).unwrap();
        assert_eq!(config.merge_distance, 40.0);
        assert_eq!(config.match_policy, MatchPolicy::Max);
        assert_eq!(config.canny_high, 200.0);
    }

    #[test]
    fn test_validate_rejects_even_kernel() {
        let config = RefineConfig {
            blur_kernel: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refine_config.json");
        let path = path.to_str().unwrap();

        let config = RefineConfig::load(path).unwrap();
        assert_eq!(config, RefineConfig::default());
        assert!(std::path::Path::new(path).exists());
        assert_eq!(RefineConfig::load(path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();

        let swapped = dir.path().join("swapped.json");
        fs::write(&swapped, r#"{ "canny_low": 200.0, "canny_high": 100.0 }"#).unwrap();
        assert!(RefineConfig::load(swapped.to_str().unwrap()).is_err());

        let even = dir.path().join("even.json");
        fs::write(&even, r#"{ "blur_kernel": 4 }"#).unwrap();
        assert!(RefineConfig::load(even.to_str().unwrap()).is_err());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ merge_distance: ").unwrap();
        assert!(RefineConfig::load(broken.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_scoring_follows_config() {
        let config: RefineConfig =
            serde_json::from_str(r#"{ "iou_mode": "union", "comparable_ratio": 0.3 }"#).unwrap();
        let scoring = config.scoring();
        assert_eq!(scoring.iou_mode, IouMode::Union);
        assert_eq!(scoring.policy, MatchPolicy::Last);
        assert_eq!(scoring.comparable_ratio, 0.3);
    }
}
