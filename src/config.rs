use clap::Parser;

/// 检测后处理与精度评估
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "检测框聚类、二次校验剪枝与 IoU 精度评估", long_about = None)]
pub struct Args {
    /// 图像目录
    #[arg(short, long)]
    pub images: String,

    /// 图像扩展名
    #[arg(short, long, default_value = "png")]
    pub ext: String,

    /// 真值目录 (默认 <images>/ground_truth)
    #[arg(short, long)]
    pub ground_truth: Option<String>,

    /// 检测器输出 (JSON)
    #[arg(short, long)]
    pub detections: String,

    /// 后处理参数配置文件
    #[arg(short, long, default_value = "refine_config.json")]
    pub config: String,

    /// 结果报告输出路径 (默认 report_<时间>.json)
    #[arg(short, long)]
    pub output: Option<String>,

    /// 并行执行二次校验
    #[arg(long)]
    pub parallel: bool,

    /// 多个真值满足条件时取最大 IoU (默认取最后一个)
    #[arg(long)]
    pub max_iou: bool,

    /// IoU 以两框覆盖区域为分母 (默认外接矩形)
    #[arg(long)]
    pub union_iou: bool,
}

impl Args {
    pub fn ground_truth_dir(&self) -> String {
        self.ground_truth
            .clone()
            .unwrap_or_else(|| format!("{}/ground_truth", self.images))
    }
}
