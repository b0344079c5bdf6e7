/// 船只检测后处理 (Boat Detector)
///
/// 读取检测器输出, 逐张图像执行:
/// 1. sigmoid 归一化分数
/// 2. 聚类合并相邻/重叠框
/// 3. 二次校验剪枝
/// 4. 与真值比较计算 IoU
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;

use boat_detector::{
    gen_time_string, pipeline, Args, IouMode, MatchPolicy, RefineConfig, ReplayLog,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = RefineConfig::load(&args.config)?;
    if args.parallel {
        config.parallel_prune = true;
    }
    if args.max_iou {
        config.match_policy = MatchPolicy::Max;
    }
    if args.union_iou {
        config.iou_mode = IouMode::Union;
    }
    config.validate()?;
    config.print_summary();

    let replay = ReplayLog::load(&args.detections)?;
    info!("📦 检测结果: {} ({} 张图像)", args.detections, replay.len());

    let gt_dir = args.ground_truth_dir();
    info!("📂 图像目录: {}", args.images);
    info!("📂 真值目录: {}", gt_dir);

    let report = pipeline::run(
        Path::new(&args.images),
        &args.ext,
        Path::new(&gt_dir),
        &replay,
        &config,
    )?;

    match report.mean_iou {
        Some(mean) => info!("📊 平均 IoU: {:.2}%", mean * 100.0),
        None => info!("📊 没有最终检测框"),
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| format!("report_{}.json", gen_time_string("")));
    report.save(&output)?;

    Ok(())
}
