// 图像列表与加载

use anyhow::{Context, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// 列出目录下指定扩展名的图像, 按文件名排序 (与真值文件顺序对应)
pub fn list_images(dir: impl AsRef<Path>, ext: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let ext = ext.trim_start_matches('.');
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("无法读取图像目录: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("无法打开图像: {}", path.display()))
}

/// 报告中使用的图像名
pub fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
