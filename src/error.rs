//! 错误类型 (Error types)

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefineError {
    /// 输入图像为空, 不做任何处理
    #[error("输入图像为空: {image}")]
    EmptyInput { image: String },

    /// 真值文件中的某一行无法解析
    #[error("真值解析失败 {}:{line}: {reason}", .path.display())]
    GroundTruthParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// 真值目录或文件无法读取
    #[error("真值读取失败 {}: {source}", .path.display())]
    GroundTruthIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 真值序列少于图像数量
    #[error("真值与图像数量不一致: {images} 张图像, {ground_truth} 组真值")]
    GroundTruthAlignment { images: usize, ground_truth: usize },
}
