//! 真值加载 (Ground-truth loader)
//!
//! 目录下每个 `*.txt` 对应一张图像, 按文件名字典序排列, 与图像列表按位置一一对应。
//! 每行一个框: `<label>: <tlX>;<brX>;<tlY>;<brY>`
//!
//! 任意一行格式错误都会使整个加载失败, 不返回只解析了一半的文件。

use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::RefineError;
use crate::Rect;

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^:]*:\s*(-?\d+)\s*;\s*(-?\d+)\s*;\s*(-?\d+)\s*;\s*(-?\d+)\s*;?\s*$")
            .expect("ground truth pattern is valid")
    })
}

/// 解析一行真值, 例如 `boat: 5;25;5;20` → 左上 (5,5), 右下 (25,20)
pub fn parse_ground_truth_line(line: &str) -> Result<Rect, String> {
    if !line.contains(':') {
        return Err("缺少 ':' 分隔的标签".to_string());
    }
    let caps = line_pattern()
        .captures(line.trim())
        .ok_or_else(|| format!("格式应为 label: tlX;brX;tlY;brY, 实际为 {:?}", line))?;

    let mut values = [0i32; 4];
    for (i, v) in values.iter_mut().enumerate() {
        *v = caps[i + 1]
            .parse()
            .map_err(|e| format!("坐标 {:?} 无效: {}", &caps[i + 1], e))?;
    }
    let [tl_x, br_x, tl_y, br_y] = values;
    Rect::from_corners((tl_x, tl_y), (br_x, br_y))
        .ok_or_else(|| format!("框尺寸超出范围: {:?}", line.trim()))
}

/// 解析单个真值文件的内容
pub fn parse_ground_truth(path: &Path, content: &str) -> Result<Vec<Rect>, RefineError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_ground_truth_line(line).map_err(|reason| RefineError::GroundTruthParse {
                path: path.to_path_buf(),
                line: i + 1,
                reason,
            })
        })
        .collect()
}

/// 列出目录下的真值文件 (按文件名排序)
pub fn list_ground_truth_files(dir: &Path) -> Result<Vec<PathBuf>, RefineError> {
    let entries = fs::read_dir(dir).map_err(|source| RefineError::GroundTruthIo {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RefineError::GroundTruthIo {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// 加载目录下所有真值, 每个文件一组
pub fn load_ground_truth(dir: impl AsRef<Path>) -> Result<Vec<Vec<Rect>>, RefineError> {
    let files = list_ground_truth_files(dir.as_ref())?;
    info!("📂 真值文件数量: {}", files.len());

    files
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path).map_err(|source| RefineError::GroundTruthIo {
                path: path.clone(),
                source,
            })?;
            let rects = parse_ground_truth(path, &content)?;
            debug!("✅ 已加载 {}: {} 个框", path.display(), rects.len());
            Ok(rects)
        })
        .collect()
}

/// 真值组数必须不少于图像数
pub fn check_alignment(images: usize, ground_truth: usize) -> Result<(), RefineError> {
    if ground_truth < images {
        return Err(RefineError::GroundTruthAlignment {
            images,
            ground_truth,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let rect = parse_ground_truth_line("boat: 5;25;5;20").unwrap();
        assert_eq!(rect.tl(), (5, 5));
        assert_eq!(rect.br(), (25, 20));
    }

    #[test]
    fn test_parse_line_tolerates_spacing_and_trailing_separator() {
        let rect = parse_ground_truth_line("  boat :  5 ; 25 ;5;20;  ").unwrap();
        assert_eq!(rect, Rect::new(5, 5, 20, 15));
        assert_eq!(
            parse_ground_truth_line("gondola: 100;340;12;90\r").unwrap(),
            Rect::new(100, 12, 240, 78)
        );
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_ground_truth_line("5;25;5;20").is_err());
        assert!(parse_ground_truth_line("boat: 5;25;5").is_err());
        assert!(parse_ground_truth_line("boat: 5;x;5;20").is_err());
        assert!(parse_ground_truth_line("boat: 5;25;5;99999999999").is_err());
        // 单个坐标合法, 但宽度溢出
        assert!(parse_ground_truth_line("boat: -2147483648;2147483647;0;10").is_err());
        assert!(parse_ground_truth_line("boat: 0;10;2147483647;-2").is_err());
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let path = Path::new("gt/03.txt");
        let err = parse_ground_truth(path, "boat: 1;2;3;4\n\nboat: 1;2\n").unwrap_err();
        match err {
            RefineError::GroundTruthParse { path: p, line, .. } => {
                assert_eq!(p, PathBuf::from("gt/03.txt"));
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_box_reports_line() {
        let err = parse_ground_truth(
            Path::new("gt/07.txt"),
            "boat: 0;10;0;10\nboat: -2147483648;2147483647;0;10\n",
        )
        .unwrap_err();
        assert!(matches!(err, RefineError::GroundTruthParse { line: 2, .. }));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rects = parse_ground_truth(Path::new("a.txt"), "\nboat: 0;10;0;10\n\n").unwrap();
        assert_eq!(rects, vec![Rect::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_alignment() {
        assert!(check_alignment(3, 3).is_ok());
        assert!(check_alignment(2, 3).is_ok());
        assert!(matches!(
            check_alignment(4, 3),
            Err(RefineError::GroundTruthAlignment {
                images: 4,
                ground_truth: 3
            })
        ));
    }
}
