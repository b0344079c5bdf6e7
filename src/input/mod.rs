/// 输入系统 (Input System)
///
/// 负责磁盘上的图像与真值
/// - images:       图像列表与加载
/// - ground_truth: 真值文件解析
pub mod ground_truth;
pub mod images;

pub use ground_truth::{
    check_alignment, load_ground_truth, parse_ground_truth, parse_ground_truth_line,
};
pub use images::{image_name, list_images, open_image};
