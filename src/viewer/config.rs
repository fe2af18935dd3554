//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ViewerConfig`，保证运行时行为可观测、可调整、可测试。
//! 导出压缩档位（fast / balanced / best）作为高层语义，映射到底层编码参数。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `max_content_length` 为宿主在解码器上限之下的进一步收紧，`None` 表示
//!   完全采用解码器声明的上限。
//! - `ExportCompression` 负责档位字符串解析与反向输出。

use super::ViewerError;

/// 查看流水线配置。
///
/// 字段覆盖几何换算、加载上限与导出编码三个方面。
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// 像素密度未知时采用的参考密度（每英寸像素数）。
    pub reference_dpi: f32,
    /// 宿主侧内容长度上限（字节）；实际上限取本值与解码器声明值的较小者。
    pub max_content_length: Option<u64>,
    /// 导出 PNG 的压缩档位。
    pub export_compression: ExportCompression,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            reference_dpi: 96.0,
            max_content_length: None,
            export_compression: ExportCompression::Balanced,
        }
    }
}

/// 导出压缩档位（面向产品/用户语义）。
///
/// - `Fast`：优先导出速度
/// - `Balanced`：体积与速度平衡
/// - `Best`：尽量压小体积
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportCompression {
    Fast,
    Balanced,
    Best,
}

impl ExportCompression {
    /// 从外部字符串解析档位。
    pub fn from_str(level: &str) -> Result<Self, ViewerError> {
        match level.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "best" => Ok(Self::Best),
            other => Err(ViewerError::SaveFailure(format!(
                "未知压缩档位：{}（可选：fast / balanced / best）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供呈现层展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Best => "best",
        }
    }

    /// 映射到 PNG 编码器的压缩策略。
    pub(crate) fn to_png(self) -> png::Compression {
        match self {
            Self::Fast => png::Compression::Fast,
            Self::Balanced => png::Compression::Default,
            Self::Best => png::Compression::Best,
        }
    }
}
