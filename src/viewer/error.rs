//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载查看流水线中的所有失败来源（读取、解码、转换、导出），
//! 避免字符串拼接式错误处理。通过 `thiserror` 保持人类可读错误，
//! 同时让调用侧可按分支匹配。
//!
//! 所有失败都在发生点处理并以可关闭的提示呈现给用户，不自动重试，
//! 也不会使进程崩溃；被新请求取代的过期解码结果不是错误，静默丢弃。

/// 查看流水线统一错误类型。
///
/// 每个变体对应一个独立的失败类别，呈现层可通过 [`code`](Self::code)
/// 与 [`stage`](Self::stage) 获得稳定的分类标识。
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// 获取字节时发生 I/O 故障。
    #[error("读取错误：{0}")]
    ReadFailure(String),

    /// 内容长度超过解码器声明的上限（在读取前检查）。
    #[error("文件过大：{0}")]
    TooLarge(String),

    /// 解码器声明无法解释该内容。
    #[error("解码错误：{0}")]
    DecodeFailure(String),

    /// 解码器输出违反 width×height×pixels 不变量（防御性检查）。
    #[error("图像数据异常：{0}")]
    MalformedImage(String),

    /// 写入文件失败（如权限不足）。
    #[error("保存错误：{0}")]
    SaveFailure(String),

    /// 写入剪贴板目标失败。
    #[error("剪贴板错误：{0}")]
    ClipboardFailure(String),

    /// 分享目标报告失败（不重试）。
    #[error("分享错误：{0}")]
    ShareFailure(String),
}

impl ViewerError {
    /// 稳定错误码，供呈现层聚合与检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReadFailure(_) => "E_READ",
            Self::TooLarge(_) => "E_TOO_LARGE",
            Self::DecodeFailure(_) => "E_DECODE",
            Self::MalformedImage(_) => "E_MALFORMED",
            Self::SaveFailure(_) => "E_SAVE",
            Self::ClipboardFailure(_) => "E_CLIPBOARD",
            Self::ShareFailure(_) => "E_SHARE",
        }
    }

    /// 失败发生的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ReadFailure(_) | Self::TooLarge(_) => "load",
            Self::DecodeFailure(_) => "decode",
            Self::MalformedImage(_) => "convert",
            Self::SaveFailure(_) | Self::ClipboardFailure(_) | Self::ShareFailure(_) => "export",
        }
    }
}

impl From<ViewerError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: ViewerError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_stage_are_stable_per_variant() {
        let err = ViewerError::TooLarge("test".to_string());
        assert_eq!(err.code(), "E_TOO_LARGE");
        assert_eq!(err.stage(), "load");

        let err = ViewerError::MalformedImage("test".to_string());
        assert_eq!(err.code(), "E_MALFORMED");
        assert_eq!(err.stage(), "convert");

        let err = ViewerError::ClipboardFailure("test".to_string());
        assert_eq!(err.code(), "E_CLIPBOARD");
        assert_eq!(err.stage(), "export");
    }
}
