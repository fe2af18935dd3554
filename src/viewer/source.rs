//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入标识”和“流水线中间结果”解耦：
//! - `SourceFile` 表示导航集合中的一个文件（名称不透明，长度来自枚举方上报）
//! - `RawContent` 表示已加载但未解码的字节，由加载器独占直到交给解码适配器

/// 导航集合中的一个源文件。
///
/// `name` 同时作为读取路径与解码器的格式判别提示；唯一性仅依惯例成立。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 文件名（含路径）。
    pub name: String,
    /// 枚举方上报的字节长度，读取前先按此值做上限检查。
    pub byte_length: u64,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, byte_length: u64) -> Self {
        Self {
            name: name.into(),
            byte_length,
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
///
/// 解码尝试结束后即被丢弃，失败时绝不产生部分内容。
#[derive(Debug)]
pub struct RawContent {
    /// 原始文件字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

impl RawContent {
    /// 已加载的字节数。
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
