//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理源文件的原始字节加载，并在“尽可能早”的阶段执行上限校验。
//! 目标是尽快失败，减少不必要的 I/O 与内存消耗：枚举方上报的长度超限时，
//! 一个字节都不读。
//!
//! ## 实现思路
//!
//! - 先按 `SourceFile` 上报长度拦截，再按文件系统 metadata 拦截
//!   （上报值可能过期），最后整体读取。
//! - 任何一步失败都不产生部分内容。
//! - 同时提供内存字节入口，供宿主把选择器交来的内容直接送入流水线。

use std::path::Path;

use super::source::{RawContent, SourceFile};
use super::ViewerError;

/// 内容加载器：带上限的整文件读取。
#[derive(Debug, Clone, Copy)]
pub struct ContentLoader {
    max_content_length: u64,
}

impl ContentLoader {
    /// 按有效上限创建加载器（解码器声明值与宿主配置的较小者）。
    pub fn new(max_content_length: u64) -> Self {
        Self { max_content_length }
    }

    /// 生效的内容长度上限（字节）。
    pub fn max_content_length(&self) -> u64 {
        self.max_content_length
    }

    /// 从文件系统加载源文件的原始字节。
    pub fn load(&self, source: &SourceFile) -> Result<RawContent, ViewerError> {
        log::info!(
            "📁 开始读取文件 - 路径: {} 上报长度: {} 字节",
            source.name,
            source.byte_length
        );

        if source.byte_length > self.max_content_length {
            return Err(self.too_large(source.byte_length));
        }

        let path = Path::new(&source.name);
        let metadata = std::fs::metadata(path)
            .map_err(|e| ViewerError::ReadFailure(format!("无法读取文件信息：{}", e)))?;

        // 上报长度可能来自过期的目录枚举
        if metadata.len() > self.max_content_length {
            return Err(self.too_large(metadata.len()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ViewerError::ReadFailure(format!("无法读取文件：{}", e)))?;

        Ok(RawContent {
            bytes,
            source_hint: "file",
        })
    }

    /// 接收宿主已经取得的内存字节，执行同样的上限校验。
    pub fn from_bytes(&self, bytes: Vec<u8>) -> Result<RawContent, ViewerError> {
        if bytes.len() as u64 > self.max_content_length {
            return Err(self.too_large(bytes.len() as u64));
        }

        Ok(RawContent {
            bytes,
            source_hint: "memory",
        })
    }

    fn too_large(&self, actual: u64) -> ViewerError {
        ViewerError::TooLarge(format!(
            "{} 字节超过上限 {} 字节",
            actual, self.max_content_length
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reported_length_over_limit_fails_before_any_io() {
        let loader = ContentLoader::new(100);
        let source = SourceFile::new("/definitely/not/a/real/path.scr", 101);

        // 路径不存在，若先做了 I/O 会得到 ReadFailure 而非 TooLarge
        let result = loader.load(&source);

        assert!(matches!(result, Err(ViewerError::TooLarge(_))));
    }

    #[test]
    fn stale_reported_length_is_caught_by_metadata_check() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        file.write_all(&[0u8; 64]).expect("write temp file failed");

        let loader = ContentLoader::new(32);
        // 上报长度撒谎说自己在上限内
        let source = SourceFile::new(file.path().to_string_lossy().to_string(), 16);

        let result = loader.load(&source);

        assert!(matches!(result, Err(ViewerError::TooLarge(_))));
    }

    #[test]
    fn missing_file_maps_to_read_failure() {
        let loader = ContentLoader::new(1024);
        let source = SourceFile::new("/definitely/not/a/real/path.scr", 10);

        let result = loader.load(&source);

        assert!(matches!(result, Err(ViewerError::ReadFailure(_))));
    }

    #[test]
    fn load_returns_whole_content_within_limit() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        file.write_all(b"retro bytes").expect("write temp file failed");

        let loader = ContentLoader::new(1024);
        let source = SourceFile::new(file.path().to_string_lossy().to_string(), 11);

        let raw = loader.load(&source).expect("load should succeed");

        assert_eq!(raw.len(), 11);
    }

    #[test]
    fn in_memory_bytes_respect_the_same_limit() {
        let loader = ContentLoader::new(4);

        assert!(loader.from_bytes(vec![0; 4]).is_ok());
        assert!(matches!(
            loader.from_bytes(vec![0; 5]),
            Err(ViewerError::TooLarge(_))
        ));
    }
}
