//! # 解码适配模块
//!
//! ## 设计思路
//!
//! 外部解码器（识别数百种古董平台图像格式）是注入的能力接口：流水线持有引用，
//! 不拥有其生命周期，测试中可替换为假实现。适配器负责把“解码器说不行”
//! 规范化为业务错误，并防御性复查解码器自身的输出不变量。
//!
//! ## 实现思路
//!
//! - `ImageDecoder` 按原生解码器表面建模：`decode(文件名, 字节)` + 声明的
//!   内容长度上限。文件名参与格式判别，字节只读不改。
//! - 成功输出 `DecodedImage`，一经产生不可变，只会被下一次解码整体取代。

use std::sync::Arc;

use super::source::RawContent;
use super::ViewerError;

/// 外部解码器能力接口。
pub trait ImageDecoder: Send + Sync {
    /// 解码器愿意处理的最大输入字节数。
    fn max_content_length(&self) -> u64;

    /// 尝试解码；无法解释该内容时返回 `None`。
    ///
    /// 实现不得修改 `content`。
    fn decode(&self, filename: &str, content: &[u8]) -> Option<DecodedImage>;
}

/// 一次成功解码的完整输出。
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// 展示用宽度（像素），恒为正。
    pub width: u32,
    /// 展示用高度（像素），恒为正。
    pub height: u32,
    /// 0x00RRGGBB 打包像素，长度恒等于 `width * height`。
    pub pixels: Vec<u32>,
    /// 缩放前的源宽度（信息性）。
    pub original_width: u32,
    /// 缩放前的源高度（信息性）。
    pub original_height: u32,
    /// 来源平台名称（如 "Atari 8-bit"）。
    pub platform_name: String,
    /// 横轴像素密度（每英寸像素数），0 表示未知。
    pub x_density: f32,
    /// 纵轴像素密度（每英寸像素数），0 表示未知。
    pub y_density: f32,
}

/// 解码适配器：调用注入的解码器并规范化结果。
#[derive(Clone)]
pub struct DecodeAdapter {
    decoder: Arc<dyn ImageDecoder>,
}

impl DecodeAdapter {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// 解码器声明的输入长度上限。
    pub fn max_content_length(&self) -> u64 {
        self.decoder.max_content_length()
    }

    /// 执行解码并复查输出不变量。
    ///
    /// 解码器拒绝时返回 [`ViewerError::DecodeFailure`]；
    /// 输出违反尺寸约定时返回 [`ViewerError::MalformedImage`]。
    pub fn decode(&self, filename: &str, raw: &RawContent) -> Result<DecodedImage, ViewerError> {
        let image = self
            .decoder
            .decode(filename, &raw.bytes)
            .ok_or_else(|| ViewerError::DecodeFailure(format!("无法解码文件：{}", filename)))?;

        Self::validate(&image)?;

        log::info!(
            "✅ 解码成功 - 来源: {} 平台: {} 尺寸: {}x{} (原始 {}x{})",
            raw.source_hint,
            image.platform_name,
            image.width,
            image.height,
            image.original_width,
            image.original_height
        );

        Ok(image)
    }

    /// 防御性复查：尺寸为正且像素数量与尺寸一致。
    ///
    /// 解码器契约本应保证这一点，这里只在其自身失守时拦截。
    fn validate(image: &DecodedImage) -> Result<(), ViewerError> {
        if image.width == 0 || image.height == 0 {
            return Err(ViewerError::MalformedImage(format!(
                "解码器报告非法尺寸：{}x{}",
                image.width, image.height
            )));
        }

        let expected = (image.width as u64)
            .checked_mul(image.height as u64)
            .ok_or_else(|| ViewerError::MalformedImage("图像像素数溢出".to_string()))?;

        if image.pixels.len() as u64 != expected {
            return Err(ViewerError::MalformedImage(format!(
                "像素数量与尺寸不一致：{}（期望 {}x{} = {}）",
                image.pixels.len(),
                image.width,
                image.height,
                expected
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectingDecoder;

    impl ImageDecoder for RejectingDecoder {
        fn max_content_length(&self) -> u64 {
            64
        }

        fn decode(&self, _filename: &str, _content: &[u8]) -> Option<DecodedImage> {
            None
        }
    }

    struct BrokenDecoder {
        width: u32,
        height: u32,
        pixel_count: usize,
    }

    impl ImageDecoder for BrokenDecoder {
        fn max_content_length(&self) -> u64 {
            64
        }

        fn decode(&self, _filename: &str, _content: &[u8]) -> Option<DecodedImage> {
            Some(DecodedImage {
                width: self.width,
                height: self.height,
                pixels: vec![0; self.pixel_count],
                original_width: self.width,
                original_height: self.height,
                platform_name: "Test".to_string(),
                x_density: 0.0,
                y_density: 0.0,
            })
        }
    }

    fn raw(bytes: &[u8]) -> RawContent {
        RawContent {
            bytes: bytes.to_vec(),
            source_hint: "test",
        }
    }

    #[test]
    fn decoder_rejection_maps_to_decode_failure() {
        let adapter = DecodeAdapter::new(Arc::new(RejectingDecoder));

        let result = adapter.decode("unknown.bin", &raw(b"\x00\x01"));

        assert!(matches!(result, Err(ViewerError::DecodeFailure(_))));
    }

    #[test]
    fn pixel_count_mismatch_maps_to_malformed_image() {
        let adapter = DecodeAdapter::new(Arc::new(BrokenDecoder {
            width: 4,
            height: 4,
            pixel_count: 15,
        }));

        let result = adapter.decode("broken.scr", &raw(b"\x00"));

        assert!(matches!(result, Err(ViewerError::MalformedImage(_))));
    }

    #[test]
    fn zero_dimensions_map_to_malformed_image() {
        let adapter = DecodeAdapter::new(Arc::new(BrokenDecoder {
            width: 0,
            height: 8,
            pixel_count: 0,
        }));

        let result = adapter.decode("broken.scr", &raw(b"\x00"));

        assert!(matches!(result, Err(ViewerError::MalformedImage(_))));
    }

    #[test]
    fn valid_output_passes_through_unchanged() {
        let adapter = DecodeAdapter::new(Arc::new(BrokenDecoder {
            width: 2,
            height: 3,
            pixel_count: 6,
        }));

        let image = adapter
            .decode("fine.scr", &raw(b"\x00"))
            .expect("decode should succeed");

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 3);
        assert_eq!(image.pixels.len(), 6);
    }
}
