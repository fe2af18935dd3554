//! # 导出流水线模块
//!
//! ## 设计思路
//!
//! 把当前呈现缓冲重新编码为便携无损格式（PNG），并携带源密度元数据，
//! 使下游查看器能复现同样的宽高比校正效果——这是“另存为”与普通截图的
//! 本质区别。保存、剪贴板、分享三种消费方式共用同一个编码入口。
//!
//! ## 实现思路
//!
//! - 导出请求按值持有缓冲快照：并发完成的新解码不会影响进行中的导出。
//! - 密度以 pHYs 块（每米像素数）写入，双轴均为已知值时才写，
//!   未知（0）则整体省略。
//! - 剪贴板与分享目标是注入接口；默认提供基于系统剪贴板的适配实现
//!   （`system-clipboard` 特性，默认开启）。

use std::path::{Path, PathBuf};

use super::config::ExportCompression;
use super::pixels::DisplayBuffer;
use super::ViewerError;

/// 一次导出动作的全部输入。
///
/// 在触发导出的瞬间从当前视图克隆构造，之后与会话状态再无关联。
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub buffer: DisplayBuffer,
    /// 源图像上报的横轴密度（每英寸像素数），0 表示未知。
    pub dpi_x: f32,
    /// 源图像上报的纵轴密度（每英寸像素数），0 表示未知。
    pub dpi_y: f32,
    /// 剪贴板/分享目标使用的标题提示。
    pub title_hint: String,
}

/// 剪贴板目标能力接口：接收编码后的字节流与标题。
pub trait ClipboardTarget {
    fn receive(&mut self, encoded: &[u8], title: &str) -> Result<(), String>;
}

/// 分享目标能力接口：接收编码后的字节流与标题，失败不重试。
pub trait ShareTarget {
    fn receive(&mut self, encoded: &[u8], title: &str) -> Result<(), String>;
}

/// 导出流水线。
#[derive(Debug, Clone, Copy)]
pub struct ExportPipeline {
    compression: ExportCompression,
}

impl ExportPipeline {
    pub fn new(compression: ExportCompression) -> Self {
        Self { compression }
    }

    /// 将呈现缓冲编码为 PNG 字节流，双轴密度已知时嵌入 pHYs。
    pub fn encode(&self, request: &ExportRequest) -> Result<Vec<u8>, ViewerError> {
        let buffer = &request.buffer;
        let expected_len = (buffer.width as usize)
            .checked_mul(buffer.height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ViewerError::SaveFailure("导出缓冲尺寸溢出".to_string()))?;

        if buffer.bytes.len() != expected_len {
            return Err(ViewerError::SaveFailure(format!(
                "导出缓冲长度异常：{}（期望 {}）",
                buffer.bytes.len(),
                expected_len
            )));
        }

        // BGRA → RGB；alpha 恒为不透明，丢弃无损
        let mut rgb = Vec::with_capacity(buffer.pixel_count() * 3);
        for chunk in buffer.bytes.chunks_exact(4) {
            rgb.push(chunk[2]);
            rgb.push(chunk[1]);
            rgb.push(chunk[0]);
        }

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, buffer.width, buffer.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(self.compression.to_png());

        if request.dpi_x > 0.0 && request.dpi_y > 0.0 {
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: dpi_to_pixels_per_meter(request.dpi_x),
                yppu: dpi_to_pixels_per_meter(request.dpi_y),
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder
            .write_header()
            .map_err(|e| ViewerError::SaveFailure(format!("PNG 头写入失败：{}", e)))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| ViewerError::SaveFailure(format!("PNG 编码失败：{}", e)))?;
        writer
            .finish()
            .map_err(|e| ViewerError::SaveFailure(format!("PNG 收尾失败：{}", e)))?;

        Ok(out)
    }

    /// 编码并写入文件。
    pub fn save_to_file(&self, request: &ExportRequest, path: &Path) -> Result<(), ViewerError> {
        log::info!("💾 保存 PNG - 路径: {}", path.display());

        let encoded = self.encode(request)?;
        std::fs::write(path, &encoded)
            .map_err(|e| ViewerError::SaveFailure(format!("无法写入 {}：{}", path.display(), e)))?;

        log::info!("✅ 保存完成 - {} 字节", encoded.len());
        Ok(())
    }

    /// 编码并交给剪贴板目标。
    pub fn copy_to_clipboard(
        &self,
        request: &ExportRequest,
        target: &mut dyn ClipboardTarget,
    ) -> Result<(), ViewerError> {
        log::info!(
            "📋 复制到剪贴板 - {}x{}",
            request.buffer.width,
            request.buffer.height
        );

        let encoded = self.encode(request)?;
        target
            .receive(&encoded, &request.title_hint)
            .map_err(ViewerError::ClipboardFailure)
    }

    /// 编码并交给分享目标，失败不重试。
    pub fn share(
        &self,
        request: &ExportRequest,
        target: &mut dyn ShareTarget,
    ) -> Result<(), ViewerError> {
        log::info!("📤 分享 - 标题: {}", request.title_hint);

        let encoded = self.encode(request)?;
        target
            .receive(&encoded, &request.title_hint)
            .map_err(ViewerError::ShareFailure)
    }

    /// 由输入文件名派生默认输出路径：扩展名替换为 `.png`。
    pub fn default_output_path(input: &Path) -> PathBuf {
        input.with_extension("png")
    }
}

/// 每英寸像素数 → pHYs 的每米像素数。
fn dpi_to_pixels_per_meter(dpi: f32) -> u32 {
    ((dpi as f64) * 10_000.0 / 254.0).round() as u32
}

/// 系统剪贴板适配：解包编码流并以原始像素写入。
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl ClipboardTarget for SystemClipboard {
    fn receive(&mut self, encoded: &[u8], _title: &str) -> Result<(), String> {
        let decoder = png::Decoder::new(std::io::Cursor::new(encoded));
        let mut reader = decoder
            .read_info()
            .map_err(|e| format!("解析导出流失败：{}", e))?;

        let mut data = vec![0u8; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut data)
            .map_err(|e| format!("解析导出流失败：{}", e))?;
        data.truncate(info.buffer_size());

        // 剪贴板接口要求 RGBA
        let mut rgba = Vec::with_capacity(data.len() / 3 * 4);
        for chunk in data.chunks_exact(3) {
            rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 0xFF]);
        }

        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("无法打开剪贴板：{}", e))?;
        clipboard
            .set_image(arboard::ImageData {
                width: info.width as usize,
                height: info.height as usize,
                bytes: rgba.into(),
            })
            .map_err(|e| format!("写入剪贴板失败：{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: u32, height: u32, dpi_x: f32, dpi_y: f32) -> ExportRequest {
        ExportRequest {
            buffer: DisplayBuffer {
                width,
                height,
                bytes: vec![0x80; (width * height * 4) as usize],
            },
            dpi_x,
            dpi_y,
            title_hint: "test.scr".to_string(),
        }
    }

    #[test]
    fn dpi_to_pixels_per_meter_rounds_to_nearest() {
        assert_eq!(dpi_to_pixels_per_meter(100.0), 3937);
        assert_eq!(dpi_to_pixels_per_meter(50.0), 1969);
        assert_eq!(dpi_to_pixels_per_meter(96.0), 3780);
    }

    #[test]
    fn unknown_density_omits_the_phys_chunk() {
        let pipeline = ExportPipeline::new(ExportCompression::Fast);
        let encoded = pipeline
            .encode(&request(2, 2, 0.0, 0.0))
            .expect("encode should succeed");

        let decoder = png::Decoder::new(std::io::Cursor::new(encoded));
        let reader = decoder.read_info().expect("decode header should succeed");

        assert!(reader.info().pixel_dims.is_none());
    }

    #[test]
    fn partially_known_density_also_omits_the_phys_chunk() {
        let pipeline = ExportPipeline::new(ExportCompression::Fast);
        let encoded = pipeline
            .encode(&request(2, 2, 100.0, 0.0))
            .expect("encode should succeed");

        let decoder = png::Decoder::new(std::io::Cursor::new(encoded));
        let reader = decoder.read_info().expect("decode header should succeed");

        assert!(reader.info().pixel_dims.is_none());
    }

    #[test]
    fn inconsistent_buffer_length_fails_with_save_failure() {
        let pipeline = ExportPipeline::new(ExportCompression::Balanced);
        let mut bad = request(2, 2, 0.0, 0.0);
        bad.buffer.bytes.pop();

        let result = pipeline.encode(&bad);

        assert!(matches!(result, Err(ViewerError::SaveFailure(_))));
    }

    #[test]
    fn default_output_path_replaces_the_extension() {
        assert_eq!(
            ExportPipeline::default_output_path(Path::new("gallery/picture.scr")),
            PathBuf::from("gallery/picture.png")
        );
        assert_eq!(
            ExportPipeline::default_output_path(Path::new("noext")),
            PathBuf::from("noext.png")
        );
    }
}
