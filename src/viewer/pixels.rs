//! # 像素转换模块
//!
//! ## 设计思路
//!
//! 解码器输出 0x00RRGGBB 打包像素，而呈现表面的原生格式是 BGRA 字节序，
//! 因此需要一次精确的逐字节重排：不舍入、不做色彩空间变换、一对一映射，
//! alpha 恒为 0xFF（源格式不携带透明度）。
//!
//! ## 实现思路
//!
//! 先校验像素数量与尺寸一致（防御性，解码契约本应保证），再按行主序
//! 写出 4 字节/像素的紧凑缓冲。尺寸乘积全部走 `checked_mul`，溢出一律
//! 视为数据异常。

use super::decoder::DecodedImage;
use super::ViewerError;

/// 可直接呈现的紧凑像素缓冲。
///
/// 字节序为 B,G,R,A，`bytes.len()` 恒等于 `width * height * 4`。
/// 由呈现层独占持有，每次成功解码后整体替换，绝不原位修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl DisplayBuffer {
    /// 像素总数。
    pub fn pixel_count(&self) -> usize {
        self.bytes.len() / 4
    }
}

/// 将解码输出转换为呈现缓冲。
///
/// 像素数量与尺寸不一致时返回 [`ViewerError::MalformedImage`]，
/// 绝不越界读取。
pub fn to_display_buffer(image: &DecodedImage) -> Result<DisplayBuffer, ViewerError> {
    let pixel_count = (image.width as u64)
        .checked_mul(image.height as u64)
        .ok_or_else(|| ViewerError::MalformedImage("图像像素数溢出".to_string()))?;

    if image.pixels.len() as u64 != pixel_count {
        return Err(ViewerError::MalformedImage(format!(
            "像素数量与尺寸不一致：{}（期望 {}x{} = {}）",
            image.pixels.len(),
            image.width,
            image.height,
            pixel_count
        )));
    }

    let byte_len = pixel_count
        .checked_mul(4)
        .filter(|len| *len <= usize::MAX as u64)
        .ok_or_else(|| ViewerError::MalformedImage("缓冲尺寸溢出".to_string()))?
        as usize;

    let mut bytes = Vec::with_capacity(byte_len);
    for &rgb in &image.pixels {
        bytes.push(rgb as u8); // blue
        bytes.push((rgb >> 8) as u8); // green
        bytes.push((rgb >> 16) as u8); // red
        bytes.push(0xFF);
    }

    Ok(DisplayBuffer {
        width: image.width,
        height: image.height,
        bytes,
    })
}
