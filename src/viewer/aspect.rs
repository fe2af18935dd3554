//! # 宽高比校正模块
//!
//! ## 设计思路
//!
//! 古董平台经常存储物理上非方形的像素（例如横向加倍），呈现时需要一对
//! 缩放因子来还原原始宽高比。只缩小、不放大：放大会糊，缩小密度较高的
//! 那根轴即可达到同样的比例。
//!
//! ## 实现思路
//!
//! - 任一密度为 0（或非法值）即视为未知，按方形像素处理，两轴均取
//!   参考密度。
//! - 两轴密度都已知时取 r = min/max，密度较大的轴缩到 r，另一轴保持 1。

use serde::Serialize;

/// 呈现时的逐轴缩放与有效密度。
///
/// `scale_x` / `scale_y` 落在 (0,1]，且恰有一个等于 1。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryMeta {
    pub scale_x: f32,
    pub scale_y: f32,
    /// 呈现表面需要绝对密度时使用的横轴值。
    pub dpi_x: f32,
    /// 呈现表面需要绝对密度时使用的纵轴值。
    pub dpi_y: f32,
}

/// 由解码器上报的像素密度计算显示缩放。
///
/// `x_density` / `y_density` 单位为每英寸像素数，0 表示未知。
pub fn compute_scale(x_density: f32, y_density: f32, reference_dpi: f32) -> GeometryMeta {
    let x_known = x_density.is_finite() && x_density > 0.0;
    let y_known = y_density.is_finite() && y_density > 0.0;

    if !x_known || !y_known {
        return GeometryMeta {
            scale_x: 1.0,
            scale_y: 1.0,
            dpi_x: reference_dpi,
            dpi_y: reference_dpi,
        };
    }

    let (scale_x, scale_y) = if x_density > y_density {
        (y_density / x_density, 1.0)
    } else if y_density > x_density {
        (1.0, x_density / y_density)
    } else {
        (1.0, 1.0)
    };

    GeometryMeta {
        scale_x,
        scale_y,
        dpi_x: x_density,
        dpi_y: y_density,
    }
}
