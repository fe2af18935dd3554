//! # 查看流水线模块（viewer）
//!
//! ## 设计思路
//!
//! 该模块将“字节获取 → 解码适配 → 像素转换 → 几何校正 → 导航 → 导出”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `session`：承载会话状态，编排整条链路与代数化异步解码
//! - `loader`：负责带上限的字节加载
//! - `decoder`：外部解码器能力接口与结果规范化
//! - `pixels`：打包像素 → BGRA 呈现缓冲
//! - `aspect`：像素密度 → 显示缩放
//! - `navigation`：同级文件集合与步进控件投影
//! - `export`：PNG 重编码与保存/剪贴板/分享目标
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 宿主打开文件 / 步进
//!    ↓
//! session.rs（代数标签 + spawn_blocking）
//!    ├─ loader.rs（上限校验 + 整文件读取）
//!    ├─ decoder.rs（外部解码 + 不变量复查）
//!    ├─ pixels.rs（0x00RRGGBB → BGRA）
//!    └─ aspect.rs（密度 → 缩放因子）
//!    ↓
//! DecodeCompletion 经通道送回，apply() 做过期判定
//!    ↓
//! 呈现层消费 ViewState；导出走 export.rs 的缓冲快照
//! ```

mod aspect;
mod config;
mod decoder;
mod error;
mod export;
mod loader;
mod navigation;
mod pixels;
mod session;
mod source;

pub use aspect::{compute_scale, GeometryMeta};
pub use config::{ExportCompression, ViewerConfig};
pub use decoder::{DecodeAdapter, DecodedImage, ImageDecoder};
pub use error::ViewerError;
#[cfg(feature = "system-clipboard")]
pub use export::SystemClipboard;
pub use export::{ClipboardTarget, ExportPipeline, ExportRequest, ShareTarget};
pub use loader::ContentLoader;
pub use navigation::{NavControls, NavState, NavigationController};
pub use pixels::{to_display_buffer, DisplayBuffer};
pub use session::{ApplyOutcome, DecodeCompletion, ImageInfo, ViewState, ViewerSession};
pub use source::{RawContent, SourceFile};
