//! # 复古图像查看流水线 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 宿主外壳（窗口 / 选择器 / 分享面板）        │
//! │                                                          │
//! │  打开文件 ── 步进浏览 ── 导出动作                          │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ ViewerSession API（Result<T, ViewerError>）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            流水线（本库）                         │
//! │                                                          │
//! │  ┌─ loader ───── 带上限的字节加载（TooLarge 先于 I/O）      │
//! │  │                                                       │
//! │  ├─ decoder ──── 注入的外部解码器 + 输出不变量复查          │
//! │  │                                                       │
//! │  ├─ pixels ───── 0x00RRGGBB → BGRA 呈现缓冲               │
//! │  ├─ aspect ───── 像素密度 → 逐轴缩放                      │
//! │  ├─ navigation ─ 同级集合 + 控件可用性纯投影               │
//! │  ├─ export ───── PNG 重编码（pHYs 密度往返）              │
//! │  └─ session ──── 代数化异步解码 + 单活跃视图               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`viewer`] | 获取 → 解码 → 呈现 → 导出的完整链路与全部公开类型 |
//!
//! 外部解码器（数百种古董平台格式的识别与像素提取）是注入的能力接口，
//! 本库只负责它周围的采集、转换、浏览与导出语义。

pub mod viewer;
