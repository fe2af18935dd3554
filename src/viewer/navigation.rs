//! # 导航控制模块
//!
//! ## 设计思路
//!
//! 维护有序的同级文件集合与当前位置，三种状态：无上下文（Empty）、
//! 单文件（Single）、多文件（Multiple）。越界的步进是“禁用”而非错误，
//! 前进/后退按钮的可用性由状态的纯投影函数给出，而不是散落的可变布尔
//! 标志，这样导航逻辑无需任何呈现表面即可单测。
//!
//! ## 实现思路
//!
//! 步进成功时返回新的当前文件，由会话层触发重新解码；失败返回 `None`。
//! 起始下标一律夹取到合法区间。

use serde::Serialize;

use super::source::SourceFile;

/// 导航状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavState {
    /// 没有任何文件上下文。
    Empty,
    /// 单文件打开，无同级枚举。
    Single,
    /// 有序集合，≥2 个条目。
    Multiple,
}

/// 前进/后退控件可用性的纯投影。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavControls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// 同级文件导航控制器。
#[derive(Debug, Default)]
pub struct NavigationController {
    files: Vec<SourceFile>,
    current_index: usize,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态。
    pub fn state(&self) -> NavState {
        match self.files.len() {
            0 => NavState::Empty,
            1 => NavState::Single,
            _ => NavState::Multiple,
        }
    }

    /// 打开单个文件（无同级枚举）。
    pub fn open(&mut self, file: SourceFile) {
        self.files = vec![file];
        self.current_index = 0;
    }

    /// 打开文件及其同级集合，起始下标夹取到合法区间。
    pub fn open_with_siblings(&mut self, files: Vec<SourceFile>, start_index: usize) {
        self.current_index = if files.is_empty() {
            0
        } else {
            start_index.min(files.len() - 1)
        };
        self.files = files;
    }

    /// 当前文件。
    pub fn current(&self) -> Option<&SourceFile> {
        self.files.get(self.current_index)
    }

    /// 前进到下一个文件；不可用时为空操作并返回 `None`。
    pub fn next(&mut self) -> Option<&SourceFile> {
        if self.controls().next_enabled {
            self.current_index += 1;
            self.current()
        } else {
            None
        }
    }

    /// 回退到上一个文件；不可用时为空操作并返回 `None`。
    pub fn previous(&mut self) -> Option<&SourceFile> {
        if self.controls().previous_enabled {
            self.current_index -= 1;
            self.current()
        } else {
            None
        }
    }

    /// 控件可用性投影。
    pub fn controls(&self) -> NavControls {
        let multiple = matches!(self.state(), NavState::Multiple);
        NavControls {
            previous_enabled: multiple && self.current_index > 0,
            next_enabled: multiple && self.current_index + 1 < self.files.len(),
        }
    }

    /// 标题栏用的“第 n 个 / 共 m 个”位置（1 起始）。
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.files.is_empty() {
            None
        } else {
            Some((self.current_index + 1, self.files.len()))
        }
    }
}
