//! # 会话编排模块
//!
//! ## 设计思路
//!
//! `ViewerSession` 编排完整链路：加载 → 解码 → 像素转换 → 几何校正。
//! 解码可能很慢，绝不阻塞交互控制循环：链路在阻塞线程池上执行，
//! 结果作为带代数标签的普通值经通道送回，而不是回调。
//!
//! 导航动作可能在上一次解码完成前到达，因此每个请求携带单调递增的
//! 代数（generation）；只有代数等于最新请求的完成结果才会被采纳，
//! 其余静默丢弃——最后请求胜出，无需排队，也无需取消信号。
//!
//! ## 实现思路
//!
//! - 同一时刻至多一份“当前视图”，成功采纳时整体替换，绝不原位修改。
//! - 链路失败时保留上一次成功的画面，错误交由呈现层就地提示
//!   （导航下标照常前进，画面与下标允许暂时分离）。
//! - 导出在触发瞬间克隆缓冲快照，之后的解码完成不影响进行中的导出。

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;

use super::aspect::{compute_scale, GeometryMeta};
use super::config::ViewerConfig;
use super::decoder::{DecodeAdapter, ImageDecoder};
use super::export::{ExportPipeline, ExportRequest};
use super::loader::ContentLoader;
use super::navigation::NavigationController;
use super::pixels::{to_display_buffer, DisplayBuffer};
use super::source::SourceFile;
use super::ViewerError;

/// 状态栏信息（平台与缩放前尺寸）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub platform: String,
    pub original_width: u32,
    pub original_height: u32,
}

/// 一次成功解码派生出的完整视图。
#[derive(Debug)]
pub struct ViewState {
    pub file_name: String,
    pub buffer: DisplayBuffer,
    pub geometry: GeometryMeta,
    pub info: ImageInfo,
    /// 源图像上报的原始密度，导出时原样携带。
    pub(crate) dpi_x: f32,
    pub(crate) dpi_y: f32,
}

/// 一次解码请求的完成结果（带代数标签的普通值）。
#[derive(Debug)]
pub struct DecodeCompletion {
    generation: u64,
    file_name: String,
    outcome: Result<ViewState, ViewerError>,
}

impl DecodeCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// 采纳完成结果的三种去向。
#[derive(Debug)]
pub enum ApplyOutcome {
    /// 当前视图已整体替换。
    Updated,
    /// 链路失败；上一次成功画面保留，错误交由呈现层提示。
    Failed(ViewerError),
    /// 结果已被更新的请求取代，静默丢弃。
    Stale,
}

/// 查看会话：单活跃视图 + 代数化的异步解码。
pub struct ViewerSession {
    adapter: DecodeAdapter,
    loader: ContentLoader,
    navigation: NavigationController,
    config: ViewerConfig,
    export: ExportPipeline,
    latest_generation: u64,
    completion_tx: mpsc::UnboundedSender<DecodeCompletion>,
    completion_rx: mpsc::UnboundedReceiver<DecodeCompletion>,
    current: Option<ViewState>,
}

impl ViewerSession {
    /// 注入解码器能力并按配置创建会话。
    pub fn new(decoder: Arc<dyn ImageDecoder>, config: ViewerConfig) -> Self {
        let adapter = DecodeAdapter::new(decoder);
        let decoder_limit = adapter.max_content_length();
        let effective_limit = config
            .max_content_length
            .map_or(decoder_limit, |cap| cap.min(decoder_limit));
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            adapter,
            loader: ContentLoader::new(effective_limit),
            navigation: NavigationController::new(),
            export: ExportPipeline::new(config.export_compression),
            config,
            latest_generation: 0,
            completion_tx,
            completion_rx,
            current: None,
        }
    }

    /// 打开单个文件（无同级枚举），返回发起请求的代数。
    pub fn open(&mut self, file: SourceFile) -> u64 {
        self.navigation.open(file.clone());
        self.request_decode(file)
    }

    /// 打开文件及其同级集合；集合为空时不发起请求。
    pub fn open_with_siblings(&mut self, files: Vec<SourceFile>, start_index: usize) -> Option<u64> {
        self.navigation.open_with_siblings(files, start_index);
        let file = self.navigation.current()?.clone();
        Some(self.request_decode(file))
    }

    /// 前进到下一个文件并重新解码；控件禁用时为空操作。
    pub fn next(&mut self) -> Option<u64> {
        let file = self.navigation.next()?.clone();
        Some(self.request_decode(file))
    }

    /// 回退到上一个文件并重新解码；控件禁用时为空操作。
    pub fn previous(&mut self) -> Option<u64> {
        let file = self.navigation.previous()?.clone();
        Some(self.request_decode(file))
    }

    /// 等待下一条完成结果（发送端随会话存活，正常情况下不会关闭）。
    pub async fn next_completion(&mut self) -> Option<DecodeCompletion> {
        self.completion_rx.recv().await
    }

    /// 采纳一条完成结果。
    ///
    /// 代数不等于最新请求的结果直接判为过期丢弃，绝不触碰当前视图。
    pub fn apply(&mut self, completion: DecodeCompletion) -> ApplyOutcome {
        if completion.generation != self.latest_generation {
            log::debug!(
                "⏭️ 丢弃过期解码结果 - gen={} 最新 gen={} 文件: {}",
                completion.generation,
                self.latest_generation,
                completion.file_name
            );
            return ApplyOutcome::Stale;
        }

        match completion.outcome {
            Ok(view) => {
                log::info!(
                    "🖼️ 视图已更新 - 文件: {} 平台: {} {}x{}",
                    view.file_name,
                    view.info.platform,
                    view.buffer.width,
                    view.buffer.height
                );
                self.current = Some(view);
                ApplyOutcome::Updated
            }
            Err(err) => {
                log::warn!(
                    "⚠️ 查看链路失败 - 文件: {} 阶段: {} 错误: {}",
                    completion.file_name,
                    err.stage(),
                    err
                );
                ApplyOutcome::Failed(err)
            }
        }
    }

    /// 当前视图（尚无成功解码时为空）。
    pub fn current_view(&self) -> Option<&ViewState> {
        self.current.as_ref()
    }

    /// 导航状态（控件投影、位置信息）。
    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    /// 按当前视图构造导出请求（缓冲快照 + 源密度）。
    pub fn export_request(&self, title_hint: &str) -> Option<ExportRequest> {
        self.current.as_ref().map(|view| ExportRequest {
            buffer: view.buffer.clone(),
            dpi_x: view.dpi_x,
            dpi_y: view.dpi_y,
            title_hint: title_hint.to_string(),
        })
    }

    /// 按会话配置构造的导出流水线。
    pub fn export_pipeline(&self) -> ExportPipeline {
        self.export
    }

    /// 发起一次带代数标签的解码请求。
    fn request_decode(&mut self, file: SourceFile) -> u64 {
        self.latest_generation += 1;
        let generation = self.latest_generation;

        log::info!(
            "🎞️ 发起解码请求 - gen={} 文件: {}",
            generation,
            file.name
        );

        let adapter = self.adapter.clone();
        let loader = self.loader;
        let reference_dpi = self.config.reference_dpi;
        let tx = self.completion_tx.clone();

        tokio::task::spawn_blocking(move || {
            let file_name = file.name.clone();
            let outcome = run_pipeline(&adapter, &loader, reference_dpi, &file);
            // 接收端随会话销毁时发送失败无妨
            let _ = tx.send(DecodeCompletion {
                generation,
                file_name,
                outcome,
            });
        });

        generation
    }
}

/// 阻塞线程上执行的完整链路：加载 → 解码 → 转换 → 几何校正。
fn run_pipeline(
    adapter: &DecodeAdapter,
    loader: &ContentLoader,
    reference_dpi: f32,
    file: &SourceFile,
) -> Result<ViewState, ViewerError> {
    let total_start = Instant::now();

    let load_start = Instant::now();
    let raw = loader.load(file)?;
    let load_elapsed = load_start.elapsed();

    let decode_start = Instant::now();
    let image = adapter.decode(&file.name, &raw)?;
    let decode_elapsed = decode_start.elapsed();

    let convert_start = Instant::now();
    let buffer = to_display_buffer(&image)?;
    let geometry = compute_scale(image.x_density, image.y_density, reference_dpi);
    let convert_elapsed = convert_start.elapsed();

    log::info!(
        "✅ 查看链路完成 - load={}ms decode={}ms convert={}ms total={}ms",
        load_elapsed.as_millis(),
        decode_elapsed.as_millis(),
        convert_elapsed.as_millis(),
        total_start.elapsed().as_millis()
    );

    Ok(ViewState {
        file_name: file.name.clone(),
        buffer,
        geometry,
        info: ImageInfo {
            platform: image.platform_name.clone(),
            original_width: image.original_width,
            original_height: image.original_height,
        },
        dpi_x: image.x_density,
        dpi_y: image.y_density,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::decoder::DecodedImage;

    struct NeverCalledDecoder;

    impl ImageDecoder for NeverCalledDecoder {
        fn max_content_length(&self) -> u64 {
            128
        }

        fn decode(&self, _filename: &str, _content: &[u8]) -> Option<DecodedImage> {
            panic!("decoder must not be invoked");
        }
    }

    #[test]
    fn fresh_session_has_no_view_and_no_export_request() {
        let session = ViewerSession::new(Arc::new(NeverCalledDecoder), ViewerConfig::default());

        assert!(session.current_view().is_none());
        assert!(session.export_request("title").is_none());
    }

    #[test]
    fn empty_sibling_set_issues_no_request() {
        let mut session = ViewerSession::new(Arc::new(NeverCalledDecoder), ViewerConfig::default());

        assert!(session.open_with_siblings(Vec::new(), 0).is_none());
        assert!(session.navigation().current().is_none());
    }

    #[test]
    fn host_limit_tightens_the_decoder_limit() {
        let config = ViewerConfig {
            max_content_length: Some(64),
            ..ViewerConfig::default()
        };
        let session = ViewerSession::new(Arc::new(NeverCalledDecoder), config);

        assert_eq!(session.loader.max_content_length(), 64);
    }

    #[test]
    fn host_limit_cannot_exceed_the_decoder_limit() {
        let config = ViewerConfig {
            max_content_length: Some(4096),
            ..ViewerConfig::default()
        };
        let session = ViewerSession::new(Arc::new(NeverCalledDecoder), config);

        assert_eq!(session.loader.max_content_length(), 128);
    }
}
