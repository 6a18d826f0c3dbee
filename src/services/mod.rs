// 上传流水线依赖的外部协作方：文档库、分析服务、通知
pub mod analysis;
pub mod notify;
pub mod registry;

pub use analysis::{AnalysisError, AnalysisResult, AnalysisTrigger, Sentiment, SimulatedAnalyzer};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notification, NotificationKind, NotificationSink};
pub use registry::{DocumentRegistry, InMemoryRegistry, RegisteredDocument, RegistryError};
