//! Download-and-relay pipeline: external tool invocation, scoped temporary
//! workspaces, format probing, and the orchestrator that streams downloaded
//! artifacts to the remote upload endpoint.

pub mod error;
pub mod formats;
pub mod relay;
pub mod tool;
pub mod workspace;

pub use error::PipelineError;
pub use formats::{FormatDescriptor, FormatLister};
pub use relay::{DownloadRequest, Relay, RelayConfig, UploadResult, DEFAULT_FORMAT_SELECTOR};
pub use tool::{ToolOutput, ToolRunner};
pub use workspace::Workspace;
