//! Persistence adapters: JSON poll store and filesystem download target.

pub mod fs_download;
pub mod poll_json;

pub use fs_download::FsDownload;
pub use poll_json::PollJsonStore;
