pub mod catalog;
pub mod client;
pub mod download;
pub mod papermc;
pub mod purpurmc;
pub mod static_path;

pub use client::HttpConfig;
pub use download::HttpDownloader;
pub use papermc::PaperMcProvider;
pub use purpurmc::PurpurMcProvider;
pub use static_path::StaticPathProvider;
