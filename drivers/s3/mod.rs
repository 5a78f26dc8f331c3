//! S3对象存储驱动
//!
//! 兼容 Cloudflare R2、AWS S3、MinIO 等 S3 协议的对象存储

pub mod config;
pub mod driver;
pub mod factory;

pub use config::S3Config;
pub use driver::S3Driver;
pub use factory::S3DriverFactory;
