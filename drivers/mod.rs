// Driver package / 驱动包
pub mod local;
pub mod s3;

use crate::storage::StoreManager;

/// Register all drivers to StoreManager / 注册所有驱动
pub fn register_all(manager: &mut StoreManager) {
    // Register local filesystem driver / 注册本地存储驱动
    manager.register_factory(Box::new(local::LocalDriverFactory));
    // Register S3 driver (R2, S3, MinIO) / 注册S3对象存储驱动
    manager.register_factory(Box::new(s3::S3DriverFactory));
}
