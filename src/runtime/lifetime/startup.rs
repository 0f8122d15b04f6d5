use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::{AdminConfig, AppConfig};
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use crate::utils::validate::normalize_email;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn construct_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
pub(crate) async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = construct_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = construct_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 管理员密码：未配置时随机生成并打印
fn admin_password(admin: &AdminConfig) -> String {
    if !admin.password.is_empty() {
        return admin.password.clone();
    }
    let pwd = generate_password();
    warn!("==========================================================");
    warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
    warn!("  Generated admin password: {}", pwd);
    warn!("  Please save this password or set ADMIN_PASSWORD env var");
    warn!("==========================================================");
    pwd
}

/// 初始化超级管理员账号
///
/// 邮箱和用户名都不存在时创建；已存在且 `force_update` 打开时覆盖密码并提升为超级管理员。
pub(crate) async fn seed_superuser(storage: &dyn Storage, admin: &AdminConfig) {
    let email = normalize_email(&admin.email);

    let existing = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => match storage.get_user_by_username(&admin.username).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Failed to look up admin account: {}, skipping seed", e);
                return;
            }
        },
        Err(e) => {
            warn!("Failed to look up admin account: {}, skipping seed", e);
            return;
        }
    };

    if let Some(user) = &existing
        && !admin.force_update
    {
        debug!(
            "Admin account already exists (ID: {}), skipping seed",
            user.id
        );
        return;
    }

    let password_hash = match hash_password(&admin_password(admin)) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping seed", e);
            return;
        }
    };

    match existing {
        Some(user) => {
            let update = UpdateUserRequest {
                password_hash: Some(password_hash),
                is_staff: Some(true),
                is_superuser: Some(true),
                is_active: Some(true),
                ..Default::default()
            };
            match storage.update_user(user.id, update).await {
                Ok(_) => info!(
                    "Admin account {} updated and promoted to superuser",
                    user.username
                ),
                Err(e) => warn!("Failed to update admin account: {}", e),
            }
        }
        None => {
            let request = CreateUserRequest {
                email,
                username: admin.username.clone(),
                password_hash,
                is_staff: true,
                is_superuser: true,
            };
            match storage.create_user(request).await {
                Ok(user) => info!(
                    "Superuser created successfully (ID: {}, username: {})",
                    user.id, user.username
                ),
                Err(e) => warn!("Failed to create admin account: {}", e),
            }
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和管理员账号
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    crate::cache::register::register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_superuser(storage.as_ref(), &AppConfig::get().admin).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support;
    use crate::utils::password::verify_password;

    fn admin(force_update: bool) -> AdminConfig {
        AdminConfig {
            email: "Root@Example.com".to_string(),
            username: "root".to_string(),
            password: "Sup3rSecret!".to_string(),
            force_update,
        }
    }

    #[tokio::test]
    async fn test_seed_creates_superuser() {
        let storage = test_support::storage().await;
        seed_superuser(&storage, &admin(false)).await;

        let user = storage
            .get_user_by_email("root@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(user.is_superuser && user.is_staff);
        assert!(verify_password("Sup3rSecret!", &user.password_hash));
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_without_force() {
        let storage = test_support::storage().await;
        let existing = test_support::user(&storage, "root", false).await;
        seed_superuser(&storage, &admin(false)).await;

        let user = storage.get_user_by_id(existing.id).await.unwrap().unwrap();
        assert!(!user.is_superuser);
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_force_update_promotes() {
        let storage = test_support::storage().await;
        let existing = test_support::user(&storage, "root", false).await;
        seed_superuser(&storage, &admin(true)).await;

        let user = storage.get_user_by_id(existing.id).await.unwrap().unwrap();
        assert!(user.is_superuser && user.is_staff);
        assert!(verify_password("Sup3rSecret!", &user.password_hash));
    }
}
