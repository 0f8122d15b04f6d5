use serde::Deserialize;
use ts_rs::TS;

// 创建用户（存储层使用，密码已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// 更新用户（存储层使用）
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

// 修改用户权限（来自HTTP请求，仅超级管理员）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateUserPrivilegesRequest {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateUserPrivilegesRequest {
    pub fn is_empty(&self) -> bool {
        self.is_staff.is_none() && self.is_superuser.is_none() && self.is_active.is_none()
    }
}

impl From<UpdateUserPrivilegesRequest> for UpdateUserRequest {
    fn from(req: UpdateUserPrivilegesRequest) -> Self {
        Self {
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
            is_active: req.is_active,
            ..Default::default()
        }
    }
}

// 用户列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub is_staff: Option<bool>,
}
