use actix_web::{HttpMessage, HttpRequest};

use crate::models::users::entities::User;

/// 请求调用者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated {
        user_id: i64,
        is_staff: bool,
        is_superuser: bool,
    },
}

impl Caller {
    pub fn from_user(user: &User) -> Self {
        Caller::Authenticated {
            user_id: user.id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }

    /// 从请求扩展中读取 JWT 中间件写入的用户；没有则视为匿名
    pub fn from_request(req: &HttpRequest) -> Self {
        req.extensions()
            .get::<User>()
            .map(Self::from_user)
            .unwrap_or(Caller::Anonymous)
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated { .. })
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Caller::Authenticated { is_staff: true, .. })
    }

    pub fn is_superuser(&self) -> bool {
        matches!(
            self,
            Caller::Authenticated {
                is_superuser: true,
                ..
            }
        )
    }

    /// 调用者是否为指定用户本人
    pub fn is(&self, user_id: i64) -> bool {
        self.user_id() == Some(user_id)
    }
}
