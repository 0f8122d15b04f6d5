use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色（由 is_staff / is_superuser 推导）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Student,    // 普通学员
    Staff,      // 教职人员
    Superuser,  // 超级管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const STAFF: &'static str = "staff";
    pub const SUPERUSER: &'static str = "superuser";

    pub fn from_flags(is_staff: bool, is_superuser: bool) -> Self {
        match (is_staff, is_superuser) {
            (_, true) => UserRole::Superuser,
            (true, false) => UserRole::Staff,
            (false, false) => UserRole::Student,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Staff => write!(f, "{}", UserRole::STAFF),
            UserRole::Superuser => write!(f, "{}", UserRole::SUPERUSER),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::STAFF => Ok(UserRole::Staff),
            UserRole::SUPERUSER => Ok(UserRole::Superuser),
            _ => Err(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, staff, superuser"
            )),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        UserRole::from_flags(self.is_staff, self.is_superuser)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> crate::errors::Result<crate::utils::jwt::TokenPair> {
        Ok(crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role().to_string(),
            refresh_token_expiry,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_flags() {
        assert_eq!(UserRole::from_flags(false, false), UserRole::Student);
        assert_eq!(UserRole::from_flags(true, false), UserRole::Staff);
        assert_eq!(UserRole::from_flags(true, true), UserRole::Superuser);
        assert_eq!(UserRole::from_flags(false, true), UserRole::Superuser);
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [UserRole::Student, UserRole::Staff, UserRole::Superuser] {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
        assert!("teacher".parse::<UserRole>().is_err());
    }
}
