//! 邮件投递
//!
//! 服务只依赖 [`Mailer`]；默认实现把邮件写入日志，部署时可通过
//! `web::Data<Arc<dyn Mailer>>` 注入真实的投递实现。

use async_trait::async_trait;

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<()>;
}

/// 只记录日志的投递实现
#[derive(Debug, Default, Clone)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        tracing::info!(
            "Mail to {} | {} | {}",
            message.to,
            message.subject,
            message.body
        );
        Ok(())
    }
}

/// 密码重置邮件
pub fn password_reset_message(to: &str, link: &str, system_name: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: format!("{system_name} password reset"),
        body: format!(
            "A password reset was requested for your account.\n\
             Open the following link to choose a new password:\n{link}\n\
             If you did not request this, you can ignore this message."
        ),
    }
}
