use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：3 <= x <= 150
    let len = username.chars().count();
    if !(3..=150).contains(&len) {
        return Err("Username length must be between 3 and 150 characters");
    }
    // 只能包含字母、数字以及 . @ + - _
    if !USERNAME_RE.is_match(username) {
        return Err("Username may contain only letters, numbers and . @ + - _ characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Enter a valid email address");
    }
    Ok(())
}

/// 规范化邮箱：去除首尾空白，域名部分转小写
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Qwerty123",
        "Abcd1234",
        "Welcome1",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 校验两次输入的新密码，返回按字段分组的错误
pub fn validate_password_pair(password: &str, password2: &str) -> Vec<(&'static str, String)> {
    let mut errors = Vec::new();
    if password != password2 {
        errors.push(("password2", "Password fields didn't match.".to_string()));
    }
    let result = validate_password(password);
    if !result.is_valid {
        for msg in result.errors {
            errors.push(("password", msg.to_string()));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b@c+d-e_f").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@Example.COM "), "Bob@example.com");
        assert_eq!(normalize_email("plain"), "plain");
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_weak_passwords() {
        let short = validate_password("Ab1");
        assert!(
            short
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert!(!validate_password("abcd1234").is_valid);
        assert!(!validate_password("ABCD1234").is_valid);
        assert!(!validate_password("AbcdEfgh").is_valid);
        assert!(
            validate_password("Password1")
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_password_pair() {
        assert!(validate_password_pair("SecurePass123", "SecurePass123").is_empty());
        let errors = validate_password_pair("SecurePass123", "SecurePass124");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "password2");
        let weak = validate_password_pair("short", "short");
        assert!(weak.iter().all(|(field, _)| *field == "password"));
    }
}
