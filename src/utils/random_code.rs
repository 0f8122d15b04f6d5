use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的字母数字随机串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机密码（保证含大小写字母与数字）
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    let mut password = generate_random_code(13);
    password.push(rng.random_range('A'..='Z'));
    password.push(rng.random_range('a'..='z'));
    password.push(rng.random_range('0'..='9'));
    password
}

/// 一次性密码重置令牌
pub fn generate_reset_token() -> String {
    generate_random_code(48)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_random_code_shape() {
        let code = generate_random_code(20);
        assert_eq!(code.len(), 20);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            assert!(validate_password(&generate_password()).is_valid);
        }
    }
}
