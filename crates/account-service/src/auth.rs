//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能。调用式操作的认证依据即这里
//! 解析出的 Claims。

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use course_shared::config::AuthConfig;

use crate::error::AccountError;

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 调用方用户 ID
    pub sub: String,
    /// 显示名称
    pub name: Option<String>,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token，返回 token 与过期时间戳
    pub fn generate_token(
        &self,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<(String, i64), AccountError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_expires_in_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.map(|s| s.to_string()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AccountError::Internal(format!("JWT 生成失败: {e}")))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AccountError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        // 过期、签名错误、签发者不符等一律视为未认证
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AccountError::Unauthenticated)?;

        Ok(token_data.claims)
    }
}
