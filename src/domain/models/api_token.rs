// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 已签发的访问令牌
///
/// 只保存令牌的 SHA-256 摘要，明文仅在签发时返回一次
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ApiToken {
    /// 生成新令牌
    ///
    /// # 返回值
    ///
    /// (待持久化的令牌记录, 明文令牌)
    pub fn issue(user_id: Uuid, ttl_secs: i64) -> (Self, String) {
        let plain = hex::encode(rand::random::<[u8; 32]>());
        let now = Utc::now();
        let token = Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash: Self::hash(&plain),
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        };
        (token, plain)
    }

    pub fn hash(plain: &str) -> String {
        hex::encode(Sha256::digest(plain.as_bytes()))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
