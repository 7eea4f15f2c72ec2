//! Auth Level Value Object
//!
//! ユーザーの権限レベル。数値が大きいほど権限が強い。
//!
//! ## 不変条件
//! - 非負の整数のみ
//! - レベル 0 は「権限なし」（匿名ユーザーと同等）
//! - ルートの要求レベル以上であればアクセス可能

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Permission level carried by an authenticated user
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AuthLevel(u64);

impl AuthLevel {
    /// No permissions
    pub const NONE: AuthLevel = AuthLevel(0);

    pub const fn new(level: u64) -> Self {
        Self(level)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Whether this level meets `required`
    pub const fn satisfies(&self, required: u64) -> bool {
        self.0 >= required
    }

    /// Read a level out of loosely typed JSON
    ///
    /// Accepts non-negative integers, including integral floats such as
    /// `1000.0`. Anything else yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(level) = value.as_u64() {
            return Some(Self(level));
        }
        match value.as_f64() {
            Some(level) if level >= 0.0 && level.fract() == 0.0 && level <= u64::MAX as f64 => {
                Some(Self(level as u64))
            }
            _ => None,
        }
    }
}

impl From<u64> for AuthLevel {
    fn from(level: u64) -> Self {
        Self(level)
    }
}

impl fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
