// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 用户记录
///
/// 与数据库存储一致，缓存条目和HTTP响应均原样返回。密码以明文
/// 存储和返回，仅受创建请求的长度规则约束；这是继承下来的已知
/// 缺陷，改为哈希会破坏既有消费者的契约。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

/// 待插入的用户草稿；id由数据库生成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}
