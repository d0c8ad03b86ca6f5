// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 从环境变量加载的类型化应用配置
pub mod config;

/// 领域模块
///
/// 核心业务实体、用户编排服务及后端协作者接口
pub mod domain;

/// 基础设施模块
///
/// 数据库、缓存、指标存储、消息代理和服务注册中心的具体客户端
pub mod infrastructure;

/// 表现层模块
///
/// HTTP处理器、路由、中间件和错误映射
pub mod presentation;

/// 工具模块
///
/// 日志遥测初始化等共享工具
pub mod utils;
