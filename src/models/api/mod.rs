use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

/// 路由描述，供客户端机读
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct RouteDescriptor {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    /// 访问要求：public / authenticated / staff / owner_or_staff / self_or_staff / superuser
    pub access: &'static str,
    pub tag: &'static str,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiSchemaResponse {
    pub title: String,
    pub version: String,
    pub routes: Vec<RouteDescriptor>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiRootResponse {
    pub message: String,
    pub username: String,
    pub endpoints: BTreeMap<String, String>,
}
