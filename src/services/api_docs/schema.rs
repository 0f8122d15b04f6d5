//! 机读路由目录，新增路由时需同步此表

use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::api::{ApiSchemaResponse, RouteDescriptor};

macro_rules! routes {
    ($( $method:literal $path:literal, $access:literal, $tag:literal, $summary:literal; )*) => {
        &[$(RouteDescriptor {
            method: $method,
            path: $path,
            summary: $summary,
            access: $access,
            tag: $tag,
        },)*]
    };
}

pub const ROUTE_CATALOG: &[RouteDescriptor] = routes! {
    "GET" "/api/v1/", "authenticated", "docs", "Welcome document with entry points";
    "GET" "/api/v1/schema", "authenticated", "docs", "Machine-readable route catalog";

    "POST" "/api/v1/auth/register", "public", "auth", "Register a new account";
    "POST" "/api/v1/auth/login", "public", "auth", "Obtain an access/refresh token pair";
    "POST" "/api/v1/auth/refresh", "public", "auth", "Exchange a refresh token for an access token";
    "POST" "/api/v1/auth/logout", "authenticated", "auth", "Clear the refresh token cookie";
    "GET" "/api/v1/auth/me", "authenticated", "auth", "Current user profile";
    "POST" "/api/v1/auth/change-password", "authenticated", "auth", "Change own password";
    "POST" "/api/v1/auth/password-reset", "public", "auth", "Request a password reset link";
    "POST" "/api/v1/auth/password-reset/{uid}/{token}", "public", "auth", "Set a new password with a reset token";

    "GET" "/api/v1/users", "staff", "users", "List user accounts";
    "GET" "/api/v1/users/{id}", "self_or_staff", "users", "Retrieve a user account";
    "PATCH" "/api/v1/users/{id}", "superuser", "users", "Change account privileges";

    "GET" "/api/v1/topics", "public", "catalog", "List topics";
    "POST" "/api/v1/topics", "staff", "catalog", "Create a topic";
    "GET" "/api/v1/topics/{id}", "public", "catalog", "Retrieve a topic with its videos and tasks";
    "PUT" "/api/v1/topics/{id}", "staff", "catalog", "Replace a topic";
    "PATCH" "/api/v1/topics/{id}", "staff", "catalog", "Partially update a topic";
    "DELETE" "/api/v1/topics/{id}", "staff", "catalog", "Delete a topic and its contents";
    "GET" "/api/v1/topics/{id}/videos", "authenticated", "catalog", "Topic with its videos";
    "GET" "/api/v1/topics/{id}/tasks", "authenticated", "catalog", "Topic with its tasks";

    "GET" "/api/v1/videos", "public", "catalog", "List videos";
    "POST" "/api/v1/videos", "staff", "catalog", "Create a video";
    "GET" "/api/v1/videos/{id}", "public", "catalog", "Retrieve a video";
    "PUT" "/api/v1/videos/{id}", "staff", "catalog", "Replace a video";
    "PATCH" "/api/v1/videos/{id}", "staff", "catalog", "Partially update a video";
    "DELETE" "/api/v1/videos/{id}", "staff", "catalog", "Delete a video";

    "GET" "/api/v1/tasks", "public", "catalog", "List tasks";
    "POST" "/api/v1/tasks", "staff", "catalog", "Create a task";
    "GET" "/api/v1/tasks/{id}", "public", "catalog", "Retrieve a task";
    "PUT" "/api/v1/tasks/{id}", "staff", "catalog", "Replace a task";
    "PATCH" "/api/v1/tasks/{id}", "staff", "catalog", "Partially update a task";
    "DELETE" "/api/v1/tasks/{id}", "staff", "catalog", "Delete a task and its submissions";

    "GET" "/api/v1/submissions", "authenticated", "submissions", "List own submissions, or all for staff";
    "POST" "/api/v1/submissions", "authenticated", "submissions", "Submit an answer to a task";
    "GET" "/api/v1/submissions/{id}", "owner_or_staff", "submissions", "Retrieve a submission";
    "PUT" "/api/v1/submissions/{id}", "owner_or_staff", "submissions", "Replace a submission; grade is staff-only";
    "PATCH" "/api/v1/submissions/{id}", "owner_or_staff", "submissions", "Partially update a submission; grade is staff-only";
    "DELETE" "/api/v1/submissions/{id}", "owner_or_staff", "submissions", "Delete a submission";

    "POST" "/api/v1/files/upload", "authenticated", "files", "Upload a single file";
    "GET" "/api/v1/files/{token}", "authenticated", "files", "Download a file by token";
};

pub async fn get_schema() -> ActixResult<HttpResponse> {
    let response = ApiSchemaResponse {
        title: "CourseHub API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routes: ROUTE_CATALOG.to_vec(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "OK")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_no_duplicates() {
        let mut seen = HashSet::new();
        for route in ROUTE_CATALOG {
            assert!(
                seen.insert((route.method, route.path)),
                "duplicate route {} {}",
                route.method,
                route.path
            );
        }
    }

    #[test]
    fn test_catalog_access_levels_are_known() {
        const KNOWN: &[&str] = &[
            "public",
            "authenticated",
            "staff",
            "owner_or_staff",
            "self_or_staff",
            "superuser",
        ];
        assert!(ROUTE_CATALOG.iter().all(|r| KNOWN.contains(&r.access)));
    }
}
