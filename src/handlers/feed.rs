use actix_web::error::QueryPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CallerIdentity;
use crate::services::FeedService;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default = "default_page")]
    pub page: u32,
    pub limit: Option<u32>,
    pub cursor: Option<Uuid>,
}

fn default_page() -> u32 {
    1
}

impl FeedQueryParams {
    /// Validate the parameters and fill in the configured default limit.
    pub(crate) fn resolve(&self, default_limit: u32, max_limit: u32) -> Result<(u32, u32)> {
        if self.page < 1 {
            return Err(AppError::Validation(
                "page must be 1 or greater".to_string(),
            ));
        }
        let limit = self.limit.unwrap_or(default_limit);
        if limit < 1 || limit > max_limit {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                max_limit
            )));
        }
        Ok((self.page, limit))
    }
}

/// Map query-string deserialization failures onto the JSON error body.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

pub struct FeedHandlerState {
    pub feed: Arc<FeedService>,
    pub default_limit: u32,
    pub max_limit: u32,
}

pub async fn get_feed(
    query: web::Query<FeedQueryParams>,
    caller: CallerIdentity,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let (page, limit) = query.resolve(state.default_limit, state.max_limit)?;

    debug!(
        "Feed request: user={} page={} limit={} cursor={:?}",
        caller.0, page, limit, query.cursor
    );

    let response = state
        .feed
        .personalized_feed(&caller.0, page, limit, query.cursor)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};

    #[test]
    fn validates_page_lower_bound() {
        let params = FeedQueryParams {
            page: 0,
            limit: Some(50),
            cursor: None,
        };
        assert!(matches!(
            params.resolve(50, 100),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn validates_limit_bounds() {
        let too_big = FeedQueryParams {
            page: 1,
            limit: Some(101),
            cursor: None,
        };
        assert!(matches!(
            too_big.resolve(50, 100),
            Err(AppError::Validation(_))
        ));

        let zero = FeedQueryParams {
            page: 1,
            limit: Some(0),
            cursor: None,
        };
        assert!(matches!(zero.resolve(50, 100), Err(AppError::Validation(_))));

        let ok = FeedQueryParams {
            page: 3,
            limit: Some(100),
            cursor: None,
        };
        assert_eq!(ok.resolve(50, 100).unwrap(), (3, 100));
    }

    #[test]
    fn absent_limit_falls_back_to_configured_default() {
        let params = FeedQueryParams {
            page: 1,
            limit: None,
            cursor: None,
        };
        assert_eq!(params.resolve(20, 100).unwrap(), (1, 20));
        assert_eq!(params.resolve(50, 100).unwrap(), (1, 50));
    }

    #[actix_web::test]
    async fn malformed_query_yields_json_validation_error() {
        async fn echo_params(_q: web::Query<FeedQueryParams>) -> HttpResponse {
            HttpResponse::Ok().finish()
        }

        let app = actix_test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .route("/feed", web::get().to(echo_params)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/feed?limit=abc")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().contains("Validation"));
    }
}
