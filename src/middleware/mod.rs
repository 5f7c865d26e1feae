/// HTTP middleware for the feed service.
///
/// Requests arrive through the gateway, which terminates authentication and
/// forwards the caller's external identifier in the `x-user-id` header. The
/// middleware here only lifts that identifier into request extensions so
/// handlers can extract it; token validation stays at the edge.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

const CALLER_HEADER: &str = "x-user-id";

/// Caller identifier stored in request extensions by [`CallerIdentityMiddleware`].
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

/// Actix middleware that requires the gateway-injected caller header.
pub struct CallerIdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CallerIdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CallerIdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallerIdentityMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct CallerIdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CallerIdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let caller = req
                .headers()
                .get(CALLER_HEADER)
                .and_then(|h| h.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
                .ok_or_else(|| ErrorUnauthorized("Missing x-user-id header"))?;

            req.extensions_mut().insert(CallerIdentity(caller));

            service.call(req).await
        })
    }
}

impl FromRequest for CallerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CallerIdentity>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Caller identity missing")),
        )
    }
}
