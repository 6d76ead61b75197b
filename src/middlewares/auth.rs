use crate::error::AppError;
use crate::utils::{JwtService, SessionClaims};
use actix_web::http::{Method, header};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// Routes that need a signed-in user. Everything else passes through.
struct ProtectedPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl ProtectedPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/api/courses", "/api/auth/session", "/api/auth/logout"],
            prefix_paths: vec![
                "/api/courses/",
                "/api/dashboard/",
                "/api/user/",
                "/api/admin/",
            ],
        }
    }

    fn is_protected(&self, path: &str) -> bool {
        if is_public_plans_path(path) {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

/// `/api/courses/<slug>/plans` is browsable before sign-in.
fn is_public_plans_path(path: &str) -> bool {
    path.strip_prefix("/api/courses/")
        .and_then(|rest| rest.strip_suffix("/plans"))
        .is_some_and(|slug| !slug.is_empty() && !slug.contains('/'))
}

pub struct SessionMiddleware {
    jwt_service: JwtService,
    cookie_name: String,
}

impl SessionMiddleware {
    pub fn new(jwt_service: JwtService, cookie_name: impl Into<String>) -> Self {
        Self {
            jwt_service,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            cookie_name: self.cookie_name.clone(),
            protected_paths: ProtectedPaths::new(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    cookie_name: String,
    protected_paths: ProtectedPaths,
}

impl<S> SessionMiddlewareService<S> {
    /// The session cookie wins; a bearer header is accepted for API clients.
    fn session_token(&self, req: &ServiceRequest) -> Option<String> {
        if let Some(cookie) = req.cookie(&self.cookie_name) {
            return Some(cookie.value().to_string());
        }

        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
    }
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS || !self.protected_paths.is_protected(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let Some(token) = self.session_token(&req) else {
            let error = AppError::AuthError("Missing session".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        match self.jwt_service.verify_session_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(_) => {
                log::debug!("Rejected session token on {}", req.path());
                let error = AppError::AuthError("Invalid session".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// Claims the middleware verified for this request, if any.
pub fn session_claims(req: &impl HttpMessage) -> Option<SessionClaims> {
    req.extensions().get::<SessionClaims>().cloned()
}
