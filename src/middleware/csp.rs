use crate::core::config::CspConfig;
use crate::core::store::PolicyMutations;
use crate::middleware::negotiate::negotiate;
use crate::monitoring::perf::PerformanceTimer;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::USER_AGENT,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

/// Attaches the compiled enforce and report-only policies to every response.
///
/// Per request the configured seed is copied, any [`PolicyMutations`] left in
/// the request extensions are applied (clear, remove, add), and one header
/// is set for each non-empty policy under the names the client understands.
#[derive(Clone)]
pub struct CspMiddleware {
    config: Arc<CspConfig>,
}

impl CspMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> Arc<CspConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<CspConfig>,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
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
        let config = self.config.clone();

        Box::pin(async move {
            config.stats().increment_request_count();

            let mut res = service.call(req).await?;

            let timer = PerformanceTimer::new();

            let mutations = res
                .request()
                .extensions()
                .get::<PolicyMutations>()
                .cloned();

            let store = config.compile(mutations.as_ref()).map_err(|e| {
                log::error!("CSP policy compilation failed: {}", e);
                e
            })?;

            let names = negotiate(
                res.request()
                    .headers()
                    .get(USER_AGENT)
                    .and_then(|value| value.to_str().ok()),
            );

            let headers = store.headers(&names)?;
            let response_headers = res.headers_mut();
            for (name, value) in headers {
                response_headers.insert(name, value);
                config.stats().increment_header_count();
            }

            config
                .stats()
                .add_header_generation_time(timer.elapsed().as_nanos() as usize);

            Ok(res)
        })
    }
}

#[inline]
pub fn csp_middleware(config: CspConfig) -> CspMiddleware {
    CspMiddleware::new(config)
}
