use crate::helpers::{create_test_config, test_handler};
use actix_web::{dev::Service, test, web, App, HttpRequest, HttpResponse};
use actix_web_csp_compiler::core::{PolicyMutations, Scope};
use actix_web_csp_compiler::middleware::{csp_middleware, CspExtensions};
use actix_web_csp_compiler::monitoring::CspStats;

async fn conflicting_handler(req: HttpRequest) -> HttpResponse {
    req.add_to_csp_policy(Scope::Enforce, "img-src", ["none"]);
    HttpResponse::Ok().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = CspStats::new();

        assert_eq!(stats.request_count(), 0);
        assert_eq!(stats.compile_count(), 0);
        assert_eq!(stats.compile_failure_count(), 0);
        assert_eq!(stats.header_count(), 0);
        assert_eq!(stats.policy_update_count(), 0);
        assert_eq!(stats.avg_header_generation_time_ns(), 0.0);
    }

    #[test]
    fn test_stats_follow_config_activity() {
        let config = create_test_config();

        let mut invalid = PolicyMutations::new();
        invalid.add(Scope::Enforce, "img-src", ["none"]);

        config.compile(None).unwrap();
        assert!(config.compile(Some(&invalid)).is_err());
        config
            .reload_json(r#"{ "enforce": { "default-src": "self" } }"#)
            .unwrap();

        let stats = config.stats();
        assert_eq!(stats.compile_count(), 2);
        assert_eq!(stats.compile_failure_count(), 1);
        assert_eq!(stats.policy_update_count(), 1);

        let report = stats.to_string();
        assert!(report.contains("Policies compiled: 2"));
        assert!(report.contains("Compilation failures: 1"));

        stats.reset();
        assert_eq!(stats.compile_count(), 0);
        assert_eq!(stats.compile_failure_count(), 0);
        assert_eq!(stats.policy_update_count(), 0);
    }

    #[actix_web::test]
    async fn test_average_covers_timed_passes_only() {
        let middleware = csp_middleware(create_test_config());
        let config = middleware.config();
        let stats = config.stats().clone();

        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(test_handler))
                .route("/conflict", web::get().to(conflicting_handler)),
        )
        .await;

        test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(app
            .call(test::TestRequest::get().uri("/conflict").to_request())
            .await
            .is_err());

        let mut invalid = PolicyMutations::new();
        invalid.add(Scope::Enforce, "img-src", ["none"]);
        assert!(config.compile(Some(&invalid)).is_err());
        config.compile(None).unwrap();

        assert_eq!(stats.compile_count(), 4);
        assert_eq!(stats.compile_failure_count(), 2);
        assert_eq!(stats.timed_pass_count(), 1);
        assert_eq!(
            stats.avg_header_generation_time_ns(),
            stats.header_generation_time_ns() as f64
        );

        stats.reset();
        assert_eq!(stats.timed_pass_count(), 0);
        assert_eq!(stats.avg_header_generation_time_ns(), 0.0);
    }
}
