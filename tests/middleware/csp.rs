use crate::helpers::{create_test_config, create_test_config_with_report_only, test_handler};
use actix_web::{
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web, App, HttpRequest, HttpResponse,
};
use actix_web_csp_compiler::core::Scope;
use actix_web_csp_compiler::middleware::{csp_middleware, CspExtensions};

const FIREFOX_20: &str = "Mozilla/5.0 (Windows NT 6.1; rv:20.0) Gecko/20100101 Firefox/20.0";

async fn cdn_script_handler(req: HttpRequest) -> HttpResponse {
    req.add_to_csp_policy(Scope::Enforce, "script-src", ["self", "https://cdn.example.com"]);
    HttpResponse::Ok().finish()
}

async fn relaxed_report_only_handler(req: HttpRequest) -> HttpResponse {
    req.remove_from_csp_policy(Scope::ReportOnly, "script-src", ["self"]);
    HttpResponse::Ok().finish()
}

async fn conflicting_handler(req: HttpRequest) -> HttpResponse {
    req.add_to_csp_policy(Scope::ReportOnly, "script-src", ["none"]);
    HttpResponse::Ok().finish()
}

fn header_str<'a, B>(res: &'a ServiceResponse<B>, name: &str) -> Option<&'a str> {
    res.headers().get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;

    #[test]
    fn test_middleware_keeps_config() {
        let middleware = csp_middleware(create_test_config());

        let store = middleware.config().store();
        assert!(store.enforce().get_directive("default-src").is_some());
        assert!(store.enforce().get_directive("img-src").is_some());
        assert!(store.report_only().is_empty());
    }

    #[actix_web::test]
    async fn test_enforce_header() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(create_test_config()))
                .route("/", web::get().to(test_handler)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            header_str(&res, "content-security-policy"),
            Some("default-src 'self';img-src 'self' https://cdn.example.com;")
        );
        // empty report-only policy sends nothing
        assert!(header_str(&res, "content-security-policy-report-only").is_none());
    }

    #[actix_web::test]
    async fn test_both_headers() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(create_test_config_with_report_only()))
                .route("/", web::get().to(test_handler)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(
            header_str(&res, "content-security-policy"),
            Some("default-src 'self';")
        );
        assert_eq!(
            header_str(&res, "content-security-policy-report-only"),
            Some("script-src 'self';report-uri /csp-report;")
        );
    }

    #[actix_web::test]
    async fn test_prefixed_headers_for_old_agents() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(create_test_config_with_report_only()))
                .route("/", web::get().to(test_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::USER_AGENT, FIREFOX_20))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(
            header_str(&res, "x-content-security-policy"),
            Some("default-src 'self';")
        );
        assert!(header_str(&res, "x-content-security-policy-report-only").is_some());
        assert!(header_str(&res, "content-security-policy").is_none());
    }

    #[actix_web::test]
    async fn test_handler_mutations_apply_per_request() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(create_test_config_with_report_only()))
                .route("/cdn", web::get().to(cdn_script_handler))
                .route("/relaxed", web::get().to(relaxed_report_only_handler))
                .route("/", web::get().to(test_handler)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/cdn").to_request()).await;
        assert_eq!(
            header_str(&res, "content-security-policy"),
            Some("default-src 'self';script-src 'self' https://cdn.example.com;")
        );

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/relaxed").to_request()).await;
        assert_eq!(
            header_str(&res, "content-security-policy-report-only"),
            Some("report-uri /csp-report;")
        );

        // the seed is untouched by earlier requests
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            header_str(&res, "content-security-policy"),
            Some("default-src 'self';")
        );
        assert_eq!(
            header_str(&res, "content-security-policy-report-only"),
            Some("script-src 'self';report-uri /csp-report;")
        );
    }

    #[actix_web::test]
    async fn test_upstream_clear_removes_headers() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(create_test_config_with_report_only()))
                .wrap_fn(|req, srv| {
                    req.clear_csp_policy(Scope::All);
                    srv.call(req)
                })
                .route("/", web::get().to(test_handler)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(header_str(&res, "content-security-policy").is_none());
        assert!(header_str(&res, "content-security-policy-report-only").is_none());
    }

    #[actix_web::test]
    async fn test_invalid_mutation_fails_request() {
        let middleware = csp_middleware(create_test_config_with_report_only());
        let stats = middleware.config().stats().clone();

        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(conflicting_handler)),
        )
        .await;

        let err = app
            .call(test::TestRequest::get().uri("/").to_request())
            .await
            .err()
            .unwrap();

        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(err.to_string().contains("script-src"));
        assert_eq!(stats.compile_failure_count(), 1);
        assert_eq!(stats.header_count(), 0);
    }

    #[actix_web::test]
    async fn test_stats_are_recorded() {
        let middleware = csp_middleware(create_test_config_with_report_only());
        let stats = middleware.config().stats().clone();

        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(test_handler)),
        )
        .await;

        for _ in 0..3 {
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        }

        assert_eq!(stats.request_count(), 3);
        assert_eq!(stats.compile_count(), 3);
        assert_eq!(stats.compile_failure_count(), 0);
        assert_eq!(stats.header_count(), 6);
    }

    #[actix_web::test]
    async fn test_reload_takes_effect_on_next_request() {
        let middleware = csp_middleware(create_test_config());
        let config = middleware.config();

        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(test_handler)),
        )
        .await;

        config
            .reload_json(r#"{ "enforce": { "default-src": "none" } }"#)
            .unwrap();

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            header_str(&res, "content-security-policy"),
            Some("default-src 'none';")
        );
    }
}
