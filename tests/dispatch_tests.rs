//! Integration tests for the breadcrumb dispatch protocol
//!
//! Every test runs complete requests through the shop site in `common`.

mod common;

use common::shop;
use http::{Method, StatusCode};
use view_breadcrumbs::*;

// ============================================================================
// Trail shape
// ============================================================================

#[test]
fn test_single_level_trail() {
    let shop = shop();
    let trail = shop.trail("/customers/");

    assert_eq!(trail.len(), 1);
    assert_eq!(trail.titles(), ["Customers"]);
    assert_eq!(trail.urls(), [Some("/customers/")]);
}

#[test]
fn test_single_level_keeps_requested_query() {
    let shop = shop();
    let response = shop.get_with_query("/customers/", "page=3").unwrap();
    let trail = response.breadcrumbs("breadcrumbs").unwrap();
    assert_eq!(trail.urls(), [Some("/customers/?page=3")]);
}

#[test]
fn test_order_example() {
    let shop = shop();
    let trail = shop.trail("/orders/42/");

    assert_eq!(trail.titles(), ["Customers", "Order #42"]);
    assert_eq!(trail.urls(), [Some("/customers/"), Some("/orders/42/")]);
}

#[test]
fn test_three_levels_root_first() {
    let shop = shop();
    let response = shop
        .get_with_query("/customers/7/orders/42/", "page=2&sort=date")
        .unwrap();
    let trail = response.breadcrumbs("breadcrumbs").unwrap();

    assert_eq!(trail.titles(), ["Customers", "Customer 7", "Order #42"]);
    assert_eq!(
        trail.urls(),
        [
            Some("/customers/"),
            Some("/customers/7/?sort=date"),
            Some("/customers/7/orders/42/?page=2&sort=date"),
        ]
    );
}

#[test]
fn test_dispatched_views_are_reported() {
    let shop = shop();
    let response = shop.get("/customers/7/orders/42/").unwrap();

    assert_eq!(response.view_dispatch_count, 1);
    assert_eq!(
        response.dispatched_views,
        [
            ViewId::new("shop.views.customer_order"),
            ViewId::new("shop.views.customer_detail"),
        ]
    );
    assert_eq!(
        shop.runs.all(),
        ["shop.views.customer_order", "shop.views.customer_detail"]
    );
}

#[test]
fn test_level_without_subject_keeps_chain() {
    let shop = shop();
    let trail = shop.trail("/catalog/sale/tv-42/");

    assert_eq!(trail.titles(), ["Catalog", "tv-42"]);
    assert_eq!(trail.urls(), [Some("/catalog/"), Some("/catalog/sale/tv-42/")]);
    assert_eq!(shop.runs.count("shop.views.sale"), 1);
}

#[test]
fn test_level_with_several_subjects() {
    let shop = shop();
    let trail = shop.trail("/compare/a1/b2/");

    assert_eq!(trail.titles(), ["Catalog", "a1", "b2"]);
    assert_eq!(trail.urls()[1], Some("/compare/a1/b2/"));
    assert_eq!(trail.urls()[2], Some("/compare/a1/b2/"));
}

#[test]
fn test_dynamic_parent() {
    let shop = shop();
    assert_eq!(shop.trail("/notes/0/").titles(), ["Note 0"]);
    assert_eq!(shop.trail("/notes/5/").titles(), ["Customers", "Note 5"]);
}

#[test]
fn test_parent_by_view_path() {
    let shop = shop();
    let trail = shop.trail("/gift-cards/");
    assert_eq!(trail.titles(), ["Customers", "Gift cards"]);
    assert_eq!(trail.urls()[0], Some("/customers/"));
}

#[test]
fn test_parent_declared_with_handler() {
    let shop = shop();
    let trail = shop.trail("/vouchers/");
    assert_eq!(trail.titles(), ["Customers", "Vouchers"]);
    assert_eq!(trail.urls(), [Some("/customers/"), Some("/vouchers/")]);
}

#[test]
fn test_class_view_ancestor() {
    let shop = shop();
    let trail = shop.trail("/dashboard/stats/");

    assert_eq!(trail.titles(), ["Dashboard (3)", "Stats"]);
    assert_eq!(shop.runs.count("shop.views.Dashboard"), 1);
}

// ============================================================================
// Ancestor bodies
// ============================================================================

#[test]
fn test_constant_subject_ancestor_is_not_executed() {
    let shop = shop();
    shop.get("/orders/42/").unwrap();

    assert_eq!(shop.runs.count("shop.views.customer_list"), 0);
    assert_eq!(shop.runs.count("shop.views.order_detail"), 1);
}

#[test]
fn test_static_subject_ancestor_is_not_executed() {
    let shop = shop();
    let trail = shop.trail("/reports/q3/");

    assert_eq!(trail.titles(), ["Reports", "q3"]);
    assert_eq!(trail.urls()[0], Some("/reports/"));
    assert_eq!(shop.runs.count("shop.views.report_list"), 0);

    // Requested directly, the body always runs.
    shop.get("/reports/").unwrap();
    assert_eq!(shop.runs.count("shop.views.report_list"), 1);
}

#[test]
fn test_forwarded_context_replaces_ancestor_body() {
    let shop = shop();
    let response = shop.get("/customers/7/invoices/3/").unwrap();
    let trail = response.breadcrumbs("breadcrumbs").unwrap();

    assert_eq!(trail.titles(), ["Customers", "Forwarded Customer", "Invoice 3"]);
    assert_eq!(trail.urls()[1], Some("/customers/7/"));
    assert_eq!(shop.runs.count("shop.views.customer_detail"), 0);
    assert_eq!(
        response.dispatched_views,
        [ViewId::new("shop.views.customer_invoice")]
    );
}

// ============================================================================
// Short circuits
// ============================================================================

#[test]
fn test_redirect_is_bit_identical() {
    let shop = shop();
    let response = shop.get("/login/").unwrap();

    assert_eq!(response, Response::redirect("/sso/"));
    assert_eq!(response.view_dispatch_count, 0);
    assert!(response.dispatched_views.is_empty());
}

#[test]
fn test_method_not_allowed_is_bit_identical() {
    let shop = shop();
    let response = shop.get("/readonly/").unwrap();
    assert_eq!(response, Response::method_not_allowed());
}

#[test]
fn test_options_request_skips_trail() {
    let shop = shop();
    let response = shop
        .router
        .handle(&Request::new(Method::OPTIONS, "/customers/"))
        .unwrap();

    assert_eq!(response, Response::template(RenderContext::new()));
    assert!(response.breadcrumbs("breadcrumbs").is_none());
}

#[test]
fn test_short_circuiting_ancestor_contributes_nothing() {
    let shop = shop();
    let response = shop.get("/checkout/").unwrap();
    let trail = response.breadcrumbs("breadcrumbs").unwrap();

    assert_eq!(trail.titles(), ["Checkout"]);
    assert_eq!(
        response.dispatched_views,
        [ViewId::new("shop.views.checkout")]
    );
}

#[test]
fn test_unrouted_path_is_not_found() {
    let shop = shop();
    let response = shop.get("/missing/").unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_plain_views_get_no_trail() {
    let shop = shop();
    let response = shop.get("/health/").unwrap();
    assert_eq!(response, Response::ok());
}

// ============================================================================
// Chain breaks
// ============================================================================

#[test]
fn test_broken_parent_fails_request() {
    let shop = shop();
    let err = shop.get("/orphans/").unwrap_err();

    assert_eq!(
        err,
        BreadcrumbError::ChainBroken {
            parent: "shop.views.deleted".to_string(),
            args: ViewArgs::positional(["1"]),
        }
    );
    assert!(err.is_chain_break());
    assert!(err.to_string().contains("shop.views.deleted"));
}

#[test]
fn test_plain_parent_breaks_chain() {
    let shop = shop();
    let err = shop.get("/status/detail/").unwrap_err();
    assert_eq!(err.broken_parent(), Some("status"));
}

#[test]
fn test_cyclic_parents_are_rejected() {
    let shop = shop();
    let err = shop.get("/loop/a/").unwrap_err();

    assert_eq!(
        err,
        BreadcrumbError::CyclicParent {
            parent: "loop_a".to_string(),
            chain: vec!["loop_a".to_string(), "loop_b".to_string()],
        }
    );
}

#[test]
fn test_same_view_with_other_arguments_is_an_ancestor() {
    let shop = shop();
    let trail = shop.trail("/categories/3/");

    assert_eq!(trail.titles(), ["Cat 1", "Cat 2", "Cat 3"]);
    assert_eq!(
        trail.urls(),
        [
            Some("/categories/1/"),
            Some("/categories/2/"),
            Some("/categories/3/"),
        ]
    );
    assert_eq!(shop.runs.count("shop.views.category"), 3);
}

#[test]
fn test_deep_category_tree_hits_depth_limit() {
    let shop = shop();
    let err = shop.get("/categories/20/").unwrap_err();

    assert_eq!(
        err,
        BreadcrumbError::DepthExceeded {
            parent: "category".to_string(),
            max_depth: 16,
        }
    );
}

#[test]
fn test_depth_limit() {
    let shop = common::shop_with_config(BreadcrumbConfig::new().max_depth(2));

    assert_eq!(shop.trail("/orders/42/").len(), 2);

    let err = shop.get("/customers/7/orders/42/").unwrap_err();
    assert_eq!(
        err,
        BreadcrumbError::DepthExceeded {
            parent: "customer_list".to_string(),
            max_depth: 2,
        }
    );
}

// ============================================================================
// Configuration and rendering
// ============================================================================

#[test]
fn test_custom_context_key() {
    let shop = common::shop_with_config(BreadcrumbConfig::new().view_context_name("trail"));
    let response = shop.get("/orders/42/").unwrap();

    assert!(response.breadcrumbs("breadcrumbs").is_none());
    assert_eq!(response.breadcrumbs("trail").unwrap().len(), 2);
}

#[test]
fn test_inclusion_context() {
    let shop = shop();
    let trail = shop.trail("/about/");
    let context = trail.inclusion_context(shop.router.config());

    assert_eq!(
        context,
        serde_json::json!({
            "breadcrumbs": [
                { "title": "Home", "url": null },
                { "title": "About", "url": "/about/" },
            ]
        })
    );
}

#[test]
fn test_middleware_sees_final_response() {
    use std::sync::{Arc, Mutex};

    let mut shop = shop();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    shop.router.add_middleware(middleware_fn(move |request, response| {
        sink.lock().unwrap().push(format!(
            "{} {}",
            request.path(),
            response.dispatched_views.len()
        ));
    }));

    shop.get("/customers/7/orders/42/").unwrap();
    shop.get("/orders/42/").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        ["/customers/7/orders/42/ 2", "/orders/42/ 1"]
    );
}
