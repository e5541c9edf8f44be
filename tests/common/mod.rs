//! Test utilities for breadcrumb dispatch tests
//!
//! Provides a small shop site wired with every kind of ancestor, plus helpers
//! for counting executed view bodies.

#![allow(dead_code)]

use serde_json::json;
use std::sync::{Arc, Mutex};
use view_breadcrumbs::*;

/// Enable log output in tests (`RUST_LOG=view_breadcrumbs=trace`).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records which view bodies ran.
#[derive(Debug, Clone, Default)]
pub struct Runs(Arc<Mutex<Vec<String>>>);

impl Runs {
    pub fn record(&self, id: &str) {
        self.0.lock().unwrap().push(id.to_string());
    }

    pub fn count(&self, id: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|run| *run == id).count()
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Function view rendering a template with a context built from its arguments.
pub fn page<F>(runs: &Runs, id: &'static str, context: F) -> ViewTarget
where
    F: Fn(&ViewArgs) -> RenderContext + Send + Sync + 'static,
{
    let runs = runs.clone();
    ViewTarget::function(id, move |_request, args| {
        runs.record(id);
        Response::template(context(args))
    })
}

/// Function view rendering a template with an empty context.
pub fn empty_page(runs: &Runs, id: &'static str) -> ViewTarget {
    page(runs, id, |_| RenderContext::new())
}

/// Subject built from one view argument.
pub fn arg_subject(
    key: &'static str,
    prefix: &'static str,
) -> impl Fn(&ViewCall<'_>) -> SubjectValue + Send + Sync + 'static {
    move |call: &ViewCall<'_>| format!("{}{}", prefix, call.args.get(key).unwrap_or_default()).into()
}

/// Class-style view used as an ancestor.
pub struct Dashboard {
    pub runs: Runs,
}

impl ClassView for Dashboard {
    fn dispatch(&self, _request: &Request, _args: &ViewArgs) -> Response {
        self.runs.record("shop.views.Dashboard");
        Response::template(RenderContext::new().with("widgets", json!(3)))
    }

    fn name(&self) -> String {
        "shop.views.Dashboard".to_string()
    }
}

/// The shop site.
pub struct Shop {
    pub router: BreadcrumbRouter,
    pub runs: Runs,
}

impl Shop {
    pub fn get(&self, path: &str) -> Result<Response> {
        self.router.handle(&Request::get(path))
    }

    pub fn get_with_query(&self, path: &str, query: &str) -> Result<Response> {
        self.router.handle(&Request::get(path).with_query(query))
    }

    /// Trail attached under the configured key.
    pub fn trail(&self, path: &str) -> Breadcrumbs {
        let response = self.get(path).unwrap();
        response
            .breadcrumbs(self.router.config().view_context_key())
            .cloned()
            .unwrap_or_else(|| panic!("no trail attached for {path}"))
    }
}

fn wrap(options: BreadcrumbOptions, target: ViewTarget) -> Handler {
    options.wrap(target).unwrap()
}

fn add(router: &mut BreadcrumbRouter, path: &str, name: &str, handler: impl Into<Handler>) {
    router
        .add_route(Route::new(path, handler).name(name))
        .unwrap();
}

/// Shop with default settings.
pub fn shop() -> Shop {
    shop_with_config(BreadcrumbConfig::default())
}

/// Shop with the given settings.
pub fn shop_with_config(config: BreadcrumbConfig) -> Shop {
    init_logging();
    let runs = Runs::default();
    let mut router = BreadcrumbRouter::with_config(config);

    // Customers > Customer > Order / Invoice
    let customer_list = wrap(
        BreadcrumbOptions::new().subject("Customers"),
        empty_page(&runs, "shop.views.customer_list"),
    );
    add(&mut router, "/customers/", "customer_list", customer_list.clone());

    add(
        &mut router,
        "/customers/:pk/",
        "customer_detail",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(|call| {
                    call.context_value("customer")
                        .and_then(|value| value.as_str())
                        .map_or(SubjectValue::Empty, Into::into)
                })
                .parent("customer_list")
                .get_params(["*", "-page"]),
            page(&runs, "shop.views.customer_detail", |args| {
                RenderContext::new().with(
                    "customer",
                    json!(format!("Customer {}", args.get("pk").unwrap_or_default())),
                )
            }),
        ),
    );

    add(
        &mut router,
        "/orders/:id/",
        "order_detail",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("id", "Order #"))
                .parent("customer_list"),
            empty_page(&runs, "shop.views.order_detail"),
        ),
    );

    add(
        &mut router,
        "/customers/:pk/orders/:id/",
        "customer_order",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("id", "Order #"))
                .parent("customer_detail")
                .parent_args(|call| {
                    ParentArgs::new(ViewArgs::keyword([(
                        "pk",
                        call.args.get("pk").unwrap_or_default(),
                    )]))
                }),
            empty_page(&runs, "shop.views.customer_order"),
        ),
    );

    add(
        &mut router,
        "/customers/:pk/invoices/:id/",
        "customer_invoice",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("id", "Invoice "))
                .parent("customer_detail")
                .parent_args(|call| {
                    ParentArgs::new(ViewArgs::keyword([(
                        "pk",
                        call.args.get("pk").unwrap_or_default(),
                    )]))
                    .context(RenderContext::new().with("customer", json!("Forwarded Customer")))
                }),
            empty_page(&runs, "shop.views.customer_invoice"),
        ),
    );

    add(
        &mut router,
        "/gift-cards/",
        "gift_cards",
        wrap(
            BreadcrumbOptions::new()
                .subject("Gift cards")
                .parent("shop.views.customer_list"),
            empty_page(&runs, "shop.views.gift_cards"),
        ),
    );

    add(
        &mut router,
        "/vouchers/",
        "vouchers",
        wrap(
            BreadcrumbOptions::new()
                .subject("Vouchers")
                .parent_view("customer_list", customer_list),
            empty_page(&runs, "shop.views.vouchers"),
        ),
    );

    add(
        &mut router,
        "/notes/:id/",
        "note_detail",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("id", "Note "))
                .parent_fn(|call| {
                    (call.args.get("id") != Some("0")).then(|| ParentRef::from("customer_list"))
                }),
            empty_page(&runs, "shop.views.note_detail"),
        ),
    );

    // Reports: statically known subject
    add(
        &mut router,
        "/reports/",
        "report_list",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(|_| "Reports".into())
                .static_subject(true),
            empty_page(&runs, "shop.views.report_list"),
        ),
    );
    add(
        &mut router,
        "/reports/:slug/",
        "report_detail",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("slug", ""))
                .parent("report_list"),
            empty_page(&runs, "shop.views.report_detail"),
        ),
    );

    // Catalog: a level without subject and a level with several
    add(
        &mut router,
        "/catalog/",
        "catalog",
        wrap(
            BreadcrumbOptions::new().subject("Catalog"),
            empty_page(&runs, "shop.views.catalog"),
        ),
    );
    add(
        &mut router,
        "/catalog/sale/",
        "sale",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(|_| SubjectValue::Empty)
                .parent("catalog"),
            empty_page(&runs, "shop.views.sale"),
        ),
    );
    add(
        &mut router,
        "/catalog/sale/:sku/",
        "sale_item",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("sku", ""))
                .parent("sale"),
            empty_page(&runs, "shop.views.sale_item"),
        ),
    );
    add(
        &mut router,
        "/compare/:a/:b/",
        "compare",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(|call| {
                    SubjectValue::Many(vec![
                        call.args.get("a").map(Subject::from),
                        None,
                        call.args.get("b").map(Subject::from),
                    ])
                })
                .parent("catalog"),
            empty_page(&runs, "shop.views.compare"),
        ),
    );

    // Short circuits
    add(
        &mut router,
        "/login/",
        "login",
        wrap(
            BreadcrumbOptions::new().subject_fn(|_| "Login".into()),
            ViewTarget::function("shop.views.login", |_, _| Response::redirect("/sso/")),
        ),
    );
    add(
        &mut router,
        "/readonly/",
        "readonly",
        wrap(
            BreadcrumbOptions::new().subject("Read only"),
            ViewTarget::function("shop.views.readonly", |_, _| Response::method_not_allowed()),
        ),
    );
    add(
        &mut router,
        "/checkout/",
        "checkout",
        wrap(
            BreadcrumbOptions::new().subject("Checkout").parent("login"),
            empty_page(&runs, "shop.views.checkout"),
        ),
    );

    // Broken and cyclic declarations
    add(
        &mut router,
        "/orphans/",
        "orphans",
        wrap(
            BreadcrumbOptions::new()
                .subject("Orphans")
                .parent("shop.views.deleted")
                .parent_args(|_| ParentArgs::new(ViewArgs::positional(["1"]))),
            empty_page(&runs, "shop.views.orphans"),
        ),
    );
    add(
        &mut router,
        "/loop/a/",
        "loop_a",
        wrap(
            BreadcrumbOptions::new().subject("A").parent("loop_b"),
            empty_page(&runs, "shop.views.loop_a"),
        ),
    );
    add(
        &mut router,
        "/loop/b/",
        "loop_b",
        wrap(
            BreadcrumbOptions::new().subject("B").parent("loop_a"),
            empty_page(&runs, "shop.views.loop_b"),
        ),
    );

    // Category tree: one view, parented on itself with the parent's key
    add(
        &mut router,
        "/categories/:pk/",
        "category",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("pk", "Cat "))
                .parent_fn(|call| {
                    call.args
                        .get_as::<u32>("pk")
                        .filter(|pk| *pk > 1)
                        .map(|_| ParentRef::from("category"))
                })
                .parent_args(|call| {
                    let pk = call.args.get_as::<u32>("pk").unwrap_or(1);
                    ParentArgs::new(ViewArgs::keyword([("pk", (pk - 1).to_string())]))
                }),
            empty_page(&runs, "shop.views.category"),
        ),
    );

    // Legacy views
    add(
        &mut router,
        "/brands/",
        "brands",
        LegacyView::new(empty_page(&runs, "shop.views.brands")).subject("Brands"),
    );
    add(
        &mut router,
        "/brands/:slug/",
        "brand_detail",
        wrap(
            BreadcrumbOptions::new()
                .subject_fn(arg_subject("slug", ""))
                .parent("brands"),
            empty_page(&runs, "shop.views.brand_detail"),
        ),
    );
    router.register_legacy(
        LegacyView::new(empty_page(&runs, "shop.legacy.home")).subject("Home"),
    );
    router.register_legacy(LegacyView::new(empty_page(&runs, "shop.legacy.blank")));
    add(
        &mut router,
        "/about/",
        "about",
        wrap(
            BreadcrumbOptions::new()
                .subject("About")
                .parent("shop.legacy.home"),
            empty_page(&runs, "shop.views.about"),
        ),
    );
    add(
        &mut router,
        "/press/",
        "press",
        wrap(
            BreadcrumbOptions::new()
                .subject("Press")
                .parent("shop.legacy.blank"),
            empty_page(&runs, "shop.views.press"),
        ),
    );

    // Class-style ancestor
    add(
        &mut router,
        "/dashboard/",
        "dashboard",
        wrap(
            BreadcrumbOptions::new().subject_fn(|call| {
                match call.context_value("widgets") {
                    Some(count) => format!("Dashboard ({count})").into(),
                    None => "Dashboard".into(),
                }
            }),
            ViewTarget::class(Dashboard { runs: runs.clone() }),
        ),
    );
    add(
        &mut router,
        "/dashboard/stats/",
        "dashboard_stats",
        wrap(
            BreadcrumbOptions::new().subject("Stats").parent("dashboard"),
            empty_page(&runs, "shop.views.dashboard_stats"),
        ),
    );

    // Not taking part in trails
    router
        .add_route(Route::new(
            "/health/",
            ViewTarget::function("shop.views.health", |_, _| Response::ok()),
        ))
        .unwrap();
    add(
        &mut router,
        "/status/",
        "status",
        ViewTarget::function("shop.views.status", |_, _| Response::ok()),
    );
    add(
        &mut router,
        "/status/detail/",
        "status_detail",
        wrap(
            BreadcrumbOptions::new().subject("Status detail").parent("status"),
            empty_page(&runs, "shop.views.status_detail"),
        ),
    );

    Shop { router, runs }
}
