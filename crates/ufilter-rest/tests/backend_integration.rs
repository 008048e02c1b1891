//! Integration tests for `RestFilterBackend` against the `one_to_one` fixtures.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ufilter_core::ValidationError;
use ufilter_db::model::{Model, ModelMeta};
use ufilter_db::query::{Lookup, Q};
use ufilter_db::value::Value;
use ufilter_db::QuerySet;
use ufilter_filters::{
    FieldSelection, Filter, FilterContext, FilterSet, FilterSetClass, ModelFilterSet, StrictMode,
};
use ufilter_http::{HttpRequest, QueryDict};
use ufilter_rest::{
    exception_handler, ApiError, AsAny, ErrorDetail, FilterBackend, FilterView, GenericApiView, RestFilterBackend,
    ViewFilterConfig,
};
use ufilter_test::fixtures::one_to_one::{place_filter_set, Place, Restaurant};
use ufilter_test::RequestFactory;

struct TestView {
    config: ViewFilterConfig,
}

impl TestView {
    fn new(config: ViewFilterConfig) -> Self {
        Self { config }
    }
}

impl FilterView for TestView {
    fn filter_config(&self) -> ViewFilterConfig {
        self.config.clone()
    }
}

impl GenericApiView for TestView {}

/// Stands in for the filter engine: records how it was built and returns a
/// canned outcome from `filter`.
#[derive(Debug)]
struct StubFilterSetClass {
    model: &'static ModelMeta,
    outcome: Result<QuerySet, ValidationError>,
    builds: AtomicUsize,
    seen_context_keys: Mutex<Vec<String>>,
    seen_data: Mutex<Option<QueryDict>>,
}

impl StubFilterSetClass {
    fn new(model: &'static ModelMeta, outcome: Result<QuerySet, ValidationError>) -> Arc<Self> {
        Arc::new(Self {
            model,
            outcome,
            builds: AtomicUsize::new(0),
            seen_context_keys: Mutex::new(Vec::new()),
            seen_data: Mutex::new(None),
        })
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

struct StubFilterSet<'a> {
    class: &'a StubFilterSetClass,
    context: FilterContext<'a>,
    data: &'a QueryDict,
}

impl FilterSet for StubFilterSet<'_> {
    fn filter(&self, _queryset: QuerySet) -> Result<QuerySet, ValidationError> {
        self.class.outcome.clone()
    }

    fn context(&self) -> &FilterContext<'_> {
        &self.context
    }

    fn data(&self) -> &QueryDict {
        self.data
    }
}

impl FilterSetClass for StubFilterSetClass {
    fn model(&self) -> &'static ModelMeta {
        self.model
    }

    fn filters(&self) -> &[Filter] {
        &[]
    }

    fn build<'a>(&'a self, context: FilterContext<'a>, data: &'a QueryDict) -> Box<dyn FilterSet + 'a> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self.seen_context_keys.lock().unwrap() = context.keys().map(String::from).collect();
        *self.seen_data.lock().unwrap() = Some(data.clone());
        Box::new(StubFilterSet {
            class: self,
            context,
            data,
        })
    }
}

fn stub_view(stub: &Arc<StubFilterSetClass>) -> TestView {
    let class: Arc<dyn FilterSetClass> = stub.clone();
    TestView::new(ViewFilterConfig::new().filter_class(class))
}

fn fields_view(fields: FieldSelection) -> TestView {
    TestView::new(ViewFilterConfig::new().filter_fields(fields))
}

fn demon_dogs() -> QuerySet {
    Place::objects().filter(Q::filter("name", Lookup::Exact(Value::from("Demon Dogs"))))
}

// ── Resolving the filter class ─────────────────────────────────────────

#[test]
fn test_get_filter_class_supplied() {
    let view = TestView::new(
        ViewFilterConfig::new()
            .filter_class(place_filter_set())
            .filter_fields(FieldSelection::only(["name"])),
    );

    let filter_class = RestFilterBackend::new()
        .get_filter_class(&view, &Place::objects().all())
        .unwrap();

    assert!(Arc::ptr_eq(&filter_class, &place_filter_set()));
}

#[test]
fn test_get_filter_class_by_filter_fields() {
    let view = fields_view(FieldSelection::only(["name"]));

    let filter_class = RestFilterBackend::new()
        .get_filter_class(&view, &Place::objects().all())
        .unwrap();

    assert_eq!(filter_class.model(), Place::meta());
    assert_eq!(filter_class.declared_fields(), vec!["name"]);
}

#[test]
fn test_get_filter_class_all_fields() {
    let view = fields_view(FieldSelection::All);

    let filter_class = RestFilterBackend::new()
        .get_filter_class(&view, &Place::objects().all())
        .unwrap();

    assert_eq!(filter_class.model(), Place::meta());
    let keys: BTreeSet<&str> = filter_class.declared_fields().into_iter().collect();
    assert_eq!(
        keys,
        BTreeSet::from(["restaurant", "id", "name", "address"])
    );
}

#[test]
fn test_generated_filter_classes_are_not_cached() {
    let view = fields_view(FieldSelection::All);
    let backend = RestFilterBackend::new();
    let queryset = Place::objects().all();

    let first = backend.get_filter_class(&view, &queryset).unwrap();
    let second = backend.get_filter_class(&view, &queryset).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_generated_filter_class_follows_queryset_model() {
    let view = fields_view(FieldSelection::All);

    let filter_class = RestFilterBackend::new()
        .get_filter_class(&view, &Restaurant::objects().all())
        .unwrap();

    assert_eq!(filter_class.model(), Restaurant::meta());
    assert_eq!(
        filter_class.declared_fields(),
        vec!["place", "serves_hot_dogs", "serves_pizza", "waiter_set"]
    );
}

#[test]
fn test_get_filter_class_unconfigured() {
    let view = TestView::new(ViewFilterConfig::new());

    let err = RestFilterBackend::new()
        .get_filter_class(&view, &Place::objects().all())
        .unwrap_err();

    assert!(matches!(err, ApiError::ImproperlyConfigured(_)));
    assert!(err.to_string().contains("filter_class or filter_fields"));
}

// ── Context ────────────────────────────────────────────────────────────

#[test]
fn test_get_filter_context() {
    let context = RestFilterBackend::new().get_filter_context(&"request", &"view");

    assert_eq!(context.len(), 2);
    assert_eq!(context.get::<&str>("request"), Some(&"request"));
    assert_eq!(context.get::<&str>("view"), Some(&"view"));
}

#[test]
fn test_get_filter_context_binds_request_and_view() {
    let request = RequestFactory::new().get("/places/?name=x");
    let view = fields_view(FieldSelection::All);

    let context = RestFilterBackend::new().get_filter_context(&request, view.as_any());

    assert!(std::ptr::eq(context.get::<HttpRequest>("request").unwrap(), &request));
    assert!(std::ptr::eq(context.get::<TestView>("view").unwrap(), &view));
}

// ── Filtering ──────────────────────────────────────────────────────────

#[test]
fn test_filter_queryset_not_filtered() {
    let stub = StubFilterSetClass::new(Place::meta(), Ok(demon_dogs()));
    let request = RequestFactory::new().get("/");

    let result = RestFilterBackend::new().filter_queryset(&request, None, &stub_view(&stub));

    assert_eq!(result, Ok(None));
    assert_eq!(stub.builds(), 0);
}

#[test]
fn test_filter_queryset_not_filtered_even_when_unconfigured() {
    let request = RequestFactory::new().get("/");
    let view = TestView::new(ViewFilterConfig::new());

    assert_eq!(
        RestFilterBackend::new().filter_queryset(&request, None, &view),
        Ok(None)
    );
}

#[test]
fn test_filter_queryset_returns_engine_result() {
    let stub = StubFilterSetClass::new(Place::meta(), Ok(demon_dogs()));
    let request = RequestFactory::new().get("/places/?name=Demon+Dogs");

    let filtered = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &stub_view(&stub))
        .unwrap();

    assert_eq!(filtered, Some(demon_dogs()));
    assert_eq!(stub.builds(), 1);
    assert_eq!(*stub.seen_context_keys.lock().unwrap(), vec!["request", "view"]);
    assert_eq!(
        stub.seen_data.lock().unwrap().as_ref(),
        Some(request.query_params())
    );
}

#[test]
fn test_filter_queryset_invalid_query() {
    let stub = StubFilterSetClass::new(
        Place::meta(),
        Err(ValidationError::from_messages([("foo", vec!["bar"])])),
    );
    let request = RequestFactory::new().get("/");

    let err = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &stub_view(&stub))
        .unwrap_err();

    let detail = err.detail().expect("validation error detail");
    assert_eq!(
        serde_json::to_value(detail).unwrap(),
        serde_json::json!({"foo": ["bar"]})
    );
}

#[test]
fn test_filter_queryset_keeps_non_field_key() {
    let mut error = ValidationError::from_messages([("foo", vec!["bar"])]);
    error.message = "Filters conflict.".to_string();
    let stub = StubFilterSetClass::new(Place::meta(), Err(error.clone()));
    let request = RequestFactory::new().get("/");

    let err = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &stub_view(&stub))
        .unwrap_err();

    assert_eq!(err.detail().map(ErrorDetail::as_map), Some(&error.message_dict()));
    let body: serde_json::Value = serde_json::from_str(exception_handler(&err).content()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"__all__": ["Filters conflict."], "foo": ["bar"]})
    );
}

#[test]
#[should_panic(expected = "does not match queryset model")]
fn test_filter_queryset_supplied_model_mismatch() {
    let view = TestView::new(
        ViewFilterConfig::new()
            .filter_class(place_filter_set())
            .filter_fields(FieldSelection::only(["name"])),
    );
    let request = RequestFactory::new().get("/");

    let _ = RestFilterBackend::new().filter_queryset(
        &request,
        Some(Restaurant::objects().all()),
        &view,
    );
}

#[test]
fn test_filter_queryset_unconfigured() {
    let request = RequestFactory::new().get("/");
    let view = TestView::new(ViewFilterConfig::new());

    let err = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &view)
        .unwrap_err();

    assert!(matches!(err, ApiError::ImproperlyConfigured(_)));
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
}

// ── End to end with the real engine ───────────────────────────────────

#[test]
fn test_filter_fields_apply_query_params() {
    let request =
        RequestFactory::new().get_with_query("/places/", &[("name", "Demon Dogs"), ("page", "2")]);
    let view = fields_view(FieldSelection::only(["name"]));

    let filtered = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &view)
        .unwrap();

    assert_eq!(filtered, Some(demon_dogs()));
}

#[test]
fn test_explicit_filter_class_applies_lookups() {
    let request = RequestFactory::new().get("/places/?address__icontains=Street&restaurant__isnull=false");
    let view = TestView::new(ViewFilterConfig::new().filter_class(place_filter_set()));

    let filtered = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &view)
        .unwrap();

    let expected = Place::objects()
        .filter(Q::filter("address", Lookup::IContains("Street".into())))
        .filter(Q::filter("restaurant", Lookup::IsNull(false)));
    assert_eq!(filtered, Some(expected));
}

#[test]
fn test_strict_fail_translates_engine_errors() {
    let class: Arc<dyn FilterSetClass> = Arc::new(
        ModelFilterSet::new(Place::meta(), FieldSelection::All).with_strict_mode(StrictMode::Fail),
    );
    let view = TestView::new(ViewFilterConfig::new().filter_class(class));
    let request = RequestFactory::new().get("/places/?id=abc&restaurant__in=1,x&name=ok");

    let err = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &view)
        .unwrap_err();

    let response = exception_handler(&err);
    assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(response.content()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "id": ["Enter a whole number."],
            "restaurant__in": ["Enter a whole number."],
        })
    );
}

#[test]
fn test_strict_empty_returns_empty_queryset() {
    let class: Arc<dyn FilterSetClass> = Arc::new(
        ModelFilterSet::new(Place::meta(), FieldSelection::only(["id"]))
            .with_strict_mode(StrictMode::Empty),
    );
    let view = TestView::new(ViewFilterConfig::new().filter_class(class));
    let request = RequestFactory::new().get("/places/?id=abc");

    let filtered = RestFilterBackend::new()
        .filter_queryset(&request, Some(Place::objects().all()), &view)
        .unwrap()
        .unwrap();

    assert!(filtered.is_none());
}

#[test]
fn test_generic_api_view_runs_default_backend() {
    let view = fields_view(FieldSelection::All);
    let request = RequestFactory::new().get("/places/?id__in=1&id__in=2");

    let filtered = view
        .filter_queryset(&request, Some(Place::objects().all()))
        .unwrap();

    assert_eq!(
        filtered,
        Some(Place::objects().filter(Q::filter(
            "id",
            Lookup::In(vec![Value::Int(1), Value::Int(2)])
        )))
    );
}

// ── Backend pipeline ───────────────────────────────────────────────────

/// Narrows the queryset by `name == tag` and counts its calls.
struct TaggingBackend {
    tag: &'static str,
    calls: AtomicUsize,
}

impl TaggingBackend {
    fn new(tag: &'static str) -> Arc<Self> {
        Arc::new(Self {
            tag,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn condition(&self) -> Q {
        Q::filter("name", Lookup::Exact(Value::from(self.tag)))
    }
}

impl FilterBackend for TaggingBackend {
    fn filter_queryset(
        &self,
        _request: &HttpRequest,
        queryset: Option<QuerySet>,
        _view: &dyn FilterView,
    ) -> Result<Option<QuerySet>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(queryset.map(|qs| qs.filter(self.condition())))
    }
}

struct RejectingBackend;

impl FilterBackend for RejectingBackend {
    fn filter_queryset(
        &self,
        _request: &HttpRequest,
        _queryset: Option<QuerySet>,
        _view: &dyn FilterView,
    ) -> Result<Option<QuerySet>, ApiError> {
        Err(ApiError::from(ValidationError::from_messages([("q", vec!["rejected"])])))
    }
}

struct PipelineView {
    backends: Vec<Arc<dyn FilterBackend>>,
}

impl FilterView for PipelineView {
    fn filter_config(&self) -> ViewFilterConfig {
        ViewFilterConfig::new()
    }
}

impl GenericApiView for PipelineView {
    fn filter_backends(&self) -> Vec<Arc<dyn FilterBackend>> {
        self.backends.clone()
    }
}

#[test]
fn test_generic_api_view_threads_backends_in_order() {
    let first = TaggingBackend::new("first");
    let second = TaggingBackend::new("second");
    let view = PipelineView {
        backends: vec![
            first.clone() as Arc<dyn FilterBackend>,
            second.clone() as Arc<dyn FilterBackend>,
        ],
    };
    let request = RequestFactory::new().get("/");

    let filtered = view
        .filter_queryset(&request, Some(Place::objects().all()))
        .unwrap();

    assert_eq!(
        filtered,
        Some(
            Place::objects()
                .filter(first.condition())
                .filter(second.condition())
        )
    );
    assert_eq!((first.calls(), second.calls()), (1, 1));
}

#[test]
fn test_generic_api_view_stops_at_first_error() {
    let after = TaggingBackend::new("after");
    let view = PipelineView {
        backends: vec![
            Arc::new(RejectingBackend) as Arc<dyn FilterBackend>,
            after.clone() as Arc<dyn FilterBackend>,
        ],
    };
    let request = RequestFactory::new().get("/");

    let err = view
        .filter_queryset(&request, Some(Place::objects().all()))
        .unwrap_err();

    assert_eq!(err.detail().and_then(|d| d.get("q")), Some(&["rejected".to_string()][..]));
    assert_eq!(after.calls(), 0);
}
