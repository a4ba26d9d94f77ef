//! HTTP handler functions for the accident map API.

use std::collections::BTreeSet;

use accident_map_accident_models::{Metric, YearFilter};
use accident_map_render::{chart, map, table};
use accident_map_selection::{LassoPayload, SelectionManager, SelectionState};
use accident_map_server_models::{
    ApiHealth, ApiMetricOption, ApiOptions, ApiSelection, ApiYearOption, ChartQueryParams,
    FragmentRequest, YearQueryParams,
};
use actix_web::{HttpResponse, web};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Returns the year and metric choices for the dashboard controls.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    let years = state.dataset.years();

    let mut year_options: Vec<ApiYearOption> = years
        .iter()
        .map(|year| ApiYearOption {
            label: year.to_string(),
            value: YearFilter::Year(*year),
        })
        .collect();
    year_options.push(ApiYearOption {
        label: sum_label(&years),
        value: YearFilter::Sum,
    });

    let metrics = Metric::all()
        .iter()
        .map(|metric| ApiMetricOption {
            label: metric.label().to_string(),
            value: *metric,
        })
        .collect();

    HttpResponse::Ok().json(ApiOptions {
        years: year_options,
        default_year: state.config.default_year,
        metrics,
        nation_label: state.config.nation_label.clone(),
    })
}

/// `GET /api/selection`
pub async fn selection(state: web::Data<AppState>) -> HttpResponse {
    match current_selection(&state) {
        Ok(current) => HttpResponse::Ok().json(api_selection(current)),
        Err(response) => response,
    }
}

/// `POST /api/selection/lasso`
///
/// Replaces the selection with the districts inside a lasso gesture.
pub async fn lasso(
    state: web::Data<AppState>,
    payload: web::Json<LassoPayload>,
) -> HttpResponse {
    update_selection(&state, |manager, _| manager.apply_lasso(&payload))
}

/// `POST /api/selection/add`
pub async fn add_district(
    state: web::Data<AppState>,
    body: web::Json<FragmentRequest>,
) -> HttpResponse {
    update_selection(&state, |manager, current| manager.add(current, &body.fragment))
}

/// `POST /api/selection/remove`
pub async fn remove_district(
    state: web::Data<AppState>,
    body: web::Json<FragmentRequest>,
) -> HttpResponse {
    update_selection(&state, |manager, current| {
        manager.remove(current, &body.fragment)
    })
}

/// `GET /api/map`
///
/// Returns the heatmap title and figure for a year.
pub async fn map(state: web::Data<AppState>, params: web::Query<YearQueryParams>) -> HttpResponse {
    let year = match parse_year(params.year.as_deref(), state.config.default_year) {
        Ok(year) => year,
        Err(response) => return response,
    };
    let current = match current_selection(&state) {
        Ok(current) => current,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(map::render_map(
        &state.dataset,
        &current,
        year,
        &state.config.map,
    ))
}

/// `GET /api/chart`
///
/// Returns the comparison chart for the current selection.
pub async fn chart(
    state: web::Data<AppState>,
    params: web::Query<ChartQueryParams>,
) -> HttpResponse {
    let year = match parse_year(params.year.as_deref(), state.config.default_year) {
        Ok(year) => year,
        Err(response) => return response,
    };
    let metric = match parse_metric(params.metric.as_deref(), state.config.default_metric) {
        Ok(metric) => metric,
        Err(response) => return response,
    };
    let current = match current_selection(&state) {
        Ok(current) => current,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(chart::render_chart(
        &state.dataset,
        &state.cache,
        &current,
        year,
        metric,
        params.national.unwrap_or(false),
    ))
}

/// `GET /api/summary`
///
/// Returns the summary table, or the empty-selection message.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<YearQueryParams>,
) -> HttpResponse {
    let year = match parse_year(params.year.as_deref(), state.config.default_year) {
        Ok(year) => year,
        Err(response) => return response,
    };
    let current = match current_selection(&state) {
        Ok(current) => current,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(table::render_summary(
        &state.dataset,
        &current,
        year,
        &state.config.nation_label,
    ))
}

fn sum_label(years: &BTreeSet<u16>) -> String {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) if first != last => format!("{first}-{last}"),
        _ => "All years".to_string(),
    }
}

fn api_selection(state: SelectionState) -> ApiSelection {
    let districts: Vec<String> = state.districts().into_iter().map(str::to_string).collect();
    let message = districts
        .is_empty()
        .then(|| table::EMPTY_SELECTION_MESSAGE.to_string());
    ApiSelection {
        state,
        districts,
        message,
    }
}

fn current_selection(state: &AppState) -> Result<SelectionState, HttpResponse> {
    state.selection.lock().map(|s| s.clone()).map_err(|e| {
        log::error!("Selection lock poisoned: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Selection state unavailable"
        }))
    })
}

/// Applies a selection event and returns the new selection.
fn update_selection(
    state: &AppState,
    event: impl FnOnce(&SelectionManager<'_>, &SelectionState) -> SelectionState,
) -> HttpResponse {
    let manager = SelectionManager::new(state.dataset.registry());

    let Ok(mut current) = state.selection.lock() else {
        log::error!("Selection lock poisoned");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Selection state unavailable"
        }));
    };

    let next = event(&manager, &*current);
    log::debug!(
        "Selection changed from {} to {} districts",
        current.len(),
        next.len()
    );
    current.clone_from(&next);
    drop(current);

    HttpResponse::Ok().json(api_selection(next))
}

fn parse_year(raw: Option<&str>, default: YearFilter) -> Result<YearFilter, HttpResponse> {
    raw.map_or(Ok(default), |raw| {
        raw.parse::<YearFilter>().map_err(|e| {
            log::debug!("Rejected year parameter: {e}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Invalid year: {raw}")
            }))
        })
    })
}

fn parse_metric(raw: Option<&str>, default: Metric) -> Result<Metric, HttpResponse> {
    raw.map_or(Ok(default), |raw| {
        raw.parse::<Metric>().map_err(|_| {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Unknown metric: {raw}")
            }))
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use accident_map_accident_models::{AccidentRecord, Severity, SexOfDriver};
    use accident_map_database::Dataset;
    use accident_map_geography::registry::DistrictRegistry;
    use accident_map_geography_models::{District, DistrictBoundary};
    use actix_web::{App, test};

    use super::*;
    use crate::config::DashboardConfig;
    use crate::configure_api;

    fn record(district: &str, year: u16, sex: SexOfDriver) -> AccidentRecord {
        AccidentRecord {
            accident_index: format!("{district}-{year}"),
            district_name: district.to_string(),
            year,
            age_of_driver: Some(40),
            age_of_vehicle: Some(8),
            engine_capacity_cc: Some(1400),
            time_of_day: None,
            propulsion: None,
            sex_of_driver: Some(sex),
            area_type: None,
            drive_hand: None,
            severity: Severity::Moderate,
        }
    }

    fn dataset() -> Dataset {
        let names = [("Leeds", 500_000), ("Bristol", 400_000), ("Bradford", 300_000)];
        let registry = DistrictRegistry::new(names.map(|(name, population)| District {
            name: name.to_string(),
            population,
            latitude: 53.0,
            longitude: -1.5,
            display_label: name.to_string(),
        }));
        let boundaries = names
            .iter()
            .map(|(name, population)| DistrictBoundary {
                name: (*name).to_string(),
                population: *population,
                accidents_by_year: BTreeMap::from([(2017, 100), (2018, 150)]),
                accidents_total: 250,
                centroid: None,
                feature: serde_json::json!({"type": "Feature", "properties": {}, "geometry": null}),
            })
            .collect();
        let records = vec![
            record("Leeds", 2017, SexOfDriver::Male),
            record("Leeds", 2018, SexOfDriver::Female),
            record("Bristol", 2018, SexOfDriver::Male),
        ];
        Dataset::new(registry, records, boundaries)
    }

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(dataset(), DashboardConfig::default()))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn options_list_years_and_metrics() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/options").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["years"][0]["value"], "2017");
        assert_eq!(body["years"][2]["value"], "sum");
        assert_eq!(body["years"][2]["label"], "2017-2018");
        assert_eq!(body["metrics"].as_array().unwrap().len(), Metric::all().len());
        assert_eq!(body["nationLabel"], "England");
    }

    #[actix_web::test]
    async fn selection_starts_pristine() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/selection").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["state"]["status"], "pristine");
        assert_eq!(body["message"], table::EMPTY_SELECTION_MESSAGE);
    }

    #[actix_web::test]
    async fn lasso_add_and_remove_update_selection() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::post()
            .uri("/api/selection/lasso")
            .set_json(serde_json::json!({
                "points": [{"text": "Leeds<br>1"}, {"customdata": "Bristol"}]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["districts"], serde_json::json!(["Bristol", "Leeds"]));

        let req = test::TestRequest::post()
            .uri("/api/selection/add")
            .set_json(serde_json::json!({"fragment": "Bradf"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["districts"],
            serde_json::json!(["Bradford", "Bristol", "Leeds"])
        );

        // ambiguous between Bristol and Bradford
        let req = test::TestRequest::post()
            .uri("/api/selection/remove")
            .set_json(serde_json::json!({"fragment": "Br"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["districts"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::post()
            .uri("/api/selection/remove")
            .set_json(serde_json::json!({"value": "Leeds"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["districts"], serde_json::json!(["Bradford", "Bristol"]));
    }

    #[actix_web::test]
    async fn empty_lasso_clears_and_renders_placeholders() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::post()
            .uri("/api/selection/lasso")
            .set_json(serde_json::json!({"points": []}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["state"]["status"], "cleared");

        let req = test::TestRequest::get().uri("/api/chart").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["layout"]["title"]["text"], chart::PLACEHOLDER_TITLE);

        let req = test::TestRequest::get().uri("/api/summary").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["kind"], "message");
    }

    #[actix_web::test]
    async fn selection_survives_year_and_metric_changes() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::post()
            .uri("/api/selection/add")
            .set_json(serde_json::json!({"fragment": "Leeds"}))
            .to_request();
        let _: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        for uri in [
            "/api/chart?year=2017&metric=vehicle_age",
            "/api/chart?year=sum&metric=sex_of_driver&national=true",
            "/api/map?year=2018",
            "/api/summary?year=2018",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success(), "{uri} failed");
        }

        let req = test::TestRequest::get().uri("/api/selection").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["districts"], serde_json::json!(["Leeds"]));
    }

    #[actix_web::test]
    async fn summary_is_filtered_by_year() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::post()
            .uri("/api/selection/add")
            .set_json(serde_json::json!({"fragment": "Leeds"}))
            .to_request();
        let _: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/summary?year=2018").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["kind"], "table");
        assert_eq!(body["rows"][0][1], "1 (50.00%)");
        assert_eq!(body["rows"][0][2], "2");
        assert_eq!(body["rows"][2][1], "100.00%");
    }

    #[actix_web::test]
    async fn map_returns_title_and_figure() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/map?year=2018").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["title"],
            "Heatmap of population adjusted accident rate per district for 2018"
        );
        assert_eq!(body["figure"]["layout"]["dragmode"], "lasso");
        assert_eq!(body["figure"]["layout"]["mapbox"]["layers"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn invalid_parameters_are_bad_requests() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        for uri in [
            "/api/map?year=last",
            "/api/chart?metric=colour",
            "/api/summary?year=18",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST, "{uri}");
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }
}
