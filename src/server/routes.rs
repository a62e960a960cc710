use crate::error::QueryError;
use crate::pipeline::{ListingsQuery, ListingsResponse};
use crate::server::AppState;
use axum::extract::{Extension, Query};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `GET /listings?lat=..&lon=..[&radius=..][&property_type=..]`
///
/// The search runs on its own task so a panic anywhere in it surfaces as a 500.
pub async fn listings_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<ListingsResponse>, QueryError> {
    let validated = query.validate(state.default_radius)?;

    let service = state.service.clone();
    let response = tokio::spawn(async move { service.search(&validated).await })
        .await
        .map_err(|e| QueryError::Internal(anyhow::Error::new(e)))?
        .map_err(QueryError::Internal)?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ListingsService;
    use crate::scrapers::finn::DEFAULT_ORIGIN;
    use crate::scrapers::{FinnSite, PageSource, PaginatedFetcher};
    use crate::server::build_app;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    const SALE_PAGE: &str = r#"<html><body>
        <article class="sf-search-ad">
            <h2 class="sf-realestate-heading"><a href="/realestate/homes/ad.html?finnkode=1">Solrik 2-roms</a></h2>
            <div class="flex justify-between"><span>50 m²</span><span>3 000 000 kr</span></div>
            <div class="text-xs s-text-subtle">Totalpris: 3 000 000 kr · 1 soverom</div>
        </article>
        <article class="sf-search-ad">
            <h2 class="sf-realestate-heading"><a href="/realestate/homes/ad.html?finnkode=2">Romslig 3-roms</a></h2>
            <div class="flex justify-between"><span>80 m²</span><span>4 000 000 kr</span></div>
            <div class="text-xs s-text-subtle">Totalpris: 4 000 000 kr · 2 soverom</div>
        </article>
        <article class="sf-search-ad">
            <h2 class="sf-realestate-heading"><a href="/realestate/homes/ad.html?finnkode=3">Hybel med egen inngang</a></h2>
        </article>
    </body></html>"#;

    const RENTAL_PAGE: &str = r#"<html><body>
        <article class="sf-search-ad">
            <h2 class="sf-realestate-heading"><a href="/realestate/lettings/ad.html?finnkode=9">Leilighet sentralt</a></h2>
            <div class="flex justify-between"><span>40 m²</span><span>12 000 kr</span></div>
            <div class="text-xs s-text-subtle">Leilighet · 1 soverom</div>
        </article>
    </body></html>"#;

    /// First page of each search comes from a fixture; later pages are empty
    struct FixtureSite {
        sale_page: &'static str,
        rental_page: &'static str,
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageSource for FixtureSite {
        async fn fetch_page(&self, url: &str, query: &[(String, String)]) -> Result<String> {
            self.urls.lock().unwrap().push(url.to_string());
            let first = query.iter().any(|(key, value)| key == "page" && value == "1");
            if !first {
                return Ok(String::new());
            }
            if url.contains("/lettings/") {
                Ok(self.rental_page.to_string())
            } else {
                Ok(self.sale_page.to_string())
            }
        }
    }

    struct PanickingSite;

    #[async_trait]
    impl PageSource for PanickingSite {
        async fn fetch_page(&self, _url: &str, _query: &[(String, String)]) -> Result<String> {
            panic!("page source blew up");
        }
    }

    fn app(source: Arc<dyn PageSource>) -> Router {
        let site = FinnSite::new(DEFAULT_ORIGIN).unwrap();
        let fetcher = PaginatedFetcher::with_delay(source, Duration::ZERO);
        let state = AppState {
            service: Arc::new(ListingsService::new(fetcher, site, 200)),
            default_radius: 500,
        };
        build_app(state, Duration::from_secs(30))
    }

    fn fixture(sale_page: &'static str, rental_page: &'static str) -> Arc<FixtureSite> {
        Arc::new(FixtureSite {
            sale_page,
            rental_page,
            urls: Mutex::new(Vec::new()),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_listings_with_yield() {
        let source = fixture(SALE_PAGE, RENTAL_PAGE);
        let (status, body) = get(app(source.clone()), "/listings?lat=59.91&lon=10.75&radius=500").await;

        assert_eq!(status, StatusCode::OK);
        let sales = body["buyListings"].as_array().unwrap();
        assert_eq!(sales.len(), 2);
        // 300 kr/m²: 50 m² → 15 000/month → 180 000/year → 6.00 %
        assert_eq!(sales[0]["estimated_rent_kr"], "15000.00");
        assert_eq!(sales[0]["yield_percentage"], "6.00");
        assert_eq!(sales[1]["yield_percentage"], "7.20");
        assert_eq!(
            body["bestOption"]["listing_url"],
            "https://www.finn.no/realestate/homes/ad.html?finnkode=2"
        );
        assert_eq!(body["rentalListings"][0]["price_per_sqm"], "300.00");
        assert_eq!(body["rentalListings"][0]["rental_price_kr"], "12000");
        assert_eq!(body["summary"]["avgRentPerSqm"], 300.0);

        let urls = source.urls.lock().unwrap().clone();
        assert!(urls.iter().any(|url| url.ends_with("/realestate/homes/search.html")));
        assert!(urls.iter().any(|url| url.ends_with("/realestate/lettings/search.html")));
    }

    #[tokio::test]
    async fn test_no_sale_listings_is_an_empty_result() {
        let source = fixture("<html></html>", RENTAL_PAGE);
        let (status, body) = get(app(source.clone()), "/listings?lat=59.91&lon=10.75").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["buyListings"], serde_json::json!([]));
        assert_eq!(body["rentalListings"], serde_json::json!([]));
        assert!(body["bestOption"].is_null());
        // the rental search is never attempted
        assert!(source
            .urls
            .lock()
            .unwrap()
            .iter()
            .all(|url| url.contains("/homes/")));
    }

    #[tokio::test]
    async fn test_no_rental_listings_is_an_empty_result() {
        let (status, body) = get(app(fixture(SALE_PAGE, "<html></html>")), "/listings?lat=59.91&lon=10.75").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["buyListings"], serde_json::json!([]));
        assert!(body["bestOption"].is_null());
    }

    #[tokio::test]
    async fn test_radius_out_of_range_is_rejected() {
        for radius in ["50", "1500"] {
            let uri = format!("/listings?lat=59.91&lon=10.75&radius={radius}");
            let (status, body) = get(app(fixture(SALE_PAGE, RENTAL_PAGE)), &uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Ugyldig 'radius' parameter. Må være mellom 100 og 1000.");
        }
    }

    #[tokio::test]
    async fn test_missing_coordinates_are_rejected_before_fetching() {
        let source = fixture(SALE_PAGE, RENTAL_PAGE);
        let (status, body) = get(app(source.clone()), "/listings?lon=10.75").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Mangler 'lat' eller 'lon' parameter.");
        assert!(source.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panic_in_search_is_internal_error() {
        let (status, body) = get(app(Arc::new(PanickingSite)), "/listings?lat=59.91&lon=10.75").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(fixture(SALE_PAGE, RENTAL_PAGE)), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
