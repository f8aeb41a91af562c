// tests/api_dashboard.rs
//
// HTTP-level tests for reports, analytics, sources, alerts, settings and
// health routes.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::{ArticleSeed, TestApp};
use newsdesk_common::db::models::Alert;
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn health_and_readiness() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn metrics_route_reports_disabled_without_recorder() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_list_newest_first_with_pagination() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.report("Monday digest", now - Duration::days(2)).await;
    app.report("Tuesday digest", now - Duration::days(1)).await;
    app.report("Wednesday digest", now).await;

    let (status, body) = app.get("/api/reports?limit=2").await;
    assert_eq!(status, StatusCode::OK);

    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["title"], "Wednesday digest");
    assert_eq!(reports[1]["title"], "Tuesday digest");
    assert_eq!(body["hasMore"], true);
    assert_eq!(body["pagination"]["total"], 3);

    let (_, body) = app.get("/api/reports?page=1&limit=2").await;
    assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], false);

    let (_, body) = app.get("/api/reports?type=weekly").await;
    assert!(body["reports"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reports_list_degrades_to_empty_page_on_backend_error() {
    // No tables at all: every query fails
    let app = TestApp::without_schema().await;

    let (status, body) = app.get("/api/reports").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reports"].as_array().unwrap().is_empty());
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["pagination"]["total"], 0);

    // Other routes surface the failure without leaking driver detail
    let (status, body) = app.get("/api/articles").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database query failed");
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn reports_list_with_huge_page_is_an_empty_page() {
    let app = TestApp::new().await;
    app.report("Daily brief", Utc::now()).await;

    let (status, body) = app.get("/api/reports?page=18446744073709551615&limit=20").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reports"].as_array().unwrap().is_empty());
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn malformed_report_id_gets_json_error() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/reports/42").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn report_detail_orders_articles_by_importance() {
    let app = TestApp::new().await;
    let source = app.source("Ars Technica", 2).await;
    let minor = app.article(ArticleSeed::new("Minor item").by(&source)).await;
    let lead = app.article(ArticleSeed::new("Lead story").by(&source)).await;
    let report = app.report("Daily brief", Utc::now()).await;
    app.place(&report, &minor, 0.3).await;
    app.place(&report, &lead, 0.95).await;

    let (status, body) = app.get(&format!("/api/reports/{}", report.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["title"], "Daily brief");

    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0]["article"]["title"], "Lead story");
    assert_eq!(articles[0]["article"]["source"]["name"], "Ars Technica");
    assert_eq!(articles[0]["importanceScore"], 0.95);
    assert_eq!(articles[1]["section"], "headlines");

    let (status, body) = app.get(&format!("/api/reports/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Report not found");
}

#[tokio::test]
async fn analytics_window_and_cost_totals() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let source = app.source("Wired", 2).await;

    app.cost("analysis", 0.25, now - Duration::hours(1)).await;
    app.cost("analysis", 0.50, now - Duration::days(3)).await;
    app.cost("report", 1.25, now - Duration::days(3)).await;
    // Outside a 7 day window
    app.cost("analysis", 9.00, now - Duration::days(20)).await;

    app.system_metric(0.98, now - Duration::hours(2)).await;
    app.system_metric(0.96, now - Duration::days(1)).await;

    app.source_stats(&source, 1, 20, 15).await;
    app.source_stats(&source, 2, 10, 10).await;

    app.article(ArticleSeed::new("recent")).await;
    app.article(ArticleSeed::new("older").published(now - Duration::days(30))).await;
    app.report("digest", now - Duration::days(1)).await;

    let (status, body) = app.get("/api/analytics?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"]["days"], 7);

    let totals = &body["totalMetrics"];
    let total_cost = totals["totalCost"].as_f64().unwrap();
    assert!((total_cost - 2.0).abs() < 1e-9);
    assert_eq!(totals["totalArticles"], 1);
    let volume = body["dailyArticles"].as_array().unwrap();
    assert_eq!(volume.len(), 1);
    assert_eq!(volume[0]["articles"], 1);
    assert_eq!(totals["totalReports"], 1);
    assert!((totals["uptime"].as_f64().unwrap() - 97.0).abs() < 1e-9);
    assert!((totals["avgProcessingTimeMs"].as_f64().unwrap() - 250.0).abs() < 1e-9);

    let daily = body["dailyCosts"].as_array().unwrap();
    let summed: f64 = daily.iter().map(|d| d["cost"].as_f64().unwrap()).sum();
    assert!((summed - total_cost).abs() < 1e-9);

    let today = now.date_naive();
    let window_start = today - Duration::days(7);
    for day in daily {
        let date: NaiveDate = day["date"].as_str().unwrap().parse().unwrap();
        assert!(date >= window_start && date <= today, "{date} outside window");
    }
    let dates: Vec<&str> = daily.iter().map(|d| d["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let breakdown = body["costBreakdown"].as_array().unwrap();
    assert_eq!(breakdown[0]["operationType"], "report");

    let performance = body["sourcePerformance"].as_array().unwrap();
    assert_eq!(performance.len(), 1);
    assert_eq!(performance[0]["name"], "Wired");
    assert_eq!(performance[0]["articlesFetched"], 30);
    assert_eq!(performance[0]["articlesProcessed"], 25);
    let rate = performance[0]["successRate"].as_f64().unwrap();
    assert!((rate - 25.0 / 30.0 * 100.0).abs() < 1e-9);

    assert!((body["latestSnapshot"]["success_rate"].as_f64().unwrap() - 0.98).abs() < 1e-9);
}

#[tokio::test]
async fn analytics_without_samples_reports_null_uptime() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"]["days"], 30);
    assert!(body["totalMetrics"]["uptime"].is_null());
    assert_eq!(body["totalMetrics"]["totalCost"], 0.0);
    assert!(body["dailyCosts"].as_array().unwrap().is_empty());
    assert!(body["latestSnapshot"].is_null());
}

#[tokio::test]
async fn analytics_rejects_out_of_range_days() {
    let app = TestApp::new().await;

    for days in ["0", "366", "-3"] {
        let (status, body) = app.get(&format!("/api/analytics?days={days}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
        assert_eq!(body["field"], "days");
    }

    let (status, _) = app.get("/api/analytics?days=week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sources_carry_health_and_filters() {
    let app = TestApp::new().await;
    app.source("Reuters", 1).await;
    app.source("Aggregator", 3).await;

    let (status, body) = app.get("/api/sources").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["sources"][0]["source"]["name"], "Reuters");
    assert_eq!(body["sources"][0]["health"], "healthy");
    assert_eq!(body["sources"][0]["tierLabel"], "Premium");

    let (_, body) = app.get("/api/sources?tier=3").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["sources"][0]["source"]["name"], "Aggregator");
}

#[tokio::test]
async fn alerts_filter_by_acknowledgement() {
    let app = TestApp::new().await;
    let now = Utc::now();

    for (title, acknowledged, age) in [("budget", true, 2), ("outage", false, 1), ("spike", false, 0)] {
        Alert {
            id: Uuid::new_v4(),
            alert_type: "system".into(),
            severity: "warning".into(),
            title: title.into(),
            message: None,
            article_id: None,
            acknowledged,
            created_at: (now - Duration::hours(age)).fixed_offset(),
        }
        .into_active_model()
        .reset_all()
        .insert(&app.db)
        .await
        .unwrap();
    }

    let (_, body) = app.get("/api/alerts?acknowledged=false").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["alerts"][0]["title"], "spike");

    let (_, body) = app.get("/api/alerts?limit=1").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn settings_defaults_then_persisted_updates() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"]["daily_limit"], 10.0);
    assert_eq!(body["processing"]["fetch_interval_minutes"], 60);

    let (status, body) = app
        .put_json(
            "/api/settings/budget",
            json!({ "daily_limit": 5.0, "monthly_limit": 100.0, "alert_threshold_percent": 90 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alert_threshold_percent"], 90);

    // Second write replaces the first
    app.put_json("/api/settings/budget", json!({ "daily_limit": 7.5, "monthly_limit": 100.0 }))
        .await;

    let (_, body) = app.get("/api/settings").await;
    assert_eq!(body["budget"]["daily_limit"], 7.5);
    assert_eq!(body["budget"]["alert_threshold_percent"], 80);
    assert_eq!(body["processing"]["batch_size"], 50);

    let (status, body) = app.get("/api/settings/budget").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_limit"], 7.5);
}

#[tokio::test]
async fn settings_reject_unknown_sections_and_bad_values() {
    let app = TestApp::new().await;

    let (status, body) = app.put_json("/api/settings/billing", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SETTINGS_SECTION_NOT_FOUND");

    let (status, _) = app
        .put_json("/api/settings/processing", json!({ "batch_size": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put_json(
            "/api/settings/notifications",
            json!({ "email_recipients": ["nobody"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored
    let (_, body) = app.get("/api/settings").await;
    assert_eq!(body["processing"]["batch_size"], 50);
}
