use httpmock::prelude::*;
use prework_toolkit::core::{ConfigProvider, OutputFormat};
use prework_toolkit::{EtlEngine, LocalStorage, RankingsPipeline, RankingsTomlConfig, ToolkitError};
use tempfile::TempDir;

fn ranking_item(rating: &str, reviews: &str, filled: usize, desc: &str) -> String {
    let price: String = (0..4)
        .map(|i| {
            if i < filled {
                r#"<span class="dollar filled">$</span>"#
            } else {
                r#"<span class="dollar">$</span>"#
            }
        })
        .collect();
    format!(
        r#"<li class="ranking-item">
             <span class="ranking-item__rating--value">{rating}</span>
             <span class="ranking-item__rating--count">{reviews}</span>
             <div class="ranking-item__price">{price}</div>
             <div class="ranking-item__desc">
               <p>{desc}</p>
             </div>
           </li>"#
    )
}

fn ranking_page(items: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Rankings</title></head><body><ol>{}</ol></body></html>",
        items.concat()
    )
}

fn toml_config(base_url: &str, output_path: &str, topics: &[&str], extra_load: &str) -> RankingsTomlConfig {
    let topics = topics
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");
    let content = format!(
        r#"
[source]
base_url = "{base_url}"
topics = [{topics}]
timeout_seconds = 5
retry_attempts = 1
retry_delay_ms = 1

[load]
output_path = "{output_path}"
output_formats = ["csv", "tsv", "json"]
{extra_load}
"#
    );
    RankingsTomlConfig::from_toml_str(&content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_rankings_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let coding = server.mock(|when, then| {
        when.method(GET).path("/rankings/best-coding-bootcamps");
        then.status(200).header("Content-Type", "text/html").body(ranking_page(&[
            ranking_item("4.97", "3,120 reviews", 4, "Immersive full-stack program."),
            ranking_item("4.85", "940 reviews", 3, "Part-time evening courses."),
        ]));
    });
    let security = server.mock(|when, then| {
        when.method(GET).path("/rankings/best-cyber-security-bootcamps");
        then.status(200).header("Content-Type", "text/html").body(ranking_page(&[
            ranking_item("4.6", "75 reviews", 2, "Security operations track."),
        ]));
    });

    let config = toml_config(
        &server.url("/rankings/"),
        &output_path,
        &["best-coding-bootcamps", "best-cyber-security-bootcamps"],
        "",
    );

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = RankingsPipeline::new(storage, config).unwrap();
    let engine = EtlEngine::new_with_monitoring(pipeline, false);

    let result = engine.run().await.unwrap();

    coding.assert_hits(1);
    security.assert_hits(1);
    assert_eq!(result, output_path);

    let csv = std::fs::read_to_string(temp_dir.path().join("rankings.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "topic,ranking,rating,reviews,cost,summary");
    assert_eq!(
        lines[1],
        "best-coding-bootcamps,1,4.97,3120,4,Immersive full-stack program."
    );
    assert_eq!(
        lines[3],
        "best-cyber-security-bootcamps,1,4.6,75,2,Security operations track."
    );

    assert!(temp_dir.path().join("rankings.tsv").exists());

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("rankings.json")).unwrap(),
    )
    .unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for key in ["ranking", "rating", "reviews", "cost", "summary"] {
        assert!(records[0].get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(records[1]["ranking"], 2);
    assert_eq!(records[1]["summary"], "Part-time evening courses.");
}

#[tokio::test]
async fn test_end_to_end_compressed_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/rankings/best-online-bootcamps");
        then.status(200)
            .body(ranking_page(&[ranking_item("5.0", "12 reviews", 1, "Remote only.")]));
    });

    let config = toml_config(
        &server.url("/rankings/"),
        &output_path,
        &["best-online-bootcamps"],
        "compress = true",
    );
    assert!(config.compress());

    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new(RankingsPipeline::new(storage, config).unwrap());

    let result = engine.run().await.unwrap();

    page.assert();
    assert!(result.ends_with("rankings.zip"));
    assert!(!temp_dir.path().join("rankings.csv").exists());

    let zip_data = std::fs::read(temp_dir.path().join("rankings.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 3);

    let mut csv_content = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("rankings.csv").unwrap(),
        &mut csv_content,
    )
    .unwrap();
    assert!(csv_content.contains("best-online-bootcamps,1,5.0,12,1,Remote only."));
}

#[tokio::test]
async fn test_end_to_end_with_missing_page() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let ok = server.mock(|when, then| {
        when.method(GET).path("/rankings/best-coding-bootcamps");
        then.status(200)
            .body(ranking_page(&[ranking_item("4.9", "10 reviews", 2, "Fine.")]));
    });
    let gone = server.mock(|when, then| {
        when.method(GET).path("/rankings/best-web-design-bootcamps");
        then.status(404);
    });

    let config = toml_config(
        &server.url("/rankings/"),
        &output_path,
        &["best-coding-bootcamps", "best-web-design-bootcamps"],
        "",
    );

    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new(RankingsPipeline::new(storage, config).unwrap());

    let err = engine.run().await.unwrap_err();

    ok.assert_hits(1);
    gone.assert_hits(1);
    assert!(matches!(err, ToolkitError::HttpStatusError { status: 404, .. }));
    assert_eq!(err.severity().exit_code(), 2);
    assert!(!temp_dir.path().join("rankings.csv").exists());
}

#[tokio::test]
async fn test_missing_field_stays_with_its_item() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    // 第一頁的第一項少了評分；後面的評分不應被往前移
    let first = ranking_page(&[
        r#"<li class="ranking-item">
             <span class="ranking-item__rating--count">50 reviews</span>
             <div class="ranking-item__price"><span class="filled"></span></div>
             <div class="ranking-item__desc">First A.</div>
           </li>"#
            .to_string(),
        ranking_item("4.9", "100 reviews", 3, "First B."),
    ]);
    let second = ranking_page(&[ranking_item("3.3", "7 reviews", 1, "Second A.")]);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/r/one");
        then.status(200).body(first);
    });
    server.mock(|when, then| {
        when.method(GET).path("/r/two");
        then.status(200).body(second);
    });

    let mut config = toml_config(&server.url("/r/"), &output_path, &["one", "two"], "");
    config.load.output_formats = vec!["json".to_string()];
    assert_eq!(config.output_formats(), vec![OutputFormat::Json]);

    let storage = LocalStorage::new(output_path.clone());
    EtlEngine::new(RankingsPipeline::new(storage, config).unwrap())
        .run()
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("rankings.json")).unwrap(),
    )
    .unwrap();
    let records = json.as_array().unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["summary"], "First A.");
    assert!(records[0]["rating"].is_null());
    assert_eq!(records[0]["reviews"], 50);
    assert_eq!(records[1]["summary"], "First B.");
    assert_eq!(records[1]["rating"], 4.9);
    assert_eq!(records[1]["cost"], 3);
    assert_eq!(records[2]["topic"], "two");
    assert_eq!(records[2]["ranking"], 1);
    assert_eq!(records[2]["rating"], 3.3);
}
