//! End-to-end tests: scrape against a mock archive, then run the feature
//! tooling over the artifacts, using only the public API.

use script_dl::config::{Config, FetchConfig, OutputConfig, PoolConfig};
use script_dl::{Reporter, ScriptScraper, features, join};
use tempfile::tempdir;
use tokio::io::BufReader;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(endpoint: String, out_dir: std::path::PathBuf) -> Config {
    Config {
        fetch: FetchConfig {
            endpoint,
            ..Default::default()
        },
        pool: PoolConfig {
            workers: 4,
            ..Default::default()
        },
        output: OutputConfig {
            output_dir: out_dir,
        },
    }
}

#[tokio::test]
async fn scrape_then_generate_and_join_features() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Alien.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><pre>In space the egg waits</pre></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Heat.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><pre>The heist goes loud</pre></body></html>",
        ))
        .mount(&server)
        .await;

    let out = tempdir().unwrap();
    let report_path = out.path().join("report.log");
    let reporter = Reporter::new(tokio::fs::File::create(&report_path).await.unwrap());

    let scraper = ScriptScraper::with_reporter(
        test_config(server.uri(), out.path().to_path_buf()),
        reporter,
    )
    .unwrap();

    let stats = scraper
        .run(BufReader::new(&b"Alien, R, sci-fi\nHeat, R, crime\n"[..]))
        .await
        .unwrap();
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.total(), 2);

    let report = std::fs::read_to_string(&report_path).unwrap();
    let mut lines: Vec<&str> = report.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["success:\tAlien", "success:\tHeat"]);

    assert_eq!(
        std::fs::read_to_string(out.path().join("alien.txt")).unwrap(),
        "In space the egg waits"
    );
    assert_eq!(
        std::fs::read_to_string(out.path().join("alien.meta")).unwrap(),
        "Alien, R, sci-fi\n"
    );

    // Feature generation over the scraped artifacts
    std::fs::remove_file(&report_path).unwrap();
    let feature_dir = tempdir().unwrap();
    let processed = features::generate_all(out.path(), feature_dir.path()).unwrap();
    assert_eq!(processed, 2);

    let alien_csv =
        std::fs::read_to_string(feature_dir.path().join("features-alien.csv")).unwrap();
    assert!(alien_csv.starts_with("content_rating,"));
    assert!(alien_csv.contains("egg"));
    assert!(alien_csv.contains("space_the"));

    // Join with no percentage filtering: every feature survives
    let joined = join::join_directory(feature_dir.path(), 0, 100).unwrap();
    let lines: Vec<&str> = joined.lines().collect();
    assert!(lines[0].starts_with("title,content_rating,"));
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("alien, R,"));
    assert!(lines[2].starts_with("heat, R,"));
}

#[tokio::test]
async fn rerun_skips_existing_titles_and_leaves_artifacts_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<pre>FADE IN:</pre>"))
        .mount(&server)
        .await;

    let out = tempdir().unwrap();
    let report_path = out.path().join("report.log");

    for run in 0..2 {
        let reporter = Reporter::new(tokio::fs::File::create(&report_path).await.unwrap());
        let scraper = ScriptScraper::with_reporter(
            test_config(server.uri(), out.path().to_path_buf()),
            reporter,
        )
        .unwrap();
        let stats = scraper
            .run(BufReader::new(&b"Jaws, PG, shark\n"[..]))
            .await
            .unwrap();

        if run == 0 {
            assert_eq!(stats.succeeded, 1);
        } else {
            assert_eq!(stats.succeeded, 0);
            assert_eq!(stats.skipped, 1);
            let report = std::fs::read_to_string(&report_path).unwrap();
            assert_eq!(report, "failure:\tJaws\tscript already found\n");
        }
    }

    assert_eq!(
        std::fs::read_to_string(out.path().join("jaws.txt")).unwrap(),
        "FADE IN:"
    );
}

#[tokio::test]
async fn invalid_configuration_fails_before_the_pipeline_starts() {
    let out = tempdir().unwrap();
    let mut config = test_config("not a url".to_string(), out.path().to_path_buf());
    config.pool.workers = 4;

    assert!(ScriptScraper::new(config).is_err());
}
