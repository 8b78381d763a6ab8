//! End-to-end crawl tests against canned catalog pages.

use showgraph_core::{CrawlConfig, ShowId, WriterId};
use showgraph_crawler::{CatalogUrls, CrawlController, CrawlState, EntryOutcome};
use showgraph_db::{credits, leads, shows, writers, Database};
use showgraph_fetch::StaticFetcher;
use std::sync::Arc;
use std::time::{Duration, Instant};

const BASE: &str = "https://catalog.test";

fn urls() -> CatalogUrls {
    CatalogUrls::new(BASE).expect("valid base URL")
}

fn show_id(id: &str) -> ShowId {
    ShowId::new(id).expect("valid show ID")
}

fn writer_id(id: &str) -> WriterId {
    WriterId::new(id).expect("valid writer ID")
}

fn config(seeds: &[&str], max_depth: u32) -> CrawlConfig {
    CrawlConfig {
        seed_titles: seeds.iter().map(ToString::to_string).collect(),
        max_depth,
        ..CrawlConfig::default().without_delays()
    }
}

async fn database() -> Arc<Database> {
    Arc::new(
        Database::open_and_migrate(":memory:")
            .await
            .expect("create database"),
    )
}

fn search_page(id: &str, text: &str) -> String {
    format!(
        r#"<html><body><ul class="find-results">
            <li><a href="/title/{id}/?ref_=fn_tt_tt_1">{text}</a></li>
        </ul></body></html>"#
    )
}

fn empty_search_page() -> String {
    r#"<html><body><div class="find-no-results">No results found</div></body></html>"#.to_string()
}

fn title_page(id: &str, title: &str, years: &str) -> String {
    format!(
        r#"<html><body>
            <h1 data-testid="hero__pageTitle"><span>{title}</span></h1>
            <a href="/title/{id}/releaseinfo?ref_=tt_ov_rdat">{years}</a>
        </body></html>"#
    )
}

/// Credits page with an embedded payload; items are `(id, name, role, episodes)`.
fn credits_page(items: &[(&str, &str, &str, u32)]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|(id, name, role, episodes)| {
            format!(
                r#"{{"id":"{id}","rowTitle":"{name}","attributes":"{role}","episodicCreditData":{{"episodeCount":{episodes}}}}}"#
            )
        })
        .collect();

    format!(
        r#"<html><body><script id="__NEXT_DATA__" type="application/json">
            {{"props":{{"pageProps":{{"contentData":{{"categories":[
                {{"name":"Writers","section":{{"items":[{}]}}}}
            ]}}}}}}}}
        </script></body></html>"#,
        items.join(",")
    )
}

/// Writer profile listing `(id, title)` pairs in the writing section.
fn profile_page(credits: &[(&str, &str)]) -> String {
    let anchors: String = credits
        .iter()
        .map(|(id, title)| format!(r#"<li><a href="/title/{id}/?ref_=nm_flmg_wr">{title}</a></li>"#))
        .collect();

    format!(
        r#"<html><body><div data-testid="nm-flmg-cat-writer"><ul>{anchors}</ul></div></body></html>"#
    )
}

/// Scrubs with three writers, one of them listed under two role strings.
fn scrubs_fetcher() -> StaticFetcher {
    let urls = urls();
    let scrubs = show_id("tt0285403");

    StaticFetcher::new()
        .with_page(
            urls.search_url("Scrubs").expect("search url"),
            search_page("tt0285403", "Scrubs (2001–2010)"),
        )
        .with_page(urls.title_url(&scrubs), title_page("tt0285403", "Scrubs", "2001–2010"))
        .with_page(
            urls.credits_url(&scrubs),
            credits_page(&[
                ("nm0488939", "Bill Lawrence", "created by", 5),
                ("nm0001234", "Neil Goldman", "written by", 12),
                ("nm0488939", "Bill Lawrence", "written by", 8),
                ("nm0005678", "Garrett Donovan", "written by", 12),
            ]),
        )
}

#[tokio::test]
async fn test_scrubs_end_to_end() {
    let db = database().await;
    let fetcher = Arc::new(scrubs_fetcher());
    let controller = CrawlController::new(config(&["Scrubs"], 0), urls(), fetcher.clone(), db.clone());

    let report = controller.run().await;

    assert_eq!(report.entries.len(), 1);
    assert_eq!(
        report.entries[0].outcome,
        EntryOutcome::Resolved {
            show_id: show_id("tt0285403"),
            title: "Scrubs".to_string(),
        }
    );
    assert_eq!(report.entries[0].writers_linked, 3);

    let stored_shows = shows::list_shows(db.pool()).await.expect("list shows");
    assert_eq!(stored_shows.len(), 1);
    assert_eq!(stored_shows[0].imdb_id.as_str(), "tt0285403");
    assert_eq!(stored_shows[0].year_start, Some(2001));
    assert_eq!(stored_shows[0].year_end, Some(2010));

    let stored_writers = writers::list_writers(db.pool()).await.expect("list writers");
    assert_eq!(stored_writers.len(), 3);

    let stored_credits = credits::writers_for_show(db.pool(), stored_shows[0].id)
        .await
        .expect("list credits");
    let lawrence = stored_credits
        .iter()
        .find(|c| c.writer_name == "Bill Lawrence")
        .expect("Bill Lawrence credited");
    assert_eq!(lawrence.episode_count, Some(8));
    assert_eq!(lawrence.role.as_deref(), Some("created by"));

    // Depth 0 never visits writer profiles
    assert!(fetcher.requests().iter().all(|url| !url.contains("/name/")));
}

#[tokio::test]
async fn test_entry_at_max_depth_does_not_expand() {
    let db = database().await;
    let fetcher = Arc::new(scrubs_fetcher());
    let controller = CrawlController::new(config(&["Scrubs"], 0), urls(), fetcher, db.clone());

    let report = controller.run().await;
    let entry = &report.entries[0];

    assert!(!entry.expanded_other_shows());
    assert_eq!(entry.leads_enqueued, 0);
    assert_eq!(
        entry.transitions,
        vec![
            CrawlState::Pending,
            CrawlState::Resolving,
            CrawlState::ExpandingWriters,
            CrawlState::Done,
        ]
    );
    assert!(leads::list_leads(db.pool()).await.expect("list leads").is_empty());
}

#[tokio::test]
async fn test_other_shows_are_recorded_as_leads() {
    let db = database().await;
    let urls = urls();
    let fetcher = Arc::new(
        scrubs_fetcher()
            .with_page(
                urls.name_url(&writer_id("nm0488939")),
                profile_page(&[("tt1441109", "Cougar Town"), ("tt0285403", "Scrubs")]),
            )
            .with_page(
                urls.name_url(&writer_id("nm0001234")),
                profile_page(&[("tt1441109", "Cougar Town"), ("tt0460649", "How I Met Your Mother")]),
            )
            .with_page(urls.name_url(&writer_id("nm0005678")), profile_page(&[])),
    );
    let controller = CrawlController::new(config(&["Scrubs"], 1), urls.clone(), fetcher.clone(), db.clone());

    let report = controller.run().await;

    // Leads are informational by default: only the seed is processed
    assert_eq!(report.entries.len(), 1);
    let entry = &report.entries[0];
    assert!(entry.expanded_other_shows());
    assert_eq!(entry.leads_enqueued, 3);

    let stored_leads = leads::list_leads(db.pool()).await.expect("list leads");
    assert_eq!(stored_leads.len(), 3);
    assert!(stored_leads.iter().all(|lead| lead.depth == 1));
    assert!(stored_leads.iter().all(|lead| lead.imdb_id.as_str() != "tt0285403"));
    assert_eq!(fetcher.request_count(&urls.title_url(&show_id("tt1441109"))), 0);
}

#[tokio::test]
async fn test_follow_leads_skips_visited_shows() {
    let db = database().await;
    let urls = urls();
    let cougar = show_id("tt1441109");
    let fetcher = Arc::new(
        scrubs_fetcher()
            .with_page(
                urls.name_url(&writer_id("nm0488939")),
                profile_page(&[("tt1441109", "Cougar Town"), ("tt0285403", "Scrubs")]),
            )
            .with_page(
                urls.name_url(&writer_id("nm0001234")),
                profile_page(&[("tt1441109", "Cougar Town")]),
            )
            .with_page(urls.name_url(&writer_id("nm0005678")), profile_page(&[]))
            .with_page(urls.title_url(&cougar), title_page("tt1441109", "Cougar Town", "2009–2015"))
            .with_page(
                urls.credits_url(&cougar),
                credits_page(&[("nm0488939", "Bill Lawrence", "created by", 102)]),
            ),
    );

    let mut crawl = config(&["Scrubs", "Scrubs"], 1);
    crawl.follow_leads = true;
    let controller = CrawlController::new(crawl, urls.clone(), fetcher.clone(), db.clone());

    let report = controller.run().await;

    assert_eq!(report.entries.len(), 3);
    assert_eq!(
        report.entries[1].outcome,
        EntryOutcome::AlreadyVisited {
            show_id: show_id("tt0285403"),
        }
    );

    let lead_entry = &report.entries[2];
    assert_eq!(lead_entry.depth, 1);
    assert_eq!(lead_entry.title, "Cougar Town");
    assert!(matches!(lead_entry.outcome, EntryOutcome::Resolved { .. }));
    assert!(!lead_entry.expanded_other_shows());

    // Each show page is fetched once; leads never go through search
    assert_eq!(fetcher.request_count(&urls.title_url(&cougar)), 1);
    assert_eq!(fetcher.request_count(&urls.title_url(&show_id("tt0285403"))), 1);
    assert!(fetcher
        .requests()
        .iter()
        .all(|url| !url.contains("Cougar")));

    let overlaps = credits::writer_overlap(db.pool()).await.expect("overlap");
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].writer_name, "Bill Lawrence");
    assert_eq!(overlaps[0].shows, vec!["Cougar Town", "Scrubs"]);
}

#[tokio::test]
async fn test_not_found_and_transport_errors_do_not_abort_run() {
    let db = database().await;
    let urls = urls();
    let ted = show_id("tt1235547");
    let fetcher = Arc::new(
        scrubs_fetcher()
            .with_page(urls.search_url("Qwxyz").expect("search url"), empty_search_page())
            .with_page(
                urls.search_url("Better Off Ted").expect("search url"),
                search_page("tt1235547", "Better Off Ted (2009–2010)"),
            )
            .with_page(urls.title_url(&ted), title_page("tt1235547", "Better Off Ted", "2009–2010"))
            .with_timeout(urls.credits_url(&ted)),
    );
    let controller = CrawlController::new(
        config(&["Qwxyz", "Better Off Ted", "Missing Page", "Scrubs"], 0),
        urls,
        fetcher,
        db.clone(),
    );

    let report = controller.run().await;

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.entries[0].outcome, EntryOutcome::NotFound);
    assert!(matches!(report.entries[1].outcome, EntryOutcome::Error { .. }));
    // Unregistered search URL answers 404
    assert!(matches!(report.entries[2].outcome, EntryOutcome::Error { .. }));
    assert!(matches!(report.entries[3].outcome, EntryOutcome::Resolved { .. }));
    assert_eq!(report.not_found(), 1);
    assert_eq!(report.errors(), 2);
    assert!(report
        .entries
        .iter()
        .all(|e| e.transitions.last() == Some(&CrawlState::Done)));

    // Writes completed before the failure stay persisted
    let stored_shows = shows::list_shows(db.pool()).await.expect("list shows");
    let titles: Vec<&str> = stored_shows.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Better Off Ted", "Scrubs"]);
}

#[tokio::test]
async fn test_profile_failure_downgrades_entry_but_keeps_credits() {
    let db = database().await;
    let urls = urls();
    let fetcher = Arc::new(
        scrubs_fetcher().with_status(urls.name_url(&writer_id("nm0488939")), 503),
    );
    let controller = CrawlController::new(config(&["Scrubs"], 1), urls, fetcher, db.clone());

    let report = controller.run().await;
    let entry = &report.entries[0];

    assert!(matches!(entry.outcome, EntryOutcome::Error { ref message } if message.contains("503")));
    assert_eq!(entry.writers_linked, 3);
    assert_eq!(
        writers::list_writers(db.pool()).await.expect("list writers").len(),
        3
    );
}

#[tokio::test]
async fn test_detail_page_without_fields_keeps_search_result() {
    let db = database().await;
    let urls = urls();
    let scrubs = show_id("tt0285403");
    let fetcher = Arc::new(
        scrubs_fetcher().with_page(urls.title_url(&scrubs), "<html><body></body></html>"),
    );
    let controller = CrawlController::new(config(&["Scrubs"], 0), urls, fetcher, db.clone());

    controller.run().await;

    let stored = shows::get_by_imdb_id(db.pool(), &scrubs)
        .await
        .expect("query show")
        .expect("show stored");
    assert_eq!(stored.title, "Scrubs");
    assert_eq!(stored.year_start, Some(2001));
    assert_eq!(stored.year_end, None);
}

#[tokio::test]
async fn test_credits_markup_fallback_when_payload_is_malformed() {
    let db = database().await;
    let urls = urls();
    let scrubs = show_id("tt0285403");
    let credits_markup = r#"
        <html><body>
            <script id="__NEXT_DATA__" type="application/json">{"props": {"pageProps": </script>
            <h4 class="dataHeaderWithBorder">Writing Credits</h4>
            <table class="simpleTable">
                <tr><td class="name"><a href="/name/nm0488939/">Bill Lawrence</a></td>
                    <td class="credit">(created by) (182 episodes, 2001-2010)</td></tr>
            </table>
        </body></html>
    "#;
    let fetcher = Arc::new(scrubs_fetcher().with_page(urls.credits_url(&scrubs), credits_markup));
    let controller = CrawlController::new(config(&["Scrubs"], 0), urls, fetcher, db.clone());

    let report = controller.run().await;
    assert_eq!(report.entries[0].writers_linked, 1);

    let stored = writers::list_writers(db.pool()).await.expect("list writers");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Bill Lawrence");
}

#[tokio::test]
async fn test_entry_ceiling_drops_remaining_frontier() {
    let db = database().await;
    let fetcher = Arc::new(scrubs_fetcher());
    let mut crawl = config(&["Scrubs", "Cougar Town", "Spin City"], 0);
    crawl.max_entries = 1;
    let controller = CrawlController::new(crawl, urls(), fetcher, db);

    let report = controller.run().await;

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.dropped, 2);
}

#[tokio::test]
async fn test_delays_are_applied_between_seeds() {
    let db = database().await;
    let fetcher = Arc::new(scrubs_fetcher());
    let mut crawl = config(&["Scrubs", "Scrubs"], 0);
    crawl.seed_delay = Duration::from_millis(40);
    crawl.politeness_delay = Duration::from_millis(20);
    let controller = CrawlController::new(crawl, urls(), fetcher, db);

    let started = Instant::now();
    controller.run().await;

    // One politeness pause for the resolved seed, one seed pause before the second
    assert!(started.elapsed() >= Duration::from_millis(60));
}
