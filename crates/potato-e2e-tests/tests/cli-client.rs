use potato_cli::client::CatalogClient;
use potato_dal::{game::CreateGame, genre::CreateGenre};
use potato_e2e_tests::{prepare_env, spawn_server};
use tracing_test::traced_test;

fn game(title: &str, genre: &str) -> CreateGame {
    CreateGame {
        title: Some(title.to_string()),
        publisher: Some("Spud Games".to_string()),
        genre: Some(CreateGenre::new(genre)),
        ..Default::default()
    }
}

#[tokio::test]
#[traced_test]
async fn test_client_import_and_query() {
    let (args, _config_guard) = prepare_env("test_client_import_and_query").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();
    let client = CatalogClient::new(base_url);

    let games = vec![
        game("Mashed Racer", "Racing"),
        game("Fry Fighter", "Fighting"),
        game("Tater Tactics", "Strategy"),
    ];
    for chunk in games.chunks(2) {
        let response = client.bulk_create(chunk).await.unwrap();
        assert!(response.success);
        assert_eq!("bulk update successful", response.message);
    }

    let mut names = client
        .genres()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(vec!["Fighting", "Racing", "Strategy"], names);

    let found = client.search("FIGHT").await.unwrap();
    assert_eq!(1, found.len());
    assert_eq!(Some("Fry Fighter"), found[0].title.as_deref());

    let found = client.search("spud").await.unwrap();
    assert_eq!(3, found.len());
}

#[tokio::test]
#[traced_test]
async fn test_client_reports_server_error() {
    let (args, _config_guard) = prepare_env("test_client_reports_server_error").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();
    let client = CatalogClient::new(base_url);

    let err = client.game(4242).await.unwrap_err();
    assert!(err.to_string().contains("404"), "unexpected error {err}");
    assert!(err.to_string().contains("Game not found"));

    let unreachable = CatalogClient::new("http://127.0.0.1:9/".parse().unwrap());
    assert!(unreachable.genres().await.is_err());
}
