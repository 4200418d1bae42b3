use super::*;

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["ukaddr", "search", "ML3 0HS"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref query,
            limit: None,
            google: false,
            lat: None,
            lng: None,
            plain: false,
        } if query == "ML3 0HS"
    ));
}

#[test]
fn parses_search_with_google_and_proximity() {
    let cli = Cli::try_parse_from([
        "ukaddr", "search", "Barrack Street", "--google", "--limit", "3", "--lat", "55.77",
        "--lng", "-4.03",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            limit,
            google,
            lat,
            lng,
            ..
        } => {
            assert_eq!(limit, Some(3));
            assert!(google);
            assert_eq!(lat.zip(lng), Some((55.77, -4.03)));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn lat_without_lng_is_rejected() {
    assert!(Cli::try_parse_from(["ukaddr", "search", "Hamilton", "--lat", "55.7"]).is_err());
}

#[test]
fn parses_postcode_lookup() {
    let cli = Cli::try_parse_from(["ukaddr", "postcode", "ML3 0HS", "--lookup"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Postcode { lookup: true, .. }
    ));
}

#[test]
fn parses_classify_and_place() {
    assert!(matches!(
        Cli::try_parse_from(["ukaddr", "classify", "sw1a1aa"]).map(|c| c.command),
        Ok(Commands::Classify { .. })
    ));
    assert!(matches!(
        Cli::try_parse_from(["ukaddr", "place", "ChIJ-abc"]).map(|c| c.command),
        Ok(Commands::Place { .. })
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["ukaddr"]).is_err());
}

#[test]
fn search_options_carry_limit_and_proximity() {
    let options = commands::search_options(Some(2), Some((55.0, -4.0)));
    assert_eq!(options.limit(), 2);
    assert_eq!(
        options.proximity,
        Some(ukaddr_core::Coordinates { lat: 55.0, lng: -4.0 })
    );
    assert!(!options.use_google_places);
}

#[test]
fn plain_line_shows_icon_place_and_provider() {
    let suggestion = ukaddr_providers::local_db::search(&ukaddr_core::classify("ML3 0HS"), 1)
        .pop()
        .expect("static record");
    assert_eq!(
        commands::plain_line(&suggestion),
        "\u{1f3ec} 1 Barrack Street, Office 2.18, Hamilton, ML3 0HS [uk-database]"
    );
}
