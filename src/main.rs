// Entrypoint for the CLI application.
// - An optional first argument names the catalog file (`.csv` selects
//   the CSV backend).
// - Everything else is configured through the environment, see `config`.

use movie_catalog::{
    api::OmdbClient,
    config::Config,
    logging,
    storage::open_storage,
    ui::{main_menu, App},
};

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let config = Config::from_env(std::env::args().nth(1));
    let storage = open_storage(config.movies_file.clone(), config.backend);
    let api = OmdbClient::new(config.omdb_url.clone(), config.api_key.clone())?;

    // Blocks until the user quits.
    main_menu(&App {
        storage,
        api,
        config,
    })?;
    Ok(())
}
