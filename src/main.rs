use actix_web::middleware::{Logger, from_fn};
use actix_web::{App, HttpServer, web};
use env_logger::Env;

use pushkind_library::auth::{TokenService, authorize};
use pushkind_library::bootstrap;
use pushkind_library::db::{establish_connection_pool, run_migrations};
use pushkind_library::models::config::ServerConfig;
use pushkind_library::repository::DieselRepository;
use pushkind_library::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => match run_migrations(&mut conn) {
            Ok(applied) => {
                for version in applied {
                    log::info!("Applied migration {version}");
                }
            }
            Err(e) => {
                log::error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("Failed to get database connection: {e}");
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);
    if let Err(e) = bootstrap::seed(server_config.bootstrap_admin.as_ref(), &repo) {
        log::error!("Bootstrap failed: {e}");
        std::process::exit(1);
    }

    let tokens = web::Data::new(TokenService::new(&server_config.jwt));
    let repo = web::Data::new(repo);
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting server on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(authorize))
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(tokens.clone())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
