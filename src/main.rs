#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

mod error;
mod hash;
mod models;
mod resource;
mod schema;
mod secret;
mod session;
mod store;

use actix_identity::{CookieIdentityPolicy, IdentityService};
use actix_web::{middleware, web, App, HttpServer, Scope};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use lazy_static::lazy_static;
use log::{error, info};
use ring::rand::SystemRandom;

static DATABASE_URL: &'static str = "DATABASE_URL";
static DOMAIN: &'static str = "DOMAIN";
static BIND_ADDR: &'static str = "BIND_ADDR";

lazy_static! {
    pub static ref RNG: SystemRandom = SystemRandom::new();
}

embed_migrations!();

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions;

// WAL keeps concurrent readers off the writer's lock; the busy timeout lets
// a second writer wait out an in-flight signup instead of failing with a
// lock error, so duplicate signups surface as unique-constraint conflicts.
impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

fn build_pool(db_url: &str) -> Pool {
    let manager = ConnectionManager::<SqliteConnection>::new(db_url);
    r2d2::Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .expect("Pool creation failed.")
}

fn api_scope() -> Scope {
    web::scope("/api")
        .service(web::resource("/register").route(web::post().to_async(resource::register)))
        .service(
            web::resource("/auth")
                .route(web::post().to_async(resource::login))
                .route(web::delete().to(resource::logout))
                .route(web::get().to(resource::me)),
        )
}

/// API Guide (keep updated!)
/// - /api/register
///     - POST { username, password }: register user
/// - /api/auth
///     - POST { username, password }: log user in
///     - DELETE: log user out
///     - GET: username of the current session
fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "dashgate=info,actix_web=info");
    }
    env_logger::init();

    let db_url = match std::env::var(DATABASE_URL) {
        Ok(v) => v,
        Err(e) => {
            error!("{}: {}", DATABASE_URL, e);
            std::process::exit(1);
        }
    };

    let pool = build_pool(&db_url);

    let conn = pool.get().expect("Pool checkout failed.");
    if let Err(e) = embedded_migrations::run(&*conn) {
        error!("Failed to provision credential store: {}", e);
        std::process::exit(1);
    }
    drop(conn);

    let domain = std::env::var(DOMAIN).unwrap_or("localhost".to_string());
    let bind_addr = std::env::var(BIND_ADDR).unwrap_or("localhost:8080".to_string());

    info!("Starting HTTP server on {}...", bind_addr);

    HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .wrap(middleware::Logger::default())
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&*secret::COOKIE_KEY)
                    .name("auth-cookie")
                    .path("/")
                    .domain(domain.as_str())
                    .max_age_time(chrono::Duration::days(1))
                    .secure(false),
            ))
            .data(web::JsonConfig::default().limit(4096))
            .service(api_scope())
    })
    .bind(bind_addr.as_str())?
    .run()
}
